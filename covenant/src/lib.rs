//! # Covenant
//!
//! Covenant is an observer library built around explicit subscription ownership, plus the worker
//! threads that consume it.
//!
//! ## Key Features
//!
//! - **Contracts**: every subscription is a move-only handle; dropping it unsubscribes
//! - **Scoped blocking**: suppress or coalesce notifications for the lifetime of a blocker
//! - **Derived containers**: keyed events, typed events, state-entry callbacks, observable values
//! - **Persistent workers**: named threads looping over subscribed steps until stopped
//!
//! ## Core Concepts
//!
//! - **ContractProvider**: owns the jobs of one notification channel and triggers them in order
//! - **Contract**: the subscriber's handle on one job; resign, relinquish or drop it
//! - **Blocker**: an Ignore or Delay window on a provider
//! - **PersistentWorker**: preparation steps once per start, execution steps on every iteration
//! - **WorkerSet**: named workers plus a main loop returning an exit code
//!
//! ## Example
//!
//! ```rust
//! use covenant::*;
//! use std::sync::mpsc;
//!
//! let mut worker = PersistentWorker::new("producer");
//! let frames: ContractProvider<u32> = ContractProvider::new();
//! let (tx, rx) = mpsc::channel();
//! let _forward = frames.subscribe_job(tx);
//!
//! let stop = worker.stop_handle();
//! let _step = {
//!     let counter = std::sync::atomic::AtomicU32::new(0);
//!     worker.add_execution_step(move || {
//!         let frame = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
//!         frames.trigger(frame);
//!         if frame == 4 {
//!             stop.stop();
//!         }
//!     })
//! };
//!
//! worker.start().unwrap();
//! worker.join().unwrap();
//! assert_eq!(rx.try_iter().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
//! ```

pub use covenant_contract as contract;
pub use covenant_worker as worker;

pub use covenant_contract::{
    ActivableObject, BlockMode, Blocker, Contract, ContractError, ContractProvider, DispatchError, EventDispatcher, EventNotifier,
    IntoJob, Job, ObservableValue, StatefulObject,
};
pub use covenant_worker::{PersistentWorker, QuitHandle, StopHandle, Thread, ThreadConfig, ThreadError, WorkerSet, WorkerSetConfig};
