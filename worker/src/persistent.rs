use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use covenant_contract::{Contract, ContractProvider};
use tracing::{debug, info_span, trace, warn};

use crate::config::ThreadConfig;
use crate::error::ThreadError;
use crate::thread::Thread;

/// A thread running a loop of subscribed steps until stopped.
///
/// Every run triggers the preparation steps once, then triggers the execution steps over and over
/// while the worker is running. There is no delay between iterations; execution steps pace
/// themselves. A worker can be started again after it was stopped and joined, which runs the
/// preparation steps again.
///
/// ```rust
/// use covenant_worker::PersistentWorker;
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
///
/// let mut worker = PersistentWorker::new("ticker");
/// let ticks = Arc::new(AtomicUsize::new(0));
/// let stop = worker.stop_handle();
/// let _step = {
///     let ticks = ticks.clone();
///     worker.add_execution_step(move || {
///         if ticks.fetch_add(1, Ordering::SeqCst) == 9 {
///             stop.stop();
///         }
///     })
/// };
///
/// worker.start().unwrap();
/// worker.join().unwrap();
/// assert_eq!(ticks.load(Ordering::SeqCst), 10);
/// ```
pub struct PersistentWorker {
    thread: Thread,
    preparation: Arc<ContractProvider>,
    execution: Arc<ContractProvider>,
    running: Arc<AtomicBool>,
}

/// Requests a [`PersistentWorker`] to leave its loop. Cloneable and usable from any thread,
/// including from within the worker's own steps.
#[derive(Clone, Debug)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) { self.running.store(false, Ordering::Release); }

    pub fn is_running(&self) -> bool { self.running.load(Ordering::Acquire) }
}

// Clears the running flag when the loop exits, including by panic
struct ClearOnExit<'a>(&'a AtomicBool);

impl Drop for ClearOnExit<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!("step panicked, worker loop ended");
        }
        self.0.store(false, Ordering::Release);
    }
}

impl PersistentWorker {
    pub fn new(name: impl Into<String>) -> Self { Self::with_config(ThreadConfig::new(name)) }

    pub fn with_config(config: ThreadConfig) -> Self {
        let preparation = Arc::new(ContractProvider::new());
        let execution = Arc::new(ContractProvider::new());
        let running = Arc::new(AtomicBool::new(false));

        let body = {
            let name = config.name.clone();
            let preparation = preparation.clone();
            let execution = execution.clone();
            let running = running.clone();
            move || {
                let _span = info_span!("thread", name = %name).entered();
                let _clear = ClearOnExit(&running);

                trace!("preparing");
                preparation.trigger(());
                while running.load(Ordering::Acquire) {
                    execution.trigger(());
                }
                debug!("worker loop left");
            }
        };

        Self { thread: Thread::with_config(config, body), preparation, execution, running }
    }

    pub fn name(&self) -> &str { self.thread.name() }

    /// Subscribes a step run once at the beginning of every run
    pub fn add_preparation_step<F>(&self, step: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.preparation.subscribe_notify(step)
    }

    /// Subscribes a step run on every iteration of the loop
    pub fn add_execution_step<F>(&self, step: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.execution.subscribe_notify(step)
    }

    pub fn preparation_jobs(&self) -> &ContractProvider { &self.preparation }

    pub fn execution_jobs(&self) -> &ContractProvider { &self.execution }

    /// Starts a new run. A worker that is still running is stopped and joined first.
    pub fn start(&mut self) -> Result<(), ThreadError> {
        if self.thread.is_joinable() {
            self.stop();
            if let Err(err) = self.thread.join() {
                warn!("previous run ended badly: {err}");
            }
        }

        // set before spawning so a stop() issued right after start() is never lost
        self.running.store(true, Ordering::Release);
        if let Err(err) = self.thread.start() {
            self.running.store(false, Ordering::Release);
            return Err(err);
        }
        debug!(name = %self.name(), "worker started");
        Ok(())
    }

    /// Asks the loop to end after the current pass. Does not wait for it; use [`Self::join`].
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            debug!(name = %self.name(), "worker stop requested");
        }
    }

    /// Stops the worker and waits for its thread to exit
    pub fn join(&mut self) -> Result<(), ThreadError> {
        self.stop();
        self.thread.join()
    }

    pub fn is_running(&self) -> bool { self.running.load(Ordering::Acquire) }

    pub fn is_joinable(&self) -> bool { self.thread.is_joinable() }

    pub fn stop_handle(&self) -> StopHandle { StopHandle { running: self.running.clone() } }
}

impl Drop for PersistentWorker {
    // the inner Thread joins on drop; without stopping first that join would never return
    fn drop(&mut self) { self.stop(); }
}

impl std::fmt::Debug for PersistentWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentWorker")
            .field("name", &self.name())
            .field("running", &self.is_running())
            .field("preparation_steps", &self.preparation.len())
            .field("execution_steps", &self.execution.len())
            .finish()
    }
}
