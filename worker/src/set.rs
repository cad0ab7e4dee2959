use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use covenant_contract::{Contract, ContractProvider};
use tracing::{debug, error, info, info_span};

use crate::config::WorkerSetConfig;
use crate::error::ThreadError;
use crate::persistent::PersistentWorker;

/// A group of named [`PersistentWorker`]s plus a main loop driven on the thread calling [`WorkerSet::run`].
///
/// Steps are registered by worker name. The name from [`WorkerSetConfig::main_thread_name`] refers
/// to the main loop; any other name creates a secondary worker on first use.
pub struct WorkerSet {
    config: WorkerSetConfig,
    workers: BTreeMap<String, PersistentWorker>,
    main_preparation: ContractProvider,
    main_execution: ContractProvider,
    quit: QuitHandle,
}

/// Ends a running [`WorkerSet`] with an exit code. Cloneable and usable from any thread or step.
#[derive(Clone, Debug)]
pub struct QuitHandle {
    running: Arc<AtomicBool>,
    exit_code: Arc<AtomicI32>,
}

impl QuitHandle {
    fn new() -> Self { Self { running: Arc::new(AtomicBool::new(false)), exit_code: Arc::new(AtomicI32::new(0)) } }

    pub fn quit(&self, code: i32) {
        self.exit_code.store(code, Ordering::Release);
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool { self.running.load(Ordering::Acquire) }

    fn reset(&self) {
        self.exit_code.store(0, Ordering::Release);
        self.running.store(true, Ordering::Release);
    }

    fn code(&self) -> i32 { self.exit_code.load(Ordering::Acquire) }
}

impl Default for WorkerSet {
    fn default() -> Self { Self::new(WorkerSetConfig::default()) }
}

impl WorkerSet {
    /// Exit code of a run ended by a panicking step
    pub const PANIC_EXIT_CODE: i32 = 101;

    pub fn new(config: WorkerSetConfig) -> Self {
        Self {
            config,
            workers: BTreeMap::new(),
            main_preparation: ContractProvider::new(),
            main_execution: ContractProvider::new(),
            quit: QuitHandle::new(),
        }
    }

    pub fn config(&self) -> &WorkerSetConfig { &self.config }

    /// The secondary worker with this name, created on first use
    pub fn worker(&mut self, name: &str) -> &mut PersistentWorker {
        self.workers.entry(name.to_string()).or_insert_with(|| PersistentWorker::with_config(self.config.thread_config(name)))
    }

    pub fn worker_names(&self) -> impl Iterator<Item = &str> { self.workers.keys().map(String::as_str) }

    pub fn add_preparation_step<F>(&mut self, name: &str, step: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        if name == self.config.main_thread_name {
            return self.add_main_preparation_step(step);
        }
        self.worker(name).add_preparation_step(step)
    }

    pub fn add_execution_step<F>(&mut self, name: &str, step: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        if name == self.config.main_thread_name {
            return self.add_main_execution_step(step);
        }
        self.worker(name).add_execution_step(step)
    }

    pub fn add_main_preparation_step<F>(&self, step: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.main_preparation.subscribe_notify(step)
    }

    pub fn add_main_execution_step<F>(&self, step: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.main_execution.subscribe_notify(step)
    }

    pub fn quit_handle(&self) -> QuitHandle { self.quit.clone() }

    pub fn quit(&self, code: i32) { self.quit.quit(code); }

    pub fn is_running(&self) -> bool { self.quit.is_running() }

    /// Starts every secondary worker, then drives the main loop on the calling thread until
    /// [`Self::quit`] is called. Secondary workers are stopped and joined before returning.
    ///
    /// A panic in a main step ends the run with [`Self::PANIC_EXIT_CODE`]. A panicked secondary
    /// worker is logged and turns a zero exit code into [`Self::PANIC_EXIT_CODE`] too.
    pub fn run(&mut self) -> Result<i32, ThreadError> {
        self.quit.reset();

        let started = self.workers.values_mut().try_for_each(PersistentWorker::start);
        if let Err(err) = started {
            self.quit.quit(Self::PANIC_EXIT_CODE);
            self.join_workers();
            return Err(err);
        }
        info!(workers = self.workers.len(), "worker set running");

        let outcome = {
            let _span = info_span!("thread", name = %self.config.main_thread_name).entered();
            let running = &self.quit.running;
            let (preparation, execution) = (&self.main_preparation, &self.main_execution);
            std::panic::catch_unwind(AssertUnwindSafe(|| {
                preparation.trigger(());
                while running.load(Ordering::Acquire) {
                    execution.trigger(());
                }
            }))
        };
        if let Err(payload) = outcome {
            error!("{}", ThreadError::panicked(&self.config.main_thread_name, payload));
            self.quit.quit(Self::PANIC_EXIT_CODE);
        }

        let mut code = self.quit.code();
        if !self.join_workers() && code == 0 {
            code = Self::PANIC_EXIT_CODE;
        }
        info!(code, "worker set finished");
        Ok(code)
    }

    // Returns false if any worker ended with an error
    fn join_workers(&mut self) -> bool {
        for worker in self.workers.values() {
            worker.stop();
        }
        let mut clean = true;
        for worker in self.workers.values_mut() {
            if let Err(err) = worker.join() {
                error!("{err}");
                clean = false;
            } else {
                debug!(name = %worker.name(), "worker joined");
            }
        }
        clean
    }
}

impl std::fmt::Debug for WorkerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerSet")
            .field("main", &self.config.main_thread_name)
            .field("workers", &self.workers.keys().collect::<Vec<_>>())
            .field("running", &self.is_running())
            .finish()
    }
}
