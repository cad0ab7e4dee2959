use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, error, warn};

use crate::config::ThreadConfig;
use crate::error::ThreadError;

/// A named, restartable thread running a fixed callback.
///
/// Nothing runs until [`Thread::start`]. Starting again joins the previous run first, so at most
/// one OS thread is ever outstanding. Dropping a joinable thread joins it rather than detaching it.
pub struct Thread {
    config: ThreadConfig,
    callback: Arc<dyn Fn() + Send + Sync + 'static>,
    handle: Option<JoinHandle<()>>,
}

impl Thread {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where F: Fn() + Send + Sync + 'static {
        Self::with_config(ThreadConfig::new(name), callback)
    }

    pub fn with_config<F>(config: ThreadConfig, callback: F) -> Self
    where F: Fn() + Send + Sync + 'static {
        Self { config, callback: Arc::new(callback), handle: None }
    }

    pub fn name(&self) -> &str { &self.config.name }

    pub fn config(&self) -> &ThreadConfig { &self.config }

    /// Spawns a new OS thread running the callback, joining the previous run first if there is one.
    /// A panic of the previous run is logged, not returned.
    pub fn start(&mut self) -> Result<(), ThreadError> {
        if let Err(err) = self.join() {
            warn!("previous run ended badly: {err}");
        }

        let mut builder = std::thread::Builder::new().name(self.config.name.clone());
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let callback = self.callback.clone();
        let handle = builder
            .spawn(move || callback())
            .map_err(|source| ThreadError::Spawn { name: self.config.name.clone(), source })?;
        debug!(name = %self.config.name, "thread started");
        self.handle = Some(handle);
        Ok(())
    }

    /// Blocks until the running thread finishes. Does nothing if it was never started or already joined.
    pub fn join(&mut self) -> Result<(), ThreadError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let result = handle.join().map_err(|payload| ThreadError::panicked(&self.config.name, payload));
        debug!(name = %self.config.name, "thread joined");
        result
    }

    pub fn is_joinable(&self) -> bool { self.handle.is_some() }

    /// True once the spawned thread has returned, even if it was not joined yet
    pub fn is_finished(&self) -> bool { self.handle.as_ref().is_none_or(|handle| handle.is_finished()) }
}

impl Drop for Thread {
    fn drop(&mut self) {
        if let Err(err) = self.join() {
            error!("{err}");
        }
    }
}

impl std::fmt::Debug for Thread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thread").field("name", &self.config.name).field("joinable", &self.is_joinable()).finish()
    }
}
