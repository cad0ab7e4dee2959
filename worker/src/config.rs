#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadConfig {
    /// Name given to the OS thread; also used in logs and errors
    pub name: String,
    /// Stack size for the spawned thread, the platform default when `None`
    pub stack_size: Option<usize>,
}

impl ThreadConfig {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), stack_size: None } }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSetConfig {
    /// Name of the worker driven on the thread calling `WorkerSet::run`
    pub main_thread_name: String,
    /// Stack size applied to every secondary worker
    pub stack_size: Option<usize>,
}

impl WorkerSetConfig {
    pub fn new(main_thread_name: impl Into<String>) -> Self { Self { main_thread_name: main_thread_name.into(), stack_size: None } }

    pub(crate) fn thread_config(&self, name: &str) -> ThreadConfig {
        ThreadConfig { name: name.to_string(), stack_size: self.stack_size }
    }
}

impl Default for WorkerSetConfig {
    fn default() -> Self { Self::new("main") }
}
