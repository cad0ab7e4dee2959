use crate::{Contract, StatefulObject};

/// An on/off flag with activation and deactivation callbacks. Starts inactive.
#[derive(Default)]
pub struct ActivableObject {
    inner: StatefulObject<bool>,
}

impl ActivableObject {
    pub fn new() -> Self { Self::default() }

    pub fn activate(&mut self) { self.inner.set_state(true); }

    pub fn deactivate(&mut self) { self.inner.set_state(false); }

    pub fn is_active(&self) -> bool { *self.inner.state() }

    pub fn add_activation_callback<F>(&mut self, job: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.inner.add_callback(true, job)
    }

    pub fn add_deactivation_callback<F>(&mut self, job: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.inner.add_callback(false, job)
    }
}
