use std::ops::Deref;

use crate::{Contract, ContractProvider};

/// A value that notifies its subscribers on every write, even when the new value equals the old one.
pub struct ObservableValue<T> {
    value: T,
    provider: ContractProvider,
}

impl<T: Default> Default for ObservableValue<T> {
    fn default() -> Self { Self::new(T::default()) }
}

impl<T> From<T> for ObservableValue<T> {
    fn from(value: T) -> Self { Self::new(value) }
}

impl<T> ObservableValue<T> {
    pub fn new(value: T) -> Self { Self { value, provider: ContractProvider::new() } }

    /// Stores the value, then notifies
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify_edition();
    }

    pub fn subscribe<F>(&self, job: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.provider.subscribe(move |()| job())
    }

    /// Notifies subscribers without changing the value, e.g. after an in-place edit
    pub fn notify_edition(&self) { self.provider.trigger(()); }
}

impl<T: Clone> ObservableValue<T> {
    pub fn get(&self) -> T { self.value.clone() }
}

impl<T> Deref for ObservableValue<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.value }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_tuple("ObservableValue").field(&self.value).finish() }
}
