use std::collections::HashMap;
use std::hash::Hash;

use crate::{Contract, ContractProvider};

/// Holds a current state and fires the callbacks bound to a state when it becomes current.
///
/// Only the provider of the entered state fires; leaving a state fires nothing, and setting the
/// state it already has is a no-op.
pub struct StatefulObject<S> {
    state: S,
    providers: HashMap<S, ContractProvider>,
}

impl<S: Default + Eq + Hash + Clone> Default for StatefulObject<S> {
    fn default() -> Self { Self::new(S::default()) }
}

impl<S: Eq + Hash + Clone> StatefulObject<S> {
    pub fn new(initial: S) -> Self { Self { state: initial, providers: HashMap::new() } }

    pub fn state(&self) -> &S { &self.state }

    pub fn set_state(&mut self, state: S) {
        if self.state == state {
            return;
        }
        self.state = state;
        if let Some(provider) = self.providers.get(&self.state) {
            provider.trigger(());
        }
    }

    pub fn add_callback<F>(&mut self, state: S, job: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.providers.entry(state).or_default().subscribe(move |()| job())
    }

    pub fn invalidate_contracts(&self, state: &S) {
        if let Some(provider) = self.providers.get(state) {
            provider.invalidate_contracts();
        }
    }
}
