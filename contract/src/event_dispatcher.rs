use std::any::{Any, type_name};
use std::collections::HashMap;
use std::hash::Hash;

use crate::{Contract, ContractProvider, DispatchError};

/// A type-erased provider, remembering the payload type name for error reporting
struct Entry {
    provider: Box<dyn Any + Send + Sync>,
    payload: &'static str,
}

impl Entry {
    fn new<A: Send + 'static>() -> Self { Self { provider: Box::new(ContractProvider::<A>::new()), payload: type_name::<A>() } }

    fn typed<A: 'static>(&self) -> Result<&ContractProvider<A>, DispatchError> {
        self.provider
            .downcast_ref::<ContractProvider<A>>()
            .ok_or(DispatchError::SignatureMismatch { expected: self.payload, found: type_name::<A>() })
    }
}

/// Like [`crate::EventNotifier`], but every event key carries its own payload type.
///
/// The payload type is fixed by the first subscription for a key; later subscriptions or emissions
/// with another type fail with [`DispatchError::SignatureMismatch`].
pub struct EventDispatcher<K> {
    providers: HashMap<K, Entry>,
}

impl<K: Eq + Hash> Default for EventDispatcher<K> {
    fn default() -> Self { Self::new() }
}

impl<K: Eq + Hash> EventDispatcher<K> {
    pub fn new() -> Self { Self { providers: HashMap::new() } }

    pub fn subscribe<A, F>(&mut self, event: K, job: F) -> Result<Contract<A>, DispatchError>
    where
        A: Clone + Send + 'static,
        F: Fn(A) + Send + Sync + 'static,
    {
        let entry = self.providers.entry(event).or_insert_with(Entry::new::<A>);
        Ok(entry.typed::<A>()?.subscribe(job))
    }

    /// Triggers the jobs of `event` with `args`. Unknown events are ignored.
    pub fn emit<A>(&self, event: &K, args: A) -> Result<(), DispatchError>
    where A: Clone + Send + 'static {
        match self.providers.get(event) {
            Some(entry) => {
                entry.typed::<A>()?.trigger(args);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Invalidates the contracts of `event` if it is registered with payload `A`.
    pub fn invalidate_contracts<A: Send + 'static>(&self, event: &K) {
        if let Some(Ok(provider)) = self.providers.get(event).map(Entry::typed::<A>) {
            provider.invalidate_contracts();
        }
    }

    pub fn contains(&self, event: &K) -> bool { self.providers.contains_key(event) }
}
