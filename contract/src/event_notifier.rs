use std::collections::BTreeMap;

use crate::{Contract, ContractProvider};

/// Routes named events to independent providers, one per key.
///
/// ```rust
/// use covenant_contract::EventNotifier;
///
/// let mut notifier = EventNotifier::new();
/// let contract = notifier.subscribe("resized", || println!("resized!"));
/// notifier.notify_event(&"resized");
/// notifier.notify_event(&"never-registered"); // nothing happens
/// # drop(contract);
/// ```
pub struct EventNotifier<K> {
    providers: BTreeMap<K, ContractProvider>,
}

impl<K: Ord> Default for EventNotifier<K> {
    fn default() -> Self { Self::new() }
}

impl<K: Ord> EventNotifier<K> {
    pub fn new() -> Self { Self { providers: BTreeMap::new() } }

    pub fn subscribe<F>(&mut self, event: K, job: F) -> Contract
    where F: Fn() + Send + Sync + 'static {
        self.provider(event).subscribe(move |()| job())
    }

    /// Triggers the jobs registered for `event`. Unknown events are ignored.
    pub fn notify_event(&self, event: &K) {
        if let Some(provider) = self.providers.get(event) {
            provider.trigger(());
        }
    }

    /// Invalidates every contract registered for `event`, creating the (empty) provider if needed.
    pub fn invalidate_contracts(&mut self, event: K) { self.provider(event).invalidate_contracts(); }

    /// The provider for `event`, created on first access
    pub fn provider(&mut self, event: K) -> &ContractProvider { self.providers.entry(event).or_default() }

    pub fn contains(&self, event: &K) -> bool { self.providers.contains_key(event) }
}
