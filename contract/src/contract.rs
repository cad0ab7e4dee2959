use std::sync::{Arc, Weak};

use crate::error::ContractError;
use crate::provider::{Inner, SlotKey};

/// A move-only handle to one subscription.
///
/// Dropping a valid contract resigns it. A contract becomes invalid once it is resigned or relinquished,
/// or when its provider unsubscribes it, invalidates its contracts or is dropped.
#[must_use = "dropping a contract resigns its subscription; call `relinquish` to keep it alive"]
pub struct Contract<A = ()> {
    inner: Weak<Inner<A>>,
    key: Option<SlotKey>,
}

impl<A> Default for Contract<A> {
    fn default() -> Self { Self { inner: Weak::new(), key: None } }
}

impl<A> Contract<A> {
    pub(crate) fn new(inner: Weak<Inner<A>>, key: SlotKey) -> Self { Self { inner, key: Some(key) } }

    fn upgrade(&self) -> Option<(Arc<Inner<A>>, SlotKey)> { Some((self.inner.upgrade()?, self.key?)) }

    /// The slot key, if this contract was issued by the given provider state
    pub(crate) fn key_for(&self, inner: &Arc<Inner<A>>) -> Option<SlotKey> {
        if std::ptr::eq(self.inner.as_ptr(), Arc::as_ptr(inner)) { self.key } else { None }
    }

    pub fn is_valid(&self) -> bool {
        match self.upgrade() {
            Some((inner, key)) => inner.is_live(key),
            None => false,
        }
    }

    /// Cancels the subscription now.
    pub fn resign(&mut self) -> Result<(), ContractError> {
        let (inner, key) = self.upgrade().ok_or(ContractError::InvalidContract { operation: "resign" })?;
        if !inner.unsubscribe(key) {
            return Err(ContractError::InvalidContract { operation: "resign" });
        }
        self.forget();
        Ok(())
    }

    /// Hands this contract over to its provider: the subscription keeps firing for the provider's lifetime
    /// and this handle becomes invalid.
    pub fn relinquish(&mut self) -> Result<(), ContractError> {
        if !self.is_valid() {
            return Err(ContractError::InvalidContract { operation: "relinquish" });
        }
        let contract = std::mem::take(self);
        if let Some(inner) = contract.inner.upgrade() {
            inner.relinquish(contract);
        }
        Ok(())
    }

    fn forget(&mut self) {
        self.inner = Weak::new();
        self.key = None;
    }

    /// Runs this contract's job alone, ignoring the provider's blockers. Does nothing if invalid.
    pub fn trigger(&self, args: A) {
        if let Some((inner, key)) = self.upgrade() {
            if let Some(job) = inner.job(key) {
                job.call(args);
            }
        }
    }
}

impl<A> Drop for Contract<A> {
    fn drop(&mut self) {
        if let Some((inner, key)) = self.upgrade() {
            inner.unsubscribe(key);
        }
    }
}

impl<A> std::fmt::Debug for Contract<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract").field("valid", &self.is_valid()).finish()
    }
}
