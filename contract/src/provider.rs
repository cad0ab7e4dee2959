use std::cell::RefCell;
use std::sync::{Arc, Weak};

use parking_lot::ReentrantMutex;

use crate::blocker::{BlockMode, Blocker, Suppression};
use crate::contract::Contract;
use crate::job::{IntoJob, Job};

/// Identifies one subscription: a slot in the provider's arena and the generation it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    pub index: usize,
    pub generation: u64,
}

struct Slot<A> {
    generation: u64,
    job: Option<Job<A>>,
}

pub(crate) struct State<A> {
    slots: Vec<Slot<A>>,
    free: Vec<usize>,
    /// Live subscriptions in subscription order
    order: Vec<SlotKey>,
    relinquished: Vec<Contract<A>>,
    suppression: Suppression<A>,
}

impl<A> Default for State<A> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), order: Vec::new(), relinquished: Vec::new(), suppression: Suppression::default() }
    }
}

impl<A> State<A> {
    fn insert(&mut self, job: Job<A>) -> SlotKey {
        let key = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.job = Some(job);
                SlotKey { index, generation: slot.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, job: Some(job) });
                SlotKey { index: self.slots.len() - 1, generation: 0 }
            }
        };
        self.order.push(key);
        key
    }

    fn job(&self, key: SlotKey) -> Option<&Job<A>> {
        self.slots.get(key.index).filter(|slot| slot.generation == key.generation).and_then(|slot| slot.job.as_ref())
    }

    /// Empties the slot and bumps its generation so no handle can reach it again.
    /// The removed job is handed back so it can be dropped once the state is no longer borrowed.
    fn free(&mut self, key: SlotKey) -> Option<Job<A>> {
        let slot = self.slots.get_mut(key.index).filter(|slot| slot.generation == key.generation)?;
        let job = slot.job.take();
        slot.generation += 1;
        self.free.push(key.index);
        self.order.retain(|k| *k != key);
        job
    }
}

/// Values removed from the state that may run user code on drop (job closures, relinquished contracts).
/// They must be dropped after the `RefCell` borrow ends.
type Garbage<A> = (Vec<Job<A>>, Vec<Contract<A>>, Option<A>);

pub(crate) struct Inner<A> {
    state: ReentrantMutex<RefCell<State<A>>>,
}

impl<A> Inner<A> {
    fn new() -> Self { Self { state: ReentrantMutex::new(RefCell::new(State::default())) } }

    pub fn subscribe(&self, job: Job<A>) -> SlotKey {
        let guard = self.state.lock();
        let key = guard.borrow_mut().insert(job);
        tracing::trace!("contract {}:{} subscribed", key.index, key.generation);
        key
    }

    pub fn is_live(&self, key: SlotKey) -> bool {
        let guard = self.state.lock();
        guard.borrow().job(key).is_some()
    }

    pub fn job(&self, key: SlotKey) -> Option<Job<A>> {
        let guard = self.state.lock();
        guard.borrow().job(key).cloned()
    }

    /// Returns false when the key no longer designates a live subscription.
    pub fn unsubscribe(&self, key: SlotKey) -> bool {
        let guard = self.state.lock();
        let removed = guard.borrow_mut().free(key);
        match removed {
            Some(job) => {
                tracing::trace!("contract {}:{} unsubscribed", key.index, key.generation);
                drop(job);
                true
            }
            None => false,
        }
    }

    pub fn relinquish(&self, contract: Contract<A>) {
        let guard = self.state.lock();
        guard.borrow_mut().relinquished.push(contract);
    }

    pub fn invalidate(&self) {
        let guard = self.state.lock();
        let garbage: Garbage<A> = {
            let mut state = guard.borrow_mut();
            let keys = std::mem::take(&mut state.order);
            let jobs = keys.into_iter().filter_map(|key| state.free(key)).collect::<Vec<_>>();
            let relinquished = std::mem::take(&mut state.relinquished);
            let pending = match &mut state.suppression {
                Suppression::Suppressed { pending, .. } => pending.take(),
                Suppression::Unblocked => None,
            };
            (jobs, relinquished, pending)
        };
        if !garbage.0.is_empty() {
            tracing::debug!("invalidated {} contracts", garbage.0.len());
        }
        drop(garbage);
    }

    pub fn len(&self) -> usize {
        let guard = self.state.lock();
        guard.borrow().order.len()
    }

    pub fn is_blocked(&self) -> bool {
        let guard = self.state.lock();
        guard.borrow().suppression.is_blocked()
    }
}

impl<A: Clone> Inner<A> {
    pub fn trigger(&self, args: A) {
        let guard = self.state.lock();
        let admitted = guard.borrow_mut().suppression.admit(args);
        if let Some(args) = admitted {
            self.dispatch(args);
        }
    }

    /// Runs every live job in subscription order.
    /// The key list is snapshotted, so jobs subscribed during the pass wait for the next one,
    /// while jobs resigned during the pass are skipped if not yet reached.
    fn dispatch(&self, args: A) {
        let guard = self.state.lock();
        let keys = guard.borrow().order.clone();
        tracing::trace!("triggering {} jobs", keys.len());
        for key in keys {
            let job = guard.borrow().job(key).cloned();
            if let Some(job) = job {
                job.call(args.clone());
            }
        }
    }

    pub fn block(&self, mode: BlockMode) {
        let guard = self.state.lock();
        guard.borrow_mut().suppression.acquire(mode);
    }

    pub fn release_block(&self, mode: BlockMode) {
        let guard = self.state.lock();
        let flush = guard.borrow_mut().suppression.release(mode);
        if let Some(args) = flush {
            tracing::debug!("flushing delayed trigger");
            self.dispatch(args);
        }
    }
}

/// The subscription registry and dispatcher for one notification channel.
///
/// Jobs run synchronously on the thread calling [`ContractProvider::trigger`], in subscription order.
/// All operations are serialised by a reentrant lock, so a job may subscribe, resign, block or trigger
/// on its own provider, and calls from different threads observe one linear history.
///
/// Moving the provider out with `std::mem::take` carries every subscription along; contracts issued
/// earlier keep working against the new owner and the source is left empty.
/// Dropping a provider invalidates all of its contracts.
///
/// ```rust
/// use covenant_contract::*;
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
///
/// let provider: ContractProvider = ContractProvider::new();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let contract = {
///     let hits = hits.clone();
///     provider.subscribe(move |_| { hits.fetch_add(1, Ordering::SeqCst); })
/// };
/// provider.trigger(());
/// drop(contract); // resigns
/// provider.trigger(());
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct ContractProvider<A = ()> {
    inner: Arc<Inner<A>>,
}

impl<A> Default for ContractProvider<A> {
    fn default() -> Self { Self::new() }
}

impl<A> ContractProvider<A> {
    pub fn new() -> Self { Self { inner: Arc::new(Inner::new()) } }

    /// Subscribe a job receiving the trigger arguments
    pub fn subscribe<F>(&self, job: F) -> Contract<A>
    where F: Fn(A) + Send + Sync + 'static {
        self.subscribe_job(job)
    }

    /// Subscribe anything convertible into a job (channels, prebuilt [`Job`]s, shared closures)
    pub fn subscribe_job<J>(&self, job: J) -> Contract<A>
    where J: IntoJob<A> {
        let key = self.inner.subscribe(job.into_job());
        Contract::new(Arc::downgrade(&self.inner), key)
    }

    /// Subscribe a job that does not care about the trigger arguments
    pub fn subscribe_notify<F>(&self, job: F) -> Contract<A>
    where F: Fn() + Send + Sync + 'static {
        self.subscribe_job(Job::NotifyOnly(Arc::new(job)))
    }

    /// Removes the contract's job if it belongs to this provider. Silently does nothing otherwise.
    pub fn unsubscribe(&self, contract: &Contract<A>) {
        if let Some(key) = contract.key_for(&self.inner) {
            self.inner.unsubscribe(key);
        }
    }

    /// Takes ownership of a contract so its subscription lives as long as this provider.
    pub fn relinquish(&self, contract: Contract<A>) { self.inner.relinquish(contract); }

    /// Nulls every subscribed job and drops relinquished contracts.
    /// Outstanding contracts report invalid from then on.
    pub fn invalidate_contracts(&self) { self.inner.invalidate(); }

    /// Number of live subscriptions
    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn is_blocked(&self) -> bool { self.inner.is_blocked() }

    pub(crate) fn downgrade(&self) -> Weak<Inner<A>> { Arc::downgrade(&self.inner) }
}

impl<A: Clone> ContractProvider<A> {
    /// Invokes every live job, unless blockers are active.
    pub fn trigger(&self, args: A) { self.inner.trigger(args); }

    /// Suppresses triggers until the returned blocker is released or dropped.
    pub fn block(&self, mode: BlockMode) -> Blocker<A> {
        self.inner.block(mode);
        Blocker::new(self.downgrade(), mode)
    }
}

impl<A> Drop for ContractProvider<A> {
    fn drop(&mut self) { self.inner.invalidate(); }
}

impl<A> std::fmt::Debug for ContractProvider<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractProvider").field("subscribers", &self.len()).field("blocked", &self.is_blocked()).finish()
    }
}
