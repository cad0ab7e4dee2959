use std::sync::Weak;

use crate::provider::Inner;

/// How a provider treats triggers while a blocker of this mode is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockMode {
    /// Triggers are dropped. Dominates `Delay` and erases its pending snapshot.
    #[default]
    Ignore,
    /// Triggers are coalesced; the last arguments are replayed once when the last delay blocker is released.
    Delay,
}

/// Aggregate suppression state of one provider.
/// The behavior of a trigger depends only on the current counts, never on which blocker was acquired first.
#[derive(Debug)]
pub(crate) enum Suppression<A> {
    Unblocked,
    Suppressed { ignore: usize, delay: usize, pending: Option<A> },
}

impl<A> Default for Suppression<A> {
    fn default() -> Self { Suppression::Unblocked }
}

impl<A> Suppression<A> {
    pub fn is_blocked(&self) -> bool { matches!(self, Suppression::Suppressed { .. }) }

    pub fn acquire(&mut self, mode: BlockMode) {
        if let Suppression::Unblocked = self {
            *self = Suppression::Suppressed { ignore: 0, delay: 0, pending: None };
        }
        if let Suppression::Suppressed { ignore, delay, pending } = self {
            match mode {
                BlockMode::Ignore => {
                    *ignore += 1;
                    *pending = None;
                }
                BlockMode::Delay => *delay += 1,
            }
        }
    }

    /// Returns the arguments when the trigger should run now.
    pub fn admit(&mut self, args: A) -> Option<A> {
        match self {
            Suppression::Unblocked => Some(args),
            Suppression::Suppressed { ignore, .. } if *ignore > 0 => None,
            Suppression::Suppressed { pending, .. } => {
                *pending = Some(args);
                None
            }
        }
    }

    /// Returns the snapshot to flush when this release ends the last delay with a trigger pending.
    pub fn release(&mut self, mode: BlockMode) -> Option<A> {
        let Suppression::Suppressed { ignore, delay, pending } = self else {
            return None;
        };

        let flush = match mode {
            BlockMode::Ignore => {
                *ignore = ignore.saturating_sub(1);
                if *ignore == 0 {
                    *pending = None;
                }
                None
            }
            BlockMode::Delay => {
                *delay = delay.saturating_sub(1);
                if *delay == 0 && *ignore == 0 { pending.take() } else { None }
            }
        };

        if *ignore == 0 && *delay == 0 {
            *self = Suppression::Unblocked;
        }
        flush
    }
}

/// A scoped suppression token for one provider.
///
/// Dropping an active blocker releases it, exactly once. Moving a blocker moves its active status with it.
#[must_use = "a blocker releases as soon as it is dropped"]
pub struct Blocker<A: Clone = ()> {
    inner: Weak<Inner<A>>,
    mode: BlockMode,
    active: bool,
}

impl<A: Clone> Blocker<A> {
    pub(crate) fn new(inner: Weak<Inner<A>>, mode: BlockMode) -> Self { Self { inner, mode, active: true } }

    pub fn mode(&self) -> BlockMode { self.mode }

    pub fn is_active(&self) -> bool { self.active }

    /// Ends this blocker's suppression. No-op if already released.
    pub fn release(&mut self) {
        if !std::mem::replace(&mut self.active, false) {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.release_block(self.mode);
        }
    }
}

impl<A: Clone> Drop for Blocker<A> {
    fn drop(&mut self) { self.release(); }
}

impl<A: Clone> std::fmt::Debug for Blocker<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blocker").field("mode", &self.mode).field("active", &self.active).finish()
    }
}
