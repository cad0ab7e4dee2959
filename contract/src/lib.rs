/*!
Subscription contracts for covenant

A [`ContractProvider`] owns the jobs subscribed to one notification channel and runs them, in
subscription order, every time it is triggered. Each subscription is represented by a move-only
[`Contract`]: dropping it cancels the subscription, [`Contract::relinquish`] hands it over to the
provider so it keeps firing for the provider's lifetime.

Triggers can be suppressed with scoped [`Blocker`]s:
- [`BlockMode::Ignore`] drops triggers
- [`BlockMode::Delay`] coalesces them and replays the last one when the last delay blocker goes away

Ignore dominates Delay: any ignore window erases what a delay window would have replayed.

# Basic usage

```rust
use covenant_contract::*;
use std::sync::{Arc, Mutex};

let provider = ContractProvider::<(u32, &'static str)>::new();
let seen = Arc::new(Mutex::new(Vec::new()));
let _contract = {
    let seen = seen.clone();
    provider.subscribe(move |args| seen.lock().unwrap().push(args))
};

{
    let _delay = provider.block(BlockMode::Delay);
    provider.trigger((1, "first"));
    provider.trigger((2, "second"));
}
assert_eq!(*seen.lock().unwrap(), [(2, "second")]);
```

# Derived containers
- [`EventNotifier`]: one provider per event key
- [`EventDispatcher`]: one provider per event key, each with its own payload type
- [`StatefulObject`] and [`ActivableObject`]: callbacks bound to entering a state
- [`ObservableValue`]: a value notifying on every write
*/

mod activable;
mod blocker;
mod contract;
mod error;
mod event_dispatcher;
mod event_notifier;
mod job;
mod observable;
mod provider;
mod stateful;

pub use activable::*;
pub use blocker::{BlockMode, Blocker};
pub use contract::*;
pub use error::*;
pub use event_dispatcher::*;
pub use event_notifier::*;
pub use job::*;
pub use observable::*;
pub use provider::ContractProvider;
pub use stateful::*;
