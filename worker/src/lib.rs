/*!
Threads and worker loops for covenant

- [`Thread`]: a named, restartable thread with a fixed callback
- [`PersistentWorker`]: a thread running preparation steps once, then execution steps in a loop until stopped
- [`WorkerSet`]: named workers plus a main loop on the calling thread, ended with an exit code

Steps are subscribed through [`covenant_contract::ContractProvider`]s, so registering one returns a
[`covenant_contract::Contract`]: drop it to remove the step.

```rust
use covenant_worker::*;
use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};

let mut set = WorkerSet::default();
let frames = Arc::new(AtomicUsize::new(0));
let quit = set.quit_handle();

let _render = {
    let frames = frames.clone();
    set.add_execution_step("renderer", move || {
        frames.fetch_add(1, Ordering::SeqCst);
        std::thread::yield_now();
    })
};
let _main = {
    let frames = frames.clone();
    set.add_main_execution_step(move || {
        if frames.load(Ordering::SeqCst) >= 3 {
            quit.quit(7);
        }
        std::thread::yield_now();
    })
};

assert_eq!(set.run().unwrap(), 7);
```
*/

mod config;
mod error;
mod persistent;
mod set;
mod thread;

pub use config::*;
pub use error::*;
pub use persistent::*;
pub use set::*;
pub use thread::*;
