use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::Level;

#[ctor::ctor]
fn init_tracing() { tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init(); }

/// A shared hit counter and a job bumping it
#[allow(unused)]
pub fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + Clone + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let job = {
        let hits = hits.clone();
        move || {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    };
    (hits, job)
}

#[allow(unused)]
pub fn hits(counter: &Arc<AtomicUsize>) -> usize { counter.load(Ordering::SeqCst) }

/// Records every value passed to the watcher; `check` drains what was recorded since the last call
#[allow(unused)]
pub fn recorder<T: Send + Sync + 'static>() -> (Arc<dyn Fn(T) + Send + Sync>, Box<dyn Fn() -> Vec<T> + Send + Sync>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let watcher = {
        let changes = changes.clone();
        Arc::new(move |value: T| {
            changes.lock().unwrap().push(value);
        })
    };

    let check = Box::new(move || {
        let changes: Vec<T> = changes.lock().unwrap().drain(..).collect();
        changes
    });

    (watcher, check)
}
