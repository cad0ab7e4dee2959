use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
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

/// Polls `condition` until it holds or five seconds pass
#[allow(unused)]
pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
