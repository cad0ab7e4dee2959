mod common;
use common::{wait_until, watcher};

use anyhow::Result;
use covenant::*;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, mpsc};

#[test]
fn test_worker_frames_coalesced_by_delay_blocker() -> Result<()> {
    let frames = Arc::new(ContractProvider::<u32>::new());
    let (seen, check) = watcher();
    let _recording = frames.subscribe_job(seen);

    let mut worker = PersistentWorker::new("producer");
    let _produce = {
        let frames = frames.clone();
        let next = AtomicU32::new(0);
        let stop = worker.stop_handle();
        worker.add_execution_step(move || {
            let frame = next.fetch_add(1, Ordering::SeqCst);
            frames.trigger(frame);
            if frame == 99 {
                stop.stop();
            }
        })
    };

    // frames triggered on the worker thread while the main thread holds the blocker
    let blocker = frames.block(BlockMode::Delay);
    worker.start()?;
    worker.join()?;
    assert!(check().is_empty());

    // the flush runs on the releasing thread with the last frame only
    drop(blocker);
    assert_eq!(check(), [99]);
    Ok(())
}

#[test]
fn test_ignore_blocker_pauses_consumers_of_running_worker() -> Result<()> {
    let ticks: Arc<ContractProvider> = Arc::new(ContractProvider::new());
    let (seen, check) = watcher::<()>();
    let _recording = ticks.subscribe_job(seen);

    let mut worker = PersistentWorker::new("ticker");
    let _tick = {
        let ticks = ticks.clone();
        worker.add_execution_step(move || {
            ticks.trigger(());
            std::thread::yield_now();
        })
    };

    worker.start()?;
    assert!(wait_until(|| !check().is_empty()));

    let blocker = ticks.block(BlockMode::Ignore);
    // block() waits for any pass in progress, so nothing lands after this drain
    check();
    std::thread::sleep(std::time::Duration::from_millis(10));
    assert!(check().is_empty());

    drop(blocker);
    assert!(wait_until(|| !check().is_empty()));
    worker.join()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Event {
    Opened,
    Closed,
}

#[test]
fn test_event_notifier_fed_from_worker_channel() -> Result<()> {
    let mut set = WorkerSet::default();
    let (tx, rx) = mpsc::channel::<Event>();

    let mut notifier = EventNotifier::new();
    let (seen, check) = watcher();
    let _opened = {
        let seen = seen.clone();
        notifier.subscribe(Event::Opened, move || seen("opened"))
    };
    let _closed = notifier.subscribe(Event::Closed, move || seen("closed"));

    let _produce = {
        let sent = AtomicBool::new(false);
        set.add_execution_step("producer", move || {
            if !sent.swap(true, Ordering::SeqCst) {
                for event in [Event::Opened, Event::Opened, Event::Closed] {
                    tx.send(event).unwrap();
                }
            }
            std::thread::yield_now();
        })
    };
    let _consume = {
        let rx = Mutex::new(rx);
        let quit = set.quit_handle();
        set.add_main_execution_step(move || {
            for event in rx.lock().unwrap().try_iter() {
                notifier.notify_event(&event);
                if event == Event::Closed {
                    quit.quit(0);
                }
            }
            std::thread::yield_now();
        })
    };

    assert_eq!(set.run()?, 0);
    assert_eq!(check(), ["opened", "opened", "closed"]);
    Ok(())
}

#[test]
fn test_dispatcher_payloads_cross_threads() -> Result<()> {
    let mut dispatcher = EventDispatcher::new();
    let (positions, check_positions) = watcher::<(i32, i32)>();
    let (labels, check_labels) = watcher::<String>();
    let _moved = dispatcher.subscribe("moved", move |position: (i32, i32)| positions(position))?;
    let _renamed = dispatcher.subscribe("renamed", move |label: String| labels(label))?;

    let dispatcher = Arc::new(dispatcher);
    let mut worker = PersistentWorker::new("emitter");
    let _emit = {
        let dispatcher = dispatcher.clone();
        let stop = worker.stop_handle();
        worker.add_execution_step(move || {
            dispatcher.emit(&"moved", (1, 2)).unwrap();
            dispatcher.emit(&"renamed", "window".to_string()).unwrap();
            assert!(dispatcher.emit(&"moved", 3u8).is_err());
            stop.stop();
        })
    };

    worker.start()?;
    worker.join()?;
    assert_eq!(check_positions(), [(1, 2)]);
    assert_eq!(check_labels(), ["window".to_string()]);
    Ok(())
}
