#![cfg(feature = "tokio")]
mod common;

use anyhow::Result;
use covenant::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::mpsc;

#[tokio::test]
async fn test_worker_feeds_async_task() -> Result<()> {
    let readings = Arc::new(ContractProvider::<u32>::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _forward = readings.subscribe_job(tx);

    let mut worker = PersistentWorker::new("sensor");
    let _sample = {
        let readings = readings.clone();
        let next = AtomicU32::new(0);
        let stop = worker.stop_handle();
        worker.add_execution_step(move || {
            let reading = next.fetch_add(1, Ordering::SeqCst);
            readings.trigger(reading * 10);
            if reading == 4 {
                stop.stop();
            }
        })
    };

    worker.start()?;
    let consumer = tokio::spawn(async move {
        let mut received = Vec::new();
        while let Some(reading) = rx.recv().await {
            received.push(reading);
            if received.len() == 5 {
                break;
            }
        }
        received
    });

    assert_eq!(consumer.await?, [0, 10, 20, 30, 40]);
    tokio::task::spawn_blocking(move || worker.join()).await??;
    Ok(())
}

#[tokio::test]
async fn test_invalidated_channel_job_closes_stream() -> Result<()> {
    let mut notifier = EventNotifier::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let _forward = notifier.provider("tick").subscribe_job(tx);

    notifier.notify_event(&"tick");
    notifier.notify_event(&"tick");
    assert_eq!(rx.recv().await, Some(()));
    assert_eq!(rx.recv().await, Some(()));

    // invalidation drops the job and with it the last sender
    notifier.invalidate_contracts("tick");
    assert_eq!(rx.recv().await, None);
    Ok(())
}
