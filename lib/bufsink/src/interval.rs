/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::BufferSink;

/// Handle of a periodic export task.
///
/// Dropping the handle does not stop the task, call [`cancel`](Self::cancel) for that.
pub struct IntervalExportHandle {
    cancel_token: CancellationToken,
    join_handle: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalExportHandle {
    pub(crate) fn spawn(sink: BufferSink, period: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();
        let rt_handle = sink.rt_handle().clone();
        let join_handle = rt_handle.spawn(async move {
            run(sink, period, task_token).await;
        });
        IntervalExportHandle {
            cancel_token,
            join_handle: Mutex::new(Some(join_handle)),
        }
    }

    /// Stop the periodic export. It is safe to call this more than once.
    ///
    /// An export already dispatched is not interrupted.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Wait for the task to quit after it has been cancelled.
    pub async fn join(&self) {
        let join_handle = self.join_handle.lock().unwrap().take();
        if let Some(handle) = join_handle {
            if let Err(e) = handle.await {
                warn!("interval export task quit abnormally: {e}");
            }
        }
    }
}

async fn run(sink: BufferSink, period: Duration, cancel_token: CancellationToken) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                debug!("interval export cancelled");
                break;
            }
            _ = interval.tick() => {
                sink.export(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bytes::Bytes;

    use crate::export_fn;

    fn collect_sink() -> (BufferSink, Arc<Mutex<Vec<Bytes>>>) {
        let exported = Arc::new(Mutex::new(Vec::new()));
        let e = exported.clone();
        let exporter = export_fn(move |data| {
            let e = e.clone();
            async move {
                e.lock().unwrap().push(data);
            }
        });
        let sink = BufferSink::new(Some(exporter), 0).unwrap();
        (sink, exported)
    }

    #[tokio::test(start_paused = true)]
    async fn tick_export() {
        let (sink, exported) = collect_sink();
        let handle = sink.interval_export(Duration::from_millis(50)).unwrap();

        sink.append(b"x");
        tokio::time::sleep(Duration::from_millis(60)).await;
        sink.wait_exports().await;

        {
            let exported = exported.lock().unwrap();
            assert_eq!(exported.len(), 1);
            assert_eq!(exported[0].as_ref(), b"x");
        }
        assert!(sink.is_empty());

        handle.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn idle_ticks() {
        let (sink, exported) = collect_sink();
        let handle = sink.interval_export(Duration::from_millis(50)).unwrap();

        tokio::time::sleep(Duration::from_millis(175)).await;
        handle.cancel();
        handle.join().await;
        sink.wait_exports().await;

        let exported = exported.lock().unwrap();
        assert_eq!(exported.len(), 3);
        assert!(exported.iter().all(|b| b.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (sink, exported) = collect_sink();
        let handle = sink.interval_export(Duration::from_millis(50)).unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.cancel();
        assert!(handle.is_cancelled());
        handle.join().await;
        sink.wait_exports().await;
        let count = exported.lock().unwrap().len();
        assert_eq!(count, 2);

        sink.append(b"late");
        tokio::time::sleep(Duration::from_millis(200)).await;
        sink.wait_exports().await;
        assert_eq!(exported.lock().unwrap().len(), count);
        assert_eq!(sink.bytes(), b"late");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_twice() {
        let (sink, _exported) = collect_sink();
        let handle = sink.interval_export(Duration::from_secs(1)).unwrap();

        handle.cancel();
        handle.cancel();
        handle.join().await;
        handle.join().await;
        assert!(handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_handle_keeps_running() {
        let (sink, exported) = collect_sink();
        let handle = sink.interval_export(Duration::from_millis(50)).unwrap();
        drop(handle);

        sink.append(b"still exported");
        tokio::time::sleep(Duration::from_millis(60)).await;
        sink.wait_exports().await;

        let exported = exported.lock().unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].as_ref(), b"still exported");
    }
}
