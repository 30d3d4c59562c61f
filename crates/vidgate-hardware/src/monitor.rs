//! Disallowed-VID notification monitor.
//!
//! This module provides the `DisallowedVidMonitor`, the callback
//! registration point for "blocked peripheral" notifications. The monitor
//! polls a [`DisallowedVidSource`] from its own task and fans every event
//! out to the registered subscribers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐      ┌───────────────┐      ┌──────────────┐
//! │ Disallowed   │─────►│ Listener task │─────►│ Subscriber 1 │
//! │ VID source   │      │ (JoinHandle)  │  │   └──────────────┘
//! └──────────────┘      └───────────────┘  │   ┌──────────────┐
//!                                          └──►│ Subscriber N │
//!                                              └──────────────┘
//! ```
//!
//! The listener never touches allow-list state; subscribers are
//! notification-only. Events keep flowing while an allow-list operation is
//! in flight, since the monitor shares no lock with the coordinator.
//!
//! # Examples
//!
//! ```no_run
//! use vidgate_hardware::monitor::DisallowedVidMonitor;
//! use vidgate_hardware::mock::MockDisallowedSource;
//!
//! #[tokio::main]
//! async fn main() -> vidgate_hardware::Result<()> {
//!     let (source, _feed) = MockDisallowedSource::new();
//!     let mut monitor = DisallowedVidMonitor::new(source);
//!
//!     monitor.subscribe(|event| {
//!         println!("[Blocked VID detected] {}", event.vid_or_unknown());
//!     });
//!
//!     let handle = monitor.start();
//!
//!     // ... later
//!     handle.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::traits::DisallowedVidSource;
use crate::types::DisallowedVidEvent;
use crate::{DeviceError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Callback invoked for every disallowed-VID notification.
pub type DisallowedVidCallback = Box<dyn Fn(&DisallowedVidEvent) + Send + Sync>;

/// Statistics about a running monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    /// Registered subscribers.
    pub subscribers: usize,

    /// Events received from the source and fanned out.
    pub delivered: u64,
}

/// Handle to a running monitor.
///
/// Dropping the handle leaves the listener running until its source closes;
/// call [`shutdown`](Self::shutdown) to stop it explicitly.
pub struct MonitorHandle {
    /// Listener task.
    task: JoinHandle<Result<()>>,

    delivered: Arc<AtomicU64>,

    subscribers: usize,
}

impl MonitorHandle {
    /// Current delivery statistics.
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            subscribers: self.subscribers,
            delivered: self.delivered.load(Ordering::Relaxed),
        }
    }

    /// Whether the listener task has stopped (source closed or failed).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the listener task and wait for it to terminate.
    ///
    /// A listener that already ended because its source closed is not an
    /// error; a listener that panicked is reported as one.
    pub async fn shutdown(self) -> Result<()> {
        self.task.abort();

        match Self::classify_task_result(self.task.await) {
            TaskTermination::Success | TaskTermination::Cancelled => Ok(()),
            TaskTermination::Error => {
                debug!("Disallowed VID listener had already stopped with an error");
                Ok(())
            }
            TaskTermination::Panic => Err(DeviceError::other("Disallowed VID listener panicked")),
        }
    }

    /// Wait for the listener to end on its own, returning how it ended.
    ///
    /// # Errors
    ///
    /// Returns the source error that stopped the listener.
    pub async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(DeviceError::other(format!("Listener task failed: {e}"))),
        }
    }

    /// Classify the termination status of the listener task.
    fn classify_task_result(
        result: std::result::Result<Result<()>, tokio::task::JoinError>,
    ) -> TaskTermination {
        match result {
            Ok(Ok(())) => TaskTermination::Success,
            Ok(Err(_)) => TaskTermination::Error,
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(_) => TaskTermination::Panic,
        }
    }
}

/// Task termination classification for shutdown handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    /// Task completed successfully.
    Success,
    /// Task returned an error.
    Error,
    /// Task was cancelled (expected during shutdown).
    Cancelled,
    /// Task panicked.
    Panic,
}

/// Fans disallowed-VID notifications out to subscribers.
///
/// # Lifecycle
///
/// 1. Create the monitor around a source
/// 2. Register callbacks with [`subscribe`](Self::subscribe)
/// 3. Call [`start`](Self::start) to spawn the listener and get a handle
/// 4. Call [`MonitorHandle::shutdown`] when the hosting session ends
pub struct DisallowedVidMonitor<S> {
    source: S,
    subscribers: Vec<DisallowedVidCallback>,
}

impl<S> DisallowedVidMonitor<S>
where
    S: DisallowedVidSource + 'static,
{
    /// Create a monitor with no subscribers.
    pub fn new(source: S) -> Self {
        Self {
            source,
            subscribers: Vec::new(),
        }
    }

    /// Register a callback. Must be called before [`start`](Self::start).
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&DisallowedVidEvent) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Spawn the listener task and return its handle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let delivered = Arc::new(AtomicU64::new(0));
        let subscribers = self.subscribers.len();

        let task = tokio::spawn(Self::listen(
            self.source,
            self.subscribers,
            Arc::clone(&delivered),
        ));

        MonitorHandle {
            task,
            delivered,
            subscribers,
        }
    }

    async fn listen(
        mut source: S,
        subscribers: Vec<DisallowedVidCallback>,
        delivered: Arc<AtomicU64>,
    ) -> Result<()> {
        loop {
            match source.next_event().await {
                Ok(event) => {
                    debug!(vid = event.vid_or_unknown(), "Disallowed VID notification");
                    for callback in &subscribers {
                        callback(&event);
                    }
                    delivered.fetch_add(1, Ordering::Relaxed);
                }
                Err(DeviceError::Disconnected { device }) => {
                    debug!("Disallowed VID source closed: {}", device);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Disallowed VID source failed: {}", e);
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDisallowedSource;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Source that yields a single error.
    struct FailingSource;

    impl DisallowedVidSource for FailingSource {
        async fn next_event(&mut self) -> Result<DisallowedVidEvent> {
            Err(DeviceError::communication("receiver unregistered"))
        }
    }

    async fn wait_for_delivered(handle: &MonitorHandle, count: u64) {
        for _ in 0..100 {
            if handle.stats().delivered >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {count} deliveries, got {:?}", handle.stats());
    }

    #[tokio::test]
    async fn test_monitor_subscribe() {
        let (source, _feed) = MockDisallowedSource::new();
        let mut monitor = DisallowedVidMonitor::new(source);
        assert_eq!(monitor.subscriber_count(), 0);

        monitor.subscribe(|_| {});
        monitor.subscribe(|_| {});

        assert_eq!(monitor.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_monitor_fans_out_to_all_subscribers() {
        let (source, feed) = MockDisallowedSource::new();
        let mut monitor = DisallowedVidMonitor::new(source);

        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        for seen in [&first, &second] {
            let sink = Arc::clone(seen);
            monitor.subscribe(move |event| {
                let vid = event.vid_or_unknown().to_string();
                sink.lock().unwrap().push(vid);
            });
        }

        let handle = monitor.start();

        feed.send_vid("0x1A86").await.unwrap();
        feed.send_unknown().await.unwrap();
        wait_for_delivered(&handle, 2).await;

        assert_eq!(*first.lock().unwrap(), vec!["0x1A86", "(unknown)"]);
        assert_eq!(*second.lock().unwrap(), vec!["0x1A86", "(unknown)"]);
        let expected = MonitorStats {
            subscribers: 2,
            delivered: 2,
        };
        assert_eq!(handle.stats(), expected);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_monitor_stops_when_source_closes() {
        let (source, feed) = MockDisallowedSource::new();
        let handle = DisallowedVidMonitor::new(source).start();

        drop(feed);

        assert!(handle.join().await.is_ok());
    }

    #[tokio::test]
    async fn test_monitor_reports_source_error() {
        let handle = DisallowedVidMonitor::new(FailingSource).start();

        let result = handle.join().await;
        assert!(matches!(
            result,
            Err(DeviceError::CommunicationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_monitor_shutdown_after_source_error() {
        let handle = DisallowedVidMonitor::new(FailingSource).start();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(handle.is_finished());
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_monitor_graceful_shutdown() {
        let (source, _feed) = MockDisallowedSource::new();
        let handle = DisallowedVidMonitor::new(source).start();

        handle.shutdown().await.unwrap();
    }
}
