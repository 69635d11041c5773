use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::event::Notification;

/// Failure reported by a listener. Logged by the bus, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ListenerError(pub String);

/// Receiver of bus notifications.
pub trait Listener: Send + Sync {
    fn on_notification(&self, notification: &Notification) -> Result<(), ListenerError>;
}

impl<F> Listener for F
where
    F: Fn(&Notification) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_notification(&self, notification: &Notification) -> Result<(), ListenerError> {
        self(notification)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Outcome of a single publish.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Synchronous publish/subscribe channel.
///
/// Listeners are called in registration order on the publishing thread. A
/// listener that returns an error or panics is logged and skipped; the
/// remaining listeners still run.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<(Subscription, Arc<dyn Listener>)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Listener + 'static) -> Subscription {
        self.subscribe_arc(Arc::new(listener))
    }

    pub fn subscribe_arc(&self, listener: Arc<dyn Listener>) -> Subscription {
        let subscription = Subscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((subscription, listener));
        subscription
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = listeners.len();
        listeners.retain(|(s, _)| *s != subscription);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Deliver a notification to every listener registered at call time.
    pub fn publish(&self, notification: Notification) -> PublishReport {
        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<(Subscription, Arc<dyn Listener>)> = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        let mut report = PublishReport::default();
        for (subscription, listener) in listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener.on_notification(&notification)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Listener {:?} failed on {} notification: {}",
                        subscription,
                        notification.topic(),
                        e
                    );
                }
                Err(_) => {
                    report.failed += 1;
                    tracing::error!(
                        "Listener {:?} panicked on {} notification",
                        subscription,
                        notification.topic()
                    );
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::StorageEvent;
    use crate::snippet::Snippet;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> impl Listener + 'static {
        let log = log.clone();
        move |n: &Notification| -> Result<(), ListenerError> {
            log.lock().unwrap().push(format!("{}:{}", tag, n.topic()));
            Ok(())
        }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(recorder(&log, "a"));
        bus.subscribe(recorder(&log, "b"));

        let report = bus.publish(Notification::Storage(StorageEvent::cleared()));
        assert_eq!(report, PublishReport { delivered: 2, failed: 0 });
        assert_eq!(*log.lock().unwrap(), vec!["a:storage", "b:storage"]);
    }

    #[test]
    fn test_failing_listener_does_not_stop_others() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(|_: &Notification| -> Result<(), ListenerError> {
            Err(ListenerError("boom".to_string()))
        });
        bus.subscribe(|_: &Notification| -> Result<(), ListenerError> { panic!("listener bug") });
        bus.subscribe(recorder(&log, "c"));

        let report = bus.publish(Notification::Storage(StorageEvent::changed(Snippet::new("A"))));
        assert_eq!(report, PublishReport { delivered: 1, failed: 2 });
        assert_eq!(*log.lock().unwrap(), vec!["c:storage"]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sub = bus.subscribe(recorder(&log, "a"));
        assert_eq!(bus.listener_count(), 1);

        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));

        let report = bus.publish(Notification::Storage(StorageEvent::cleared()));
        assert_eq!(report.delivered, 0);
        assert!(log.lock().unwrap().is_empty());
    }
}
