use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use snipman_core::{DialogRequest, EventBus, Notification};

/// Number of error and info messages each kept by default.
pub const DEFAULT_MESSAGE_HISTORY: usize = 100;

/// User-facing messages and dialogs, delivered through the event bus.
///
/// Dialogs are published as [`Notification::Dialog`]; the returned future
/// resolves once whoever shows the dialog answers it. A dialog dropped
/// without an answer resolves as dismissed.
///
/// Recorded messages are kept in bounded histories; the oldest entry is
/// dropped once `capacity` is reached.
pub struct Notifier {
    bus: Arc<EventBus>,
    capacity: usize,
    errors: Mutex<VecDeque<String>>,
    info: Mutex<VecDeque<String>>,
}

impl Notifier {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self::with_capacity(bus, DEFAULT_MESSAGE_HISTORY)
    }

    pub fn with_capacity(bus: Arc<EventBus>, capacity: usize) -> Self {
        Self {
            bus,
            capacity: capacity.max(1),
            errors: Mutex::new(VecDeque::new()),
            info: Mutex::new(VecDeque::new()),
        }
    }

    /// Two-button alert. Resolves true for the primary action.
    pub async fn alert(
        &self,
        message: &str,
        title: Option<&str>,
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> bool {
        let primary = primary.unwrap_or("Ok").to_string();
        let secondary = secondary.unwrap_or("Cancel").to_string();
        let accept = primary.clone();

        let (tx, rx) = oneshot::channel();
        let request = DialogRequest::new(
            title.unwrap_or("Alert"),
            message,
            vec![primary, secondary],
            move |action| {
                let _ = tx.send(action == accept);
            },
        );

        self.bus.publish(Notification::Dialog(request));
        rx.await.unwrap_or(false)
    }

    /// Dialog with arbitrary actions. Resolves to the chosen label, or None
    /// when the dialog is dismissed.
    pub async fn confirm(&self, message: &str, title: Option<&str>, actions: &[&str]) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        let request = DialogRequest::new(
            title.unwrap_or("Alert"),
            message,
            actions.iter().map(|a| a.to_string()).collect(),
            move |action| {
                let _ = tx.send(action);
            },
        );

        self.bus.publish(Notification::Dialog(request));
        rx.await.ok()
    }

    pub fn error(&self, message: &str) {
        tracing::warn!("{}", message);
        self.record(&self.errors, message);
    }

    /// Record a multi-line error as a single message.
    pub fn error_lines(&self, lines: &[&str]) {
        self.error(&lines.join("\n"));
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", message);
        self.record(&self.info, message);
    }

    /// Recorded errors, oldest first.
    pub fn errors(&self) -> Vec<String> {
        snapshot(&self.errors)
    }

    /// Recorded info messages, oldest first.
    pub fn info_messages(&self) -> Vec<String> {
        snapshot(&self.info)
    }

    fn record(&self, history: &Mutex<VecDeque<String>>, message: &str) {
        let mut history = history.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        while history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(message.to_string());
    }
}

fn snapshot(history: &Mutex<VecDeque<String>>) -> Vec<String> {
    history
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .cloned()
        .collect()
}
