use std::sync::{Arc, Mutex};

use crate::snippet::Snippet;

/// Messages carried by the [`EventBus`](crate::bus::EventBus).
#[derive(Debug, Clone)]
pub enum Notification {
    /// The snippet store changed.
    Storage(StorageEvent),
    /// A user-facing dialog should be shown.
    Dialog(DialogRequest),
}

impl Notification {
    /// Topic name, used for logging.
    pub fn topic(&self) -> &'static str {
        match self {
            Notification::Storage(_) => "storage",
            Notification::Dialog(_) => "dialog",
        }
    }
}

/// Store change. `snippet` is `None` after a bulk clear.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    pub snippet: Option<Snippet>,
}

impl StorageEvent {
    pub fn changed(snippet: Snippet) -> Self {
        Self {
            snippet: Some(snippet),
        }
    }

    pub fn cleared() -> Self {
        Self { snippet: None }
    }

    pub fn is_clear(&self) -> bool {
        self.snippet.is_none()
    }
}

type Responder = Box<dyn FnOnce(String) + Send>;

/// Request to show a dialog with a set of labelled actions.
///
/// Whoever presents the dialog answers it with [`DialogRequest::respond`].
/// Clones share the same responder, so only the first answer is delivered.
#[derive(Clone)]
pub struct DialogRequest {
    pub title: String,
    pub message: String,
    pub actions: Vec<String>,
    responder: Arc<Mutex<Option<Responder>>>,
}

impl DialogRequest {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<String>,
        on_action: impl FnOnce(String) + Send + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            actions,
            responder: Arc::new(Mutex::new(Some(Box::new(on_action)))),
        }
    }

    /// Answer the dialog with one of its action labels.
    /// Returns false for an unknown label or when the dialog was already answered.
    pub fn respond(&self, action: &str) -> bool {
        if !self.actions.iter().any(|a| a == action) {
            return false;
        }
        let responder = self
            .responder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match responder {
            Some(callback) => {
                callback(action.to_string());
                true
            }
            None => false,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.responder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl std::fmt::Debug for DialogRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogRequest")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("actions", &self.actions)
            .field("answered", &self.is_answered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_storage_event() {
        assert!(StorageEvent::cleared().is_clear());
        assert!(!StorageEvent::changed(Snippet::new("A")).is_clear());
    }

    #[test]
    fn test_dialog_respond_once() {
        let chosen = Arc::new(Mutex::new(Vec::new()));
        let sink = chosen.clone();
        let dialog = DialogRequest::new("Alert", "Delete?", actions(&["Ok", "Cancel"]), move |a| {
            sink.lock().unwrap().push(a)
        });

        let copy = dialog.clone();
        assert!(!dialog.is_answered());
        assert!(copy.respond("Cancel"));
        assert!(!dialog.respond("Ok"));
        assert!(dialog.is_answered());
        assert_eq!(*chosen.lock().unwrap(), vec!["Cancel".to_string()]);
    }

    #[test]
    fn test_dialog_unknown_action() {
        let dialog = DialogRequest::new("Alert", "Hi", actions(&["Ok"]), |_| {});
        assert!(!dialog.respond("Maybe"));
        assert!(!dialog.is_answered());
    }

    #[test]
    fn test_topic() {
        let n = Notification::Storage(StorageEvent::cleared());
        assert_eq!(n.topic(), "storage");
    }
}
