use std::sync::Arc;

use snipman_core::{CoreError, EventBus, ListenerError, Notification, StorageError};
use snipman_db::{init_database, RedbSnippetStore};
use snipman_remote::{HttpRunner, StaticResourceLoader};

use crate::config::Config;
use crate::manager::SnippetManager;
use crate::notify::Notifier;
use crate::routes::ApiError;

/// Manager wired to the production collaborators.
pub type Manager = SnippetManager<RedbSnippetStore, StaticResourceLoader, HttpRunner>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Manager>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub fn new(manager: Manager, notifier: Notifier) -> Self {
        Self {
            manager: Arc::new(manager),
            notifier: Arc::new(notifier),
        }
    }

    /// Open the database and wire up the manager described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let db = init_database(&config.db_path, &config.host)?;
        let store = Arc::new(RedbSnippetStore::new(db, &config.host));
        let loader = Arc::new(StaticResourceLoader::new(config.resources.clone()));
        let runner = Arc::new(HttpRunner::new());

        let bus = Arc::new(EventBus::new());
        bus.subscribe(log_storage_events);

        let manager = SnippetManager::new(config.host.clone(), store, loader, runner, bus.clone())
            .with_runner_url(config.runner_url.clone())
            .with_name_policy(config.name_policy);

        Ok(Self::new(manager, Notifier::new(bus)))
    }

    /// Record a failed operation for the user and turn it into a response.
    pub fn report(&self, error: CoreError) -> ApiError {
        self.notifier.error(&error.message());
        ApiError(error)
    }
}

fn log_storage_events(notification: &Notification) -> Result<(), ListenerError> {
    if let Notification::Storage(event) = notification {
        match &event.snippet {
            Some(snippet) => tracing::debug!("Storage changed: {} ({})", snippet.id, snippet.name),
            None => tracing::debug!("Storage cleared"),
        }
    }
    Ok(())
}
