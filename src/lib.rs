//! Snipman - snippet manager service for host application add-ins.

pub mod config;
pub mod manager;
pub mod notify;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use manager::{NamePolicy, SnippetManager};
pub use notify::Notifier;
pub use routes::create_router;
pub use state::AppState;
