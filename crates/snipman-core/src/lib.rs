//! Snipman Core - Domain models, traits, naming and validation.
//!
//! This crate contains the core domain logic for managing add-in snippets.
//! It has no dependencies on other Snipman crates.

pub mod bus;
pub mod error;
pub mod event;
pub mod host;
pub mod naming;
pub mod playlist;
pub mod remote;
pub mod snippet;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use bus::{EventBus, Listener, ListenerError, PublishReport, Subscription};
pub use error::{CoreError, RemoteError, Resource, StorageError, ValidationError};
pub use event::{DialogRequest, Notification, StorageEvent};
pub use host::HostContext;
pub use naming::{resolve_unique_name, DEFAULT_SNIPPET_NAME};
pub use playlist::{Gallery, Group, Playlist, PlaylistItem};
pub use remote::{ResourceLoader, RunRequest, Runner};
pub use snippet::{Snippet, SnippetId};
pub use storage::SnippetStore;
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemorySnippetStore;
