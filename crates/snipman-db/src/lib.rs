//! Snipman DB - redb implementation of the snippet store.

pub mod snippet_store;
pub mod tables;

pub use snippet_store::RedbSnippetStore;

use std::path::Path;
use std::sync::Arc;

use redb::Database;

use snipman_core::{HostContext, StorageError};

/// Open (or create) a database and make sure the host's snippet table exists.
pub fn init_database(
    path: impl AsRef<Path>,
    host: &HostContext,
) -> Result<Arc<Database>, StorageError> {
    let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

    RedbSnippetStore::init_tables(&db, host)?;

    Ok(Arc::new(db))
}
