use std::sync::Arc;

use redb::{Database, ReadableTable};

use snipman_core::{HostContext, Snippet, SnippetId, SnippetStore, StorageError};

use crate::tables::{snippet_table, snippet_table_name};

fn db_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(e.to_string())
}

fn decode(bytes: &[u8]) -> Result<Snippet, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// redb implementation of SnippetStore, scoped to one host namespace.
///
/// Several hosts can share a database; each gets its own table.
pub struct RedbSnippetStore {
    db: Arc<Database>,
    table: String,
}

impl RedbSnippetStore {
    pub fn new(db: Arc<Database>, host: &HostContext) -> Self {
        Self {
            db,
            table: snippet_table_name(host),
        }
    }

    /// Initialize the host's table.
    pub fn init_tables(db: &Database, host: &HostContext) -> Result<(), StorageError> {
        let name = snippet_table_name(host);
        let write_txn = db.begin_write().map_err(db_err)?;
        {
            let _ = write_txn
                .open_table(snippet_table(&name))
                .map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.table
    }
}

impl SnippetStore for RedbSnippetStore {
    fn get(&self, id: &SnippetId) -> Result<Option<Snippet>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn
            .open_table(snippet_table(&self.table))
            .map_err(db_err)?;

        match table.get(id.as_str()).map_err(db_err)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn values(&self) -> Result<Vec<Snippet>, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn
            .open_table(snippet_table(&self.table))
            .map_err(db_err)?;

        let mut snippets = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, value) = entry.map_err(db_err)?;
            snippets.push(decode(value.value())?);
        }

        Ok(snippets)
    }

    fn insert(&self, snippet: Snippet) -> Result<Snippet, StorageError> {
        let value =
            serde_json::to_vec(&snippet).map_err(|e| StorageError::Serialization(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = write_txn
                .open_table(snippet_table(&self.table))
                .map_err(db_err)?;
            table
                .insert(snippet.id.as_str(), value.as_slice())
                .map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;

        Ok(snippet)
    }

    fn remove(&self, id: &SnippetId) -> Result<Option<Snippet>, StorageError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;

        let removed;
        {
            let mut table = write_txn
                .open_table(snippet_table(&self.table))
                .map_err(db_err)?;
            let result = table.remove(id.as_str()).map_err(db_err)?;
            removed = match result {
                Some(value) => Some(decode(value.value())?),
                None => None,
            };
        }

        write_txn.commit().map_err(db_err)?;

        Ok(removed)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;
        let removed;
        {
            let mut table = write_txn
                .open_table(snippet_table(&self.table))
                .map_err(db_err)?;

            let mut keys = Vec::new();
            for entry in table.iter().map_err(db_err)? {
                let (key, _) = entry.map_err(db_err)?;
                keys.push(key.value().to_string());
            }

            for key in &keys {
                table.remove(key.as_str()).map_err(db_err)?;
            }
            removed = keys.len();
        }
        write_txn.commit().map_err(db_err)?;

        tracing::debug!("Cleared {} snippets from {}", removed, self.table);
        Ok(())
    }
}
