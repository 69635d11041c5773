use crate::error::StorageError;
use crate::snippet::{Snippet, SnippetId};

/// Trait for a namespaced snippet store.
///
/// Every call is treated as atomic and immediately visible to the next read.
pub trait SnippetStore: Send + Sync {
    /// Get a snippet by ID.
    fn get(&self, id: &SnippetId) -> Result<Option<Snippet>, StorageError>;

    /// Get all snippets, in no particular order.
    fn values(&self) -> Result<Vec<Snippet>, StorageError>;

    /// Insert a snippet, replacing any previous value with the same id.
    /// Returns the stored value.
    fn insert(&self, snippet: Snippet) -> Result<Snippet, StorageError>;

    /// Remove a snippet. Returns the removed value, if there was one.
    fn remove(&self, id: &SnippetId) -> Result<Option<Snippet>, StorageError>;

    /// Remove every snippet.
    fn clear(&self) -> Result<(), StorageError>;
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory snippet store for testing.
    #[derive(Default)]
    pub struct InMemorySnippetStore {
        snippets: RwLock<HashMap<SnippetId, Snippet>>,
    }

    impl InMemorySnippetStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store pre-populated with the given snippets.
        pub fn with_snippets(snippets: impl IntoIterator<Item = Snippet>) -> Self {
            let store = Self::new();
            {
                let mut map = store.snippets.write().unwrap();
                for snippet in snippets {
                    map.insert(snippet.id.clone(), snippet);
                }
            }
            store
        }

        pub fn len(&self) -> usize {
            self.snippets.read().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl SnippetStore for InMemorySnippetStore {
        fn get(&self, id: &SnippetId) -> Result<Option<Snippet>, StorageError> {
            Ok(self.snippets.read().unwrap().get(id).cloned())
        }

        fn values(&self) -> Result<Vec<Snippet>, StorageError> {
            Ok(self.snippets.read().unwrap().values().cloned().collect())
        }

        fn insert(&self, snippet: Snippet) -> Result<Snippet, StorageError> {
            self.snippets
                .write()
                .unwrap()
                .insert(snippet.id.clone(), snippet.clone());
            Ok(snippet)
        }

        fn remove(&self, id: &SnippetId) -> Result<Option<Snippet>, StorageError> {
            Ok(self.snippets.write().unwrap().remove(id))
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.snippets.write().unwrap().clear();
            Ok(())
        }
    }

}
