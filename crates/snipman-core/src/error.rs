use thiserror::Error;

use crate::snippet::SnippetId;

/// Static resource a [`CoreError::ResourceUnavailable`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Template,
    Catalog,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Template => f.write_str("template"),
            Resource::Catalog => f.write_str("catalog"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Snippet {resource} unavailable: {location}")]
    ResourceUnavailable { resource: Resource, location: String },

    #[error("Snippet not found: {0}")]
    NotFound(SnippetId),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snippet name already in use: {0}")]
    DuplicateName(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl CoreError {
    /// Human-readable message suitable for showing to the user.
    pub fn message(&self) -> String {
        match self {
            CoreError::ResourceUnavailable { resource: Resource::Template, .. } => {
                "Cannot retrieve snippet template. Make sure you have an active internet connection."
                    .to_string()
            }
            CoreError::ResourceUnavailable { resource: Resource::Catalog, location } => format!(
                "Cannot retrieve snippet catalog from {}. Make sure you have an active internet connection.",
                location
            ),
            CoreError::NotFound(_) => {
                "Cannot retrieve snippet from storage. Make sure the ID is correct.".to_string()
            }
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Snippet cannot be empty")]
    EmptyEntity,

    #[error("Snippet name cannot be empty")]
    EmptyName,

    #[error("Snippet id cannot be empty")]
    EmptyId,
}

impl ValidationError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::EmptyEntity => "empty-entity",
            ValidationError::EmptyName => "empty-name",
            ValidationError::EmptyId => "empty-id",
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt snippet record: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
