use std::future::Future;

use crate::error::RemoteError;
use crate::host::HostContext;
use crate::playlist::Playlist;
use crate::snippet::Snippet;

/// Source of the static resources published for each host.
///
/// Both fetches return `None` when the resource cannot be retrieved or
/// decoded; implementations log the cause.
pub trait ResourceLoader: Send + Sync {
    /// Fetch the template new snippets start from.
    fn load_default_template(
        &self,
        host: &HostContext,
    ) -> impl Future<Output = Option<Snippet>> + Send;

    /// Fetch the catalog of example snippets. `location` overrides the host's
    /// default catalog path.
    fn load_catalog(
        &self,
        host: &HostContext,
        location: Option<&str>,
    ) -> impl Future<Output = Option<Playlist>> + Send;
}

/// Outbound form submission to a remote execution endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub endpoint: String,
    pub fields: Vec<(String, String)>,
}

impl RunRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that submits run requests. Submission does not wait for, or
/// read, the remote response.
pub trait Runner: Send + Sync {
    fn submit(&self, request: RunRequest) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
