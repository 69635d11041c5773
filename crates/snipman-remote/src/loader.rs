use std::path::{Component, Path, PathBuf};

use snipman_core::{HostContext, Playlist, RemoteError, ResourceLoader, Snippet};

use crate::endpoint::{is_absolute, parse_http_url};

/// Where static resources are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    /// Local directory containing the `snippets/` tree.
    Directory(PathBuf),
    /// HTTP(S) base URL serving the `snippets/` tree.
    Http(String),
}

impl ResourceSource {
    /// Interpret a configuration value: URLs become `Http`, anything else a directory.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if parse_http_url(value).is_ok() {
            ResourceSource::Http(value.trim_end_matches('/').to_string())
        } else {
            ResourceSource::Directory(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceSource::Directory(path) => write!(f, "{}", path.display()),
            ResourceSource::Http(base) => f.write_str(base),
        }
    }
}

/// Loads the default template (YAML) and catalog (JSON) for a host.
pub struct StaticResourceLoader {
    source: ResourceSource,
    client: reqwest::Client,
}

impl StaticResourceLoader {
    pub fn new(source: ResourceSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &ResourceSource {
        &self.source
    }

    /// Fetch a resource as text. `location` must be relative; it is resolved
    /// against the configured source and may not leave it.
    pub async fn fetch_text(&self, location: &str) -> Result<String, RemoteError> {
        let relative = relative_path(location)?;

        match &self.source {
            ResourceSource::Directory(root) => {
                let path = root.join(relative);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| RemoteError::Request(format!("{}: {}", path.display(), e)))
            }
            ResourceSource::Http(base) => {
                let segments: Vec<_> = relative
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => part.to_str(),
                        _ => None,
                    })
                    .collect();
                let url = format!("{}/{}", base, segments.join("/"));
                self.fetch_url(&url).await
            }
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, RemoteError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RemoteError::Request(format!(
                "HTTP error {} for {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))
    }
}

/// Validate a resource location: no URLs and nothing that climbs out of the source root.
fn relative_path(location: &str) -> Result<&Path, RemoteError> {
    let invalid = || RemoteError::InvalidEndpoint(location.to_string());
    if is_absolute(location) || location.contains("://") {
        return Err(invalid());
    }

    let relative = Path::new(location.trim_start_matches('/'));
    let mut normal = 0;
    for component in relative.components() {
        match component {
            Component::Normal(part) if part.to_str().is_some() => normal += 1,
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }
    if normal == 0 {
        return Err(invalid());
    }
    Ok(relative)
}

impl ResourceLoader for StaticResourceLoader {
    async fn load_default_template(&self, host: &HostContext) -> Option<Snippet> {
        let location = host.default_template_path();
        let text = match self.fetch_text(&location).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to fetch template {}: {}", location, e);
                return None;
            }
        };

        match serde_yaml::from_str::<Snippet>(&text) {
            Ok(snippet) => Some(snippet),
            Err(e) => {
                tracing::warn!("Failed to parse template {}: {}", location, e);
                None
            }
        }
    }

    async fn load_catalog(&self, host: &HostContext, location: Option<&str>) -> Option<Playlist> {
        let location = location
            .map(str::to_string)
            .unwrap_or_else(|| host.catalog_path());
        let text = match self.fetch_text(&location).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to fetch catalog {}: {}", location, e);
                return None;
            }
        };

        match serde_json::from_str::<Playlist>(&text) {
            Ok(playlist) => Some(playlist),
            Err(e) => {
                tracing::warn!("Failed to parse catalog {}: {}", location, e);
                None
            }
        }
    }
}
