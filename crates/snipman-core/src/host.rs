use serde::{Deserialize, Serialize};

/// The host application the add-in runs inside (e.g. "Excel").
///
/// Snippets are stored per host, and each host has its own template and
/// catalog resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostContext {
    name: String,
}

impl HostContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace of this host's snippet store.
    pub fn store_namespace(&self) -> String {
        format!("{}Snippets", self.name)
    }

    /// Relative path of the default snippet template.
    pub fn default_template_path(&self) -> String {
        format!("snippets/{}/default.yml", self.name.to_lowercase())
    }

    /// Relative path of the example snippet catalog.
    pub fn catalog_path(&self) -> String {
        format!("snippets/{}/playlist.json", self.name.to_lowercase())
    }
}

impl std::fmt::Display for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
