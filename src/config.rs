use std::net::SocketAddr;
use std::path::PathBuf;

use snipman_core::HostContext;
use snipman_remote::{parse_http_url, ResourceSource};

use crate::manager::NamePolicy;

/// Default remote execution endpoint.
pub const DEFAULT_RUNNER_URL: &str = "https://addin-playground-runner.azurewebsites.net";

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: HostContext,
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub resources: ResourceSource,
    pub runner_url: String,
    pub name_policy: NamePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("SNIPMAN_HOST").unwrap_or_else(|_| "Excel".to_string());
        if host.trim().is_empty() {
            return Err(ConfigError::Invalid("SNIPMAN_HOST", "must not be empty"));
        }

        let listen_addr = std::env::var("SNIPMAN_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3200".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("SNIPMAN_LISTEN_ADDR", "must be a valid socket address")
            })?;

        let db_path = std::env::var("SNIPMAN_DB_PATH")
            .unwrap_or_else(|_| "./snipman.redb".to_string())
            .into();

        let resources = ResourceSource::parse(
            &std::env::var("SNIPMAN_RESOURCES").unwrap_or_else(|_| "./static".to_string()),
        );

        let runner_url = match std::env::var("SNIPMAN_RUNNER_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => DEFAULT_RUNNER_URL.to_string(),
        };
        if parse_http_url(&runner_url).is_err() {
            return Err(ConfigError::Invalid(
                "SNIPMAN_RUNNER_URL",
                "must be an http(s) URL with a host",
            ));
        }

        let name_policy = match std::env::var("SNIPMAN_ENFORCE_UNIQUE_NAMES") {
            Ok(value) => {
                if parse_bool(&value).ok_or(ConfigError::Invalid(
                    "SNIPMAN_ENFORCE_UNIQUE_NAMES",
                    "must be true or false",
                ))? {
                    NamePolicy::Enforce
                } else {
                    NamePolicy::Suggest
                }
            }
            Err(_) => NamePolicy::Suggest,
        };

        Ok(Config {
            host: HostContext::new(host),
            listen_addr,
            db_path,
            resources,
            runner_url,
            name_policy,
        })
    }

    /// Create a test configuration.
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Config {
            host: HostContext::new("Excel"),
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: PathBuf::from("/tmp/snipman-test.redb"),
            resources: ResourceSource::Directory(PathBuf::from("./static")),
            runner_url: DEFAULT_RUNNER_URL.to_string(),
            name_policy: NamePolicy::Suggest,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" yes "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_default_runner_url_is_valid() {
        assert!(parse_http_url(DEFAULT_RUNNER_URL).is_ok());
        assert!(parse_http_url("https://").is_err());
    }

    #[test]
    fn test_testing_config() {
        let config = Config::for_testing();
        assert_eq!(config.host.store_namespace(), "ExcelSnippets");
        assert_eq!(config.name_policy, NamePolicy::Suggest);
    }
}
