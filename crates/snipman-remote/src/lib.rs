//! Snipman Remote - static resource loading and remote snippet execution.

pub mod endpoint;
pub mod loader;
pub mod runner;

pub use endpoint::parse_http_url;
pub use loader::{ResourceSource, StaticResourceLoader};
pub use runner::HttpRunner;
