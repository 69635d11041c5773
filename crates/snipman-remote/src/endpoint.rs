use reqwest::Url;

use snipman_core::RemoteError;

/// Parse an absolute http(s) URL with a host.
pub fn parse_http_url(value: &str) -> Result<Url, RemoteError> {
    let invalid = || RemoteError::InvalidEndpoint(value.to_string());
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// True when `value` parses as a URL of any scheme.
pub(crate) fn is_absolute(value: &str) -> bool {
    Url::parse(value.trim()).is_ok()
}
