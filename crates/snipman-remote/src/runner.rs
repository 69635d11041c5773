use snipman_core::{RemoteError, RunRequest, Runner};

use crate::endpoint::parse_http_url;

/// Submits run requests as an HTML form POST.
///
/// The POST is spawned onto the tokio runtime and `submit` returns as soon as
/// it is queued. The response is never read.
#[derive(Clone, Default)]
pub struct HttpRunner {
    client: reqwest::Client,
}

impl HttpRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Runner for HttpRunner {
    async fn submit(&self, request: RunRequest) -> Result<(), RemoteError> {
        let url = parse_http_url(&request.endpoint)?;

        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .post(url)
                .form(&request.fields)
                .send()
                .await;
            match result {
                Ok(response) => tracing::debug!(
                    "Run request to {} answered with {}",
                    request.endpoint,
                    response.status()
                ),
                Err(e) => tracing::warn!("Run request to {} failed: {}", request.endpoint, e),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::timeout;

    /// Read one HTTP/1.1 request (headers plus content-length body).
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = timeout(Duration::from_secs(5), socket.read(&mut chunk))
                .await
                .unwrap()
                .unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_endpoint() {
        let runner = HttpRunner::new();
        for endpoint in ["not a url", "https://", "ftp://runner/run"] {
            let request = RunRequest::new(endpoint).with_field("snippet", "name: A\n");
            let err = runner.submit(request).await.unwrap_err();
            assert!(matches!(err, RemoteError::InvalidEndpoint(_)));
        }
    }

    #[tokio::test]
    async fn test_submit_posts_snippet_form() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/run", listener.local_addr().unwrap());

        HttpRunner::new()
            .submit(RunRequest::new(endpoint).with_field("snippet", "name: A b\n"))
            .await
            .unwrap();

        let (mut socket, _) = timeout(Duration::from_secs(5), listener.accept())
            .await
            .unwrap()
            .unwrap();
        let request = read_request(&mut socket).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
            .await
            .unwrap();

        assert!(request.starts_with("POST /run HTTP/1.1\r\n"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.ends_with("\r\n\r\nsnippet=name%3A+A+b%0A"));
    }
}
