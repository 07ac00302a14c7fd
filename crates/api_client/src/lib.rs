use std::time::Duration;

use reqwest::Client;
use shared::protocol::{EchoRequest, EchoResponse};
use thiserror::Error;
use tracing::warn;

pub const ECHO_PATH: &str = "/api/echo";

/// How long a dispatch may stay in flight before it is failed.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("server responded with status {status}")]
    Status { status: u16 },
    #[error("failed to reach the server: {source}")]
    Transport { source: reqwest::Error },
    #[error("failed to decode the server response: {source}")]
    Decode { source: reqwest::Error },
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .expect("default http client");
        Self::with_http_client(http, base_url)
    }

    /// Wraps a caller-supplied transport, for custom timeouts or proxies.
    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts a message to the echo endpoint and decodes the success
    /// envelope. Failures are logged and returned; nothing is retried.
    pub async fn send_message(&self, request: &EchoRequest) -> Result<EchoResponse, DispatchError> {
        let url = format!("{}{ECHO_PATH}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                warn!(%url, %error, "echo dispatch could not reach the server");
                DispatchError::Transport { source: error }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "echo dispatch rejected by the server");
            return Err(DispatchError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<EchoResponse>().await.map_err(|error| {
            warn!(%url, %error, "echo response could not be decoded");
            DispatchError::Decode { source: error }
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
