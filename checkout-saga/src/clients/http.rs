//! A deliberately minimal stand-in for the "resilient HTTP client" the spec
//! treats as an external collaborator (timeouts, connection pooling,
//! retry-on-idempotent-verb, circuit breaking). No reqwest-middleware or
//! circuit-breaker crate appears anywhere in this codebase's dependency
//! surface, so rather than fabricate one, this wraps a single shared
//! `reqwest::Client` and retries `GET` alone, up to twice, on transport
//! errors or 5xx responses. See DESIGN.md for why this is a simplification.

use reqwest::{Method, StatusCode};
use std::time::Duration;

/// Shared, process-wide HTTP client used by every downstream adapter.
#[derive(Clone)]
pub struct ResilientHttpClient {
    inner: reqwest::Client,
}

/// Errors surfaced by the resilient client, independent of any particular
/// downstream's response shape.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent, or the connection failed outright.
    #[error("transport error calling {0}: {1}")]
    Transport(String, reqwest::Error),
    /// The downstream returned a non-2xx status after retries were exhausted.
    #[error("downstream {0} returned status {1}")]
    Status(String, StatusCode),
}

const MAX_GET_RETRIES: u32 = 2;

impl ResilientHttpClient {
    /// Build a client with the given per-call timeout (used for both
    /// connect and total request time).
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest` client cannot be built (e.g. TLS
    /// backend initialization failure) — this only happens at process
    /// startup, never per-request.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        #[allow(clippy::unwrap_used)]
        let inner = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .unwrap();
        Self { inner }
    }

    /// Issue a GET request, retrying transport errors and 5xx responses up
    /// to [`MAX_GET_RETRIES`] times. Not used for POST/DELETE — those are
    /// not generally idempotent at the transport level; the business layer
    /// implements its own idempotency where it matters (spec §4.1, §4.6).
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if every attempt fails.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, HttpError> {
        let mut attempt = 0;
        loop {
            let result = self.inner.get(url).send().await;
            match result {
                Ok(resp) if resp.status().is_server_error() && attempt < MAX_GET_RETRIES => {
                    attempt += 1;
                    continue;
                }
                Ok(resp) => return Ok(resp),
                Err(_) if attempt < MAX_GET_RETRIES => {
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(HttpError::Transport(url.to_string(), err)),
            }
        }
    }

    /// Issue a non-idempotent request (POST/DELETE) without retry.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Transport`] if the request cannot be sent.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, HttpError> {
        let mut builder = self.inner.request(method, url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        builder
            .send()
            .await
            .map_err(|err| HttpError::Transport(url.to_string(), err))
    }

    /// Attach standard auth/tenant headers to a request builder.
    #[must_use]
    pub fn authed(
        &self,
        method: Method,
        url: &str,
        bearer_token: &str,
        tenant_id: &str,
    ) -> reqwest::RequestBuilder {
        self.inner
            .request(method, url)
            .bearer_auth(bearer_token)
            .header("X-Tenant-Id", tenant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_is_cheaply_cloneable() {
        let client = ResilientHttpClient::new(Duration::from_secs(1));
        let _clone = client.clone();
    }
}
