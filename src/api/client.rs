//! The client struct and shared request/response plumbing.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::session::Session;
use crate::types::{ApiDetail, AppError, Result, AUTH_FAILED_MESSAGE};

/// HTTP client for the PAPI backend.
///
/// Cheap to clone per call site is not needed; one instance is created at
/// startup and borrowed by every screen. The session is injected so that
/// token resolution stays explicit.
pub struct PapiClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl PapiClient {
    /// Creates a client against the given base URL (no trailing slash
    /// required) with the given session store.
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected session store.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the stored bearer token, failing locally with
    /// [`AppError::MissingToken`] when none is held.
    pub(crate) fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.require_token()?;
        Ok(builder.bearer_auth(token))
    }

    /// Sends a request and deserializes a 2xx JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("failed to parse response: {}", e)))
    }

    /// Sends a request where the 2xx body is irrelevant.
    pub(crate) async fn send_unit(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await?;
        Ok(())
    }

    /// Issues the request and maps the response status into the error
    /// taxonomy: 401 becomes an authentication failure (server detail
    /// preferred), any other non-2xx a request failure with the server's
    /// `detail` when present, transport errors a network failure.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        debug!(status = %status, "papi response");

        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ApiDetail>()
            .await
            .ok()
            .and_then(|body| body.message());

        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Auth(
                detail.unwrap_or_else(|| AUTH_FAILED_MESSAGE.to_string()),
            ));
        }

        Err(AppError::Api {
            status: status.as_u16(),
            detail: detail
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let session = Arc::new(Session::new(std::env::temp_dir().join("papi-test.json")));
        let client = PapiClient::new("http://localhost:8000/", session);
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/cases/get_all_cases"),
            "http://localhost:8000/cases/get_all_cases"
        );
    }

    #[test]
    fn test_authed_without_token_fails_locally() {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(Session::new(dir.path().join("session.json")));
        let client = PapiClient::new("http://localhost:8000", session);

        let builder = client.http.get(client.url("/auth/me"));
        let err = client.authed(builder).unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }
}
