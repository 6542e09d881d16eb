//! HTTP plumbing for the remote store.
//!
//! Thin wrapper over `reqwest` that attaches the session token, maps status
//! codes onto [`StoreError`], and parses JSON bodies. Requests are sent
//! exactly once; failures surface immediately to the caller.

use crate::secret::SecretString;
use crate::traits::{Credentials, StoreConfig, StoreError, StoreResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// HTTP client holding the session with the store.
pub struct HttpClient {
    client: Client,
    config: StoreConfig,
    credentials: Credentials,
    /// Session token, acquired lazily on the first authenticated request.
    session: RwLock<Option<SecretString>>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    org: &'a str,
    email: &'a str,
    password: &'a SecretString,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: SecretString,
}

impl HttpClient {
    /// Creates a client for the given endpoint and credentials.
    pub fn new(config: StoreConfig, credentials: Credentials) -> StoreResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                reqwest::header::HeaderName::try_from(key.as_str()),
                reqwest::header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, val);
            }
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            credentials,
            session: RwLock::new(None),
        })
    }

    /// Builds a URL from a path.
    pub fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Logs in with the configured credentials and caches the session token.
    pub async fn login(&self) -> StoreResult<()> {
        let token = self.acquire_token().await?;
        *self.session.write().await = Some(token);
        Ok(())
    }

    async fn acquire_token(&self) -> StoreResult<SecretString> {
        let body = LoginRequest {
            org: &self.credentials.org,
            email: &self.credentials.email,
            password: &self.credentials.password,
        };
        let request = self.client.post(self.build_url("auth/login")).json(&body);
        let response = self.send(request).await?;
        let login: LoginResponse = self.parse_json(response).await?;
        info!(org = %self.credentials.org, name = %self.config.name, "logged in to entity store");
        Ok(login.token)
    }

    /// Returns the cached session token, logging in on first use.
    async fn ensure_session(&self) -> StoreResult<SecretString> {
        if let Some(token) = self.session.read().await.as_ref() {
            return Ok(token.clone());
        }
        let mut session = self.session.write().await;
        // Another caller may have logged in while we waited for the lock.
        if let Some(token) = session.as_ref() {
            return Ok(token.clone());
        }
        let token = self.acquire_token().await?;
        *session = Some(token.clone());
        Ok(token)
    }

    /// Executes an authenticated GET and deserializes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> StoreResult<T> {
        let token = self.ensure_session().await?;
        let request = self
            .client
            .get(self.build_url(path))
            .query(query)
            .bearer_auth(token.expose());
        let response = self.send(request).await?;
        self.parse_json(response).await
    }

    /// Executes an authenticated POST and deserializes the JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreResult<T> {
        let token = self.ensure_session().await?;
        let request = self
            .client
            .post(self.build_url(path))
            .json(body)
            .bearer_auth(token.expose());
        let response = self.send(request).await?;
        self.parse_json(response).await
    }

    /// Executes an authenticated PUT and deserializes the JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreResult<T> {
        let token = self.ensure_session().await?;
        let request = self
            .client
            .put(self.build_url(path))
            .json(body)
            .bearer_auth(token.expose());
        let response = self.send(request).await?;
        self.parse_json(response).await
    }

    /// Sends a request once and maps transport and status errors.
    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(e.to_string())
            } else if e.is_connect() {
                StoreError::ConnectionFailed(e.to_string())
            } else {
                StoreError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(StoreError::RateLimited(retry_after));
        }

        if status.is_client_error() {
            return match status {
                StatusCode::UNAUTHORIZED => {
                    Err(StoreError::AuthenticationFailed("Unauthorized".into()))
                }
                StatusCode::FORBIDDEN => Err(StoreError::AuthorizationDenied("Forbidden".into())),
                StatusCode::NOT_FOUND => Err(StoreError::NotFound("Resource not found".into())),
                StatusCode::BAD_REQUEST => {
                    let body = response.text().await.unwrap_or_default();
                    Err(StoreError::InvalidRequest(format!("Bad request: {}", body)))
                }
                _ => Err(StoreError::RequestFailed(format!(
                    "Client error: {}",
                    status
                ))),
            };
        }

        if status.is_server_error() {
            return Err(StoreError::RequestFailed(format!(
                "Server error: {}",
                status
            )));
        }

        debug!(status = %status, "store request completed");
        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(&self, response: Response) -> StoreResult<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            StoreError::InvalidResponse(format!(
                "Failed to parse response (status {}): {} - Body: {}",
                status,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }
}
