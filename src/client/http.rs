//! Authenticated HTTP client
//!
//! One configured client per process. Every request goes through
//! [`ApiClient::send`], which is where the bearer token is attached and
//! where 401/403 answers end the session.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::{extract_detail, ClientError, ClientResult};
use crate::session::Session;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001/api/v1";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every path is resolved against
    pub base_url: String,
    /// Request timeout in seconds (uploads and LLM calls can be slow)
    pub request_timeout_secs: u64,
    /// Size of the chunks an upload body is streamed in
    pub upload_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 120,
            upload_chunk_size: 64 * 1024,
        }
    }
}

/// How a 401/403 answer is reported once the token is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthPolicy {
    /// Regular calls: `SessionExpired`
    Session,
    /// Credential exchange: `Api` with the server's detail
    Credentials,
}

/// HTTP client bound to one backend and one session
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for `config`, reading tokens from `session`
    pub fn new(config: ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ClientError::from_reqwest)?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session this client authenticates with
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Resolve a path against the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Start a request, attaching the bearer token when one is present
    pub async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.get().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request under the session failure policy
    ///
    /// 401 and 403 clear the token, broadcast the expiry, and come back as
    /// [`ClientError::SessionExpired`]. Other non-success statuses come back
    /// as [`ClientError::Api`] with the server's `detail`.
    pub async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        self.dispatch(builder, AuthPolicy::Session).await
    }

    /// Send a credential exchange (login, register)
    ///
    /// 401 and 403 still clear any stored token and broadcast the expiry,
    /// but come back as [`ClientError::Api`] so the form can show the
    /// server's `detail` for wrong credentials.
    pub async fn send_credentials(&self, builder: RequestBuilder) -> ClientResult<Response> {
        self.dispatch(builder, AuthPolicy::Credentials).await
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::GET, path).await;
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    /// POST a JSON body to `path` and decode the JSON answer
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).await.json(body);
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    /// POST with an empty body and decode the JSON answer
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::POST, path).await;
        let response = self.send(builder).await?;
        decode_json(response).await
    }

    /// DELETE `path`, discarding the body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, path).await;
        self.send(builder).await?;
        Ok(())
    }

    async fn dispatch(&self, builder: RequestBuilder, policy: AuthPolicy) -> ClientResult<Response> {
        let request = builder.build().map_err(ClientError::from_reqwest)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let started = Instant::now();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = response.status();
        tracing::debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API request"
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if let Err(e) = self.session.expire().await {
                tracing::error!(error = %e, "Failed to persist session expiry");
            }
            if policy == AuthPolicy::Session {
                return Err(ClientError::SessionExpired {
                    status: status.as_u16(),
                });
            }
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decode a JSON response body
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await.map_err(ClientError::from_reqwest)?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
