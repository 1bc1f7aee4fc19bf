use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::envelope::{http_error_message, unwrap_envelope};
use super::notify::Notifier;
use crate::config::RequestConfig;
use crate::error::{TransportError, TransportResult};
use crate::storage::{Storage, API_TOKEN_KEY};

/// HTTP client for the knowledge-graph backend.
///
/// Attaches the stored bearer token, logs every call with its latency,
/// unwraps the response envelope, and notifies the user of failures.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout_ms: u64,
    notifier: Arc<dyn Notifier>,
    token_storage: Option<Arc<dyn Storage>>,
}

impl HttpTransport {
    /// Create a new transport rooted at `base_url`
    pub fn new(
        base_url: &str,
        request_config: &RequestConfig,
        notifier: Arc<dyn Notifier>,
    ) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(TransportError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms: request_config.timeout_ms,
            notifier,
            token_storage: None,
        })
    }

    /// Read the bearer token from `storage` before each request.
    pub fn with_token_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.token_storage = Some(storage);
        self
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> TransportResult<Value> {
        let builder = self.client.get(self.url(path)).query(query);
        self.send(Method::GET, path, builder).await
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> TransportResult<Value> {
        let builder = self.client.post(self.url(path)).json(body);
        self.send(Method::POST, path, builder).await
    }

    /// POST with an empty JSON object body.
    pub async fn post_empty(&self, path: &str) -> TransportResult<Value> {
        self.post(path, &Value::Object(Default::default())).await
    }

    /// PUT a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> TransportResult<Value> {
        let builder = self.client.put(self.url(path)).json(body);
        self.send(Method::PUT, path, builder).await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> TransportResult<Value> {
        let builder = self.client.delete(self.url(path));
        self.send(Method::DELETE, path, builder).await
    }

    /// POST a file as multipart field `file`.
    pub async fn upload(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> TransportResult<Value> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let builder = self.client.post(self.url(path)).multipart(form);
        self.send(Method::POST, path, builder).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn bearer_token(&self) -> Option<String> {
        let storage = self.token_storage.as_ref()?;
        match storage.get_item(API_TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read API token, sending request without it");
                None
            }
        }
    }

    /// Execute a request and unwrap the envelope (internal)
    async fn send(
        &self,
        method: Method,
        path: &str,
        mut builder: RequestBuilder,
    ) -> TransportResult<Value> {
        let request_id = Uuid::new_v4();

        if let Some(token) = self.bearer_token().await {
            builder = builder.bearer_auth(token);
        }

        debug!(%request_id, method = %method, path = %path, "API request");

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                error!(
                    %request_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "API request failed without response"
                );
                return Err(self.surface(self.classify(e)));
            }
        };

        let status = response.status();
        let text = response.text().await;
        let latency = start.elapsed();

        info!(
            %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "API call completed"
        );

        let text = text.map_err(|e| self.surface(self.classify(e)))?;

        if !status.is_success() {
            let body: Option<Value> = serde_json::from_str(&text).ok();
            let message = http_error_message(status.as_u16(), body.as_ref());
            return Err(self.surface(TransportError::Http {
                status: status.as_u16(),
                message,
            }));
        }

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                self.surface(TransportError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })
            })?
        };

        match unwrap_envelope(body) {
            Ok(payload) => Ok(payload),
            Err(failure) if failure.is_silent() => {
                warn!(
                    %request_id,
                    code = failure.code.as_deref().unwrap_or_default(),
                    reason = %failure.message,
                    "Backend reported degraded data"
                );
                Err(failure.into())
            }
            Err(failure) => Err(self.surface(failure.into())),
        }
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else if err.is_builder() {
            TransportError::Request(err)
        } else {
            TransportError::Network {
                message: "No response from server - Please check your connection".to_string(),
            }
        }
    }

    fn surface(&self, err: TransportError) -> TransportError {
        self.notifier.error(&err.to_string());
        err
    }
}
