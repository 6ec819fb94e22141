//! Internal HTTP client that applies timeouts, classifies failures and retries.

use crate::core::{
    domain::error::{DashboardError, DashboardResult, ValidationError},
    infrastructure::{
        config::DashboardConfig,
        request::{RequestOptions, retry_delay},
    },
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client for the dashboard backend.
///
/// Every call goes through [`ApiClient::request_value`]: the request is sent
/// with its timeout, the body is parsed (JSON, or `{"message": <text>}` for
/// anything else) and failures are classified into timeout, network and HTTP
/// errors. Network failures, timeouts and 5xx answers are retried while the
/// request still has retry budget, waiting one backoff unit longer before
/// each successive attempt.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    config: Arc<DashboardConfig>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `DashboardError::Unexpected` if the HTTP client cannot be built and
    /// `DashboardError::Validation` for an unusable rate limit.
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| DashboardError::Unexpected(format!("Cannot build HTTP client: {}", e)))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
                    ValidationError::field("requests_per_second", "Must be greater than 0")
                })?;
                let burst = NonZeroU32::new(rl.burst_size)
                    .ok_or_else(|| ValidationError::field("burst_size", "Must be greater than 0"))?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Performs a GET without retries.
    pub async fn get<T>(&self, operation: &str, endpoint: &str) -> DashboardResult<T>
    where
        T: DeserializeOwned,
    {
        self.request(operation, self.with_timeout(RequestOptions::get(endpoint)))
            .await
    }

    /// Performs a POST with a JSON body.
    pub async fn post<B, T>(&self, operation: &str, endpoint: &str, body: &B) -> DashboardResult<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let options = self.with_timeout(RequestOptions::post(endpoint)).json(body)?;
        self.request(operation, options).await
    }

    /// Performs a PUT with a JSON body.
    pub async fn put<B, T>(&self, operation: &str, endpoint: &str, body: &B) -> DashboardResult<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let options = self.with_timeout(RequestOptions::put(endpoint)).json(body)?;
        self.request(operation, options).await
    }

    /// Performs a DELETE.
    pub async fn delete<T>(&self, operation: &str, endpoint: &str) -> DashboardResult<T>
    where
        T: DeserializeOwned,
    {
        self.request(operation, self.with_timeout(RequestOptions::delete(endpoint)))
            .await
    }

    /// Runs a request and decodes the body into `T`.
    pub async fn request<T>(&self, operation: &str, options: RequestOptions) -> DashboardResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.request_value(operation, &options).await?;
        decode(operation, &options.endpoint, value)
    }

    /// Runs a request, retrying retryable failures while budget remains, and
    /// returns the parsed body.
    pub async fn request_value(
        &self,
        operation: &str,
        options: &RequestOptions,
    ) -> DashboardResult<Value> {
        let mut remaining = options.retries;

        loop {
            match self.send_once(operation, options).await {
                Ok(value) => return Ok(value),
                Err(err) if remaining > 0 && err.is_retryable() => {
                    let delay = retry_delay(self.config.backoff_base, remaining);
                    warn!(
                        operation,
                        endpoint = %options.endpoint,
                        error = %err,
                        retries_left = remaining - 1,
                        delay_ms = delay.as_millis() as u64,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    remaining -= 1;
                }
                Err(err) => {
                    warn!(
                        operation,
                        endpoint = %options.endpoint,
                        code = err.code().as_str(),
                        error = %err,
                        "request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// One attempt: rate limit, send, read the body, classify the outcome.
    async fn send_once(&self, operation: &str, options: &RequestOptions) -> DashboardResult<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self
            .config
            .base_url
            .endpoint_url(&options.endpoint, &options.query)?;
        debug!(operation, method = %options.method, url = %url, "sending request");

        let mut req_builder = self
            .http_client
            .request(options.method.clone(), url)
            .header(ACCEPT, "application/json");
        if let Some(body) = &options.body {
            req_builder = req_builder.json(body);
        }

        let exchange = async {
            let response = req_builder
                .send()
                .await
                .map_err(|e| transport_error(operation, options, e))?;
            let status = response.status();
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ct| ct.contains("application/json"));
            let text = response
                .text()
                .await
                .map_err(|e| transport_error(operation, options, e))?;
            Ok::<_, DashboardError>((status, is_json, text))
        };

        let (status, is_json, text) = tokio::time::timeout(options.timeout, exchange)
            .await
            .map_err(|_| DashboardError::Timeout {
                operation: operation.to_string(),
                endpoint: options.endpoint.clone(),
                timeout_ms: options.timeout_ms(),
            })??;

        debug!(operation, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(DashboardError::Http {
                operation: operation.to_string(),
                endpoint: options.endpoint.clone(),
                status: status.as_u16(),
                body: parse_error_body(is_json, text),
            });
        }

        parse_success_body(operation, options, status, is_json, text)
    }

    fn with_timeout(&self, options: RequestOptions) -> RequestOptions {
        options.timeout(self.config.timeout)
    }
}

fn transport_error(operation: &str, options: &RequestOptions, e: reqwest::Error) -> DashboardError {
    if e.is_timeout() {
        DashboardError::Timeout {
            operation: operation.to_string(),
            endpoint: options.endpoint.clone(),
            timeout_ms: options.timeout_ms(),
        }
    } else {
        DashboardError::Network {
            operation: operation.to_string(),
            endpoint: options.endpoint.clone(),
            message: e.to_string(),
        }
    }
}

fn parse_success_body(
    operation: &str,
    options: &RequestOptions,
    status: StatusCode,
    is_json: bool,
    text: String,
) -> DashboardResult<Value> {
    if text.trim().is_empty() || status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    if !is_json {
        return Ok(serde_json::json!({ "message": text }));
    }
    serde_json::from_str(&text).map_err(|e| DashboardError::Decode {
        operation: operation.to_string(),
        endpoint: options.endpoint.clone(),
        message: format!("Invalid JSON: {}", e),
    })
}

/// Error bodies never fail to parse: malformed JSON is kept as text.
fn parse_error_body(is_json: bool, text: String) -> Value {
    if is_json {
        if let Ok(value) = serde_json::from_str(&text) {
            return value;
        }
    }
    serde_json::json!({ "message": text })
}

/// Decodes a parsed body into `T`, keeping the request context on failure.
pub(crate) fn decode<T>(operation: &str, endpoint: &str, value: Value) -> DashboardResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| DashboardError::Decode {
        operation: operation.to_string(),
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
