//! Description of one logical API call, including its retry budget.

use crate::core::domain::error::{DashboardError, DashboardResult};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;

use super::config::DEFAULT_TIMEOUT;

/// Method, endpoint, body, timeout and remaining retry budget of a request.
///
/// The body is serialized once up front so every retry re-sends the same bytes.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
    pub retries: u32,
}

impl RequestOptions {
    /// A request with the default timeout and no retries.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attaches a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> DashboardResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            DashboardError::Unexpected(format!(
                "Failed to serialize body for {}: {}",
                self.endpoint, e
            ))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Number of backoff steps the retry wait counts down from.
const BACKOFF_STEPS: u32 = 3;

/// Wait before the next attempt, given how many retries are left.
///
/// The wait is `base * (3 - remaining)`: with a one second base, a budget of 2
/// waits 1s then 2s, and a final retry always waits 2s. Budgets above 2 start
/// with immediate retries.
pub(crate) fn retry_delay(base: Duration, remaining: u32) -> Duration {
    base.saturating_mul(BACKOFF_STEPS.saturating_sub(remaining))
}
