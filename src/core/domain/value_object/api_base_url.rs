use crate::core::domain::error::ValidationError;
use std::fmt;
use url::Url;

const MAX_URL_LENGTH: usize = 2083; // RFC 7230 practical limit
const ALLOWED_SCHEMES: [&str; 2] = ["https", "http"];

/// The validated base URL every dashboard endpoint is resolved against
/// (e.g. `http://localhost:3000/api`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBaseUrl(Url);

impl ApiBaseUrl {
    /// Parses and validates a base URL.
    pub fn new(url: &str) -> Result<Self, ValidationError> {
        validate_url(url)?;
        let parsed = Url::parse(url)
            .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
        Ok(Self(parsed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Resolves an endpoint path (e.g. `/nodes/pve1/resources`) and optional
    /// query pairs against the base path.
    pub fn endpoint_url(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Url, ValidationError> {
        let base = self.0.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, endpoint.trim_start_matches('/'));
        let mut url = Url::parse(&joined)
            .map_err(|e| ValidationError::Format(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

/// Validates a base URL: non-empty, http(s), bounded length, no query or fragment.
pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::field("base_url", "URL cannot be empty"));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed =
        Url::parse(url).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme. Must be one of: {}",
            ALLOWED_SCHEMES.join(", ")
        )));
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::field("base_url", "URL must include a host"));
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ValidationError::ConstraintViolation(
            "Base URL cannot carry a query string or fragment".to_string(),
        ));
    }

    Ok(())
}

impl fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
