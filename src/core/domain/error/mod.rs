use thiserror::Error;

/// The main error type for dashboard operations.
///
/// Request failures carry the logical operation name (e.g. `"list nodes"`) and
/// the endpoint that was called, so the presentation layer can show where a
/// failure happened as well as what kind of failure it was.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The request did not complete within its timeout.
    ///
    /// # Fields
    /// * `operation` - The logical operation that was running
    /// * `endpoint` - The endpoint path that was called
    /// * `timeout_ms` - The timeout that elapsed, in milliseconds
    #[error("{operation} timed out after {timeout_ms} ms ({endpoint})")]
    Timeout {
        operation: String,
        endpoint: String,
        timeout_ms: u64,
    },

    /// The request never produced an HTTP response (DNS, refused connection, reset...).
    #[error("{operation} could not reach {endpoint}: {message}")]
    Network {
        operation: String,
        endpoint: String,
        message: String,
    },

    /// The backend answered with a non-success status.
    ///
    /// # Fields
    /// * `status` - The HTTP status code
    /// * `body` - The parsed response body, or `{"message": <raw text>}` for non-JSON bodies
    #[error("{operation} failed with HTTP {status} ({endpoint})")]
    Http {
        operation: String,
        endpoint: String,
        status: u16,
        body: serde_json::Value,
    },

    /// A success response whose body could not be decoded into the expected shape.
    #[error("{operation} returned an unreadable response ({endpoint}): {message}")]
    Decode {
        operation: String,
        endpoint: String,
        message: String,
    },

    /// Represents validation failures of client-side input
    #[error("Validation error: {source}")]
    Validation { source: ValidationError },

    /// Anything that does not fit the categories above
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<ValidationError> for DashboardError {
    fn from(error: ValidationError) -> Self {
        DashboardError::Validation { source: error }
    }
}

/// Coarse failure category, used to pick guidance text and retry behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Timeout,
    Network,
    Http,
    Decode,
    Validation,
    Unexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Network => "NETWORK_ERROR",
            ErrorCode::Http => "HTTP_ERROR",
            ErrorCode::Decode => "DECODE_ERROR",
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::Unexpected => "UNEXPECTED_ERROR",
        }
    }
}

impl DashboardError {
    /// Returns the failure category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DashboardError::Timeout { .. } => ErrorCode::Timeout,
            DashboardError::Network { .. } => ErrorCode::Network,
            DashboardError::Http { .. } => ErrorCode::Http,
            DashboardError::Decode { .. } => ErrorCode::Decode,
            DashboardError::Validation { .. } => ErrorCode::Validation,
            DashboardError::Unexpected(_) => ErrorCode::Unexpected,
        }
    }

    /// Returns `true` for failures worth retrying: network failures, timeouts and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Timeout { .. } | DashboardError::Network { .. } => true,
            DashboardError::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DashboardError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The logical operation that failed, for request-layer errors.
    pub fn operation(&self) -> Option<&str> {
        match self {
            DashboardError::Timeout { operation, .. }
            | DashboardError::Network { operation, .. }
            | DashboardError::Http { operation, .. }
            | DashboardError::Decode { operation, .. } => Some(operation.as_str()),
            _ => None,
        }
    }

    /// The endpoint that was called, for request-layer errors.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            DashboardError::Timeout { endpoint, .. }
            | DashboardError::Network { endpoint, .. }
            | DashboardError::Http { endpoint, .. }
            | DashboardError::Decode { endpoint, .. } => Some(endpoint.as_str()),
            _ => None,
        }
    }

    /// The `error` or `message` field the backend put in a failure body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DashboardError::Http { body, .. } => body
                .get("error")
                .and_then(|v| v.as_str())
                .or_else(|| body.get("message").and_then(|v| v.as_str()))
                .filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Human-readable guidance for a toast, chosen by failure category.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Timeout { .. } => {
                "The server took too long to respond. Check that the backend is running and try again."
                    .to_string()
            }
            DashboardError::Network { .. } => {
                "Unable to reach the server. Check your network connection and the backend address."
                    .to_string()
            }
            DashboardError::Http { status, .. } => {
                if let Some(message) = self.server_message() {
                    return message.to_string();
                }
                match status {
                    400 => "The request was rejected as invalid.".to_string(),
                    401 | 403 => {
                        "Authentication failed. Check the node credentials.".to_string()
                    }
                    404 => "The requested item was not found.".to_string(),
                    409 => "The operation conflicts with the current state.".to_string(),
                    500..=599 => {
                        "The server encountered an error. Please try again later.".to_string()
                    }
                    other => format!("Request failed with status {}.", other),
                }
            }
            DashboardError::Decode { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            DashboardError::Validation { source } => source.to_string(),
            DashboardError::Unexpected(message) => message.clone(),
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Type alias for Results that may fail with a DashboardError
pub type DashboardResult<T> = Result<T, DashboardError>;
