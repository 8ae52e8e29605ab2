//! Error types for image editing and video generation.

use std::fmt;
use std::time::Duration;

/// Errors that can occur while editing images or generating videos.
#[derive(Debug, thiserror::Error)]
pub enum FramecraftError {
    /// No usable API key is configured.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote service answered with an error.
    #[error("remote service error: {0}")]
    Remote(#[from] RemoteError),

    /// Network or HTTP transport error, including undecodable responses.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A local input could not be read or encoded.
    #[error("failed to encode input: {0}")]
    Encoding(String),

    /// The service reported success but returned nothing usable.
    #[error("no result: {0}")]
    NoResult(String),

    /// I/O error (e.g., saving an output file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FramecraftError {
    /// Returns true for failures that came from the remote service boundary.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::Network(_))
    }

    /// Returns true when the caller should re-acquire a credential before
    /// retrying the whole operation.
    pub fn requires_reauth(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::Remote(err) => err.reason.requires_reauth(),
            _ => false,
        }
    }

    /// Returns true if this error is likely transient and worth retrying.
    ///
    /// Nothing in this crate retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Remote(err) => matches!(
                err.reason,
                RemoteReason::ResourceExhausted | RemoteReason::Unavailable
            ),
            _ => false,
        }
    }

    /// Returns the suggested retry delay, if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Remote(err) if err.reason == RemoteReason::ResourceExhausted => err.retry_after,
            Self::Remote(err) if err.reason == RemoteReason::Unavailable => {
                Some(err.retry_after.unwrap_or(Duration::from_secs(2)))
            }
            Self::Network(_) => Some(Duration::from_secs(2)),
            _ => None,
        }
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, FramecraftError>;

/// Structured reason attached to a remote failure.
///
/// Derived from the canonical status string in a Google API error body, from
/// the numeric code of a long-running operation error, or, failing both, from
/// the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteReason {
    /// The request was malformed.
    InvalidArgument,
    /// The request can't run in the current state (e.g. billing disabled).
    FailedPrecondition,
    /// Missing or invalid credential.
    Unauthenticated,
    /// The credential lacks access to the resource.
    PermissionDenied,
    /// The resource doesn't exist. For this API that usually means the key
    /// belongs to a project that can't see the model.
    NotFound,
    /// Quota or rate limit exceeded.
    ResourceExhausted,
    /// The service is temporarily unavailable.
    Unavailable,
    /// Internal service error.
    Internal,
    /// Any other canonical status.
    Other(String),
}

impl RemoteReason {
    /// Parses a canonical status string such as `"NOT_FOUND"`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "FAILED_PRECONDITION" => Self::FailedPrecondition,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "NOT_FOUND" => Self::NotFound,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            "UNAVAILABLE" => Self::Unavailable,
            "INTERNAL" => Self::Internal,
            other => Self::Other(other.to_string()),
        }
    }

    /// Maps a numeric `google.rpc.Code`.
    pub fn from_rpc_code(code: i32) -> Self {
        match code {
            3 => Self::InvalidArgument,
            5 => Self::NotFound,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            13 => Self::Internal,
            14 => Self::Unavailable,
            16 => Self::Unauthenticated,
            c => Self::Other(format!("code {c}")),
        }
    }

    /// Maps an HTTP status when the body carries no canonical status.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidArgument,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            429 => Self::ResourceExhausted,
            500 => Self::Internal,
            502..=504 => Self::Unavailable,
            s => Self::Other(format!("HTTP {s}")),
        }
    }

    /// Returns true when the failure implies a stale or invalid credential.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::Unauthenticated | Self::PermissionDenied
        )
    }

    /// Returns the canonical status string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Unavailable => "UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for RemoteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported by the remote generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status, absent for operation-level errors.
    pub status: Option<u16>,
    /// Structured reason.
    pub reason: RemoteReason,
    /// Service-provided message, sanitized.
    pub message: String,
    /// Suggested delay from a `Retry-After` header.
    pub retry_after: Option<Duration>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", status, self.reason, self.message),
            None => write!(f, "{}: {}", self.reason, self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl RemoteError {
    /// Builds an error from a non-success HTTP response body.
    ///
    /// Understands the standard `{"error": {"code", "message", "status"}}`
    /// envelope and falls back to the raw text.
    pub fn from_http(status: u16, body: &str, retry_after: Option<Duration>) -> Self {
        #[derive(serde::Deserialize)]
        struct Envelope {
            error: ErrorBody,
        }
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            status: Option<String>,
        }

        let parsed = serde_json::from_str::<Envelope>(body).ok();
        let reason = parsed
            .as_ref()
            .and_then(|e| e.error.status.as_deref())
            .map(RemoteReason::from_status)
            .unwrap_or_else(|| RemoteReason::from_http_status(status));
        let message = parsed
            .and_then(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string());

        Self {
            status: Some(status),
            reason,
            message: sanitize_error_message(&message),
            retry_after,
        }
    }

    /// Builds an error from the `error` field of a long-running operation.
    pub fn from_operation(code: Option<i32>, message: Option<&str>) -> Self {
        Self {
            status: None,
            reason: code
                .map(RemoteReason::from_rpc_code)
                .unwrap_or_else(|| RemoteReason::Other("UNKNOWN".into())),
            message: sanitize_error_message(message.unwrap_or("unknown error")),
            retry_after: None,
        }
    }
}

/// Reads a `Retry-After` header expressed in whole seconds.
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Prepares a service-provided message for storage in an error.
///
/// Redacts `key=` query values; everything else is kept as sent.
pub fn sanitize_error_message(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("key=") {
        let (head, tail) = rest.split_at(pos + "key=".len());
        out.push_str(head);
        out.push_str("[REDACTED]");
        let end = tail
            .find(|c: char| c == '&' || c == '"' || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}
