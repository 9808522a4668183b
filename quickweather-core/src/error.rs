use thiserror::Error;

/// Message used when the provider answers with a non-success status.
pub const HTTP_STATUS_MESSAGE: &str = "Network response was not ok";

/// Where a lookup failed. Kept for diagnostics; callers only show the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupErrorKind {
    /// DNS, connect, timeout or body read failure.
    Transport,
    /// Provider answered with a non-2xx status.
    HttpStatus,
    /// Body did not have the expected shape.
    Parse,
}

impl LookupErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupErrorKind::Transport => "transport",
            LookupErrorKind::HttpStatus => "http_status",
            LookupErrorKind::Parse => "parse",
        }
    }
}

impl std::fmt::Display for LookupErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed lookup, normalized to one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LookupError {
    kind: LookupErrorKind,
    message: String,
}

impl LookupError {
    pub fn new(kind: LookupErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Transport, message)
    }

    pub fn http_status() -> Self {
        Self::new(LookupErrorKind::HttpStatus, HTTP_STATUS_MESSAGE)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(LookupErrorKind::Parse, message)
    }

    pub fn kind(&self) -> LookupErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// reqwest's own Display is just "error sending request"; the cause lives in
// the source chain. The URL carries the API key and is dropped first.
impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let timed_out = err.is_timeout();
        let reason = format!("{:#}", anyhow::Error::from(err));

        if timed_out && !reason.contains("timed out") {
            LookupError::transport(format!("Request timed out: {reason}"))
        } else {
            LookupError::transport(reason)
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::parse(format!("Failed to parse weather response: {err}"))
    }
}
