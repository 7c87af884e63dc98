// Domain error types
// Every failure an import or fetch can report resolves to one of these.

use thiserror::Error;

/// Failure while fetching the event listing from the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out: {message}")]
    Timeout { message: String },
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("api rejected request with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// The response object does not have the structure of an event listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("expected an array of events, found {found}")]
    UnexpectedShape { found: &'static str },
    #[error("object payload carries no events")]
    MissingEvents,
    #[error("event at index {index} is invalid: {message}")]
    InvalidRecord { index: usize, message: String },
}

/// Failure reading or writing the local event store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("store i/o failed: {message}")]
    Io { message: String },
    #[error("failed to encode events: {message}")]
    Encode { message: String },
    #[error("store contents are corrupt: {message}")]
    Corrupt { message: String },
}

impl PersistenceError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),
    #[error("failed to save imported events: {0}")]
    Persistence(#[from] PersistenceError),
}
