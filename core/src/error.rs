//! Error types for the mood API client.
//!
//! # Design
//! Every way a call can fail lands in one `ApiError` variant. `Unauthorized`
//! and `Validation` get dedicated variants because callers act on them
//! (clear the session, show messages next to inputs); all other non-2xx
//! responses land in `Server` with the best message we could extract.

use std::collections::BTreeMap;

use thiserror::Error;

/// Shown when no better message can be extracted.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";
/// Shown for a 2xx response without a body.
pub const EMPTY_RESPONSE: &str = "The server returned an empty response";
/// Shown after a 401.
pub const SESSION_EXPIRED: &str = "Your session has expired, please sign in again";
/// Shown for a 400 whose field errors are rendered next to the inputs.
pub const VALIDATION_FAILED: &str = "Please correct the highlighted fields";

/// Errors returned by `MoodClient` parse methods and `Transport` impls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 2xx status but no payload to decode.
    #[error("empty response body")]
    EmptyResponse,

    /// 401: the stored credential is no longer valid.
    #[error("unauthorized")]
    Unauthorized,

    /// 400 with a `{field: message}` body.
    #[error("validation failed: {fields:?}")]
    Validation { fields: BTreeMap<String, String> },

    /// Any other non-2xx status.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status carried by the error, if a response existed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Validation { .. } => Some(400),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// A message fit for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::EmptyResponse => EMPTY_RESPONSE.to_string(),
            ApiError::Unauthorized => SESSION_EXPIRED.to_string(),
            ApiError::Validation { .. } => VALIDATION_FAILED.to_string(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Transport(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => UNKNOWN_ERROR.to_string(),
        }
    }
}

/// Errors raised by credential store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored preferences are corrupt: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
