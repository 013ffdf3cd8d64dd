//! Uniform classification of HTTP responses.
//!
//! Every endpoint goes through the same rules; only the payload type
//! differs. See `map_response` for the table.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, UNKNOWN_ERROR};
use crate::http::HttpResponse;
use crate::types::ErrorBody;

/// Map a response that must carry a payload.
///
/// - 2xx with a body decodes into `T`
/// - 2xx without a body is `EmptyResponse`, never success
/// - 401 is `Unauthorized`
/// - 400 is `Validation` when the body is a `{field: message}` map
/// - anything else is `Server` with the structured message, or the fixed
///   unknown-error text
pub fn map_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(map_failure(response));
    }
    if !response.has_body() {
        return Err(ApiError::EmptyResponse);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map a response whose success carries no payload (delete).
pub fn map_empty_response(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(map_failure(response))
    }
}

/// Classify a non-2xx response.
pub fn map_failure(response: &HttpResponse) -> ApiError {
    debug!(status = response.status, "mapping failed response");
    match response.status {
        401 => ApiError::Unauthorized,
        400 => match serde_json::from_str::<BTreeMap<String, String>>(&response.body) {
            Ok(fields) if !fields.is_empty() => ApiError::Validation { fields },
            _ => server_error(response),
        },
        _ => server_error(response),
    }
}

fn server_error(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    ApiError::Server {
        status: response.status,
        message,
    }
}
