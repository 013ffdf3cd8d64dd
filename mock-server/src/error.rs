use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    /// Rendered as a bare `{field: message}` map with status 400.
    #[error("Invalid fields: {0:?}")]
    Fields(BTreeMap<String, String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),
}

impl AppError {
    pub fn field(name: &str, message: &str) -> Self {
        AppError::Fields(BTreeMap::from([(name.to_string(), message.to_string())]))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Fields(fields) => {
                return (StatusCode::BAD_REQUEST, Json(fields)).into_response();
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let body = json!({
            "code": status.as_u16(),
            "message": self.to_string(),
            "timestamp": crate::now(),
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
