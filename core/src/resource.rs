//! Tri-state outcome reported to screens for every network call.

use std::collections::BTreeMap;

use crate::error::ApiError;

/// A failed call, reduced to what a screen needs to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub field_errors: Option<BTreeMap<String, String>>,
    pub unauthorized: bool,
}

impl Failure {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: None,
            unauthorized: false,
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.as_ref()?.get(field).map(String::as_str)
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        let message = err.user_message();
        match err {
            ApiError::Unauthorized => Failure {
                message,
                field_errors: None,
                unauthorized: true,
            },
            ApiError::Validation { fields } => Failure {
                message,
                field_errors: Some(fields),
                unauthorized: false,
            },
            _ => Failure::message(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Success(T),
    Error(Failure),
    Loading,
}

impl<T> Resource<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Resource::Error(f) if f.unauthorized)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Resource::Error(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(failure) => Resource::Error(failure),
            Resource::Loading => Resource::Loading,
        }
    }
}

impl<T> From<Result<T, ApiError>> for Resource<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(err) => Resource::Error(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SESSION_EXPIRED;

    #[test]
    fn unauthorized_error_sets_flag() {
        let resource: Resource<()> = Err(ApiError::Unauthorized).into();
        assert!(resource.is_unauthorized());
        assert_eq!(resource.failure().unwrap().message, SESSION_EXPIRED);
    }

    #[test]
    fn validation_error_keeps_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), "already used".to_string());
        let resource: Resource<()> = Err(ApiError::Validation { fields }).into();
        let failure = resource.failure().unwrap();
        assert_eq!(failure.field_error("email"), Some("already used"));
        assert!(!failure.unauthorized);
    }

    #[test]
    fn map_preserves_errors() {
        let ok: Resource<u8> = Resource::Success(2);
        assert_eq!(ok.map(|n| n * 2), Resource::Success(4));
        let err: Resource<u8> = Resource::Error(Failure::message("x"));
        assert_eq!(err.map(|n| n * 2), Resource::Error(Failure::message("x")));
    }
}
