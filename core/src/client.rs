//! Stateless HTTP request builder and response parser for the mood API.
//!
//! # Design
//! `MoodClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the round-trip; bearer tokens are attached by
//! `auth::authorize`, and the 401 side effect lives in `Repository`.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::{map_empty_response, map_response};
use crate::types::{AdviceEntry, AuthResponse, LoginRequest, MoodEntry, MoodRequest, RegisterRequest};

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const MOODS_PATH: &str = "/api/moods";
pub const GENERATE_ADVICE_PATH: &str = "/api/advice/generate";
pub const LATEST_ADVICE_PATH: &str = "/api/advice/latest";

/// Synchronous, stateless client for the mood journal API.
#[derive(Debug, Clone)]
pub struct MoodClient {
    base_url: String,
}

impl MoodClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, REGISTER_PATH.to_string(), input)
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, LOGIN_PATH.to_string(), input)
    }

    pub fn build_add_mood(&self, input: &MoodRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, MOODS_PATH.to_string(), input)
    }

    pub fn build_update_mood(&self, id: i64, input: &MoodRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("{MOODS_PATH}/{id}"), input)
    }

    pub fn build_delete_mood(&self, id: i64) -> HttpRequest {
        self.bare_request(HttpMethod::Delete, format!("{MOODS_PATH}/{id}"))
    }

    pub fn build_list_moods(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Get, MOODS_PATH.to_string())
    }

    pub fn build_generate_advice(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Post, GENERATE_ADVICE_PATH.to_string())
    }

    pub fn build_latest_advice(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Get, LATEST_ADVICE_PATH.to_string())
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        map_response(&response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        map_response(&response)
    }

    pub fn parse_add_mood(&self, response: HttpResponse) -> Result<MoodEntry, ApiError> {
        map_response(&response)
    }

    pub fn parse_update_mood(&self, response: HttpResponse) -> Result<MoodEntry, ApiError> {
        map_response(&response)
    }

    pub fn parse_delete_mood(&self, response: HttpResponse) -> Result<(), ApiError> {
        map_empty_response(&response)
    }

    pub fn parse_list_moods(&self, response: HttpResponse) -> Result<Vec<MoodEntry>, ApiError> {
        map_response(&response)
    }

    pub fn parse_generate_advice(&self, response: HttpResponse) -> Result<AdviceEntry, ApiError> {
        map_response(&response)
    }

    pub fn parse_latest_advice(&self, response: HttpResponse) -> Result<AdviceEntry, ApiError> {
        map_response(&response)
    }

    fn bare_request(&self, method: HttpMethod, path: String) -> HttpRequest {
        debug!(%method, %path, "building request");
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut req = self.bare_request(method, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }
}
