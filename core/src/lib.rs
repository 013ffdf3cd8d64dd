//! Client core for the MoodMate mood journal.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sit the
//! credential store, a repository that applies session side effects, and
//! one state holder per screen.
//!
//! # Design
//! - `MoodClient` is stateless; it holds only `base_url`.
//! - Every call is split into `build_*` and `parse_*`, and every parse goes
//!   through `mapper`, so all responses are classified the same way.
//! - `CredentialStore` publishes the whole credential record as one value;
//!   a 401 anywhere clears it.
//! - `Repository` binds client, store and a `Transport`. The blocking
//!   `ureq` transport is behind the default `ureq` feature.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod mapper;
pub mod repository;
pub mod resource;
pub mod screens;
pub mod store;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::MoodClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, StoreError, StoreResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use repository::Repository;
pub use resource::{Failure, Resource};
pub use store::{CredentialStore, FilePreferences, MemoryPreferences, Preferences};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    AdviceEntry, AuthResponse, Credentials, LoginRequest, MoodEntry, MoodRequest, Profile,
    RegisterRequest, MOOD_CATALOGUE,
};
