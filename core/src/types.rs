//! Domain DTOs for the mood journal API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch drift.
//! Mood and advice payloads use camelCase on the wire, the register request
//! uses snake_case, and auth responses accept both.

use serde::{Deserialize, Serialize};

/// Lowest accepted mood score.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted mood score.
pub const MAX_SCORE: u8 = 10;

/// Request payload for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Request payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of both auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "user_id")]
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    /// The credential record this response establishes, if it carries a token.
    pub fn credentials(&self) -> Option<Credentials> {
        let token = self.token.as_deref().filter(|t| !t.trim().is_empty())?;
        Some(Credentials {
            token: token.to_string(),
            user_id: self.user_id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        })
    }
}

/// Request payload for creating or updating a mood entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequest {
    pub emoji: String,
    pub score: u8,
    pub note: String,
    pub entry_date: String,
}

/// A mood entry as stored by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: i64,
    pub emoji: String,
    pub score: u8,
    #[serde(default)]
    pub note: String,
    pub entry_date: String,
    #[serde(default)]
    pub created_at: String,
}

/// Latest or freshly generated advice text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdviceEntry {
    pub advice: String,
    #[serde(default)]
    pub created_at: String,
}

/// Structured error body returned for non-validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Token plus profile, persisted together by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Credentials {
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The signed-in user's identity, without the token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Profile {
    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One selectable mood on the add-mood screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodOption {
    pub emoji: &'static str,
    pub label: &'static str,
}

/// Moods offered by the add-mood screen, in display order.
pub const MOOD_CATALOGUE: &[MoodOption] = &[
    MoodOption { emoji: "😄", label: "Happy" },
    MoodOption { emoji: "😌", label: "Calm" },
    MoodOption { emoji: "😐", label: "Neutral" },
    MoodOption { emoji: "😔", label: "Sad" },
    MoodOption { emoji: "😢", label: "Crying" },
    MoodOption { emoji: "😠", label: "Angry" },
    MoodOption { emoji: "😰", label: "Anxious" },
    MoodOption { emoji: "😴", label: "Tired" },
];

/// Index of `emoji` in the catalogue.
pub fn catalogue_index(emoji: &str) -> Option<usize> {
    MOOD_CATALOGUE.iter().position(|m| m.emoji == emoji)
}
