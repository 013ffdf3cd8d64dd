//! Per-screen state holders.
//!
//! # Design
//! Each holder owns a UI-state record (field contents plus field errors)
//! and, for screens with a submit, an `ActionState`. Intents rewrite the
//! record and clear the edited field's error. Submits are split in two so
//! the host can run the I/O itself:
//!
//! - `begin_*` validates and returns the request input, or `None` when
//!   validation failed or a submission is already in flight
//! - `finish_*` consumes the `Resource` produced by the call
//!
//! A one-shot method that drives a `Repository` is provided for hosts that
//! use one.

use crate::resource::Failure;

pub mod add_mood;
pub mod details;
pub mod history;
pub mod home;
pub mod profile;
pub mod sign_in;
pub mod sign_up;
pub mod splash;

pub use add_mood::{AddMoodScreen, AddMoodUiState, MoodSubmission};
pub use details::{MoodDetailsScreen, MoodDetailsUiState};
pub use history::{HistoryFilters, HistoryUiState, MoodHistoryScreen};
pub use home::{AdviceUiState, HomeScreen, HomeUiState};
pub use profile::{ProfileScreen, ProfileUiState};
pub use sign_in::{SignInErrors, SignInScreen, SignInUiState};
pub use sign_up::{SignUpErrors, SignUpScreen, SignUpUiState};
pub use splash::{start_destination, Destination};

/// Outcome of the latest submit on a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub is_loading: bool,
    pub is_success: bool,
    pub error: Option<String>,
}

impl ActionState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn success() -> Self {
        Self {
            is_success: true,
            ..Self::default()
        }
    }

    pub fn failed(error: Option<String>) -> Self {
        Self {
            error,
            ..Self::default()
        }
    }
}

/// Server field names accepted for one form input.
pub(crate) struct FieldAliases {
    pub names: &'static [&'static str],
}

impl FieldAliases {
    pub(crate) fn pick(&self, failure: &Failure) -> Option<String> {
        self.names
            .iter()
            .find_map(|name| failure.field_error(name))
            .map(str::to_string)
    }

    /// Every message for these names, joined, for forms with one error slot.
    pub(crate) fn pick_all(&self, failure: &Failure) -> Option<String> {
        let messages: Vec<&str> = self
            .names
            .iter()
            .filter_map(|name| failure.field_error(name))
            .collect();
        if messages.is_empty() {
            None
        } else {
            Some(messages.join("; "))
        }
    }
}

/// The part of `failure` that cannot be shown next to an input.
///
/// Without field errors this is the failure message. With field errors it
/// is the messages for fields the form does not know, or `None` when every
/// message found a home.
pub(crate) fn unplaced_message(failure: &Failure, known: &[&FieldAliases]) -> Option<String> {
    let Some(fields) = failure.field_errors.as_ref() else {
        return Some(failure.message.clone());
    };
    let unknown: Vec<String> = fields
        .iter()
        .filter(|(name, _)| !known.iter().any(|alias| alias.names.contains(&name.as_str())))
        .map(|(name, message)| format!("{name}: {message}"))
        .collect();
    if unknown.is_empty() {
        None
    } else {
        Some(unknown.join("; "))
    }
}

#[cfg(test)]
pub(crate) fn field_map(pairs: &[(&str, &str)]) -> std::collections::BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
