//! Local input checks run before any request is built.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{catalogue_index, MoodRequest, MAX_SCORE, MIN_SCORE, MOOD_CATALOGUE};

pub const MIN_PASSWORD_LEN: usize = 6;

pub const EMAIL_EMPTY: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Enter a valid email address";
pub const PASSWORD_EMPTY: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const FIRST_NAME_EMPTY: &str = "First name is required";
pub const LAST_NAME_EMPTY: &str = "Last name is required";
pub const MOOD_FIELDS_REQUIRED: &str = "Pick a mood, a score between 1 and 10, and write a note";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern is valid")
});

/// Email check applied to the trimmed input.
pub fn email_error(email: &str) -> Option<&'static str> {
    let email = email.trim();
    if email.is_empty() {
        Some(EMAIL_EMPTY)
    } else if !EMAIL_REGEX.is_match(email) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

/// Passwords are not trimmed.
pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_EMPTY)
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some(PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

pub fn required(value: &str, message: &'static str) -> Option<&'static str> {
    value.trim().is_empty().then_some(message)
}

pub fn score_in_range(score: u8) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// A mood entry needs a catalogue emoji, a score in range and a non-blank note.
pub fn mood_error(mood_index: Option<usize>, score: Option<u8>, note: &str) -> Option<&'static str> {
    let has_mood = mood_index.is_some_and(|i| i < MOOD_CATALOGUE.len());
    let has_score = score.is_some_and(score_in_range);
    if has_mood && has_score && !note.trim().is_empty() {
        None
    } else {
        Some(MOOD_FIELDS_REQUIRED)
    }
}

/// `mood_error` for an already assembled request.
pub fn mood_request_error(request: &MoodRequest) -> Option<&'static str> {
    mood_error(catalogue_index(&request.emoji), Some(request.score), &request.note)
}
