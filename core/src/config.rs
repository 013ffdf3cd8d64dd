//! Client configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::error::StoreResult;
use crate::store::{CredentialStore, FilePreferences};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` keeps credentials in memory only.
    pub prefs_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            prefs_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Read `MOODMATE_API_URL`, `MOODMATE_PREFS_PATH` and
    /// `MOODMATE_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup("MOODMATE_API_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    name: "MOODMATE_API_URL",
                })
            }
            Some(url) => url.trim().to_string(),
            None => DEFAULT_BASE_URL.to_string(),
        };

        let prefs_path = lookup("MOODMATE_PREFS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let timeout = match lookup("MOODMATE_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: "MOODMATE_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            prefs_path,
            timeout,
        })
    }

    /// Open the credential store this configuration points at.
    pub fn open_store(&self) -> StoreResult<CredentialStore> {
        match &self.prefs_path {
            Some(path) => CredentialStore::open(FilePreferences::new(path)),
            None => Ok(CredentialStore::in_memory()),
        }
    }
}
