use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreResult;
use crate::store::CredentialStore;
use crate::types::{Credentials, Profile};

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUiState {
    /// `None` once the session is gone.
    pub profile: Option<Profile>,
    pub notifications_enabled: bool,
    pub selected_language: String,
    pub should_navigate_to_login: bool,
}

impl Default for ProfileUiState {
    fn default() -> Self {
        Self {
            profile: None,
            notifications_enabled: true,
            selected_language: DEFAULT_LANGUAGE.to_string(),
            should_navigate_to_login: false,
        }
    }
}

/// Profile screen, following the store's composite credential record.
#[derive(Debug)]
pub struct ProfileScreen {
    store: Arc<CredentialStore>,
    updates: watch::Receiver<Option<Credentials>>,
    ui: ProfileUiState,
}

impl ProfileScreen {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        let mut updates = store.subscribe();
        let profile = updates.borrow_and_update().as_ref().map(Credentials::profile);
        Self {
            store,
            updates,
            ui: ProfileUiState {
                profile,
                ..ProfileUiState::default()
            },
        }
    }

    pub fn ui(&self) -> &ProfileUiState {
        &self.ui
    }

    /// Pick up a save or clear made since the last look. Returns whether
    /// the profile changed.
    pub fn refresh(&mut self) -> bool {
        if !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        let profile = self.updates.borrow_and_update().as_ref().map(Credentials::profile);
        self.ui = ProfileUiState {
            profile,
            ..self.ui.clone()
        };
        true
    }

    pub fn full_name(&self) -> String {
        self.ui
            .profile
            .as_ref()
            .map(Profile::full_name)
            .unwrap_or_default()
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.ui = ProfileUiState {
            notifications_enabled: enabled,
            ..self.ui.clone()
        };
    }

    pub fn set_language(&mut self, language: &str) {
        self.ui = ProfileUiState {
            selected_language: language.to_string(),
            ..self.ui.clone()
        };
    }

    /// Clear the session and ask the host to show sign-in. The session is
    /// gone even when the error reports that the prefs were not rewritten.
    pub fn logout(&mut self) -> StoreResult<()> {
        let cleared = self.store.clear();
        self.refresh();
        self.set_navigation_flag(true);
        cleared
    }

    pub fn reset_navigation_flag(&mut self) {
        self.set_navigation_flag(false);
    }

    fn set_navigation_flag(&mut self, should_navigate_to_login: bool) {
        self.ui = ProfileUiState {
            should_navigate_to_login,
            ..self.ui.clone()
        };
    }
}
