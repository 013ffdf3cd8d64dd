use crate::repository::Repository;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::MoodEntry;

pub const MOOD_NOT_FOUND: &str = "This mood entry no longer exists";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodDetailsUiState {
    pub mood: MoodEntry,
    pub is_loading: bool,
    pub is_deleting: bool,
    pub show_delete_dialog: bool,
    pub delete_success: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct MoodDetailsScreen {
    ui: MoodDetailsUiState,
    should_navigate_to_login: bool,
}

impl MoodDetailsScreen {
    pub fn new(mood: MoodEntry) -> Self {
        Self {
            ui: MoodDetailsUiState {
                mood,
                is_loading: false,
                is_deleting: false,
                show_delete_dialog: false,
                delete_success: false,
                error: None,
            },
            should_navigate_to_login: false,
        }
    }

    pub fn ui(&self) -> &MoodDetailsUiState {
        &self.ui
    }

    pub fn mood_id(&self) -> i64 {
        self.ui.mood.id
    }

    pub fn should_navigate_to_login(&self) -> bool {
        self.should_navigate_to_login
    }

    pub fn begin_refresh(&mut self) {
        self.ui = MoodDetailsUiState {
            is_loading: true,
            error: None,
            ..self.ui.clone()
        };
    }

    /// Pick this screen's entry out of a fresh list.
    pub fn finish_refresh(&mut self, result: Resource<Vec<MoodEntry>>) {
        let id = self.mood_id();
        self.ui = match result {
            Resource::Success(moods) => match moods.into_iter().find(|mood| mood.id == id) {
                Some(mood) => MoodDetailsUiState {
                    mood,
                    is_loading: false,
                    ..self.ui.clone()
                },
                None => MoodDetailsUiState {
                    is_loading: false,
                    error: Some(MOOD_NOT_FOUND.to_string()),
                    ..self.ui.clone()
                },
            },
            Resource::Error(failure) => {
                self.should_navigate_to_login |= failure.unauthorized;
                MoodDetailsUiState {
                    is_loading: false,
                    error: Some(failure.message),
                    ..self.ui.clone()
                }
            }
            Resource::Loading => MoodDetailsUiState {
                is_loading: true,
                ..self.ui.clone()
            },
        };
    }

    pub fn refresh<T: Transport>(&mut self, repo: &Repository<T>) {
        self.begin_refresh();
        let result = repo.list_moods();
        self.finish_refresh(result);
    }

    pub fn show_delete_dialog(&mut self) {
        self.set_delete_dialog(true);
    }

    pub fn dismiss_delete_dialog(&mut self) {
        self.set_delete_dialog(false);
    }

    fn set_delete_dialog(&mut self, show_delete_dialog: bool) {
        self.ui = MoodDetailsUiState {
            show_delete_dialog,
            ..self.ui.clone()
        };
    }

    /// Returns the id to delete, or `None` while a delete is in flight.
    pub fn begin_delete(&mut self) -> Option<i64> {
        if self.ui.is_deleting {
            return None;
        }
        self.ui = MoodDetailsUiState {
            show_delete_dialog: false,
            is_deleting: true,
            error: None,
            ..self.ui.clone()
        };
        Some(self.mood_id())
    }

    pub fn finish_delete(&mut self, result: Resource<()>) {
        self.ui = match result {
            Resource::Success(()) => MoodDetailsUiState {
                is_deleting: false,
                delete_success: true,
                ..self.ui.clone()
            },
            Resource::Error(failure) => {
                self.should_navigate_to_login |= failure.unauthorized;
                MoodDetailsUiState {
                    is_deleting: false,
                    error: Some(failure.message),
                    ..self.ui.clone()
                }
            }
            Resource::Loading => MoodDetailsUiState {
                is_deleting: true,
                ..self.ui.clone()
            },
        };
    }

    pub fn delete<T: Transport>(&mut self, repo: &Repository<T>) {
        if let Some(id) = self.begin_delete() {
            let result = repo.delete_mood(id);
            self.finish_delete(result);
        }
    }

    pub fn clear_error(&mut self) {
        self.ui = MoodDetailsUiState {
            error: None,
            ..self.ui.clone()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::repository::testing::{signed_in_repo, ScriptedTransport, MOOD_JSON};

    fn entry() -> MoodEntry {
        serde_json::from_str(MOOD_JSON).unwrap()
    }

    #[test]
    fn refresh_replaces_entry_by_id() {
        let list = r#"[
            {"id":4,"emoji":"😔","score":2,"note":"other","entryDate":"2024-05-03T10:00:00"},
            {"id":3,"emoji":"😄","score":10,"note":"edited elsewhere","entryDate":"2024-05-02T10:00:00"}
        ]"#;
        let repo = signed_in_repo(ScriptedTransport::new().reply(200, list));
        let mut screen = MoodDetailsScreen::new(entry());
        screen.refresh(&repo);

        assert!(!screen.ui().is_loading);
        assert_eq!(screen.ui().mood.score, 10);
        assert_eq!(screen.ui().mood.note, "edited elsewhere");
    }

    #[test]
    fn refresh_reports_missing_entry() {
        let repo = signed_in_repo(ScriptedTransport::new().reply(200, "[]"));
        let mut screen = MoodDetailsScreen::new(entry());
        screen.refresh(&repo);
        assert_eq!(screen.ui().error.as_deref(), Some(MOOD_NOT_FOUND));
        assert_eq!(screen.ui().mood, entry());
    }

    #[test]
    fn delete_closes_dialog_and_succeeds_on_empty_body() {
        let repo = signed_in_repo(ScriptedTransport::new().reply(204, ""));
        let mut screen = MoodDetailsScreen::new(entry());
        screen.show_delete_dialog();
        assert!(screen.ui().show_delete_dialog);

        screen.delete(&repo);
        assert!(!screen.ui().show_delete_dialog);
        assert!(screen.ui().delete_success);
        assert!(!screen.ui().is_deleting);

        let sent = repo.transport().last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert!(sent.path.ends_with("/api/moods/3"));
    }

    #[test]
    fn delete_in_flight_refuses_another() {
        let mut screen = MoodDetailsScreen::new(entry());
        assert_eq!(screen.begin_delete(), Some(3));
        assert_eq!(screen.begin_delete(), None);
    }

    #[test]
    fn unauthorized_delete_requests_sign_in() {
        let repo = signed_in_repo(ScriptedTransport::new().reply(401, ""));
        let mut screen = MoodDetailsScreen::new(entry());
        screen.delete(&repo);
        assert!(!screen.ui().delete_success);
        assert!(screen.should_navigate_to_login());
        assert!(!repo.store().is_logged_in());
    }

    #[test]
    fn dismiss_keeps_entry() {
        let mut screen = MoodDetailsScreen::new(entry());
        screen.show_delete_dialog();
        screen.dismiss_delete_dialog();
        assert!(!screen.ui().show_delete_dialog);
        assert!(!screen.ui().delete_success);
    }
}
