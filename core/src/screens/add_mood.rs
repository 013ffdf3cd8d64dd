use crate::format::now_entry_timestamp;
use crate::repository::Repository;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::{catalogue_index, MoodEntry, MoodOption, MoodRequest, MOOD_CATALOGUE};
use crate::validate::mood_error;

use super::{unplaced_message, ActionState, FieldAliases};

pub const SAVE_FAILED: &str = "The mood entry could not be saved";

const MOOD_FIELDS: FieldAliases = FieldAliases {
    names: &["emoji", "score", "note", "entryDate", "entry_date"],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddMoodUiState {
    /// Index into `MOOD_CATALOGUE`.
    pub selected_mood: Option<usize>,
    pub rating: Option<u8>,
    pub note: String,
    pub validation_error: Option<String>,
}

/// Everything needed to send one add or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSubmission {
    /// `Some` in edit mode.
    pub mood_id: Option<i64>,
    pub request: MoodRequest,
}

/// Add-mood screen; with a mood id it edits that entry instead.
#[derive(Debug, Default)]
pub struct AddMoodScreen {
    ui: AddMoodUiState,
    action: ActionState,
    editing: Option<i64>,
}

impl AddMoodScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing(mood_id: i64) -> Self {
        Self {
            editing: Some(mood_id),
            ..Self::default()
        }
    }

    pub fn ui(&self) -> &AddMoodUiState {
        &self.ui
    }

    pub fn action(&self) -> &ActionState {
        &self.action
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing.is_some()
    }

    pub fn moods(&self) -> &'static [MoodOption] {
        MOOD_CATALOGUE
    }

    /// Seed the form from the entry being edited. Ignored in add mode.
    pub fn set_initial_data(&mut self, entry: &MoodEntry) {
        if !self.is_edit_mode() {
            return;
        }
        self.ui = AddMoodUiState {
            selected_mood: catalogue_index(&entry.emoji),
            rating: Some(entry.score),
            note: entry.note.clone(),
            validation_error: None,
        };
    }

    pub fn on_note_change(&mut self, note: &str) {
        self.ui = AddMoodUiState {
            note: note.to_string(),
            validation_error: None,
            ..self.ui.clone()
        };
    }

    pub fn on_mood_selected(&mut self, index: usize) {
        self.ui = AddMoodUiState {
            selected_mood: Some(index),
            validation_error: None,
            ..self.ui.clone()
        };
    }

    pub fn on_rating_selected(&mut self, rating: u8) {
        self.ui = AddMoodUiState {
            rating: Some(rating),
            validation_error: None,
            ..self.ui.clone()
        };
    }

    /// Validate and enter the submitting state. `entry_date` is the wire
    /// timestamp to send.
    pub fn begin_save(&mut self, entry_date: String) -> Option<MoodSubmission> {
        if self.action.is_loading {
            return None;
        }
        if let Some(error) = mood_error(self.ui.selected_mood, self.ui.rating, &self.ui.note) {
            self.ui = AddMoodUiState {
                validation_error: Some(error.to_string()),
                ..self.ui.clone()
            };
            return None;
        }
        let (Some(index), Some(score)) = (self.ui.selected_mood, self.ui.rating) else {
            return None;
        };
        self.action = ActionState::loading();
        Some(MoodSubmission {
            mood_id: self.editing,
            request: MoodRequest {
                emoji: MOOD_CATALOGUE[index].emoji.to_string(),
                score,
                note: self.ui.note.trim().to_string(),
                entry_date,
            },
        })
    }

    pub fn finish_save(&mut self, result: Resource<MoodEntry>) {
        match result {
            Resource::Success(_) => {
                self.action = ActionState::success();
                if !self.is_edit_mode() {
                    self.ui = AddMoodUiState::default();
                }
            }
            Resource::Error(failure) => {
                self.ui = AddMoodUiState {
                    validation_error: MOOD_FIELDS.pick_all(&failure),
                    ..self.ui.clone()
                };
                let message = unplaced_message(&failure, &[&MOOD_FIELDS]).map(|message| {
                    if message.trim().is_empty() {
                        SAVE_FAILED.to_string()
                    } else {
                        message
                    }
                });
                self.action = ActionState::failed(message);
            }
            Resource::Loading => self.action = ActionState::loading(),
        }
    }

    pub fn save<T: Transport>(&mut self, repo: &Repository<T>) {
        let Some(submission) = self.begin_save(now_entry_timestamp()) else {
            return;
        };
        let result = match submission.mood_id {
            Some(id) => repo.update_mood(id, &submission.request),
            None => repo.add_mood(&submission.request),
        };
        self.finish_save(result);
    }

    pub fn reset_action(&mut self) {
        self.action = ActionState::default();
    }
}
