use crate::repository::Repository;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::{AdviceEntry, MoodEntry};

/// How many entries the home screen shows.
pub const RECENT_MOODS: usize = 3;

pub const ADVICE_UNAVAILABLE: &str = "The advice service is unavailable right now";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeUiState {
    pub is_loading: bool,
    pub moods: Vec<MoodEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdviceUiState {
    pub advice: Option<String>,
    pub created_at: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AdviceUiState {
    fn from_entry(entry: AdviceEntry) -> Self {
        Self {
            advice: Some(entry.advice),
            created_at: Some(entry.created_at),
            ..Self::default()
        }
    }
}

/// Recent entries plus the latest advice.
#[derive(Debug, Default)]
pub struct HomeScreen {
    ui: HomeUiState,
    advice: AdviceUiState,
    should_navigate_to_login: bool,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> &HomeUiState {
        &self.ui
    }

    pub fn advice(&self) -> &AdviceUiState {
        &self.advice
    }

    pub fn should_navigate_to_login(&self) -> bool {
        self.should_navigate_to_login
    }

    pub fn reset_navigation_flag(&mut self) {
        self.should_navigate_to_login = false;
    }

    /// Load moods and the latest advice, the way the screen does on open.
    pub fn load<T: Transport>(&mut self, repo: &Repository<T>) {
        self.load_recent_moods(repo);
        self.load_latest_advice(repo);
    }

    pub fn begin_recent_moods(&mut self) {
        self.ui = HomeUiState {
            is_loading: true,
            ..HomeUiState::default()
        };
    }

    pub fn finish_recent_moods(&mut self, result: Resource<Vec<MoodEntry>>) {
        self.ui = match result {
            Resource::Success(mut moods) => {
                moods.truncate(RECENT_MOODS);
                HomeUiState {
                    is_loading: false,
                    moods,
                    error: None,
                }
            }
            Resource::Error(failure) => {
                self.should_navigate_to_login |= failure.unauthorized;
                HomeUiState {
                    error: Some(failure.message),
                    ..HomeUiState::default()
                }
            }
            Resource::Loading => HomeUiState {
                is_loading: true,
                ..HomeUiState::default()
            },
        };
    }

    pub fn load_recent_moods<T: Transport>(&mut self, repo: &Repository<T>) {
        self.begin_recent_moods();
        let result = repo.list_moods();
        self.finish_recent_moods(result);
    }

    /// A failed fetch just shows no advice; only a 401 is acted on.
    pub fn finish_latest_advice(&mut self, result: Resource<AdviceEntry>) {
        match result {
            Resource::Success(entry) => self.advice = AdviceUiState::from_entry(entry),
            Resource::Error(failure) => {
                self.should_navigate_to_login |= failure.unauthorized;
                self.advice = AdviceUiState::default();
            }
            Resource::Loading => {}
        }
    }

    pub fn load_latest_advice<T: Transport>(&mut self, repo: &Repository<T>) {
        let result = repo.latest_advice();
        self.finish_latest_advice(result);
    }

    /// Returns `false` while a generation is already running.
    pub fn begin_generate(&mut self) -> bool {
        if self.advice.is_loading {
            return false;
        }
        self.advice = AdviceUiState {
            is_loading: true,
            error: None,
            ..self.advice.clone()
        };
        true
    }

    pub fn finish_generate(&mut self, result: Resource<AdviceEntry>) {
        match result {
            Resource::Success(entry) => self.advice = AdviceUiState::from_entry(entry),
            Resource::Error(failure) => {
                self.should_navigate_to_login |= failure.unauthorized;
                let message = if failure.message.trim().is_empty() {
                    ADVICE_UNAVAILABLE.to_string()
                } else {
                    failure.message
                };
                self.advice = AdviceUiState {
                    is_loading: false,
                    error: Some(message),
                    ..self.advice.clone()
                };
            }
            Resource::Loading => {
                self.advice = AdviceUiState {
                    is_loading: true,
                    ..self.advice.clone()
                };
            }
        }
    }

    pub fn generate_advice<T: Transport>(&mut self, repo: &Repository<T>) {
        if self.begin_generate() {
            let result = repo.generate_advice();
            self.finish_generate(result);
        }
    }
}
