use chrono::{Datelike, Months, NaiveDate};

use crate::format::is_on_day;
use crate::repository::Repository;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::MoodEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryUiState {
    pub is_loading: bool,
    pub moods: Vec<MoodEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilters {
    pub search_text: String,
    pub selected_date: Option<NaiveDate>,
    /// Date highlighted in the open picker, applied on confirm.
    pub pending_date: Option<NaiveDate>,
    pub is_picker_open: bool,
    /// First day of the month the picker shows.
    pub current_month: NaiveDate,
}

impl HistoryFilters {
    fn new(today: NaiveDate) -> Self {
        Self {
            search_text: String::new(),
            selected_date: None,
            pending_date: None,
            is_picker_open: false,
            current_month: first_of_month(today),
        }
    }

    fn matches(&self, mood: &MoodEntry) -> bool {
        let matches_search = self.search_text.is_empty()
            || mood
                .note
                .to_lowercase()
                .contains(&self.search_text.to_lowercase());
        let matches_date = self
            .selected_date
            .is_none_or(|day| is_on_day(&mood.entry_date, day));
        matches_search && matches_date
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// All of the user's entries, filtered locally by note text and day.
#[derive(Debug)]
pub struct MoodHistoryScreen {
    ui: HistoryUiState,
    filters: HistoryFilters,
    all_moods: Vec<MoodEntry>,
    should_navigate_to_login: bool,
}

impl MoodHistoryScreen {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            ui: HistoryUiState::default(),
            filters: HistoryFilters::new(today),
            all_moods: Vec::new(),
            should_navigate_to_login: false,
        }
    }

    pub fn ui(&self) -> &HistoryUiState {
        &self.ui
    }

    pub fn filters(&self) -> &HistoryFilters {
        &self.filters
    }

    pub fn should_navigate_to_login(&self) -> bool {
        self.should_navigate_to_login
    }

    pub fn begin_load(&mut self) {
        self.ui = HistoryUiState {
            is_loading: true,
            ..HistoryUiState::default()
        };
    }

    pub fn finish_load(&mut self, result: Resource<Vec<MoodEntry>>) {
        match result {
            Resource::Success(moods) => {
                self.all_moods = moods;
                self.ui = HistoryUiState {
                    is_loading: false,
                    moods: self.filtered(),
                    error: None,
                };
            }
            Resource::Error(failure) => {
                self.should_navigate_to_login |= failure.unauthorized;
                self.all_moods = Vec::new();
                self.ui = HistoryUiState {
                    is_loading: false,
                    moods: Vec::new(),
                    error: Some(failure.message),
                };
            }
            Resource::Loading => self.begin_load(),
        }
    }

    pub fn load<T: Transport>(&mut self, repo: &Repository<T>) {
        self.begin_load();
        let result = repo.list_moods();
        self.finish_load(result);
    }

    pub fn on_search_change(&mut self, text: &str) {
        self.filters = HistoryFilters {
            search_text: text.to_string(),
            ..self.filters.clone()
        };
        self.apply_filters();
    }

    pub fn clear_search(&mut self) {
        self.on_search_change("");
    }

    pub fn open_picker(&mut self) {
        self.filters = HistoryFilters {
            is_picker_open: true,
            ..self.filters.clone()
        };
    }

    pub fn dismiss_picker(&mut self) {
        self.filters = HistoryFilters {
            is_picker_open: false,
            pending_date: None,
            ..self.filters.clone()
        };
    }

    pub fn pick_date(&mut self, day: NaiveDate) {
        self.filters = HistoryFilters {
            pending_date: Some(day),
            ..self.filters.clone()
        };
    }

    /// Apply the picked date. Without a pick the picker stays open.
    pub fn confirm_date(&mut self) {
        if let Some(day) = self.filters.pending_date {
            self.filters = HistoryFilters {
                selected_date: Some(day),
                is_picker_open: false,
                ..self.filters.clone()
            };
            self.apply_filters();
        }
    }

    pub fn clear_date(&mut self) {
        self.filters = HistoryFilters {
            selected_date: None,
            pending_date: None,
            ..self.filters.clone()
        };
        self.apply_filters();
    }

    pub fn show_month(&mut self, month: NaiveDate) {
        self.set_month(first_of_month(month));
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.filters.current_month.checked_add_months(Months::new(1)) {
            self.set_month(next);
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(prev) = self.filters.current_month.checked_sub_months(Months::new(1)) {
            self.set_month(prev);
        }
    }

    fn set_month(&mut self, current_month: NaiveDate) {
        self.filters = HistoryFilters {
            current_month,
            ..self.filters.clone()
        };
    }

    fn filtered(&self) -> Vec<MoodEntry> {
        self.all_moods
            .iter()
            .filter(|mood| self.filters.matches(mood))
            .cloned()
            .collect()
    }

    /// Re-filter the last loaded list; a load error stays on screen.
    fn apply_filters(&mut self) {
        self.ui = HistoryUiState {
            moods: self.filtered(),
            ..self.ui.clone()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{signed_in_repo, ScriptedTransport};

    const MOODS: &str = r#"[
        {"id":3,"emoji":"😄","score":9,"note":"Beach day with friends","entryDate":"2024-05-03T18:00:00","createdAt":"2024-05-03T18:00:01"},
        {"id":2,"emoji":"😔","score":3,"note":"rainy and slow","entryDate":"2024-05-02T08:00:00","createdAt":"2024-05-02T08:00:01"},
        {"id":1,"emoji":"😌","score":6,"note":"quiet evening at the BEACH house","entryDate":"2024-05-02T21:00:00","createdAt":"2024-05-02T21:00:01"}
    ]"#;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn loaded() -> MoodHistoryScreen {
        let repo = signed_in_repo(ScriptedTransport::new().reply(200, MOODS));
        let mut screen = MoodHistoryScreen::new(day(17));
        screen.load(&repo);
        screen
    }

    fn ids(screen: &MoodHistoryScreen) -> Vec<i64> {
        screen.ui().moods.iter().map(|m| m.id).collect()
    }

    #[test]
    fn failed_reload_drops_the_old_list() {
        let repo = signed_in_repo(
            ScriptedTransport::new()
                .reply(200, MOODS)
                .reply(500, r#"{"code":500,"message":"boom"}"#),
        );
        let mut screen = MoodHistoryScreen::new(day(17));
        screen.load(&repo);
        assert_eq!(ids(&screen), vec![3, 2, 1]);

        screen.load(&repo);
        assert!(screen.ui().moods.is_empty());
        assert_eq!(screen.ui().error.as_deref(), Some("boom"));

        screen.on_search_change("");
        screen.pick_date(day(2));
        screen.confirm_date();
        screen.clear_date();
        assert!(screen.ui().moods.is_empty());
        assert_eq!(screen.ui().error.as_deref(), Some("boom"));
    }

    #[test]
    fn load_shows_everything() {
        let screen = loaded();
        assert!(!screen.ui().is_loading);
        assert_eq!(ids(&screen), vec![3, 2, 1]);
    }

    #[test]
    fn search_is_case_insensitive_on_note() {
        let mut screen = loaded();
        screen.on_search_change("beach");
        assert_eq!(ids(&screen), vec![3, 1]);
        screen.clear_search();
        assert_eq!(ids(&screen).len(), 3);
    }

    #[test]
    fn date_filter_applies_on_confirm() {
        let mut screen = loaded();
        screen.open_picker();
        screen.pick_date(day(2));
        assert_eq!(ids(&screen).len(), 3);

        screen.confirm_date();
        assert!(!screen.filters().is_picker_open);
        assert_eq!(ids(&screen), vec![2, 1]);

        screen.on_search_change("beach");
        assert_eq!(ids(&screen), vec![1]);

        screen.clear_date();
        assert_eq!(ids(&screen), vec![3, 1]);
    }

    #[test]
    fn dismiss_discards_pending_date() {
        let mut screen = loaded();
        screen.open_picker();
        screen.pick_date(day(3));
        screen.dismiss_picker();
        assert!(screen.filters().pending_date.is_none());
        screen.confirm_date();
        assert!(screen.filters().selected_date.is_none());
    }

    #[test]
    fn month_navigation() {
        let mut screen = MoodHistoryScreen::new(day(17));
        assert_eq!(screen.filters().current_month, day(1));
        screen.next_month();
        assert_eq!(screen.filters().current_month, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        screen.previous_month();
        screen.previous_month();
        assert_eq!(screen.filters().current_month, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        screen.show_month(NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
        assert_eq!(screen.filters().current_month, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
    }

    #[test]
    fn unauthorized_load_requests_sign_in() {
        let repo = signed_in_repo(ScriptedTransport::new().reply(401, ""));
        let mut screen = MoodHistoryScreen::new(day(1));
        screen.load(&repo);
        assert!(screen.should_navigate_to_login());
        assert!(screen.ui().error.is_some());
        assert!(!repo.store().is_logged_in());
    }
}
