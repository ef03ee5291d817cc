//! Application state and state-mutation methods.
//!
//! `AppState` owns the adventure list. The list is only ever replaced
//! wholesale by [`AppState::apply_fetch_result`], which the event loop calls
//! on the UI thread when a fetch completes; failures leave it untouched and
//! raise the alert instead. The view layer reads it through
//! [`AppState::adventures`].

use crate::error::FetchError;
use crate::fetch::FetchResult;
use crate::model::Adventure;
use crate::theme::ThemeConfig;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tui_scrollview::ScrollViewState;

/// Which pane currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    List,
    Details,
}

/// Deferred action set by the reducer and executed by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Refresh,
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// Current adventure list; replaced atomically on successful fetch.
    adventures: Vec<Adventure>,
    /// List selection state managed by ratatui
    pub list_state: ListState,
    /// Which pane currently has keyboard focus
    pub focused_pane: FocusPane,
    /// Theme configuration
    pub theme: ThemeConfig,
    /// Label of the data source shown in the status bar (API base or file)
    pub source_label: String,
    /// Number of fetches currently in flight or queued
    pub in_flight: usize,
    /// Pending alert; present until the user dismisses it
    pub alert: Option<FetchError>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Flag to quit app
    pub should_quit: bool,
    /// State for scrolling the details pane
    pub details_scroll_state: ScrollViewState,
    /// Pending action to execute after input handling
    pub pending_action: Option<AppAction>,
    /// Screen region of the list pane (set during render, used for paging)
    pub list_area: Option<Rect>,
}

impl AppState {
    pub fn new(theme: ThemeConfig, source_label: String) -> Self {
        Self {
            adventures: Vec::new(),
            list_state: ListState::default(),
            focused_pane: FocusPane::List,
            theme,
            source_label,
            in_flight: 0,
            alert: None,
            show_help: false,
            should_quit: false,
            details_scroll_state: ScrollViewState::default(),
            pending_action: None,
            list_area: None,
        }
    }

    /// Read-only view of the current adventure list.
    pub fn adventures(&self) -> &[Adventure] {
        &self.adventures
    }

    pub fn selected_adventure(&self) -> Option<&Adventure> {
        self.list_state
            .selected()
            .and_then(|idx| self.adventures.get(idx))
    }

    /// Marks one fetch as accepted by the worker queue.
    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// Applies a completed fetch. On success the list is replaced and the
    /// selection clamped; on failure the list stays as it was and the alert
    /// is raised (replacing any undismissed one, never stacking).
    pub fn apply_fetch_result(&mut self, result: FetchResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(adventures) => {
                let had_selection = self.list_state.selected().is_some();
                self.adventures = adventures;
                if !had_selection && !self.adventures.is_empty() {
                    self.list_state.select(Some(0));
                }
                self.clamp_selection();
                self.details_scroll_state = ScrollViewState::default();
            }
            Err(err) => {
                self.alert = Some(err);
            }
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Clamps the current list selection to valid bounds.
    pub fn clamp_selection(&mut self) {
        let len = self.adventures.len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        match self.list_state.selected() {
            Some(selected) if selected >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    /// Moves selection by `direction` (+1 or -1) and resets the details
    /// scroll for the newly selected adventure.
    pub fn move_selection(&mut self, direction: i32) {
        if self.adventures.is_empty() {
            return;
        }
        if direction < 0 {
            self.list_state.select_previous();
        } else {
            self.list_state.select_next();
        }
        self.clamp_selection();
        self.details_scroll_state = ScrollViewState::default();
    }

    pub fn select_first(&mut self) {
        if !self.adventures.is_empty() {
            self.list_state.select(Some(0));
            self.details_scroll_state = ScrollViewState::default();
        }
    }

    pub fn select_last(&mut self) {
        let len = self.adventures.len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
            self.details_scroll_state = ScrollViewState::default();
        }
    }

    /// Moves selection by one list page, using the rendered list height.
    pub fn move_page(&mut self, direction: i32) {
        let len = self.adventures.len();
        if len == 0 {
            return;
        }
        let page = self.list_area.map(|a| a.height as usize).unwrap_or(10);
        let current = self.list_state.selected().unwrap_or(0);
        let new_sel = if direction < 0 {
            current.saturating_sub(page)
        } else {
            (current + page).min(len - 1)
        };
        self.list_state.select(Some(new_sel));
        self.details_scroll_state = ScrollViewState::default();
    }

    pub fn focus_pane(&mut self, pane: FocusPane) {
        self.focused_pane = pane;
    }

    pub fn toggle_focus(&mut self) {
        self.focused_pane = match self.focused_pane {
            FocusPane::List => FocusPane::Details,
            FocusPane::Details => FocusPane::List,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;
    use crate::theme;

    fn adventure(id: i64) -> Adventure {
        Adventure {
            id,
            creator_id: 5,
            creator_username: "amy".to_string(),
            date: 1000,
            info: format!("adventure {}", id),
            joined: 3,
            participants: vec![Participant {
                id: 5,
                username: "amy".to_string(),
            }],
            image_url: format!("http://x/{}.png", id),
        }
    }

    fn make_app() -> AppState {
        AppState::new(theme::Theme::Dracula.config(), "test".to_string())
    }

    #[test]
    fn starts_empty_with_no_selection() {
        let app = make_app();
        assert!(app.adventures().is_empty());
        assert_eq!(app.list_state.selected(), None);
        assert!(!app.is_fetching());
    }

    #[test]
    fn successful_fetch_replaces_the_list() {
        let mut app = make_app();
        app.begin_fetch();
        app.apply_fetch_result(Ok(vec![adventure(1), adventure(2)]));

        assert_eq!(app.adventures().len(), 2);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(!app.is_fetching());
        assert!(app.alert.is_none());

        // A later fetch replaces, never merges.
        app.begin_fetch();
        app.apply_fetch_result(Ok(vec![adventure(7)]));
        assert_eq!(app.adventures().len(), 1);
        assert_eq!(app.adventures()[0].id, 7);
    }

    #[test]
    fn failed_fetch_keeps_the_list_and_raises_one_alert() {
        let mut app = make_app();
        app.begin_fetch();
        app.apply_fetch_result(Ok(vec![adventure(1), adventure(2)]));

        app.begin_fetch();
        app.apply_fetch_result(Err(FetchError::Server("down for maintenance".to_string())));

        assert_eq!(app.adventures().len(), 2);
        assert!(!app.is_fetching());
        match &app.alert {
            Some(FetchError::Server(msg)) => assert_eq!(msg, "down for maintenance"),
            other => panic!("expected server alert, got {:?}", other),
        }

        app.dismiss_alert();
        assert!(app.alert.is_none());
        assert_eq!(app.adventures().len(), 2);
    }

    #[test]
    fn selection_is_clamped_when_the_list_shrinks() {
        let mut app = make_app();
        app.apply_fetch_result(Ok(vec![adventure(1), adventure(2), adventure(3)]));
        app.list_state.select(Some(2));

        app.apply_fetch_result(Ok(vec![adventure(1)]));
        assert_eq!(app.list_state.selected(), Some(0));

        app.apply_fetch_result(Ok(Vec::new()));
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn move_selection_stays_in_bounds() {
        let mut app = make_app();
        app.apply_fetch_result(Ok(vec![adventure(1), adventure(2)]));

        app.move_selection(1);
        assert_eq!(app.list_state.selected(), Some(1));
        app.move_selection(1);
        assert_eq!(app.list_state.selected(), Some(1));
        app.move_selection(-1);
        assert_eq!(app.list_state.selected(), Some(0));
        app.move_selection(-1);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn paging_uses_the_rendered_list_height() {
        let mut app = make_app();
        app.apply_fetch_result(Ok((1..=30).map(adventure).collect()));
        app.list_area = Some(Rect::new(0, 0, 20, 10));

        app.move_page(1);
        assert_eq!(app.list_state.selected(), Some(10));
        app.move_page(1);
        assert_eq!(app.list_state.selected(), Some(20));
        app.move_page(-1);
        assert_eq!(app.list_state.selected(), Some(10));
    }

    #[test]
    fn in_flight_counts_queued_fetches() {
        let mut app = make_app();
        app.begin_fetch();
        app.begin_fetch();
        assert!(app.is_fetching());

        app.apply_fetch_result(Ok(Vec::new()));
        assert!(app.is_fetching());
        app.apply_fetch_result(Ok(Vec::new()));
        assert!(!app.is_fetching());
    }
}
