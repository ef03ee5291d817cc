//! Key-event reducer.
//!
//! Mutates `AppState` in place. May set `app.pending_action`; the runtime is
//! responsible for acting on it after this function returns. Dispatch order
//! matters: an open alert swallows everything except dismissal, then the
//! help overlay, then normal navigation.

use crate::state::{AppAction, AppState, FocusPane};
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

pub fn handle_key_event(
    app: &mut AppState,
    code: KeyCode,
    _modifiers: KeyModifiers,
    kind: KeyEventKind,
) {
    if matches!(kind, KeyEventKind::Release) {
        return;
    }

    // The alert is modal: only dismissal gets through.
    if app.alert.is_some() {
        if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_alert();
        }
        return;
    }

    if app.show_help {
        if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if code == KeyCode::Tab || code == KeyCode::BackTab {
        app.toggle_focus();
        return;
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('r') | KeyCode::F(5) => {
            app.pending_action = Some(AppAction::Refresh);
        }
        KeyCode::Enter => {
            if app.focused_pane == FocusPane::List && app.selected_adventure().is_some() {
                app.focus_pane(FocusPane::Details);
            }
        }
        KeyCode::Esc => {
            if app.focused_pane == FocusPane::Details {
                app.focus_pane(FocusPane::List);
            }
        }
        KeyCode::Up => {
            if app.focused_pane == FocusPane::Details {
                app.details_scroll_state.scroll_up();
            } else {
                app.move_selection(-1);
            }
        }
        KeyCode::Down => {
            if app.focused_pane == FocusPane::Details {
                app.details_scroll_state.scroll_down();
            } else {
                app.move_selection(1);
            }
        }
        KeyCode::Home => {
            if app.focused_pane == FocusPane::Details {
                app.details_scroll_state = tui_scrollview::ScrollViewState::default();
            } else {
                app.select_first();
            }
        }
        KeyCode::End => {
            if app.focused_pane == FocusPane::Details {
                app.details_scroll_state.scroll_to_bottom();
            } else {
                app.select_last();
            }
        }
        KeyCode::PageUp => {
            if app.focused_pane == FocusPane::Details {
                app.details_scroll_state.scroll_page_up();
            } else {
                app.move_page(-1);
            }
        }
        KeyCode::PageDown => {
            if app.focused_pane == FocusPane::Details {
                app.details_scroll_state.scroll_page_down();
            } else {
                app.move_page(1);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::Adventure;
    use crate::theme;

    fn adventure(id: i64) -> Adventure {
        Adventure {
            id,
            creator_id: 1,
            creator_username: "amy".to_string(),
            date: 1000,
            info: format!("adventure {}", id),
            joined: 0,
            participants: Vec::new(),
            image_url: String::new(),
        }
    }

    fn make_app(items: usize) -> AppState {
        let mut app = AppState::new(theme::Theme::Dracula.config(), "test".to_string());
        app.apply_fetch_result(Ok((1..=items as i64).map(adventure).collect()));
        app
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key_event(app, code, KeyModifiers::NONE, KeyEventKind::Press);
    }

    #[test]
    fn navigation_moves_the_selection() {
        let mut app = make_app(3);
        assert_eq!(app.list_state.selected(), Some(0));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(1));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::End);
        assert_eq!(app.list_state.selected(), Some(2));
        press(&mut app, KeyCode::Home);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn refresh_key_sets_the_pending_action() {
        let mut app = make_app(1);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.pending_action, Some(AppAction::Refresh));

        app.pending_action = None;
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.pending_action, Some(AppAction::Refresh));
    }

    #[test]
    fn enter_opens_details_and_esc_returns() {
        let mut app = make_app(2);
        assert_eq!(app.focused_pane, FocusPane::List);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focused_pane, FocusPane::Details);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focused_pane, FocusPane::List);
    }

    #[test]
    fn enter_with_nothing_selected_stays_on_the_list() {
        let mut app = make_app(0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focused_pane, FocusPane::List);
    }

    #[test]
    fn tab_cycles_panes() {
        let mut app = make_app(1);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusPane::Details);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusPane::List);
    }

    #[test]
    fn alert_swallows_input_until_dismissed() {
        let mut app = make_app(2);
        app.alert = Some(FetchError::Server("boom".to_string()));

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::Char('r'));
        assert!(app.pending_action.is_none());

        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_none());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn help_overlay_toggles() {
        let mut app = make_app(1);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        // Navigation is ignored while help is open.
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(0));

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn quit_key_sets_the_flag() {
        let mut app = make_app(1);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = make_app(2);
        handle_key_event(
            &mut app,
            KeyCode::Down,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
