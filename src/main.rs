//! # adventures-tui
//!
//! A terminal client for browsing adventures fetched from the adventures
//! HTTP API: scrollable list, details pane, manual refresh, and modal error
//! alerts that leave the last good list untouched.

use adventures_tui::api::{self, ApiClient};
use adventures_tui::fetch::FetchHandle;
use adventures_tui::input::handle_key_event;
use adventures_tui::state::{AppAction, AppState};
use adventures_tui::{theme, ui};
use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use std::io;
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "adventures-tui: a terminal client for the adventures API.\n\
                  Fetches the full adventure list and browses it with a list and details pane."
)]
struct Args {
    /// Base URL of the adventures API
    #[arg(short, long, default_value = "http://localhost:5000/api/v1")]
    api_base: String,

    /// Path to a local JSON file to load instead of the API
    #[arg(short, long)]
    file: Option<String>,

    /// UI theme (dracula, solarized, gruvbox)
    #[arg(short, long, default_value = "dracula")]
    theme: String,
}

/// How long the event loop waits for input before draining fetch results.
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let args = Args::parse();

    let theme_enum = theme::Theme::from_str(&args.theme).map_err(anyhow::Error::msg)?;
    let theme = theme_enum.config();

    let source_label = args
        .file
        .clone()
        .unwrap_or_else(|| args.api_base.clone());

    // The fetch worker owns the data source; the UI thread only ever sees
    // completed FetchResults.
    let fetcher = if let Some(file) = args.file.clone() {
        FetchHandle::spawn(move || api::load_file(&file))
    } else {
        let client = ApiClient::new(&args.api_base)?;
        FetchHandle::spawn(move || client.fetch_all())
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(theme, source_label);

    // Initial load, same path as a manual refresh.
    if fetcher.request() {
        app.begin_fetch();
    }

    let res = run_app(&mut terminal, &mut app, &fetcher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    fetcher: &FetchHandle,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if app.should_quit {
            break;
        }

        // Apply any completed fetches on this (the UI) thread.
        while let Some(result) = fetcher.try_result() {
            app.apply_fetch_result(result);
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    handle_key_event(app, key.code, key.modifiers, key.kind);
                    if let Some(action) = app.pending_action.take() {
                        handle_action(app, fetcher, action);
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_action(app: &mut AppState, fetcher: &FetchHandle, action: AppAction) {
    match action {
        AppAction::Refresh => {
            // Serialized behind any in-flight fetch; coalesced when one is
            // already queued.
            if fetcher.request() {
                app.begin_fetch();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventures_tui::error::FetchError;
    use std::sync::mpsc;
    use std::time::Duration as StdDuration;

    fn drain_one(fetcher: &FetchHandle) -> Option<adventures_tui::fetch::FetchResult> {
        for _ in 0..100 {
            if let Some(result) = fetcher.try_result() {
                return Some(result);
            }
            std::thread::sleep(StdDuration::from_millis(10));
        }
        None
    }

    #[test]
    fn refresh_action_tracks_in_flight_state() {
        let theme = theme::Theme::Dracula.config();
        let mut app = AppState::new(theme, "test".to_string());
        let fetcher = FetchHandle::spawn(|| Ok(Vec::new()));

        handle_action(&mut app, &fetcher, AppAction::Refresh);
        assert!(app.is_fetching());

        let result = drain_one(&fetcher).expect("fetch should complete");
        app.apply_fetch_result(result);
        assert!(!app.is_fetching());
        assert!(app.adventures().is_empty());
    }

    #[test]
    fn coalesced_refresh_does_not_overcount() {
        let theme = theme::Theme::Dracula.config();
        let mut app = AppState::new(theme, "test".to_string());

        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let fetcher = FetchHandle::spawn(move || {
            started_tx.send(()).ok();
            release_rx.recv().ok();
            Err(FetchError::Server("nope".to_string()))
        });

        // One in flight, one queued, the rest coalesce.
        handle_action(&mut app, &fetcher, AppAction::Refresh);
        started_rx
            .recv_timeout(StdDuration::from_secs(5))
            .expect("first fetch should start");
        for _ in 0..3 {
            handle_action(&mut app, &fetcher, AppAction::Refresh);
        }
        assert_eq!(app.in_flight, 2);

        release_tx.send(()).unwrap();
        release_tx.send(()).unwrap();
        for _ in 0..2 {
            let result = drain_one(&fetcher).expect("fetch should complete");
            app.apply_fetch_result(result);
        }
        assert!(!app.is_fetching());
        assert!(app.alert.is_some());
    }
}
