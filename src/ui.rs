use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect, Size},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::Adventure;
use crate::state::{AppState, FocusPane};

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main area - takes all space
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    app.list_area = Some(main_chunks[0]);

    render_adventure_list(f, app, main_chunks[0]);
    render_details(f, app, main_chunks[1]);
    render_status_bar(f, app, chunks[1]);

    if app.alert.is_some() {
        render_alert_modal(f, app);
    } else if app.show_help {
        render_help_overlay(f, app);
    }
}

/// Renders the scrollable list of adventures: date, joined count, and the
/// first line of the description per row.
fn render_adventure_list(f: &mut Frame, app: &mut AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .adventures()
        .iter()
        .map(|adventure| {
            let row = Line::from(vec![
                Span::styled(
                    adventure.formatted_date(),
                    app.theme.text.add_modifier(Modifier::DIM),
                ),
                Span::raw("  "),
                Span::styled(format!("{:>3} joined", adventure.joined), app.theme.title),
                Span::raw("  "),
                Span::raw(adventure.title_line().to_string()),
            ]);
            ListItem::new(row)
        })
        .collect();

    let is_focused = app.focused_pane == FocusPane::List;
    let title = if app.is_fetching() {
        format!(" Adventures ({}) ~ refreshing ", app.adventures().len())
    } else {
        format!(" Adventures ({}) ", app.adventures().len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title_style(app.theme.title)
        .title(title)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ move • Enter details ").right_aligned()
        } else {
            Line::from("").right_aligned()
        })
        .title_alignment(Alignment::Left)
        .style(app.theme.list_normal);

    let list = List::new(items)
        .block(block)
        .style(app.theme.list_normal)
        .scroll_padding(2)
        .highlight_style(app.theme.list_selected);

    f.render_stateful_widget(list, area, &mut app.list_state);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    let mut scrollbar_state = ScrollbarState::new(app.adventures().len())
        .position(app.list_state.selected().unwrap_or(0));

    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Renders the details pane for the selected adventure.
fn render_details(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focused_pane == FocusPane::Details;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .style(app.theme.text)
        .title(" Details ")
        .title_alignment(Alignment::Left)
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ scroll • Esc back ").right_aligned()
        } else {
            Line::from("").right_aligned()
        });

    let inner_area = block.inner(area);
    f.render_widget(block, area);
    if inner_area.width == 0 || inner_area.height == 0 {
        return;
    }

    let Some(adventure) = app.selected_adventure() else {
        let placeholder = if app.is_fetching() {
            "Fetching adventures…"
        } else {
            "No adventure selected. Press r to refresh."
        };
        f.render_widget(
            Paragraph::new(placeholder)
                .style(app.theme.text.add_modifier(Modifier::DIM))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    };

    let horizontal_padding = 1u16;
    let content_width = inner_area.width.saturating_sub(horizontal_padding * 2);
    if content_width == 0 {
        return;
    }

    let lines = details_lines(adventure, app, content_width);
    let content_height = lines.len() as u16;

    let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    let scroll_area = scroll_view.area();
    scroll_view.buf_mut().set_style(scroll_area, app.theme.text);

    let content_rect = Rect::new(0, 0, content_width, content_height);
    scroll_view.render_widget(
        Paragraph::new(Text::from(lines)).style(app.theme.text),
        content_rect,
    );

    let scroll_view_area = Rect::new(
        inner_area.x + horizontal_padding,
        inner_area.y,
        content_width,
        inner_area.height,
    );
    f.render_stateful_widget(scroll_view, scroll_view_area, &mut app.details_scroll_state);
}

/// Builds the styled lines for the details pane body.
fn details_lines(adventure: &Adventure, app: &AppState, width: u16) -> Vec<Line<'static>> {
    let label = app.theme.title;
    let dim = app.theme.text.add_modifier(Modifier::DIM);

    let mut lines: Vec<Line<'static>> = vec![
        Line::from(vec![
            Span::styled("Created by  ", label),
            Span::raw(format!(
                "{} (#{})",
                adventure.creator_username, adventure.creator_id
            )),
        ]),
        Line::from(vec![
            Span::styled("Date        ", label),
            Span::raw(adventure.formatted_date()),
        ]),
        Line::from(vec![
            Span::styled("Joined      ", label),
            Span::raw(adventure.joined.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Image       ", label),
            Span::styled(adventure.image_url.clone(), dim),
        ]),
        Line::from(""),
    ];

    for wrapped in wrap_text(&adventure.info, width as usize) {
        lines.push(Line::from(wrapped));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Participants ({})", adventure.participants.len()),
        label,
    )));
    if adventure.participants.is_empty() {
        lines.push(Line::from(Span::styled("  nobody yet", dim)));
    }
    for participant in &adventure.participants {
        lines.push(Line::from(format!(
            "  • {} (#{})",
            participant.username, participant.id
        )));
    }

    lines
}

/// Greedy word wrap measured in display columns, so wide (CJK, emoji)
/// characters count for their terminal width. Words longer than the width
/// are hard-split at the column limit.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw_line.split_whitespace() {
            let mut word = word;
            loop {
                let word_width = word.width();
                let needed = if current.is_empty() {
                    word_width
                } else {
                    current_width + 1 + word_width
                };
                if needed <= width {
                    if !current.is_empty() {
                        current.push(' ');
                        current_width += 1;
                    }
                    current.push_str(word);
                    current_width += word_width;
                    break;
                }
                if current.is_empty() {
                    out.push(split_off_columns(&mut word, width));
                    if word.is_empty() {
                        break;
                    }
                } else {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
            }
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Splits off the longest prefix of `word` that fits in `width` display
/// columns, advancing `word` past it. Always consumes at least one char so
/// a glyph wider than the width cannot loop forever.
fn split_off_columns(word: &mut &str, width: usize) -> String {
    let mut split_at = word.len();
    let mut columns = 0usize;
    for (idx, ch) in word.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if columns + ch_width > width && idx > 0 {
            split_at = idx;
            break;
        }
        columns += ch_width;
        if idx == 0 && columns > width {
            split_at = idx + ch.len_utf8();
            break;
        }
    }
    let head = word[..split_at].to_string();
    *word = &word[split_at..];
    head
}

/// Renders the multisection status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("r ", key_style),
        Span::raw("refresh  "),
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let middle = if app.is_fetching() {
        format!("Adventures: {} ⟳", app.adventures().len())
    } else {
        format!("Adventures: {}", app.adventures().len())
    };
    f.render_widget(
        Paragraph::new(Line::from(middle))
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(Line::from(format!("Source: {}", app.source_label)))
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

/// Renders the modal alert for a failed fetch. The previous list stays on
/// screen behind it, untouched.
fn render_alert_modal(f: &mut Frame, app: &mut AppState) {
    let Some(alert) = &app.alert else {
        return;
    };

    let area = f.area();
    let popup_width = area.width.min(56).saturating_sub(4);
    let popup_height = area.height.min(9).saturating_sub(2);
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.error)
        .style(app.theme.text)
        .title(format!(" {} ", alert.title()))
        .title_style(app.theme.error)
        .title_bottom(Line::from(" Enter/Esc dismiss ").right_aligned());

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let mut lines = vec![Line::from("")];
    for wrapped in wrap_text(&alert.to_string(), inner_area.width.saturating_sub(2) as usize) {
        lines.push(Line::from(wrapped).alignment(Alignment::Center));
    }
    if let Some(detail) = alert.detail() {
        lines.push(Line::from(""));
        for wrapped in wrap_text(&detail, inner_area.width.saturating_sub(2) as usize) {
            lines.push(
                Line::from(Span::styled(
                    wrapped,
                    app.theme.text.add_modifier(Modifier::DIM),
                ))
                .alignment(Alignment::Center),
            );
        }
    }

    f.render_widget(Paragraph::new(Text::from(lines)), inner_area);
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(52).saturating_sub(4);
    let popup_height = area.height.min(14).saturating_sub(2);
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key = app.theme.title;
    let rows = [
        ("↑/↓", "move selection / scroll details"),
        ("PgUp/PgDn", "page"),
        ("Home/End", "jump to first / last"),
        ("Enter", "open details"),
        ("Esc", "back to list"),
        ("Tab", "switch pane"),
        ("r / F5", "refresh from the API"),
        ("?", "toggle this help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {:<10}", keys), key),
                Span::raw(*what),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)), inner_area);
}
