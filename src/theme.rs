use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub list_normal: Style,
    pub list_selected: Style,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub text: Style,
    /// Accent for the error alert border and title.
    pub error: Style,
}

/// Returns a ThemeConfig based on the Dracula color palette.
pub fn dracula_theme() -> ThemeConfig {
    // Dracula palette
    let bg = Color::Rgb(40, 42, 54);
    let selection = Color::Rgb(68, 71, 90);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let red = Color::Rgb(255, 85, 85);

    ThemeConfig {
        list_normal: Style::default().fg(fg).bg(bg),
        list_selected: Style::default()
            .fg(fg)
            .bg(selection)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(comment),
        border_selected: Style::default().fg(purple),
        title: Style::default().fg(purple).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
pub fn solarized_theme() -> ThemeConfig {
    // Solarized Dark palette
    let base02 = Color::Rgb(7, 54, 66);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let base3 = Color::Rgb(253, 246, 227);
    let red = Color::Rgb(220, 50, 47);
    let blue = Color::Rgb(38, 139, 210);

    ThemeConfig {
        list_normal: Style::default().fg(base0).bg(base02),
        list_selected: Style::default()
            .fg(base3)
            .bg(blue)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(base01),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(base0).bg(base02),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
pub fn gruvbox_theme() -> ThemeConfig {
    // Gruvbox Dark palette
    let bg0 = Color::Rgb(40, 40, 40);
    let bg1 = Color::Rgb(60, 56, 54);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let blue = Color::Rgb(69, 133, 136);
    let red = Color::Rgb(204, 36, 29);

    ThemeConfig {
        list_normal: Style::default().fg(fg1).bg(bg0),
        list_selected: Style::default()
            .fg(fg1)
            .bg(bg1)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg1).bg(bg0),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Named themes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dracula,
    Solarized,
    Gruvbox,
}

impl Theme {
    pub fn config(self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::Solarized => solarized_theme(),
            Theme::Gruvbox => gruvbox_theme(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "solarized" => Ok(Theme::Solarized),
            "gruvbox" => Ok(Theme::Gruvbox),
            other => Err(format!(
                "unknown theme '{}' (expected dracula, solarized, gruvbox)",
                other
            )),
        }
    }
}
