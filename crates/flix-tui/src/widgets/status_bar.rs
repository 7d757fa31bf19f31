//! Status bar: bottom line with input mode, current route, and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use flix_core::route::{Route, View};

use crate::theme::{C_ERROR, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_SECONDARY, C_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
        }
    }
}

pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// One-row footer. `overlay_open` swaps in the overlay's keys.
pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    route: &Route,
    overlay_open: bool,
    api_key_missing: bool,
) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled(
        format!("{} ", route),
        Style::default().fg(C_SECONDARY),
    ));
    if api_key_missing {
        spans.push(Span::styled(
            "no API key ",
            Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
        ));
    }

    let keys = match mode {
        InputMode::Search => " type keyword  Enter search  Esc clear/cancel",
        InputMode::Normal if overlay_open => " y copy trailer url  Esc/q close  Backspace back",
        InputMode::Normal => match route.view() {
            View::Home | View::Tv => {
                " ←→ move  [ ] page  ↑↓/Tab rows  Enter details  1-3 views  / search  r retry  ? help  q quit"
            }
            View::Search => {
                " ↑↓ move  ←→ column  Enter details  m/t more  / search  Backspace back  ? help  q quit"
            }
        },
    };
    spans.push(Span::styled(keys, Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
