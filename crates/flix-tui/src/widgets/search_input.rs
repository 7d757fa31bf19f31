//! SearchInput: wraps tui-input for the keyword prompt in the header.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED};

const PROMPT: &str = "/ ";

#[derive(Debug, PartialEq)]
pub enum InputEvent {
    Edited,
    Submitted(String),
    Cancelled,
}

pub struct SearchInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    /// Start editing, pre-filled with the current keyword.
    pub fn activate(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Esc clears a non-empty prompt first and closes it on the second press.
    /// Enter submits the trimmed text; an empty prompt submits nothing.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputEvent {
        match key.code {
            KeyCode::Esc if !self.input.value().is_empty() => {
                self.input = Input::default();
                InputEvent::Edited
            }
            KeyCode::Esc => {
                self.deactivate();
                InputEvent::Cancelled
            }
            KeyCode::Enter => {
                self.deactivate();
                let keyword = self.input.value().trim().to_string();
                if keyword.is_empty() {
                    InputEvent::Cancelled
                } else {
                    InputEvent::Submitted(keyword)
                }
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                InputEvent::Edited
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(PROMPT.len() as u16 + 1) as usize;
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();
        let span = if value.is_empty() {
            Span::styled(format!("{}{}", PROMPT, self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let shown: String = value.chars().skip(scroll).collect();
            Span::styled(format!("{}{}", PROMPT, shown), Style::default().fg(C_INPUT_FG))
        };
        frame.render_widget(
            Paragraph::new(Line::from(span)).style(Style::default().bg(C_INPUT_BG)),
            area,
        );

        if self.active && area.width > 0 {
            let offset = PROMPT.len() + self.input.visual_cursor().saturating_sub(scroll);
            let x = (area.x + offset as u16).min(area.x + area.width - 1);
            frame.set_cursor_position((x, area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut SearchInput, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_enter_submits_trimmed_keyword() {
        let mut input = SearchInput::new("search");
        input.activate("");
        type_str(&mut input, " dune ");
        assert_eq!(input.handle_key(key(KeyCode::Enter)), InputEvent::Submitted("dune".into()));
        assert!(!input.is_active());
    }

    #[test]
    fn test_empty_enter_cancels() {
        let mut input = SearchInput::new("search");
        input.activate("");
        assert_eq!(input.handle_key(key(KeyCode::Enter)), InputEvent::Cancelled);
    }

    #[test]
    fn test_esc_clears_then_closes() {
        let mut input = SearchInput::new("search");
        input.activate("alien");
        assert_eq!(input.text(), "alien");
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputEvent::Edited);
        assert_eq!(input.text(), "");
        assert!(input.is_active());
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputEvent::Cancelled);
        assert!(!input.is_active());
    }

    #[test]
    fn test_backspace_edits() {
        let mut input = SearchInput::new("search");
        input.activate("");
        type_str(&mut input, "heatt");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.text(), "heat");
    }
}
