//! Header component: 1-row top bar.
//!
//! Left: app name and the view tabs. Right: the search prompt (active) or the
//! current keyword. Not in the focus ring; the App routes keys here while the
//! prompt is open.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use flix_core::route::View;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::search_input::{InputEvent, SearchInput},
};

const TABS: [View; 3] = [View::Home, View::Tv, View::Search];
const BRAND: &str = " FLIX ";

pub struct Header {
    input: SearchInput,
    /// Tab hit boxes from the last draw.
    tab_areas: Vec<(View, Rect)>,
}

impl Header {
    pub fn new() -> Self {
        Self {
            input: SearchInput::new("search movies and shows…"),
            tab_areas: Vec::new(),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.input.is_active()
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.input.is_active() {
            return vec![];
        }
        match self.input.handle_key(key) {
            InputEvent::Edited => vec![],
            InputEvent::Submitted(keyword) => vec![Action::SubmitSearch(keyword)],
            InputEvent::Cancelled => vec![Action::CloseSearch],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return vec![];
        }
        self.tab_areas
            .iter()
            .find(|(_, r)| r.contains((event.column, event.row).into()))
            .map(|(view, _)| vec![Action::SwitchView(*view)])
            .unwrap_or_default()
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenSearch => self.input.activate(state.search.keyword()),
            Action::CloseSearch | Action::SubmitSearch(_) => self.input.deactivate(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Percentage(40)])
            .split(area);

        let mut spans = vec![Span::styled(
            BRAND,
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )];
        self.tab_areas.clear();
        let mut x = cols[0].x + BRAND.len() as u16;
        for (i, view) in TABS.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, view.label());
            let width = label.chars().count() as u16;
            let style = if *view == state.view() {
                Style::default()
                    .fg(C_PRIMARY)
                    .bg(C_SELECTION_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            self.tab_areas.push((*view, Rect::new(x, cols[0].y, width, 1)));
            x += width + 1;
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

        if self.input.is_active() {
            self.input.draw(frame, cols[1]);
        } else if !state.search.keyword().is_empty() {
            let line = Line::from(vec![
                Span::styled("search: ", Style::default().fg(C_MUTED)),
                Span::styled(state.search.keyword(), Style::default().fg(C_SECONDARY)),
            ]);
            frame.render_widget(Paragraph::new(line).right_aligned(), cols[1]);
        }
    }
}
