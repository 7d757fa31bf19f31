//! SearchView: Movies and TV Shows result grids for the current keyword.
//!
//! Only items with a poster are listed. `m`/`t` ask for the next page of one
//! kind; the footer of each column shows whether more pages exist.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use flix_core::model::{Item, MediaKind};
use flix_core::rating::StarRating;
use flix_core::search::SearchResults;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, style_secondary, style_selected, style_stars, C_BADGE_PENDING, C_ERROR, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

const COLUMNS: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Tv];

pub struct SearchView {
    column: usize,
    lists: [ListState; 2],
    areas: [Rect; 2],
}

impl SearchView {
    pub fn new() -> Self {
        Self {
            column: 0,
            lists: [ListState::default(), ListState::default()],
            areas: [Rect::default(); 2],
        }
    }

    fn visible<'a>(state: &'a AppState, kind: MediaKind) -> Vec<&'a Item> {
        state.search.results(kind).visible().collect()
    }

    fn open(&self, state: &AppState, column: usize) -> Vec<Action> {
        let kind = COLUMNS[column];
        let Some(index) = self.lists[column].selected() else {
            return vec![];
        };
        match Self::visible(state, kind).get(index) {
            Some(item) => vec![Action::OpenItem {
                tag: kind.as_str(),
                kind,
                id: item.id,
            }],
            None => vec![],
        }
    }

    fn select(&mut self, state: &AppState, delta: isize) {
        let len = Self::visible(state, COLUMNS[self.column]).len();
        let list = &mut self.lists[self.column];
        if len == 0 {
            list.select(None);
            return;
        }
        let current = list.selected().unwrap_or(0) as isize;
        list.select(Some((current + delta).clamp(0, len as isize - 1) as usize));
    }
}

fn footer(results: &SearchResults, key: char) -> Line<'static> {
    if results.loading {
        Line::from(Span::styled(" loading…", Style::default().fg(C_BADGE_PENDING)))
    } else if let Some(err) = &results.error {
        Line::from(Span::styled(format!(" {} (r to retry)", err), Style::default().fg(C_ERROR)))
    } else if results.has_more {
        Line::from(Span::styled(
            format!(" [{}] load more · page {}/{}", key, results.page, results.total_pages),
            style_secondary(),
        ))
    } else {
        Line::from(Span::styled(" end of results", style_muted()))
    }
}

fn result_item(item: &Item) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::raw(item.title.as_str()),
        Span::styled(format!("  {}", item.year()), style_secondary()),
        Span::styled(format!("  {}", StarRating::from_average(item.vote_average).glyphs()), style_stars()),
    ]))
}

impl Component for SearchView {
    fn id(&self) -> ComponentId {
        ComponentId::SearchResults
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select(state, -1),
            KeyCode::Down | KeyCode::Char('j') => self.select(state, 1),
            KeyCode::PageUp => self.select(state, -10),
            KeyCode::PageDown => self.select(state, 10),
            KeyCode::Left | KeyCode::Char('h') => self.column = 0,
            KeyCode::Right | KeyCode::Char('l') => self.column = 1,
            KeyCode::Enter => return self.open(state, self.column),
            KeyCode::Char('m') => return vec![Action::LoadMore(MediaKind::Movie)],
            KeyCode::Char('t') => return vec![Action::LoadMore(MediaKind::Tv)],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let pos = (event.column, event.row).into();
        let Some(column) = self.areas.iter().position(|r| r.contains(pos)) else {
            return vec![];
        };
        self.column = column;
        match event.kind {
            MouseEventKind::ScrollDown => self.select(state, 3),
            MouseEventKind::ScrollUp => self.select(state, -3),
            MouseEventKind::Down(MouseButton::Left) => {
                // Border row, then one row per item from the list offset.
                let area = self.areas[column];
                let row = event.row.saturating_sub(area.y + 1) as usize;
                let index = self.lists[column].offset() + row;
                if index < Self::visible(state, COLUMNS[column]).len() {
                    self.lists[column].select(Some(index));
                    return self.open(state, column);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::SubmitSearch(_) = action {
            self.column = 0;
            self.lists = [ListState::default(), ListState::default()];
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if state.search.keyword().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" press / and type a keyword", style_muted())),
                area,
            );
            self.areas = [Rect::default(); 2];
            return;
        }

        let [left, right] = Layout::horizontal([Constraint::Percentage(50); 2]).areas(area);
        self.areas = [left, right];

        for (column, kind) in COLUMNS.iter().enumerate() {
            let results = state.search.results(*kind);
            let items = Self::visible(state, *kind);
            let col_focused = focused && column == self.column;
            let badge = Badge {
                text: items.len().to_string(),
                color: C_SECONDARY,
            };
            let block = pane_chrome(kind.label(), None, col_focused, Some(badge))
                .title_bottom(footer(results, if *kind == MediaKind::Movie { 'm' } else { 't' }));

            let list_state = &mut self.lists[column];
            if list_state.selected().is_none() && !items.is_empty() {
                list_state.select(Some(0));
            }
            if let Some(sel) = list_state.selected() {
                if sel >= items.len() {
                    list_state.select(items.len().checked_sub(1));
                }
            }

            let list = List::new(items.into_iter().map(result_item))
                .block(block)
                .highlight_style(if col_focused { style_selected() } else { Style::default() });
            frame.render_stateful_widget(list, self.areas[column], list_state);
        }
    }
}
