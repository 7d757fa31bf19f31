//! DetailOverlay component: modal popup over the current view.
//!
//! Shown while the route carries an item id. Everything it displays is read
//! from `AppState`: the item from the catalog (or search results) and the
//! detail/trailer cache of the overlay controller.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use flix_core::model::youtube_watch_url;
use flix_core::rating::StarRating;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_default, style_muted, style_secondary, style_stars, style_title, C_GENRE, C_LINK,
        C_OVERLAY_BG, C_PANEL_BORDER_FOCUSED,
    },
};

pub struct DetailOverlayView {
    /// Popup rect from the last draw; clicks outside it close the overlay.
    popup: Rect,
}

impl DetailOverlayView {
    pub fn new() -> Self {
        Self {
            popup: Rect::default(),
        }
    }

    fn trailer_url(state: &AppState) -> Option<String> {
        state
            .overlay
            .cache()
            .trailer_key
            .as_deref()
            .map(youtube_watch_url)
    }
}

pub fn popup_rect(area: Rect) -> Rect {
    let width = (area.width * 7 / 10).max(40).min(area.width);
    let height = (area.height * 7 / 10).max(12).min(area.height);
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

impl Component for DetailOverlayView {
    fn id(&self) -> ComponentId {
        ComponentId::DetailOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => vec![Action::CloseOverlay],
            KeyCode::Char('y') => match Self::trailer_url(state) {
                Some(url) => vec![Action::CopyToClipboard(url)],
                None => vec![],
            },
            // The overlay is modal.
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left)
                if !self.popup.contains((event.column, event.row).into()) =>
            {
                vec![Action::CloseOverlay]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let Some(selection) = state.overlay.selection() else {
            self.popup = Rect::default();
            return;
        };
        self.popup = popup_rect(area);
        let cache = state.overlay.cache();

        let title = state
            .overlay
            .continuity_key()
            .map(|k| format!(" {} ", k))
            .unwrap_or_default();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
            .title(Span::styled(title, style_muted()))
            .style(Style::default().bg(C_OVERLAY_BG));

        let mut lines: Vec<Line> = Vec::new();
        match state.selected_item() {
            Some(item) => {
                let stars = StarRating::from_average(item.vote_average);
                lines.push(Line::from(vec![
                    Span::styled(item.title.as_str(), style_title()),
                    Span::styled(format!("  {}", item.year()), style_secondary()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled(stars.glyphs(), style_stars()),
                    Span::styled(format!(" {:.1}", item.vote_average), style_secondary()),
                ]));
                if let Some(detail) = &cache.detail {
                    if let Some(extent) = detail.extent() {
                        lines.push(Line::from(Span::styled(extent, style_secondary())));
                    }
                    let genres = detail.genre_line();
                    if !genres.is_empty() {
                        lines.push(Line::from(Span::styled(genres, Style::default().fg(C_GENRE))));
                    }
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(item.overview.as_str(), style_default())));
                lines.push(Line::from(""));
                if let Some(url) = state.images.url(item.poster_path.as_deref(), None) {
                    lines.push(Line::from(vec![
                        Span::styled("poster   ", style_muted()),
                        Span::styled(url, Style::default().fg(C_LINK)),
                    ]));
                }
            }
            // Deep link to an item that no loaded list contains.
            None => lines.push(Line::from(Span::styled(
                format!("{} {} is not available", selection.kind, selection.item_id),
                style_muted(),
            ))),
        }

        if let Some(err) = &cache.detail_error {
            lines.push(Line::from(Span::styled(format!("details unavailable: {}", err), style_muted())));
        }
        let trailer = match Self::trailer_url(state) {
            Some(url) => Span::styled(url, Style::default().fg(C_LINK).add_modifier(Modifier::UNDERLINED)),
            None if cache.is_loading() => Span::styled("loading…", style_muted()),
            None => Span::styled("no trailer", style_muted()),
        };
        lines.push(Line::from(vec![Span::styled("trailer  ", style_muted()), trailer]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "y copy trailer url · esc close",
            style_muted(),
        )));

        frame.render_widget(Clear, self.popup);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            self.popup,
        );
    }
}
