//! Banner: hero strip above the rows showing item 0 of the lead category.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use flix_core::catalog::Slot;
use flix_core::model::{Category, MediaKind};
use flix_core::rating::StarRating;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, style_secondary, style_stars, style_title, C_ACCENT, C_LINK},
    widgets::pane_chrome::pane_chrome,
    workspace::catalog_kind,
};

pub struct Banner;

impl Banner {
    pub fn new() -> Self {
        Self
    }

    fn open_action(state: &AppState) -> Option<Action> {
        let kind = catalog_kind(state.view())?;
        let item = state.catalog.banner(kind)?;
        Some(Action::OpenItem {
            tag: lead(kind).tag(),
            kind,
            id: item.id,
        })
    }
}

fn lead(kind: MediaKind) -> Category {
    Category::all(kind)[0]
}

impl Component for Banner {
    fn id(&self) -> ComponentId {
        ComponentId::Banner
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('i') => Self::open_action(state).into_iter().collect(),
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Self::open_action(state).into_iter().collect(),
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let Some(kind) = catalog_kind(state.view()) else {
            return;
        };
        let block = pane_chrome(lead(kind).title(), None, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(item) = state.catalog.banner(kind) else {
            let msg = match state.catalog.slot(lead(kind)) {
                Slot::Failed(e) => format!(" {}", e),
                _ => " loading…".to_string(),
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style_muted())), inner);
            return;
        };

        let stars = StarRating::from_average(item.vote_average);
        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!(" {}", item.title), style_title().fg(C_ACCENT)),
                Span::styled(format!("  {}", item.year()), style_secondary()),
            ]),
            Line::from(vec![
                Span::styled(format!(" {}", stars.glyphs()), style_stars()),
                Span::styled(format!(" {:.1}", item.vote_average), style_secondary()),
            ]),
            Line::from(Span::styled(format!(" {}", item.overview), style_secondary())),
        ];
        if let Some(url) = state.images.url(item.backdrop_path.as_deref(), Some("original")) {
            lines.push(Line::from(Span::styled(
                format!(" {}", url),
                Style::default().fg(C_LINK).add_modifier(Modifier::DIM),
            )));
        }
        lines.push(Line::from(Span::styled(" [enter] more info", style_muted())));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
