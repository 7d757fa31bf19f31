//! CarouselRow: one category rendered as a window of boxes.
//!
//! The row reads its page from the carousel engine; paging requests go out
//! as actions and the App applies them. While a transition is in flight the
//! outgoing and incoming windows are drawn side by side at the slide offsets.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use flix_core::carousel::{max_page_index, slide_offsets, visible_window};
use flix_core::catalog::Slot;
use flix_core::model::{Category, Item};
use flix_core::rating::StarRating;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_muted, style_secondary, style_selected, style_stars, C_ACCENT, C_BADGE_PENDING,
        C_ERROR, C_MUTED, C_PANEL_BORDER, C_PANEL_BORDER_FOCUSED, C_SECONDARY,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub const ROW_HEIGHT: u16 = 7;

pub struct CarouselRow {
    category: Category,
    /// Box index inside the visible window.
    cursor: usize,
}

impl CarouselRow {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            cursor: 0,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    fn window<'a>(&self, state: &'a AppState) -> &'a [Item] {
        state
            .carousel
            .window(self.category, state.catalog.items(self.category))
    }

    fn can_page(&self, state: &AppState) -> bool {
        let count = state.catalog.items(self.category).len();
        !state.carousel.is_blocked(self.category)
            && max_page_index(count, state.carousel.page_size()) > 0
    }

    fn open(&self, state: &AppState, index: usize) -> Vec<Action> {
        match self.window(state).get(index) {
            Some(item) => vec![Action::OpenItem {
                tag: self.category.tag(),
                kind: self.category.kind(),
                id: item.id,
            }],
            None => vec![],
        }
    }

    fn badge(&self, state: &AppState) -> Option<Badge> {
        match state.catalog.slot(self.category) {
            Slot::Pending => Some(Badge {
                text: "…".into(),
                color: C_BADGE_PENDING,
            }),
            Slot::Failed(_) => Some(Badge {
                text: "ERR".into(),
                color: C_ERROR,
            }),
            Slot::Ready(page) => {
                let pages = max_page_index(page.results.len(), state.carousel.page_size()) + 1;
                (pages > 1).then(|| Badge {
                    text: format!("{}/{}", state.carousel.page_index(self.category) + 1, pages),
                    color: C_SECONDARY,
                })
            }
        }
    }
}

/// Content area (inside the border, minus the one-column paging gutters) and
/// the two gutters.
fn split_row(area: Rect) -> (Rect, Rect, Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let gutter = inner.width.min(1);
    let left = Rect { width: gutter, ..inner };
    let right = Rect {
        x: inner.right().saturating_sub(gutter),
        width: gutter,
        ..inner
    };
    let content = Rect {
        x: inner.x + gutter,
        width: inner.width.saturating_sub(gutter * 2),
        ..inner
    };
    (content, left, right)
}

/// Slot `index` of `page_size` across `content`, shifted by `dx` and clipped.
fn slot_rect(content: Rect, page_size: usize, index: usize, dx: i32) -> Option<Rect> {
    let slot_w = (content.width as usize / page_size.max(1)) as i32;
    if slot_w == 0 {
        return None;
    }
    let x = content.x as i32 + dx + slot_w * index as i32;
    let left = x.max(content.x as i32);
    let right = (x + slot_w).min(content.right() as i32);
    (right > left).then(|| Rect {
        x: left as u16,
        width: (right - left) as u16,
        ..content
    })
}

/// Cut `text` to `width` display columns, ending in `…` when shortened.
fn truncate(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn draw_box(frame: &mut Frame, rect: Rect, item: &Item, selected: bool, linked: bool) {
    let border = if linked {
        Style::default().fg(C_ACCENT)
    } else if selected {
        Style::default().fg(C_PANEL_BORDER_FOCUSED)
    } else {
        Style::default().fg(C_PANEL_BORDER)
    };
    let title_style = if selected {
        style_selected()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let stars = StarRating::from_average(item.vote_average);
    let lines = vec![
        Line::from(Span::styled(
            truncate(&item.title, rect.width.saturating_sub(2) as usize),
            title_style,
        )),
        Line::from(Span::styled(item.year(), style_secondary())),
        Line::from(Span::styled(stars.glyphs(), style_stars())),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(border)),
        rect,
    );
}

impl Component for CarouselRow {
    fn id(&self) -> ComponentId {
        ComponentId::Row(self.category)
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = self.window(state).len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                } else if self.can_page(state) {
                    self.cursor = state.carousel.page_size() - 1;
                    return vec![Action::PageBack(self.category)];
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                } else if self.can_page(state) {
                    self.cursor = 0;
                    return vec![Action::PageForward(self.category)];
                }
            }
            KeyCode::Char('[') => return vec![Action::PageBack(self.category)],
            KeyCode::Char(']') => return vec![Action::PageForward(self.category)],
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.cursor = len.saturating_sub(1),
            KeyCode::Enter => return self.open(state, self.cursor),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollDown => return vec![Action::PageForward(self.category)],
            MouseEventKind::ScrollUp => return vec![Action::PageBack(self.category)],
            MouseEventKind::Down(MouseButton::Left) => {}
            _ => return vec![],
        }
        let pos = (event.column, event.row).into();
        let (content, left, right) = split_row(area);
        if left.contains(pos) {
            return vec![Action::PageBack(self.category)];
        }
        if right.contains(pos) {
            return vec![Action::PageForward(self.category)];
        }
        if state.slide_progress(self.category).is_some() {
            return vec![];
        }
        let page_size = state.carousel.page_size();
        let hit = (0..self.window(state).len())
            .find(|i| slot_rect(content, page_size, *i, 0).is_some_and(|r| r.contains(pos)));
        match hit {
            Some(i) => {
                self.cursor = i;
                self.open(state, i)
            }
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome(self.category.title(), None, focused, self.badge(state));
        frame.render_widget(block, area);
        let (content, left, right) = split_row(area);

        let items = state.catalog.items(self.category);
        if items.is_empty() {
            let msg = match state.catalog.slot(self.category) {
                Slot::Failed(e) => e.clone(),
                Slot::Pending => "loading…".to_string(),
                Slot::Ready(_) => "nothing here".to_string(),
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style_muted())), content);
            return;
        }

        let page_size = state.carousel.page_size();
        if max_page_index(items.len(), page_size) > 0 {
            let arrow = Style::default().fg(C_MUTED);
            frame.render_widget(Paragraph::new("‹").style(arrow), left);
            frame.render_widget(Paragraph::new("›").style(arrow), right);
        }

        let linked = state.overlay.continuity_key();
        let row_state = state.carousel.state(self.category);
        let mut draw_window = |page: usize, dx: i32, cursor: Option<usize>| {
            for (i, item) in visible_window(items, page, page_size).iter().enumerate() {
                let Some(rect) = slot_rect(content, page_size, i, dx) else {
                    continue;
                };
                let key = format!("{}-{}", self.category.tag(), item.id);
                draw_box(frame, rect, item, cursor == Some(i), linked.as_deref() == Some(key.as_str()));
            }
        };

        match (state.slide_progress(self.category), row_state.outgoing_page) {
            (Some(progress), Some(outgoing)) => {
                let offsets = slide_offsets(row_state.direction, content.width, progress);
                draw_window(outgoing, offsets.outgoing_x, None);
                draw_window(row_state.page_index, offsets.incoming_x, None);
            }
            _ => {
                let len = visible_window(items, row_state.page_index, page_size).len();
                self.cursor = self.cursor.min(len.saturating_sub(1));
                let cursor = focused.then_some(self.cursor);
                draw_window(row_state.page_index, 0, cursor);
            }
        }
    }
}
