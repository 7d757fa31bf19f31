//! ViewLayout: which panes a view shows, and focus memory across views.
//!
//! Home and TV show the banner plus one carousel row per category; Search
//! shows the results grids. Focus is remembered per view so switching tabs
//! and coming back lands on the same row.

use std::collections::HashMap;

use flix_core::model::{Category, MediaKind};
use flix_core::route::View;

use crate::action::ComponentId;
use crate::focus::FocusRing;

pub struct ViewLayout {
    pub view: View,
    pub show_help: bool,
    pub show_keys_bar: bool,
    pub focus: FocusRing,
    remembered: HashMap<View, ComponentId>,
}

impl ViewLayout {
    pub fn new(view: View) -> Self {
        let mut layout = Self {
            view,
            show_help: false,
            show_keys_bar: true,
            focus: FocusRing::default(),
            remembered: HashMap::new(),
        };
        layout.focus.set_items(panes_for(view), None);
        layout
    }

    /// Switch the focus ring to `view`. Returns false if it was already active.
    pub fn switch(&mut self, view: View) -> bool {
        if view == self.view {
            return false;
        }
        if let Some(id) = self.focus.current() {
            self.remembered.insert(self.view, id);
        }
        self.view = view;
        let keep = self.remembered.get(&view).copied();
        self.focus.set_items(panes_for(view), keep);
        true
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focus.current()
    }

    pub fn focus_next(&mut self) {
        self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus.prev();
    }
}

/// Media kind whose catalog rows a view shows.
pub fn catalog_kind(view: View) -> Option<MediaKind> {
    match view {
        View::Home => Some(MediaKind::Movie),
        View::Tv => Some(MediaKind::Tv),
        View::Search => None,
    }
}

fn panes_for(view: View) -> Vec<ComponentId> {
    match catalog_kind(view) {
        Some(kind) => std::iter::once(ComponentId::Banner)
            .chain(Category::all(kind).iter().map(|c| ComponentId::Row(*c)))
            .collect(),
        None => vec![ComponentId::SearchResults],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_panes() {
        let layout = ViewLayout::new(View::Tv);
        assert_eq!(layout.focused(), Some(ComponentId::Banner));
        assert_eq!(panes_for(View::Tv).len(), 5);
        assert_eq!(panes_for(View::Search), vec![ComponentId::SearchResults]);
    }

    #[test]
    fn test_focus_remembered_per_view() {
        let mut layout = ViewLayout::new(View::Home);
        layout.focus_next();
        layout.focus_next();
        assert_eq!(layout.focused(), Some(ComponentId::Row(Category::Popular)));

        assert!(layout.switch(View::Search));
        assert_eq!(layout.focused(), Some(ComponentId::SearchResults));
        assert!(!layout.switch(View::Search));

        layout.switch(View::Home);
        assert_eq!(layout.focused(), Some(ComponentId::Row(Category::Popular)));
    }
}
