//! FocusRing: keyboard focus cycling between the panes of a view.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = self.current.checked_sub(1).unwrap_or(self.items.len() - 1);
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring (view switch). Focus lands on `keep` if it is in the
    /// new set, otherwise on the first item.
    pub fn set_items(&mut self, items: Vec<ComponentId>, keep: Option<ComponentId>) {
        self.items = items;
        self.current = keep
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_core::model::Category;

    fn ring() -> FocusRing {
        FocusRing::new(vec![
            ComponentId::Banner,
            ComponentId::Row(Category::NowPlaying),
            ComponentId::Row(Category::Popular),
        ])
    }

    #[test]
    fn test_cycles_both_ways() {
        let mut r = ring();
        assert_eq!(r.prev(), Some(ComponentId::Row(Category::Popular)));
        assert_eq!(r.next(), Some(ComponentId::Banner));
        assert_eq!(r.next(), Some(ComponentId::Row(Category::NowPlaying)));
    }

    #[test]
    fn test_set_items_keeps_focus_when_present() {
        let mut r = ring();
        r.set(ComponentId::Row(Category::Popular));
        let keep = r.current();
        r.set_items(
            vec![ComponentId::Row(Category::Popular), ComponentId::Banner],
            keep,
        );
        assert!(r.is_focused(ComponentId::Row(Category::Popular)));

        r.set_items(vec![ComponentId::SearchResults], keep);
        assert_eq!(r.current(), Some(ComponentId::SearchResults));
    }

    #[test]
    fn test_empty_ring() {
        let mut r = FocusRing::default();
        assert_eq!(r.next(), None);
        assert_eq!(r.prev(), None);
        assert!(!r.is_focused(ComponentId::Banner));
    }
}
