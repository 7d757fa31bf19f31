//! Action enum: all user-initiated intents and internal events.

use flix_core::model::{Category, MediaKind};
use flix_core::route::View;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    Banner,
    Row(Category),
    SearchResults,
    DetailOverlay,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Routing ──────────────────────────────────────────────────────────────
    Back,
    SwitchView(View),

    // ── Focus ────────────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Catalog rows ─────────────────────────────────────────────────────────
    PageForward(Category),
    PageBack(Category),
    /// Open the detail overlay. `tag` names the row (or banner) it came from.
    OpenItem {
        tag: &'static str,
        kind: MediaKind,
        id: u64,
    },
    CloseOverlay,
    /// Re-issue every fetch that failed on the current view.
    Retry,

    // ── Search ───────────────────────────────────────────────────────────────
    OpenSearch,
    SubmitSearch(String),
    CloseSearch,
    LoadMore(MediaKind),

    // ── UI ───────────────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,
    CopyToClipboard(String),
    Quit,
    Resize(u16, u16),
}
