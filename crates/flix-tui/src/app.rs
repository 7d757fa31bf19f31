//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in: terminal input and
//!   the results of spawned API fetches.
//! - Fetch results are applied through the controllers' generation checks, so
//!   a response that was superseded while in flight is dropped on arrival.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::collections::{HashMap, HashSet};
use std::io;
use std::time::{Duration, Instant};

use futures_util::stream::{FuturesUnordered, StreamExt};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use flix_core::catalog::Slot;
use flix_core::config::Config;
use flix_core::error::FetchError;
use flix_core::model::{CatalogPage, Category, DetailRecord, MediaKind, VideoList};
use flix_core::overlay::DetailRequest;
use flix_core::route::{Route, Router, View};
use flix_core::search::SearchRequest;
use flix_core::tmdb::TmdbClient;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        banner::Banner,
        carousel_row::{CarouselRow, ROW_HEIGHT},
        detail_overlay::DetailOverlayView,
        header::Header,
        help_overlay::HelpOverlay,
        search_view::SearchView,
    },
    theme::{style_muted, C_BG},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
    workspace::{catalog_kind, ViewLayout},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    CatalogLoaded {
        category: Category,
        generation: u64,
        result: Result<CatalogPage, FetchError>,
    },
    DetailLoaded {
        request: DetailRequest,
        result: Result<DetailRecord, FetchError>,
    },
    TrailerLoaded {
        request: DetailRequest,
        result: Result<VideoList, FetchError>,
    },
    SearchLoaded {
        request: SearchRequest,
        result: Result<CatalogPage, FetchError>,
    },
}

const BANNER_HEIGHT: u16 = 7;
const ANIMATION_FPS: u64 = 30;

/// Last-drawn layout rects: used for mouse hit-testing.
#[derive(Default)]
struct PaneAreas {
    header: Rect,
    banner: Rect,
    rows: HashMap<Category, Rect>,
    search: Rect,
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0 && r.height > 0 && r.contains((col, row).into())
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,
    router: Router,
    tmdb: TmdbClient,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    banner: Banner,
    rows: Vec<CarouselRow>,
    search_view: SearchView,
    detail: DetailOverlayView,
    help_overlay: HelpOverlay,

    layout: ViewLayout,
    pane_areas: PaneAreas,
    toast: ToastManager,

    /// Kinds whose catalogs have been requested at least once.
    requested: HashSet<MediaKind>,
    /// Sender handed to fetch tasks; set once `run` creates the channel.
    tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, tmdb: TmdbClient, initial: Route) -> Self {
        let rows = Category::MOVIES
            .iter()
            .chain(Category::TV.iter())
            .map(|c| CarouselRow::new(*c))
            .collect();
        let state = AppState::new(config, !tmdb.has_api_key());
        let layout = ViewLayout::new(state.view());
        Self {
            state,
            router: Router::new(initial),
            tmdb,
            header: Header::new(),
            banner: Banner::new(),
            rows,
            search_view: SearchView::new(),
            detail: DetailOverlayView::new(),
            help_overlay: HelpOverlay::new(),
            layout,
            pane_areas: PaneAreas::default(),
            toast: ToastManager::new(),
            requested: HashSet::new(),
            tx: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.tx = Some(tx.clone());

        if self.state.api_key_missing {
            self.toast.error(format!(
                "no API key: set api.api_key in {} or {}",
                Config::config_path().display(),
                flix_core::platform::API_KEY_ENV
            ));
        }
        self.on_route_changed();

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            while let Ok(ev) = event::read() {
                if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                    break;
                }
            }
        });

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry + spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Carousel slides. Idle unless a transition is running.
        let mut anim_tick = tokio::time::interval(Duration::from_millis(1000 / ANIMATION_FPS));
        anim_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                    // Drain whatever else is queued before the next frame.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next);
                    }
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.header.tick(s));
                        all.extend(self.banner.tick(s));
                        for row in &mut self.rows {
                            all.extend(row.tick(s));
                        }
                        all.extend(self.search_view.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }

                _ = anim_tick.tick() => {
                    if self.state.carousel.any_in_flight() {
                        self.finish_slides();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("flix exiting");

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => {}
            },

            AppMessage::CatalogLoaded {
                category,
                generation,
                result,
            } => self.on_catalog_loaded(category, generation, result),

            AppMessage::DetailLoaded { request, result } => {
                let failure = result.as_ref().err().map(|e| (e.to_string(), e.is_retryable()));
                if !self.state.overlay.apply_detail(&request, result) {
                    return;
                }
                if let Some((msg, retryable)) = failure {
                    warn!("details for {} {} failed: {}", request.kind, request.item_id, msg);
                    if retryable {
                        self.toast.retryable(format!("details: {}", msg));
                    } else {
                        self.toast.warning(format!("details: {}", msg));
                    }
                }
            }

            AppMessage::TrailerLoaded { request, result } => {
                if let Err(e) = &result {
                    debug!("videos for {} {} failed: {}", request.kind, request.item_id, e);
                }
                self.state.overlay.apply_trailer(&request, result);
            }

            AppMessage::SearchLoaded { request, result } => {
                let failure = result.as_ref().err().map(ToString::to_string);
                if !self.state.search.apply(&request, result) {
                    return;
                }
                if let Some(msg) = failure {
                    warn!("search {} {:?} page {} failed: {}", request.kind, request.keyword, request.page, msg);
                    self.toast.retryable(format!("search {}: {}", request.kind.label(), msg));
                }
            }
        }
    }

    fn on_catalog_loaded(
        &mut self,
        category: Category,
        generation: u64,
        result: Result<CatalogPage, FetchError>,
    ) {
        let failure = result.as_ref().err().map(|e| (e.to_string(), e.is_retryable()));
        if !self.state.catalog.apply(category, generation, result) {
            debug!("catalog {}: dropped superseded response", category);
            return;
        }
        match failure {
            Some((msg, retryable)) => {
                warn!("catalog {} failed: {}", category, msg);
                let text = format!("{}: {}", category.title(), msg);
                if retryable {
                    self.toast.retryable(text);
                } else {
                    self.toast.error(text);
                }
            }
            None => {
                let count = self.state.catalog.items(category).len();
                debug!("catalog {}: {} items", category, count);
                self.state.carousel.clamp(category, count);
            }
        }
        let loading = catalog_kind(self.state.view())
            .is_some_and(|kind| self.state.catalog.is_loading(kind));
        if !loading {
            self.toast.dismiss_spinner();
        }
    }

    // ── Routing ───────────────────────────────────────────────────────────────

    fn navigate(&mut self, route: Route) {
        if self.router.navigate(route) {
            self.on_route_changed();
        }
    }

    /// Bring every controller in line with the router's current route.
    fn on_route_changed(&mut self) {
        let route = self.router.current().clone();
        info!("route: {}", route);
        let previous = self.state.view();
        self.state.route = route.clone();
        let view = route.view();

        if view != previous {
            // Leaving a catalog view unmounts its rows; paging restarts at 0.
            if let Some(kind) = catalog_kind(previous) {
                for category in Category::all(kind) {
                    self.state.carousel.unmount(*category);
                    self.state.slides.remove(category);
                }
            }
            self.layout.switch(view);
        }

        if let Some(kind) = catalog_kind(view) {
            for category in Category::all(kind) {
                self.state.carousel.mount(*category);
            }
            if self.requested.insert(kind) {
                self.toast.spinner(format!("loading {}", kind.label().to_lowercase()));
                self.load_catalogs(Category::all(kind).to_vec());
            }
        }

        if let Some(keyword) = route.keyword() {
            for request in self.state.search.set_keyword(keyword) {
                self.load_search(request);
            }
        }

        if let Some(request) = self.state.overlay.sync(&route) {
            self.load_detail(request);
        }
    }

    // ── Fetches ───────────────────────────────────────────────────────────────

    /// One task per batch; results stream back in completion order.
    fn load_catalogs(&mut self, categories: Vec<Category>) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let jobs: Vec<(Category, u64)> = categories
            .into_iter()
            .map(|c| (c, self.state.catalog.begin_load(c)))
            .collect();
        let tmdb = self.tmdb.clone();
        tokio::spawn(async move {
            let mut pending: FuturesUnordered<_> = jobs
                .into_iter()
                .map(|(category, generation)| {
                    let tmdb = tmdb.clone();
                    async move { (category, generation, tmdb.catalog(category, 1).await) }
                })
                .collect();
            while let Some((category, generation, result)) = pending.next().await {
                let msg = AppMessage::CatalogLoaded {
                    category,
                    generation,
                    result,
                };
                if tx.send(msg).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Detail and trailer fetches are independent; either may land first.
    fn load_detail(&self, request: DetailRequest) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let tmdb = self.tmdb.clone();
        let detail_tx = tx.clone();
        let detail_tmdb = tmdb.clone();
        tokio::spawn(async move {
            let result = detail_tmdb.details(request.kind, request.item_id).await;
            let _ = detail_tx.send(AppMessage::DetailLoaded { request, result }).await;
        });
        tokio::spawn(async move {
            let result = tmdb.videos(request.kind, request.item_id).await;
            let _ = tx.send(AppMessage::TrailerLoaded { request, result }).await;
        });
    }

    fn load_search(&self, request: SearchRequest) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let tmdb = self.tmdb.clone();
        tokio::spawn(async move {
            let result = tmdb.search(request.kind, &request.keyword, request.page).await;
            let _ = tx.send(AppMessage::SearchLoaded { request, result }).await;
        });
    }

    /// `r`: re-issue what failed on screen, or refresh the rows if nothing did.
    fn retry(&mut self) {
        let mut retried = false;

        if let Some(kind) = catalog_kind(self.state.view()) {
            let failed: Vec<Category> = Category::all(kind)
                .iter()
                .copied()
                .filter(|c| matches!(self.state.catalog.slot(*c), Slot::Failed(_)))
                .collect();
            if !failed.is_empty() {
                self.load_catalogs(failed);
                retried = true;
            }
        }

        if self.state.overlay.cache().detail_error.is_some() {
            if let Some(request) = self.state.overlay.current_request() {
                self.load_detail(request);
                retried = true;
            }
        }

        for kind in [MediaKind::Movie, MediaKind::Tv] {
            if let Some(request) = self.state.search.retry(kind) {
                self.load_search(request);
                retried = true;
            }
        }

        if retried {
            self.toast.info("retrying…");
        } else if let Some(kind) = catalog_kind(self.state.view()) {
            self.toast.info(format!("refreshing {}", kind.label().to_lowercase()));
            self.load_catalogs(Category::all(kind).to_vec());
        }
    }

    // ── Carousel transitions ──────────────────────────────────────────────────

    fn turn_page(&mut self, category: Category, forward: bool) {
        let count = self.state.catalog.items(category).len();
        let turned = if forward {
            self.state.carousel.advance(category, count)
        } else {
            self.state.carousel.retreat(category, count)
        };
        if !turned {
            return;
        }
        debug!(
            "carousel {}: page {}",
            category,
            self.state.carousel.page_index(category)
        );
        if self.state.transition.is_zero() {
            self.state.carousel.complete_transition(category);
        } else {
            self.state.slides.insert(category, Instant::now());
        }
    }

    /// Complete every slide whose exit animation has run its course.
    fn finish_slides(&mut self) {
        let done: Vec<Category> = self
            .state
            .slides
            .keys()
            .copied()
            .filter(|c| self.state.slide_progress(*c).is_some_and(|p| p >= 1.0))
            .collect();
        for category in done {
            self.state.slides.remove(&category);
            self.state.carousel.complete_transition(category);
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // The search prompt takes every key while open.
        if self.header.is_searching() {
            return self.header.handle_key(key, &self.state);
        }

        if self.layout.show_help {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            return vec![Action::ToggleHelp];
        }

        if self.state.overlay.is_open() {
            return match key.code {
                KeyCode::Backspace => vec![Action::Back],
                KeyCode::Char('?') => vec![Action::ToggleHelp],
                _ => self.detail.handle_key(key, &self.state),
            };
        }

        let on_rows = self.state.view() != View::Search;
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Char('/') => return vec![Action::OpenSearch],
            KeyCode::Char('1') => return vec![Action::SwitchView(View::Home)],
            KeyCode::Char('2') => return vec![Action::SwitchView(View::Tv)],
            KeyCode::Char('3') => return vec![Action::SwitchView(View::Search)],
            KeyCode::Char('r') => return vec![Action::Retry],
            KeyCode::Backspace => return vec![Action::Back],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Up | KeyCode::Char('k') if on_rows => return vec![Action::FocusPrev],
            KeyCode::Down | KeyCode::Char('j') if on_rows => return vec![Action::FocusNext],
            _ => {}
        }

        let s = &self.state;
        match self.layout.focused() {
            Some(ComponentId::Banner) => self.banner.handle_key(key, s),
            Some(ComponentId::Row(category)) => self
                .rows
                .iter_mut()
                .find(|r| r.category() == category)
                .map(|r| r.handle_key(key, s))
                .unwrap_or_default(),
            Some(ComponentId::SearchResults) => self.search_view.handle_key(key, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click {
            return vec![];
        }
        let (col, row) = (event.column, event.row);
        let s = &self.state;

        if self.layout.show_help {
            return match event.kind {
                MouseEventKind::Down(_) => vec![Action::ToggleHelp],
                _ => vec![],
            };
        }
        // The overlay is modal: its backdrop swallows every click.
        if s.overlay.is_open() {
            return self.detail.handle_mouse(event, Rect::default(), s);
        }

        let areas = &self.pane_areas;
        if hit(areas.header, col, row) {
            return self.header.handle_mouse(event, areas.header, s);
        }

        let mut target = None;
        if hit(areas.banner, col, row) {
            target = Some((ComponentId::Banner, self.banner.handle_mouse(event, areas.banner, s)));
        } else if hit(areas.search, col, row) {
            target = Some((
                ComponentId::SearchResults,
                self.search_view.handle_mouse(event, areas.search, s),
            ));
        } else if let Some((category, area)) = areas.rows.iter().find(|(_, r)| hit(**r, col, row)) {
            if let Some(component) = self.rows.iter_mut().find(|r| r.category() == *category) {
                target = Some((component.id(), component.handle_mouse(event, *area, s)));
            }
        }

        match target {
            Some((id, mut actions)) => {
                if self.layout.focused() != Some(id) {
                    actions.insert(0, Action::FocusPane(id));
                }
                actions
            }
            None => vec![],
        }
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.search_view.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are depth-limited to one level.
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Resize(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Routing ───────────────────────────────────────────────────────
            Action::Back => {
                if self.router.back() {
                    self.on_route_changed();
                }
            }
            Action::SwitchView(view) => {
                let route = match view {
                    View::Home => Route::Home,
                    View::Tv => Route::Tv,
                    View::Search => Route::search(self.state.search.keyword()),
                };
                self.navigate(route);
                if view == View::Search && self.state.search.keyword().is_empty() {
                    self.dispatch(Action::OpenSearch);
                }
            }

            // ── Focus ─────────────────────────────────────────────────────────
            Action::FocusNext => self.layout.focus_next(),
            Action::FocusPrev => self.layout.focus_prev(),
            Action::FocusPane(id) => self.layout.focus.set(id),

            // ── Catalog rows ──────────────────────────────────────────────────
            Action::PageForward(category) => self.turn_page(category, true),
            Action::PageBack(category) => self.turn_page(category, false),
            Action::OpenItem { tag, kind, id } => {
                let route = self
                    .state
                    .overlay
                    .activate(self.router.current(), tag, kind, id);
                self.navigate(route);
            }
            Action::CloseOverlay => {
                let route = self.state.overlay.close_route(self.router.current());
                self.navigate(route);
            }
            Action::Retry => self.retry(),

            // ── Search ────────────────────────────────────────────────────────
            Action::OpenSearch => self.state.input_mode = InputMode::Search,
            Action::CloseSearch => self.state.input_mode = InputMode::Normal,
            Action::SubmitSearch(keyword) => {
                self.state.input_mode = InputMode::Normal;
                self.navigate(Route::search(keyword));
            }
            Action::LoadMore(kind) => match self.state.search.load_more(kind) {
                Some(request) => self.load_search(request),
                None if !self.state.search.results(kind).has_more => {
                    self.toast.info(format!("no more {}", kind.label().to_lowercase()));
                }
                None => {}
            },

            // ── UI ────────────────────────────────────────────────────────────
            Action::ToggleHelp => self.layout.show_help = !self.layout.show_help,
            Action::ToggleKeys => self.layout.show_keys_bar = !self.layout.show_keys_bar,
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => self.toast.success(format!("copied: {}", text)),
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }
            Action::Quit => self.should_quit = true,
            Action::Resize(..) => {}
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let status_h = u16::from(self.layout.show_keys_bar);
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(status_h),
            ])
            .split(area);

        self.pane_areas.header = outer[0];
        self.header.draw(frame, outer[0], false, &self.state);
        status_bar::draw_separator(frame, outer[1]);

        self.pane_areas.banner = Rect::default();
        self.pane_areas.search = Rect::default();
        self.pane_areas.rows.clear();
        match catalog_kind(self.state.view()) {
            Some(kind) => self.draw_catalog(frame, outer[2], kind),
            None => {
                let focused = self.layout.focused() == Some(ComponentId::SearchResults);
                self.pane_areas.search = outer[2];
                self.search_view.draw(frame, outer[2], focused, &self.state);
            }
        }

        if self.layout.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                outer[3],
                self.state.input_mode,
                &self.state.route,
                self.state.overlay.is_open(),
                self.state.api_key_missing,
            );
        }

        if self.state.overlay.is_open() {
            self.detail.draw(frame, area, true, &self.state);
        }
        self.help_overlay.draw(frame, area, false, &self.state);
        self.toast.draw(frame, area);
    }

    /// Banner plus one row per category, scrolled so the focused pane is on
    /// screen when the terminal is too short for all of them.
    fn draw_catalog(&mut self, frame: &mut ratatui::Frame, area: Rect, kind: MediaKind) {
        if self.state.catalog.is_loading(kind) {
            let msg = Paragraph::new(format!("loading {}…", kind.label().to_lowercase()))
                .style(style_muted())
                .centered();
            let [middle] = Layout::vertical([Constraint::Length(1)])
                .flex(ratatui::layout::Flex::Center)
                .areas(area);
            frame.render_widget(msg, middle);
            return;
        }

        let panes: Vec<(ComponentId, u16)> = std::iter::once((ComponentId::Banner, BANNER_HEIGHT))
            .chain(Category::all(kind).iter().map(|c| (ComponentId::Row(*c), ROW_HEIGHT)))
            .collect();
        let focused = self.layout.focused();
        let focus_idx = panes
            .iter()
            .position(|(id, _)| Some(*id) == focused)
            .unwrap_or(0);
        let mut start = 0;
        while start < focus_idx
            && panes[start..=focus_idx].iter().map(|(_, h)| *h).sum::<u16>() > area.height
        {
            start += 1;
        }

        let mut y = area.y;
        for (id, height) in &panes[start..] {
            if y + height > area.bottom() {
                break;
            }
            let rect = Rect::new(area.x, y, area.width, *height);
            y += height;
            let is_focused = focused == Some(*id);
            match id {
                ComponentId::Banner => {
                    self.pane_areas.banner = rect;
                    self.banner.draw(frame, rect, is_focused, &self.state);
                }
                ComponentId::Row(category) => {
                    self.pane_areas.rows.insert(*category, rect);
                    if let Some(row) = self.rows.iter_mut().find(|r| r.category() == *category) {
                        row.draw(frame, rect, is_focused, &self.state);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flix_core::config::ApiConfig;
    use flix_core::model::Item;

    fn test_app() -> App {
        let config = Config::default();
        let tmdb = TmdbClient::new(&ApiConfig::default()).unwrap();
        let mut app = App::new(&config, tmdb, Route::Home);
        app.on_route_changed();
        app
    }

    fn page(count: u64) -> CatalogPage {
        let mut page = CatalogPage::empty();
        page.results = (1..=count)
            .map(|id| Item {
                id,
                title: format!("Item {}", id),
                poster_path: Some(format!("/{}.jpg", id)),
                backdrop_path: None,
                overview: String::new(),
                release_date: "2024-01-01".into(),
                vote_average: 7.0,
            })
            .collect();
        page
    }

    fn load(app: &mut App, category: Category, count: u64) {
        let generation = app.state.catalog.begin_load(category);
        app.on_catalog_loaded(category, generation, Ok(page(count)));
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_open_and_close_item() {
        let mut app = test_app();
        app.dispatch(Action::OpenItem {
            tag: "popular",
            kind: MediaKind::Movie,
            id: 5,
        });
        assert_eq!(app.router.current(), &Route::Movie(5));
        assert!(app.state.overlay.is_open());
        assert_eq!(app.state.overlay.continuity_key().as_deref(), Some("popular-5"));

        app.dispatch(Action::CloseOverlay);
        assert_eq!(app.router.current(), &Route::Home);
        assert!(!app.state.overlay.is_open());
    }

    #[test]
    fn test_q_closes_overlay_before_quitting() {
        let mut app = test_app();
        app.dispatch(Action::OpenItem {
            tag: "nowPlaying",
            kind: MediaKind::Movie,
            id: 1,
        });
        for a in app.handle_key(key(KeyCode::Char('q'))) {
            app.dispatch(a);
        }
        assert!(!app.state.overlay.is_open());
        assert!(!app.should_quit);

        for a in app.handle_key(key(KeyCode::Char('q'))) {
            app.dispatch(a);
        }
        assert!(app.should_quit);
    }

    #[test]
    fn test_page_turn_blocks_until_slide_finishes() {
        let mut app = test_app();
        load(&mut app, Category::Popular, 13);

        app.dispatch(Action::PageForward(Category::Popular));
        assert_eq!(app.state.carousel.page_index(Category::Popular), 1);
        assert!(app.state.carousel.is_blocked(Category::Popular));
        assert!(app.state.slides.contains_key(&Category::Popular));

        // A second turn during the slide is dropped.
        app.dispatch(Action::PageForward(Category::Popular));
        assert_eq!(app.state.carousel.page_index(Category::Popular), 1);

        // Other rows are not held up.
        load(&mut app, Category::TopRated, 13);
        app.dispatch(Action::PageBack(Category::TopRated));
        assert_eq!(app.state.carousel.page_index(Category::TopRated), 1);

        let past = Instant::now() - Duration::from_secs(5);
        app.state.slides.insert(Category::Popular, past);
        app.state.slides.insert(Category::TopRated, past);
        assert!(app.state.carousel.any_in_flight());
        app.finish_slides();
        assert!(app.state.slides.is_empty());
        assert!(!app.state.carousel.any_in_flight());
        assert!(!app.state.carousel.is_blocked(Category::Popular));
    }

    #[test]
    fn test_single_page_row_does_not_turn() {
        let mut app = test_app();
        load(&mut app, Category::Upcoming, 6);
        app.dispatch(Action::PageForward(Category::Upcoming));
        assert_eq!(app.state.carousel.page_index(Category::Upcoming), 0);
        assert!(app.state.slides.is_empty());
    }

    #[test]
    fn test_leaving_a_view_resets_its_rows() {
        let mut app = test_app();
        load(&mut app, Category::Popular, 13);
        app.dispatch(Action::PageForward(Category::Popular));
        app.state.slides.clear();

        app.dispatch(Action::SwitchView(View::Tv));
        assert_eq!(app.layout.view, View::Tv);
        app.dispatch(Action::SwitchView(View::Home));
        assert_eq!(app.state.carousel.page_index(Category::Popular), 0);
        assert!(!app.state.carousel.is_blocked(Category::Popular));
    }

    #[test]
    fn test_superseded_catalog_result_is_dropped() {
        let mut app = test_app();
        let first = app.state.catalog.begin_load(Category::NowPlaying);
        let second = app.state.catalog.begin_load(Category::NowPlaying);

        app.on_catalog_loaded(Category::NowPlaying, first, Ok(page(3)));
        assert!(app.state.catalog.items(Category::NowPlaying).is_empty());

        app.on_catalog_loaded(Category::NowPlaying, second, Ok(page(2)));
        assert_eq!(app.state.catalog.items(Category::NowPlaying).len(), 2);
    }

    #[test]
    fn test_failed_catalog_marks_slot() {
        let mut app = test_app();
        let generation = app.state.catalog.begin_load(Category::TopRated);
        app.on_catalog_loaded(Category::TopRated, generation, Err(FetchError::MissingApiKey));
        assert!(matches!(app.state.catalog.slot(Category::TopRated), Slot::Failed(_)));
        assert!(!app.toast.is_empty());
    }

    #[test]
    fn test_search_tab_without_keyword_opens_prompt() {
        let mut app = test_app();
        app.dispatch(Action::SwitchView(View::Search));
        assert_eq!(app.state.view(), View::Search);
        assert!(app.header.is_searching());
        assert_eq!(app.state.input_mode, InputMode::Search);

        app.dispatch(Action::SubmitSearch("dune".into()));
        assert!(!app.header.is_searching());
        assert_eq!(app.state.search.keyword(), "dune");
        assert_eq!(app.router.current(), &Route::search("dune"));
    }

    #[test]
    fn test_back_returns_to_previous_route() {
        let mut app = test_app();
        app.dispatch(Action::SwitchView(View::Tv));
        app.dispatch(Action::OpenItem {
            tag: "airToday",
            kind: MediaKind::Tv,
            id: 77,
        });
        assert_eq!(app.router.current(), &Route::TvShow(77));

        app.dispatch(Action::Back);
        assert_eq!(app.router.current(), &Route::Tv);
        assert!(!app.state.overlay.is_open());
    }
}
