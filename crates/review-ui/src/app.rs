//! Main application state and TUI event loop for the review dashboard.
//!
//! [`App`] owns the theme, the session store, the filter state and the
//! current [`DashboardView`]. Every key press that changes a filter rebuilds
//! the view synchronously; product-filter keystrokes go through a debouncer
//! first.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::Text,
    widgets::Paragraph,
    Frame, Terminal,
};

use review_core::time_utils::{format_day, DateRange};
use review_runtime::dashboard::{DashboardView, FilterState};
use review_runtime::data::analysis::ReviewSession;
use review_runtime::debounce::Debouncer;
use review_runtime::session_store::SessionStore;

use crate::charts;
use crate::components::header::{key_hints, Header};
use crate::review_list;
use crate::table_view;
use crate::themes::Theme;

const TICK_RATE: Duration = Duration::from_millis(50);

// ── InputMode / AppAction ─────────────────────────────────────────────────────

/// Whether keys drive the dashboard or edit the product filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingProduct,
}

/// Work a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    Reload,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the review dashboard.
pub struct App {
    pub theme: Theme,
    pub store: SessionStore,
    pub filter: FilterState,
    pub session: Option<Arc<ReviewSession>>,
    pub view: Option<DashboardView>,
    /// Index into the day axis of the charts.
    pub selected_day: Option<usize>,
    pub input_mode: InputMode,
    /// Product filter text as typed, ahead of the debounced filter.
    pub product_input: String,
    /// First review card shown.
    pub review_scroll: usize,
    pub should_quit: bool,
    debouncer: Debouncer<String>,
}

impl App {
    /// Construct the app around a store that may already hold a session.
    pub fn new(theme_name: &str, store: SessionStore, filter: FilterState) -> Self {
        let session = store.session();
        let product_input = filter.product_filter.clone();
        let mut app = Self {
            theme: Theme::from_name(theme_name),
            store,
            filter,
            session,
            view: None,
            selected_day: None,
            input_mode: InputMode::Normal,
            product_input,
            review_scroll: 0,
            should_quit: false,
            debouncer: Debouncer::default(),
        };
        app.refresh();
        app
    }

    /// Replace the displayed session and rebuild the view.
    pub fn set_session(&mut self, session: Arc<ReviewSession>) {
        self.session = Some(session);
        self.filter.drill_date = None;
        self.selected_day = None;
        self.refresh();
    }

    /// Rebuild the view from the current session and filters.
    pub fn refresh(&mut self) {
        self.view = self
            .session
            .as_deref()
            .and_then(|s| DashboardView::build(s, &self.filter));
        let days = self.view.as_ref().map_or(0, |v| v.new_reviews.len());
        self.selected_day = match (self.selected_day, days) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => None,
        };
        let reviews = self.view.as_ref().map_or(0, |v| v.reviews.len());
        self.review_scroll = self.review_scroll.min(reviews.saturating_sub(1));
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press. Time is passed in for the debouncer.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> AppAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return AppAction::Quit;
        }
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditingProduct => {
                self.handle_editing_key(key, now);
                AppAction::None
            }
        }
    }

    /// Release a debounced product filter once its quiet period has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(value) = self.debouncer.poll(now) {
            self.apply_product_filter(value);
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return AppAction::Quit;
            }
            KeyCode::Char('r') => return AppAction::Reload,
            KeyCode::Char('t') => {
                self.filter.top_only = !self.filter.top_only;
                self.review_scroll = 0;
                self.refresh();
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::EditingProduct;
            }
            KeyCode::Esc => {
                if self.filter.drill_date.take().is_some() {
                    self.review_scroll = 0;
                    self.refresh();
                }
            }
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Enter => self.drill_into_selection(),
            KeyCode::Char('[') => self.shift_range(|r| r.shift_start(-1)),
            KeyCode::Char(']') => self.shift_range(|r| r.shift_start(1)),
            KeyCode::Char('{') => self.shift_range(|r| r.shift_end(-1)),
            KeyCode::Char('}') => self.shift_range(|r| r.shift_end(1)),
            KeyCode::Up => self.review_scroll = self.review_scroll.saturating_sub(1),
            KeyCode::Down => {
                let max = self.view.as_ref().map_or(0, |v| v.reviews.len());
                if self.review_scroll + 1 < max {
                    self.review_scroll += 1;
                }
            }
            _ => {}
        }
        AppAction::None
    }

    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                if let Some(value) = self.debouncer.flush() {
                    self.apply_product_filter(value);
                }
            }
            KeyCode::Backspace => {
                self.product_input.pop();
                self.debouncer.push(self.product_input.clone(), now);
            }
            KeyCode::Char(c) => {
                self.product_input.push(c);
                self.debouncer.push(self.product_input.clone(), now);
            }
            _ => {}
        }
    }

    fn apply_product_filter(&mut self, value: String) {
        if self.filter.product_filter != value {
            tracing::debug!(filter = %value, "product filter applied");
            self.filter.product_filter = value;
            self.review_scroll = 0;
            self.refresh();
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let days = self.view.as_ref().map_or(0, |v| v.new_reviews.len());
        if days == 0 {
            return;
        }
        let next = match self.selected_day {
            None if delta < 0 => days - 1,
            None => 0,
            Some(i) => i.saturating_add_signed(delta).min(days - 1),
        };
        self.selected_day = Some(next);
    }

    fn drill_into_selection(&mut self) {
        let day = self
            .view
            .as_ref()
            .zip(self.selected_day)
            .and_then(|(v, i)| v.new_reviews.day_at(i));
        if let Some(day) = day {
            self.filter.drill_date = Some(day);
            self.review_scroll = 0;
            self.refresh();
        }
    }

    fn shift_range(&mut self, shift: impl Fn(&DateRange) -> DateRange) {
        let current = self
            .session
            .as_deref()
            .and_then(|s| self.filter.effective_range(s));
        if let Some(range) = current {
            self.filter.range = Some(shift(&range));
            self.refresh();
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// Keyboard events are polled with a short timeout so the debouncer is
    /// serviced between key presses. Reloads run on the store and replace
    /// the session only when they succeed.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, Instant::now()) == AppAction::Reload {
                            self.reload().await;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            self.tick(Instant::now());

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn reload(&mut self) {
        tracing::info!("reloading {} input path(s)", self.store.paths().len());
        if let Ok(session) = self.store.load().await {
            self.set_session(session);
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let editing = self.input_mode == InputMode::EditingProduct;

        let Some(view) = &self.view else {
            table_view::render_no_data(frame, area, self.store.last_error(), &self.theme);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(40),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        let product_text = if editing {
            self.product_input.as_str()
        } else {
            view.product_filter.as_str()
        };
        let header = Header {
            range: view.range,
            product_filter: product_text,
            top_only: view.top_only,
            drill_date: view.drill_date.map(format_day),
            editing,
            theme: &self.theme,
        };
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), rows[0]);

        let chart_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        charts::render_series_chart(
            frame,
            chart_cols[0],
            "New reviews per day",
            &view.new_reviews,
            view.time_unit,
            self.selected_day,
            &self.theme,
        );
        charts::render_series_chart(
            frame,
            chart_cols[1],
            "Snapshot totals",
            &view.snapshots,
            view.time_unit,
            self.selected_day,
            &self.theme,
        );

        let body_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(rows[2]);
        table_view::render_product_table(frame, body_cols[0], &view.products, &self.theme);
        review_list::render_review_list(
            frame,
            body_cols[1],
            &view.reviews,
            &view.counts_label,
            self.review_scroll,
            &self.theme,
        );

        let footer = match self.store.last_error() {
            Some(err) => ratatui::text::Line::from(ratatui::text::Span::styled(
                format!(" reload failed: {err}"),
                self.theme.error,
            )),
            None => key_hints(&self.theme, editing),
        };
        frame.render_widget(Paragraph::new(footer), rows[3]);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
