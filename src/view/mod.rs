//! TUI rendering and terminal management (impure shell)
//!
//! Owns the terminal and the [`ConversationList`], feeds it input events with
//! the current `Instant`, and sleeps in `event::poll` until either input
//! arrives or the list's pending pass is due.

pub mod avatars;
pub mod constants;
pub mod list_pane;
pub mod styles;

pub use avatars::{DemoAvatars, FetchQueue};
pub use list_pane::{format_status, render_list, slot_at_cell, RowPainter};
pub use styles::{ColorConfig, RowStyles};

use crate::config::ResolvedConfig;
use crate::model::{AppError, ConversationSummary, SummaryPatch};
use crate::source::{InputSource, SyntheticSource};
use crate::view_state::content::{Clock, SystemClock};
use crate::view_state::scroll::ScrollPosition;
use crate::view_state::{ConversationList, EngineConfig, ItemIndex, ViewportDimensions};
use constants::{IDLE_POLL_MS, STATUS_BAR_HEIGHT, UNITS_PER_ROW, WHEEL_ROWS};
use crossterm::{
    ExecutableCommand,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input source error
    #[error("Input error: {0}")]
    Input(#[from] crate::model::InputError),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Everything the app needs besides the terminal and the data.
pub struct AppOptions {
    /// Engine tuning.
    pub engine: EngineConfig,
    /// Colour setting.
    pub colors: ColorConfig,
    /// Wall clock for time labels.
    pub clock: Box<dyn Clock>,
    /// Data source description for the status bar.
    pub source_label: String,
    /// Seed for simulated incoming messages.
    pub seed: u64,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    list: ConversationList,
    fetches: FetchQueue,
    styles: RowStyles,
    source_label: String,
    incoming: SyntheticSource,
    list_area: Rect,
    dirty: bool,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and mouse capture.
    pub fn new(summaries: Vec<ConversationSummary>, options: AppOptions) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, summaries, options, Instant::now())
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (q or Ctrl+C). Between events the loop
    /// sleeps until the list's pending pass is due, or [`IDLE_POLL_MS`] when
    /// nothing is scheduled.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self
                .list
                .time_until_pass(Instant::now())
                .unwrap_or(Duration::from_millis(IDLE_POLL_MS));

            if event::poll(timeout)? {
                let now = Instant::now();
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, now) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse, now),
                    Event::Resize(width, height) => self.handle_resize(width, height, now),
                    _ => {}
                }
            }

            self.step(Instant::now());
            if self.dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build the app on an existing terminal and ingest `summaries`.
    pub fn with_terminal(
        terminal: Terminal<B>,
        summaries: Vec<ConversationSummary>,
        options: AppOptions,
        now: Instant,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let list_area = list_area_for(size.width, size.height);
        let (avatars, fetches) = DemoAvatars::new();
        let mut list = ConversationList::new(
            options.engine,
            viewport_for(list_area),
            Box::new(avatars),
            options.clock,
        );
        list.ingest(summaries, now);

        Ok(Self {
            terminal,
            list,
            fetches,
            styles: RowStyles::with_color_config(options.colors),
            source_label: options.source_label,
            incoming: SyntheticSource::new(options.seed),
            list_area,
            dirty: true,
        })
    }

    /// The list engine.
    pub fn list(&self) -> &ConversationList {
        &self.list
    }

    /// The terminal, for inspecting a test backend.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Run due passes and deliver finished avatar fetches.
    pub fn step(&mut self, now: Instant) {
        if let Some(report) = self.list.tick(now) {
            self.dirty |= report.promoted > 0 || report.evicted > 0;
        }
        if self.deliver_fetches() > 0 {
            self.dirty = true;
        }
    }

    fn deliver_fetches(&mut self) -> usize {
        let finished: Vec<String> = self.fetches.borrow_mut().drain(..).collect();
        finished
            .iter()
            .filter_map(|avatar_ref| Some((avatar_ref, DemoAvatars::image(avatar_ref)?)))
            .map(|(avatar_ref, image)| self.list.deliver_avatar(avatar_ref, image))
            .sum()
    }

    /// Handle a key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, now),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, now),
            KeyCode::PageDown => {
                self.list
                    .scroll_by(i64::from(self.list.viewport().height), now);
            }
            KeyCode::PageUp => {
                self.list
                    .scroll_by(-i64::from(self.list.viewport().height), now);
            }
            KeyCode::Home => {
                self.list.scroll_to(ScrollPosition::Top, now);
            }
            KeyCode::End => {
                self.list.scroll_to(ScrollPosition::Bottom, now);
            }
            KeyCode::Esc => self.list.clear_selection(),
            KeyCode::Char('n') => self.simulate_incoming(now),
            KeyCode::Char('r') => self.mark_selected_read(now),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(now),
            _ => return false,
        }
        self.dirty = true;
        false
    }

    fn move_selection(&mut self, step: i64, now: Instant) {
        let count = self.list.count();
        if count == 0 {
            return;
        }
        let target = match self.list.current_selection() {
            Some(at) if step < 0 => at.prev(),
            Some(at) => ItemIndex::new((at.get() + 1).min(count - 1)),
            None => ItemIndex::new(0),
        };
        self.list.select_index(target);
        self.list.ensure_visible(target, now);
    }

    fn simulate_incoming(&mut self, now: Instant) {
        let ids: Vec<_> = self.list.all().iter().map(|s| s.id).collect();
        let list = &self.list;
        let message = self
            .incoming
            .incoming_message(&ids, chrono::Utc::now(), |id| {
                list.position_of(id)
                    .and_then(|at| list.summary(at))
                    .map_or(0, |s| s.unread_count)
            });
        if let Some((id, patch)) = message {
            let at = self.list.apply_upsert(id, patch, now);
            debug!(%id, index = ?at.map(|i| i.get()), "Simulated incoming message");
        }
    }

    fn mark_selected_read(&mut self, now: Instant) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let patch = SummaryPatch {
            unread_count: Some(0),
            ..SummaryPatch::default()
        };
        self.list.apply_upsert(id, patch, now);
    }

    fn remove_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_id() {
            self.list.apply_remove(id, now);
        }
    }

    fn selected_id(&self) -> Option<crate::model::ConversationId> {
        let at = self.list.current_selection()?;
        self.list.summary(at).map(|s| s.id)
    }

    /// Handle a mouse event: wheel scrolls, left click selects.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let wheel = WHEEL_ROWS * UNITS_PER_ROW as i64;
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.list.scroll_by(wheel, now);
            }
            MouseEventKind::ScrollUp => {
                self.list.scroll_by(-wheel, now);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                match slot_at_cell(&self.list, self.list_area, mouse.column, mouse.row) {
                    Some(at) => self.list.select_index(at),
                    None => return,
                }
            }
            _ => return,
        }
        self.dirty = true;
    }

    /// Handle a terminal resize.
    pub fn handle_resize(&mut self, width: u16, height: u16, now: Instant) {
        self.list_area = list_area_for(width, height);
        self.list.resize(viewport_for(self.list_area), now);
        self.dirty = true;
    }

    /// Render the list and the status bar.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let list = &self.list;
        let styles = &self.styles;
        let status = format_status(list, &self.source_label);

        self.terminal.draw(|frame| {
            let [list_area, status_area] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .areas(frame.area());
            render_list(list, list_area, frame.buffer_mut(), styles);
            frame.render_widget(Paragraph::new(status).style(styles.status()), status_area);
        })?;
        self.dirty = false;
        Ok(())
    }
}

fn list_area_for(width: u16, height: u16) -> Rect {
    Rect::new(0, 0, width, height.saturating_sub(STATUS_BAR_HEIGHT))
}

fn viewport_for(area: Rect) -> ViewportDimensions {
    ViewportDimensions::new(
        u32::from(area.width),
        u32::from(area.height) * UNITS_PER_ROW as u32,
    )
}

/// Load the input, run the TUI, and restore the terminal.
pub fn run_with_source(
    input_source: InputSource,
    config: &ResolvedConfig,
    colors: ColorConfig,
    seed: u64,
) -> Result<(), TuiError> {
    let summaries = input_source.load(chrono::Utc::now())?;
    info!(
        source = %input_source.describe(),
        count = summaries.len(),
        "Starting list view"
    );

    let options = AppOptions {
        engine: config.engine_config(),
        colors,
        clock: Box::new(SystemClock),
        source_label: input_source.describe(),
        seed,
    };
    let mut app = TuiApp::new(summaries, options)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
