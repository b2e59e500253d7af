//! Main application state and TUI event loop for Pickup Explorer.
//!
//! [`App`] owns the theme, view mode and dashboard state. It drives both the
//! dashboard and the summary table event loops. The loops block on terminal
//! input, so callers run them on a blocking thread and stop them from outside
//! through [`App::shutdown_handle`].

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use explorer_core::models::PickupListing;

use crate::dashboard_view::{self, DashboardConfig, DashboardState};
use crate::table_view::{self, TableRowData};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Sectioned chart dashboard.
    Dashboard,
    /// Per-make summary table.
    Summary,
}

impl ViewMode {
    /// Parse a view name; anything but `"summary"` is the dashboard.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "summary" => ViewMode::Summary,
            _ => ViewMode::Dashboard,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the Pickup Explorer TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub config: DashboardConfig,
    pub state: DashboardState,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    shutdown: Arc<AtomicBool>,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode, config: DashboardConfig) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            config,
            state: DashboardState::default(),
            should_quit: false,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends a running event loop within one tick once set.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// `true` once the user quit or a shutdown was requested.
    pub fn should_stop(&self) -> bool {
        self.should_quit || self.shutdown.load(Ordering::Relaxed)
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout, which bounds how
    /// long a shutdown request waits; every iteration redraws from
    /// `self.state`.
    pub fn run_dashboard(mut self, pickups: &[PickupListing]) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result: io::Result<()> = loop {
            if let Err(e) = terminal.draw(|frame| {
                let area = frame.area();
                dashboard_view::render_dashboard(
                    frame,
                    area,
                    pickups,
                    &self.state,
                    &self.config,
                    &self.theme,
                );
            }) {
                break Err(e);
            }

            match poll_key(tick_rate) {
                Ok(Some(key)) => self.handle_key(key),
                Ok(None) => {}
                Err(e) => break Err(e),
            }

            if self.should_stop() {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Run the static summary table, then wait for `q` / `Esc` / `Ctrl+C`.
    pub fn run_table(mut self, rows: Vec<TableRowData>, totals: TableRowData) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result: io::Result<()> = loop {
            if let Err(e) = terminal.draw(|frame| {
                let area = frame.area();
                if rows.is_empty() {
                    table_view::render_no_data(frame, area, &self.theme);
                } else {
                    table_view::render_table_view(
                        frame,
                        area,
                        "Pickups by Make",
                        &rows,
                        &totals,
                        &self.theme,
                    );
                }
            }) {
                break Err(e);
            }

            match poll_key(tick_rate) {
                Ok(Some(key)) => self.handle_key(key),
                Ok(None) => {}
                Err(e) => break Err(e),
            }

            if self.should_stop() {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    ///
    /// Navigation and the cutoff toggle only act on the dashboard.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            _ if self.view_mode != ViewMode::Dashboard => {}
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.state.next_section(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.state.previous_section()
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.state.toggle_cutoff();
                debug!("Price cutoff toggled: {}", self.state.cutoff_enabled);
            }
            _ => {}
        }
    }
}

/// Wait up to `timeout` for a key press.
fn poll_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            // Windows reports releases as well.
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard_view::Section;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard_app() -> App {
        App::new("dark", ViewMode::Dashboard, DashboardConfig::default())
    }

    // ── ViewMode ──────────────────────────────────────────────────────────────

    #[test]
    fn test_view_mode_from_name() {
        assert_eq!(ViewMode::from_name("summary"), ViewMode::Summary);
        assert_eq!(ViewMode::from_name("SUMMARY"), ViewMode::Summary);
        assert_eq!(ViewMode::from_name("dashboard"), ViewMode::Dashboard);
        assert_eq!(ViewMode::from_name("anything"), ViewMode::Dashboard);
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = dashboard_app();
        assert_eq!(app.view_mode, ViewMode::Dashboard);
        assert_eq!(app.state, DashboardState::default());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("neon", ViewMode::Summary, DashboardConfig::default());
        assert!(app.theme.header.fg.is_some());
    }

    // ── handle_key ────────────────────────────────────────────────────────────

    #[test]
    fn test_navigation_keys() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.state.section, Section::MinorPrices);
        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state.section, Section::DaysListed);
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.state.section, Section::MinorPrices);
    }

    #[test]
    fn test_cutoff_toggle_key() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.state.cutoff_enabled);
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Char('c')));
        assert!(!app.state.cutoff_enabled);
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            let mut app = dashboard_app();
            app.handle_key(key(code));
            assert!(app.should_quit, "{code:?} should quit");
        }

        let mut app = dashboard_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(!app.state.cutoff_enabled);
    }

    #[test]
    fn test_shutdown_handle_stops_app() {
        let app = dashboard_app();
        assert!(!app.should_stop());

        let handle = app.shutdown_handle();
        std::thread::spawn(move || handle.store(true, Ordering::Relaxed))
            .join()
            .unwrap();
        assert!(app.should_stop());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_key_stops_app() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_stop());
    }

    #[test]
    fn test_summary_ignores_dashboard_keys() {
        let mut app = App::new("dark", ViewMode::Summary, DashboardConfig::default());
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.state, DashboardState::default());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
