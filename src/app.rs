//! Application struct and event loop.
//!
//! Owns the terminal, the state and the alert source channel.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::*;
use crate::source::{AlertSource, SourceEvent, SourceOp};
use crate::ui::{self, AppState, PanelAction};

type Backend = CrosstermBackend<io::Stdout>;

/// Main application struct.
pub struct App {
    state: AppState,
    source: Option<AlertSource>,

    source_tx: mpsc::UnboundedSender<SourceEvent>,
    source_rx: mpsc::UnboundedReceiver<SourceEvent>,

    // Local loop state
    fetch_in_flight: bool,
    /// Show a status message when the fetch in flight completes.
    announce_load: bool,
    last_fetch: Option<Instant>,
    refresh_interval: Option<Duration>,
    started: Instant,
}

impl App {
    pub fn new(config: &Config, source: Option<AlertSource>, initial_preset: Option<&str>) -> Self {
        let theme = ui::Theme::by_name(&config.theme)
            .or_else(|| ui::Theme::from_toml_file(&custom_theme_path(&config.theme)))
            .unwrap_or_else(|| {
                warn!(theme = %config.theme, "unknown theme, using default");
                ui::Theme::default()
            });

        let source_label = source
            .as_ref()
            .map(AlertSource::describe)
            .unwrap_or_else(|| t!("header.no_source").to_string());

        let mut state = AppState::new(
            config.presets.clone(),
            config.page_size,
            theme,
            source_label,
        );
        state.remember_deletes = source.as_ref().is_some_and(|s| !s.persists_deletes());

        if let Some(name) = initial_preset {
            if !state.select_preset(name) {
                warn!(preset = name, "unknown preset, starting on the first tab");
                state.set_status(t!("msg.unknown_preset", name = name).to_string());
            }
        }
        if let Some(warning) = &config.parse_warning {
            state.set_status(warning.clone());
        }

        let (source_tx, source_rx) = mpsc::unbounded_channel();
        let refresh_interval = (config.refresh_interval_secs > 0)
            .then(|| Duration::from_secs(config.refresh_interval_secs));

        Self {
            state,
            source,
            source_tx,
            source_rx,
            fetch_in_flight: false,
            announce_load: true,
            last_fetch: None,
            refresh_interval,
            started: Instant::now(),
        }
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        // Terminal init
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        // Cleanup, also after a failed loop
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result?;
        println!("\n{}\n", t!("app.stopped"));
        Ok(())
    }

    fn event_loop(&mut self, terminal: &mut Terminal<Backend>) -> Result<()> {
        if self.source.is_some() {
            self.request_fetch();
        } else {
            self.state.set_status(t!("msg.no_source").to_string());
        }

        loop {
            self.state.tick_count = (self.started.elapsed().as_millis() / SPINNER_FRAME_MS) as u64;
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            self.drain_source_events();

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        info!("quit requested");
                        return Ok(());
                    }
                }
            }

            self.tick_refresh();
        }
    }

    // ── Source ───────────────────────────────────────────────────

    /// Start a fetch unless one is already running.
    fn request_fetch(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        if self.fetch_in_flight {
            debug!("fetch already in flight");
            return;
        }
        self.fetch_in_flight = true;
        self.state.loading = true;
        self.last_fetch = Some(Instant::now());
        debug!(source = %source.describe(), "fetching alerts");

        let tx = self.source_tx.clone();
        tokio::spawn(async move {
            let event = match source.fetch().await {
                Ok(alerts) => SourceEvent::Loaded(alerts),
                Err(e) => SourceEvent::Error {
                    op: SourceOp::Fetch,
                    message: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    fn persist_deleted(&mut self, ids: Vec<String>, deleted: bool) {
        let changed = self.state.apply_deleted(&ids, deleted);
        if changed.is_empty() {
            return;
        }
        info!(count = changed.len(), deleted, "applying delete flag");

        let Some(source) = self.source.clone() else {
            self.announce_persisted(changed.len(), deleted);
            return;
        };
        let tx = self.source_tx.clone();
        tokio::spawn(async move {
            let event = match source.set_deleted(&changed, deleted).await {
                Ok(()) => SourceEvent::Persisted {
                    ids: changed.iter().map(|a| a.id.clone()).collect(),
                    deleted,
                },
                Err(e) => SourceEvent::Error {
                    message: e.to_string(),
                    op: SourceOp::SetDeleted {
                        persisted: e.persisted,
                        failed: e.failed,
                        deleted,
                    },
                },
            };
            let _ = tx.send(event);
        });
    }

    fn announce_persisted(&mut self, count: usize, deleted: bool) {
        let msg = if deleted {
            t!("msg.deleted", count = count)
        } else {
            t!("msg.restored", count = count)
        };
        self.state.set_status(msg.to_string());
    }

    fn drain_source_events(&mut self) {
        while let Ok(event) = self.source_rx.try_recv() {
            match event {
                SourceEvent::Loaded(alerts) => {
                    info!(count = alerts.len(), "alerts loaded");
                    self.fetch_in_flight = false;
                    let count = alerts.len();
                    self.state.replace_alerts(alerts);
                    if self.announce_load {
                        self.announce_load = false;
                        self.state
                            .set_status(t!("msg.loaded", count = count).to_string());
                    }
                }
                SourceEvent::Persisted { ids, deleted } => {
                    info!(count = ids.len(), deleted, "delete flag persisted");
                    self.announce_persisted(ids.len(), deleted);
                }
                SourceEvent::Error { op, message } => match op {
                    SourceOp::Fetch => {
                        warn!(error = %message, "fetch failed");
                        self.fetch_in_flight = false;
                        self.announce_load = false;
                        self.state.loading = false;
                        self.state
                            .set_status(t!("msg.load_failed", error = message).to_string());
                    }
                    SourceOp::SetDeleted {
                        persisted,
                        failed,
                        deleted,
                    } => {
                        warn!(
                            error = %message,
                            persisted = persisted.len(),
                            failed = failed.len(),
                            deleted,
                            "persisting delete flag failed"
                        );
                        // Only alerts the server never accepted go back
                        self.state.apply_deleted(&failed, !deleted);
                        let msg = if persisted.is_empty() {
                            t!("msg.persist_failed", error = message)
                        } else {
                            t!(
                                "msg.persist_partial",
                                saved = persisted.len(),
                                count = failed.len(),
                                error = message
                            )
                        };
                        self.state.set_status(msg.to_string());
                    }
                },
            }
        }
    }

    fn tick_refresh(&mut self) {
        let Some(interval) = self.refresh_interval else {
            return;
        };
        let due = self
            .last_fetch
            .map(|at| at.elapsed() >= interval)
            .unwrap_or(true);
        if due {
            self.request_fetch();
        }
    }

    fn apply_action(&mut self, action: Option<PanelAction>) {
        match action {
            Some(PanelAction::SetDeleted { ids, deleted }) => self.persist_deleted(ids, deleted),
            Some(PanelAction::ShowDetail(id)) => self.state.open_detail(id),
            None => {}
        }
    }

    // ── Keys ─────────────────────────────────────────────────────

    /// Returns `true` if the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.state.show_help {
            return self.handle_key_help(key);
        }

        if self.state.detail_alert_id.is_some() {
            return self.handle_key_detail(key);
        }

        if self.state.active_panel().row_menu.is_some() {
            return self.handle_key_row_menu(key);
        }

        if self.state.active_panel().is_editing_option() {
            return self.handle_key_option_input(key);
        }

        self.handle_key_normal(key)
    }

    fn handle_key_help(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.state.show_help = false;
                self.state.help_scroll = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.help_scroll = self.state.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.help_scroll += 1;
            }
            KeyCode::Home => self.state.help_scroll = 0,
            KeyCode::End => self.state.help_scroll = usize::MAX, // clamped at render time
            _ => {}
        }
        false
    }

    fn handle_key_detail(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.state.close_detail();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.detail_scroll = self.state.detail_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.detail_scroll += 1;
            }
            KeyCode::PageUp => {
                self.state.detail_scroll =
                    self.state.detail_scroll.saturating_sub(DETAIL_PAGE_STEP);
            }
            KeyCode::PageDown => {
                self.state.detail_scroll += DETAIL_PAGE_STEP;
            }
            _ => {}
        }
        false
    }

    fn handle_key_row_menu(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.state.with_active_panel(|panel, _| panel.close_row_menu());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.with_active_panel(|panel, _| panel.row_menu_up());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.with_active_panel(|panel, _| panel.row_menu_down());
            }
            KeyCode::Enter => {
                let action = self
                    .state
                    .with_active_panel(|panel, _| panel.activate_row_menu());
                self.apply_action(action);
            }
            _ => {}
        }
        false
    }

    fn handle_key_option_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.state.with_active_panel(|panel, _| panel.cancel_option_input());
            }
            KeyCode::Enter => {
                self.state
                    .with_active_panel(|panel, alerts| panel.commit_option_input(alerts));
            }
            KeyCode::Tab => {
                self.state
                    .with_active_panel(|panel, alerts| panel.complete_option_input(alerts));
            }
            KeyCode::Backspace => {
                self.state.with_active_panel(|panel, _| panel.option_input_backspace());
            }
            KeyCode::Char(c) => {
                self.state.with_active_panel(|panel, _| panel.option_input_char(c));
            }
            _ => {}
        }
        false
    }

    /// Handle keys in normal mode. Returns `true` if the app should quit.
    fn handle_key_normal(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,

            // Tab navigation
            KeyCode::Tab => self.state.next_tab(),
            KeyCode::BackTab => self.state.prev_tab(),
            KeyCode::Char(c @ '1'..='9') => {
                self.state.select_tab(c as usize - '1' as usize);
            }

            // Cursor and pages
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.with_active_panel(|panel, alerts| panel.cursor_up(alerts));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.with_active_panel(|panel, alerts| panel.cursor_down(alerts));
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                self.state.with_active_panel(|panel, _| panel.prev_page());
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                self.state.with_active_panel(|panel, alerts| panel.next_page(alerts));
            }
            KeyCode::Home => {
                self.state.with_active_panel(|panel, _| panel.first_page());
            }
            KeyCode::End => {
                self.state.with_active_panel(|panel, alerts| panel.last_page(alerts));
            }
            KeyCode::Char('p') => {
                let size = self.state.with_active_panel(|panel, _| {
                    panel.cycle_page_size();
                    panel.pagination.page_size
                });
                self.state
                    .set_status(t!("msg.page_size", size = size).to_string());
            }

            // Selection
            KeyCode::Char(' ') => {
                self.state
                    .with_active_panel(|panel, alerts| panel.toggle_cursor_row(alerts));
            }
            KeyCode::Char('a') => {
                self.state.with_active_panel(|panel, alerts| panel.toggle_page(alerts));
            }
            KeyCode::Esc => {
                self.state.with_active_panel(|panel, _| panel.clear_selection());
            }
            KeyCode::Enter => {
                self.state.with_active_panel(|panel, alerts| panel.open_row_menu(alerts));
            }

            // Bulk actions
            KeyCode::Char('d') => {
                let action = self
                    .state
                    .with_active_panel(|panel, _| panel.bulk_set_deleted(true));
                self.apply_action(action);
            }
            KeyCode::Char('u') => {
                let action = self
                    .state
                    .with_active_panel(|panel, _| panel.bulk_set_deleted(false));
                self.apply_action(action);
            }

            // Options
            KeyCode::Char('/') => {
                self.state.with_active_panel(|panel, _| panel.begin_option_input());
            }
            KeyCode::Backspace => {
                self.state
                    .with_active_panel(|panel, alerts| panel.remove_last_option(alerts));
            }
            KeyCode::Char('C') => {
                self.state
                    .with_active_panel(|panel, alerts| panel.reset_options(alerts));
            }

            // Refresh
            KeyCode::Char('r') => {
                if self.source.is_some() {
                    self.announce_load = true;
                    self.request_fetch();
                } else {
                    self.state.set_status(t!("msg.no_source").to_string());
                }
            }

            // Appearance
            KeyCode::Char('T') => {
                self.state.cycle_theme();
                let name = self.state.theme.name.clone();
                self.state
                    .set_status(t!("msg.theme", name = name).to_string());
            }
            KeyCode::Char('L') => {
                self.state.cycle_lang();
                let lang = self.state.current_lang.to_uppercase();
                self.state.set_status(t!("msg.lang", lang = lang).to_string());
            }

            KeyCode::Char('?') => self.state.show_help = true,
            _ => {}
        }
        false
    }
}
