use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::constants::*;
use crate::models::{Alert, Preset};

use super::panel::AlertTablePanel;
use super::theme::Theme;

/// Central application state - the single source of truth.
pub struct AppState {
    /// Every alert known to the app. Panels only ever read this.
    pub alerts: Vec<Alert>,
    /// One panel per preset, in tab order. Never empty.
    pub panels: Vec<AlertTablePanel>,
    pub active_tab: usize,

    // ── Source ──────────────────────────────────────────────────
    pub loading: bool,
    pub source_label: String,
    pub last_loaded: Option<DateTime<Utc>>,
    /// Set when the source cannot persist deletes; they are then replayed
    /// onto every fetched list from `deleted_overrides`.
    pub remember_deletes: bool,
    pub deleted_overrides: HashMap<String, bool>,

    pub tick_count: u64,

    // ── Status message (shown in status bar) ───────────────────
    pub status_message: Option<(String, Instant)>,

    // ── Overlays ────────────────────────────────────────────────
    pub show_help: bool,
    pub help_scroll: usize,
    pub detail_alert_id: Option<String>,
    pub detail_scroll: usize,

    // ── Appearance ──────────────────────────────────────────────
    pub theme: Theme,
    pub current_lang: String,
}

impl AppState {
    pub fn new(presets: Vec<Preset>, page_size: usize, theme: Theme, source_label: String) -> Self {
        let presets = if presets.is_empty() {
            Preset::builtin()
        } else {
            presets
        };
        Self {
            alerts: Vec::new(),
            panels: presets
                .into_iter()
                .map(|p| AlertTablePanel::new(p, page_size))
                .collect(),
            active_tab: 0,
            loading: false,
            source_label,
            last_loaded: None,
            remember_deletes: false,
            deleted_overrides: HashMap::new(),
            tick_count: 0,
            status_message: None,
            show_help: false,
            help_scroll: 0,
            detail_alert_id: None,
            detail_scroll: 0,
            theme,
            current_lang: rust_i18n::locale().to_string(),
        }
    }

    pub fn active_panel(&self) -> &AlertTablePanel {
        &self.panels[self.active_tab]
    }

    /// Run `f` against the active panel and the shared alert list.
    pub fn with_active_panel<R>(&mut self, f: impl FnOnce(&mut AlertTablePanel, &[Alert]) -> R) -> R {
        let panel = &mut self.panels[self.active_tab];
        f(panel, &self.alerts)
    }

    // ── Tabs ────────────────────────────────────────────────────

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.panels.len();
    }

    pub fn prev_tab(&mut self) {
        self.active_tab = (self.active_tab + self.panels.len() - 1) % self.panels.len();
    }

    /// Jump to tab `index` (0-based). Out of range is ignored.
    pub fn select_tab(&mut self, index: usize) {
        if index < self.panels.len() {
            self.active_tab = index;
        }
    }

    /// Jump to the tab of the preset called `name` (case-insensitive).
    pub fn select_preset(&mut self, name: &str) -> bool {
        match self
            .panels
            .iter()
            .position(|p| p.preset.name.eq_ignore_ascii_case(name))
        {
            Some(index) => {
                self.active_tab = index;
                true
            }
            None => false,
        }
    }

    /// Number of alerts in view per tab.
    pub fn tab_counts(&self) -> Vec<usize> {
        self.panels.iter().map(|p| p.count(&self.alerts)).collect()
    }

    // ── Alerts ──────────────────────────────────────────────────

    /// Swap in a freshly fetched alert list.
    pub fn replace_alerts(&mut self, mut alerts: Vec<Alert>) {
        for alert in alerts.iter_mut() {
            if let Some(&deleted) = self.deleted_overrides.get(&alert.id) {
                alert.deleted = deleted;
            }
        }
        self.alerts = alerts;
        self.loading = false;
        self.last_loaded = Some(Utc::now());
        if let Some(id) = &self.detail_alert_id {
            if !self.alerts.iter().any(|a| &a.id == id) {
                self.close_detail();
            }
        }
        self.sync_panels();
    }

    /// Set the deleted flag on the given alerts and return copies of the ones changed.
    pub fn apply_deleted(&mut self, ids: &[String], deleted: bool) -> Vec<Alert> {
        let mut changed = Vec::new();
        for alert in self.alerts.iter_mut() {
            if alert.deleted != deleted && ids.contains(&alert.id) {
                alert.deleted = deleted;
                changed.push(alert.clone());
            }
        }
        if self.remember_deletes {
            for alert in &changed {
                self.deleted_overrides.insert(alert.id.clone(), deleted);
            }
        }
        self.sync_panels();
        changed
    }

    fn sync_panels(&mut self) {
        for panel in self.panels.iter_mut() {
            panel.sync(&self.alerts);
        }
    }

    // ── Detail overlay ──────────────────────────────────────────

    pub fn open_detail(&mut self, id: String) {
        self.detail_alert_id = Some(id);
        self.detail_scroll = 0;
    }

    pub fn close_detail(&mut self) {
        self.detail_alert_id = None;
        self.detail_scroll = 0;
    }

    pub fn detail_alert(&self) -> Option<&Alert> {
        let id = self.detail_alert_id.as_ref()?;
        self.alerts.iter().find(|a| &a.id == id)
    }

    // ── Appearance ──────────────────────────────────────────────

    /// Cycle to the next built-in theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next_builtin();
    }

    /// Cycle to the next UI language.
    pub fn cycle_lang(&mut self) {
        let current_idx = LANGUAGES
            .iter()
            .position(|&l| l == self.current_lang)
            .unwrap_or(0);
        let next_lang = LANGUAGES[(current_idx + 1) % LANGUAGES.len()];
        rust_i18n::set_locale(next_lang);
        self.current_lang = next_lang.to_string();
    }

    /// Set a status bar message with automatic timestamp.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }
}
