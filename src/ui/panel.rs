//! One preset tab: the alert table panel and the state it owns.
//!
//! A panel keeps three pieces of local state for as long as its tab
//! exists: the selected filter options, the pagination and the row
//! selection. The view it shows is always recomputed from the shared
//! alert list, so nothing here ever edits an alert. Changes to alerts
//! leave the panel as [`PanelAction`] values for the app to carry out.

use crate::alerts::suggest::{complete, option_suggestions};
use crate::alerts::{
    extra_columns, filter_and_sort, table_columns, AlertColumn, Pagination, RowSelection,
};
use crate::models::{Alert, FilterOption, Preset};

/// What the panel asks the app to do with shared data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    SetDeleted { ids: Vec<String>, deleted: bool },
    ShowDetail(String),
}

/// Which bar sits above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionBar {
    /// Preset name, option chips and the option editor.
    Presets,
    /// Actions over the selected rows.
    BulkActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMenuEntry {
    ViewDetails,
    Delete,
    Restore,
    Select,
    Deselect,
}

impl RowMenuEntry {
    pub fn label(&self) -> String {
        match self {
            RowMenuEntry::ViewDetails => t!("menu.view_details").to_string(),
            RowMenuEntry::Delete => t!("menu.delete").to_string(),
            RowMenuEntry::Restore => t!("menu.restore").to_string(),
            RowMenuEntry::Select => t!("menu.select").to_string(),
            RowMenuEntry::Deselect => t!("menu.deselect").to_string(),
        }
    }
}

/// Popup of per-row actions, bound to one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMenu {
    pub alert_id: String,
    pub entries: Vec<RowMenuEntry>,
    pub selected: usize,
}

/// Everything the renderer needs for one frame of a panel.
pub struct PanelView<'a> {
    pub alerts: Vec<&'a Alert>,
    pub columns: Vec<AlertColumn>,
    pub selected_ids: Vec<String>,
}

impl PanelView<'_> {
    pub fn action_bar(&self) -> ActionBar {
        if self.selected_ids.is_empty() {
            ActionBar::Presets
        } else {
            ActionBar::BulkActions
        }
    }
}

pub struct AlertTablePanel {
    pub preset: Preset,
    pub selected_options: Vec<FilterOption>,
    pub pagination: Pagination,
    pub row_selection: RowSelection,
    /// Cursor row, relative to the current page.
    pub cursor: usize,
    /// Text being typed as a new option, `Some` while the editor is open.
    pub option_input: Option<String>,
    pub row_menu: Option<RowMenu>,
}

impl AlertTablePanel {
    pub fn new(preset: Preset, page_size: usize) -> Self {
        Self {
            selected_options: preset.options.clone(),
            preset,
            pagination: Pagination::new(page_size),
            row_selection: RowSelection::default(),
            cursor: 0,
            option_input: None,
            row_menu: None,
        }
    }

    pub fn shows_checkboxes(&self) -> bool {
        self.preset.shows_checkboxes()
    }

    /// The filtered, sorted view with its columns and selection.
    pub fn view<'a>(&self, alerts: &'a [Alert]) -> PanelView<'a> {
        let extra = extra_columns(alerts);
        PanelView {
            alerts: self.visible(alerts),
            columns: table_columns(&extra, self.shows_checkboxes(), true),
            selected_ids: self.row_selection.selected_ids(),
        }
    }

    fn visible<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        filter_and_sort(alerts, &self.selected_options, &self.preset.name)
    }

    /// Number of alerts in view.
    pub fn count(&self, alerts: &[Alert]) -> usize {
        self.visible(alerts).len()
    }

    /// Alerts on the current page.
    pub fn page<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        let view = self.visible(alerts);
        let range = self.pagination.page_range(view.len());
        view[range].to_vec()
    }

    pub fn cursor_alert<'a>(&self, alerts: &'a [Alert]) -> Option<&'a Alert> {
        self.page(alerts).get(self.cursor).copied()
    }

    /// Pull page and cursor back inside the view after alerts or options changed.
    pub fn sync(&mut self, alerts: &[Alert]) {
        let total = self.count(alerts);
        self.pagination.clamp(total);
        let rows = self.pagination.page_range(total).len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    // ── Cursor and pages ─────────────────────────────────────────

    pub fn cursor_down(&mut self, alerts: &[Alert]) {
        let total = self.count(alerts);
        let rows = self.pagination.page_range(total).len();
        if self.cursor + 1 < rows {
            self.cursor += 1;
        } else if self.pagination.next_page(total) {
            self.cursor = 0;
        }
    }

    pub fn cursor_up(&mut self, alerts: &[Alert]) {
        if self.cursor > 0 {
            self.cursor -= 1;
        } else if self.pagination.prev_page() {
            let total = self.count(alerts);
            self.cursor = self.pagination.page_range(total).len().saturating_sub(1);
        }
    }

    pub fn next_page(&mut self, alerts: &[Alert]) {
        if self.pagination.next_page(self.count(alerts)) {
            self.cursor = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.pagination.prev_page() {
            self.cursor = 0;
        }
    }

    pub fn first_page(&mut self) {
        self.pagination.first_page();
        self.cursor = 0;
    }

    pub fn last_page(&mut self, alerts: &[Alert]) {
        self.pagination.last_page(self.count(alerts));
        self.cursor = 0;
    }

    pub fn cycle_page_size(&mut self) {
        self.pagination.cycle_page_size();
        self.cursor = 0;
    }

    // ── Selection ────────────────────────────────────────────────

    pub fn toggle_cursor_row(&mut self, alerts: &[Alert]) {
        if !self.shows_checkboxes() {
            return;
        }
        if let Some(alert) = self.cursor_alert(alerts) {
            self.row_selection.toggle(&alert.id);
        }
    }

    pub fn toggle_page(&mut self, alerts: &[Alert]) {
        if !self.shows_checkboxes() {
            return;
        }
        let page = self.page(alerts);
        self.row_selection.toggle_all(page.iter().map(|a| a.id.as_str()));
    }

    pub fn clear_selection(&mut self) {
        self.row_selection.clear();
    }

    /// Delete or restore every selected alert, then drop the selection.
    pub fn bulk_set_deleted(&mut self, deleted: bool) -> Option<PanelAction> {
        let ids = self.row_selection.selected_ids();
        if ids.is_empty() {
            return None;
        }
        self.row_selection.clear();
        Some(PanelAction::SetDeleted { ids, deleted })
    }

    // ── Options ──────────────────────────────────────────────────

    pub fn is_editing_option(&self) -> bool {
        self.option_input.is_some()
    }

    pub fn begin_option_input(&mut self) {
        self.option_input = Some(String::new());
    }

    pub fn cancel_option_input(&mut self) {
        self.option_input = None;
    }

    pub fn option_input_char(&mut self, c: char) {
        if let Some(input) = &mut self.option_input {
            input.push(c);
        }
    }

    pub fn option_input_backspace(&mut self) {
        if let Some(input) = &mut self.option_input {
            input.pop();
        }
    }

    /// Replace the typed text with the first matching suggestion.
    pub fn complete_option_input(&mut self, alerts: &[Alert]) {
        let Some(input) = &self.option_input else {
            return;
        };
        let suggestions = option_suggestions(&self.visible(alerts));
        if let Some(found) = complete(&suggestions, input) {
            self.option_input = Some(found.to_string());
        }
    }

    /// Add the typed text as an option. Blank input and duplicates are dropped.
    pub fn commit_option_input(&mut self, alerts: &[Alert]) {
        let Some(input) = self.option_input.take() else {
            return;
        };
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        let option = FilterOption::new(input);
        if !self.selected_options.contains(&option) {
            self.selected_options.push(option);
            self.options_changed(alerts);
        }
    }

    pub fn remove_last_option(&mut self, alerts: &[Alert]) {
        if self.selected_options.pop().is_some() {
            self.options_changed(alerts);
        }
    }

    pub fn reset_options(&mut self, alerts: &[Alert]) {
        if self.selected_options != self.preset.options {
            self.selected_options = self.preset.options.clone();
            self.options_changed(alerts);
        }
    }

    fn options_changed(&mut self, alerts: &[Alert]) {
        self.pagination.first_page();
        self.cursor = 0;
        self.sync(alerts);
    }

    // ── Row menu ─────────────────────────────────────────────────

    pub fn open_row_menu(&mut self, alerts: &[Alert]) {
        let Some(alert) = self.cursor_alert(alerts) else {
            return;
        };
        let mut entries = vec![RowMenuEntry::ViewDetails];
        entries.push(if alert.deleted {
            RowMenuEntry::Restore
        } else {
            RowMenuEntry::Delete
        });
        if self.shows_checkboxes() {
            entries.push(if self.row_selection.is_selected(&alert.id) {
                RowMenuEntry::Deselect
            } else {
                RowMenuEntry::Select
            });
        }
        self.row_menu = Some(RowMenu {
            alert_id: alert.id.clone(),
            entries,
            selected: 0,
        });
    }

    pub fn close_row_menu(&mut self) {
        self.row_menu = None;
    }

    pub fn row_menu_up(&mut self) {
        if let Some(menu) = &mut self.row_menu {
            menu.selected = menu.selected.saturating_sub(1);
        }
    }

    pub fn row_menu_down(&mut self) {
        if let Some(menu) = &mut self.row_menu {
            if menu.selected + 1 < menu.entries.len() {
                menu.selected += 1;
            }
        }
    }

    /// Run the highlighted entry and close the menu.
    pub fn activate_row_menu(&mut self) -> Option<PanelAction> {
        let menu = self.row_menu.take()?;
        let entry = *menu.entries.get(menu.selected)?;
        match entry {
            RowMenuEntry::ViewDetails => Some(PanelAction::ShowDetail(menu.alert_id)),
            RowMenuEntry::Delete => Some(PanelAction::SetDeleted {
                ids: vec![menu.alert_id],
                deleted: true,
            }),
            RowMenuEntry::Restore => Some(PanelAction::SetDeleted {
                ids: vec![menu.alert_id],
                deleted: false,
            }),
            RowMenuEntry::Select => {
                self.row_selection.set(&menu.alert_id, true);
                None
            }
            RowMenuEntry::Deselect => {
                self.row_selection.set(&menu.alert_id, false);
                None
            }
        }
    }
}
