//! Renderer module: split into focused submodules.
//!
//! - `header`: Logo, preset tabs with counts, source summary
//! - `panel`: Active alert table panel (action bar + table)
//! - `status_bar`: Bottom status bar with keybinds and messages
//! - `overlays`: Popup overlays (row menu, alert detail, help)
//! - `helpers`: Shared rendering utilities

mod header;
pub mod helpers;
mod overlays;
mod panel;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::state::AppState;

/// Top-level render function.
pub fn render(frame: &mut Frame, state: &AppState) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header bar
            Constraint::Min(6),    // Active panel
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    header::render_header(frame, main_chunks[0], state);
    panel::render_panel(frame, main_chunks[1], state);
    status_bar::render_status_bar(frame, main_chunks[2], state);

    if let Some(menu) = &state.active_panel().row_menu {
        overlays::render_row_menu(frame, main_chunks[1], menu, state);
    }

    if let Some(alert) = state.detail_alert() {
        overlays::render_alert_detail(frame, size, alert, state);
    }

    if state.show_help {
        overlays::render_help_overlay(frame, size, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    use crate::models::{Alert, Preset};
    use crate::ui::Theme;

    fn make_state() -> AppState {
        rust_i18n::set_locale("en");
        let mut state = AppState::new(Preset::builtin(), 10, Theme::default_dark(), "test".into());
        let mut a = Alert::new("a1", "disk full", Utc.timestamp_opt(100, 0).unwrap());
        a.extra.insert("team".into(), "storage".into());
        let b = Alert::new("a2", "cpu hot", Utc.timestamp_opt(200, 0).unwrap());
        state.replace_alerts(vec![a, b]);
        state
    }

    fn screen(state: &AppState) -> String {
        let backend = TestBackend::new(140, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_tabs_table_and_extra_column() {
        let out = screen(&make_state());
        assert!(out.contains("Feed"));
        assert!(out.contains("Deleted"));
        assert!(out.contains("disk full"));
        assert!(out.contains("cpu hot"));
        assert!(out.contains("team"));
        assert!(out.contains("Page 1 of 1"));
    }

    #[test]
    fn selection_swaps_preset_bar_for_bulk_bar() {
        let mut state = make_state();
        assert!(!screen(&state).contains("1 selected"));
        state.with_active_panel(|panel, alerts| panel.toggle_cursor_row(alerts));
        let out = screen(&state);
        assert!(out.contains("1 selected"));
        assert!(out.contains("[x]"));
    }

    #[test]
    fn empty_view_message_depends_on_loading() {
        let mut state = make_state();
        state.select_tab(2);
        assert!(screen(&state).contains("No alerts"));
        state.loading = true;
        assert!(screen(&state).contains("Loading alerts"));
    }

    #[test]
    fn overlays_render() {
        let mut state = make_state();
        state.with_active_panel(|panel, alerts| panel.open_row_menu(alerts));
        assert!(screen(&state).contains("View details"));

        state.with_active_panel(|panel, _| panel.close_row_menu());
        state.open_detail("a1".into());
        let out = screen(&state);
        assert!(out.contains("storage"));

        state.close_detail();
        state.show_help = true;
        assert!(screen(&state).contains("Keyboard Shortcuts"));
    }
}
