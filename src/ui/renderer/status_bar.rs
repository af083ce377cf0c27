//! Status bar at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::constants::STATUS_MESSAGE_TIMEOUT_SECS;
use crate::ui::state::AppState;

use super::helpers::{key_badge, key_label};

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let panel = state.active_panel();

    let mut spans = vec![
        Span::raw(" "),
        key_badge("q", t.accent, t),
        key_label(t!("status.quit").to_string(), t),
        key_badge("Tab", t.accent, t),
        key_label(t!("status.switch").to_string(), t),
    ];

    if panel.is_editing_option() {
        spans.push(key_badge("Enter", t.accent, t));
        spans.push(key_label(t!("status.add").to_string(), t));
        spans.push(key_badge("Tab", t.accent_secondary, t));
        spans.push(key_label(t!("status.complete").to_string(), t));
        spans.push(key_badge("Esc", t.accent, t));
        spans.push(key_label(t!("status.cancel").to_string(), t));
    } else {
        spans.push(key_badge("/", t.accent, t));
        spans.push(key_label(t!("status.option").to_string(), t));
        if panel.shows_checkboxes() {
            spans.push(key_badge("Space", t.accent, t));
            spans.push(key_label(t!("status.select").to_string(), t));
        }
        spans.push(key_badge("Enter", t.accent, t));
        spans.push(key_label(t!("status.menu").to_string(), t));
        spans.push(key_badge("r", t.accent, t));
        spans.push(key_label(t!("status.refresh").to_string(), t));
        spans.push(key_badge("T", t.accent, t));
        spans.push(key_label(t!("status.theme", name = t.name.as_str()).to_string(), t));
        spans.push(key_badge("L", t.accent, t));
        spans.push(key_label(
            t!("status.lang", lang = state.current_lang.to_uppercase()).to_string(),
            t,
        ));
        spans.push(key_badge("?", t.accent, t));
        spans.push(key_label(t!("status.help").to_string(), t));
    }

    // Transient message -- auto-expires
    if let Some((msg, when)) = &state.status_message {
        if when.elapsed().as_secs() < STATUS_MESSAGE_TIMEOUT_SECS {
            spans.push(Span::styled(
                format!("  {} ", msg),
                Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
