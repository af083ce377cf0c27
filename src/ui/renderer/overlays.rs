//! Popup overlays: row action menu, alert detail, help.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::constants::*;
use crate::models::Alert;
use crate::ui::panel::RowMenu;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;

use super::helpers::{centered_rect, render_scrollbar_bordered, section_heading};

pub fn render_row_menu(frame: &mut Frame, area: Rect, menu: &RowMenu, state: &AppState) {
    let t = &state.theme;
    let height = menu.entries.len() as u16 + 2;
    let popup_area = centered_rect(ROW_MENU_WIDTH, height, area);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = menu
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == menu.selected {
                t.table_row_cursor()
            } else {
                t.table_row_normal()
            };
            let marker = if i == menu.selected { "▸ " } else { "  " };
            Line::from(Span::styled(format!("{}{}", marker, entry.label()), style))
        })
        .collect();

    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(format!(" {} ", menu.alert_id), t.header_style()))
            .borders(Borders::ALL)
            .border_style(t.border_highlight_style()),
    );
    frame.render_widget(popup, popup_area);
}

fn detail_line<'a>(label: &str, value: String, t: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<18}", label), Style::default().fg(t.text_dim)),
        Span::styled(value, Style::default().fg(t.text_primary)),
    ])
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

/// Every line of the detail popup, before scrolling.
fn detail_lines<'a>(alert: &Alert, width: usize, t: &Theme) -> Vec<Line<'a>> {
    let now = Utc::now();
    let mut lines = vec![section_heading(format!(" {}", t!("detail.fields")), t)];

    lines.push(Line::from(vec![
        Span::styled(format!("  {:<18}", "severity"), Style::default().fg(t.text_dim)),
        Span::styled(
            format!(" {} ", alert.severity),
            t.severity_badge_style(&alert.severity),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<18}", "status"), Style::default().fg(t.text_dim)),
        Span::styled(alert.status.to_string(), t.status_style(&alert.status)),
    ]));
    lines.push(detail_line("id", alert.id.clone(), t));
    lines.push(detail_line("name", alert.name.clone(), t));
    lines.push(detail_line(
        "lastReceived",
        format!(
            "{} ({})",
            alert.last_received.to_rfc3339(),
            alert.age_display(now)
        ),
        t,
    ));
    lines.push(detail_line("environment", alert.environment.clone(), t));
    lines.push(detail_line("service", opt(&alert.service), t));
    lines.push(detail_line("source", alert.source.join(", "), t));
    lines.push(detail_line("assignee", opt(&alert.assignee), t));
    lines.push(detail_line("fingerprint", alert.fingerprint.clone(), t));
    lines.push(detail_line("url", opt(&alert.url), t));
    lines.push(detail_line("pushed", alert.pushed.to_string(), t));
    lines.push(detail_line("deleted", alert.deleted.to_string(), t));
    lines.push(detail_line("group", alert.group.to_string(), t));
    if let Some(dup) = alert.is_duplicate {
        lines.push(detail_line("isDuplicate", dup.to_string(), t));
    }
    if let Some(reason) = &alert.duplicate_reason {
        lines.push(detail_line("duplicateReason", reason.clone(), t));
    }

    // Long text, wrapped to the popup
    let wrap_width = width.saturating_sub(4).max(10);
    for (heading, text) in [
        (t!("detail.description"), &alert.description),
        (t!("detail.message"), &alert.message),
    ] {
        let Some(text) = text else { continue };
        lines.push(Line::raw(""));
        lines.push(section_heading(format!(" {}", heading), t));
        for line in textwrap::wrap(text, wrap_width) {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(t.text_primary),
            )));
        }
    }

    if !alert.extra.is_empty() {
        lines.push(Line::raw(""));
        lines.push(section_heading(format!(" {}", t!("detail.extra")), t));
        for key in alert.extra.keys() {
            lines.push(detail_line(key, alert.extra_display(key), t));
        }
    }

    lines
}

pub fn render_alert_detail(frame: &mut Frame, area: Rect, alert: &Alert, state: &AppState) {
    let t = &state.theme;
    let popup_width = DETAIL_POPUP_WIDTH.min(area.width.saturating_sub(4));
    let popup_height = DETAIL_POPUP_HEIGHT.min(area.height.saturating_sub(2));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", t!("detail.title", name = alert.name.as_str())),
            t.header_style(),
        ))
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = detail_lines(alert, inner.width as usize, t);
    let total = lines.len();
    let scroll = state
        .detail_scroll
        .min(total.saturating_sub(inner.height as usize));
    let visible: Vec<Line> = lines.into_iter().skip(scroll).collect();

    frame.render_widget(Paragraph::new(visible), inner);
    render_scrollbar_bordered(frame, popup_area, total, scroll);
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup_area = centered_rect(HELP_POPUP_WIDTH, HELP_POPUP_HEIGHT, area);

    frame.render_widget(Clear, popup_area);

    let help_entry = |key: &str, desc: String, color: Color| -> Line {
        Line::from(vec![
            Span::styled(
                format!("  {:<18}", key),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc, Style::default().fg(t.text_primary)),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            format!("  {}", t!("help.heading")),
            t.header_style(),
        )),
        Line::raw(""),
        help_entry("Tab / Shift+Tab", t!("help.tabs").to_string(), t.accent),
        help_entry("1 - 9", t!("help.jump").to_string(), t.accent),
        help_entry("Up/Down / j / k", t!("help.cursor").to_string(), t.accent),
        help_entry("Left/Right / h / l", t!("help.pages").to_string(), t.accent),
        help_entry("PgUp / PgDn", t!("help.pages").to_string(), t.accent),
        help_entry("Home / End", t!("help.first_last").to_string(), t.accent),
        help_entry("p", t!("help.page_size").to_string(), t.accent),
        Line::raw(""),
        section_heading(format!("  {}", t!("help.selection")), t),
        help_entry("Space", t!("help.select").to_string(), t.checkbox),
        help_entry("a", t!("help.select_page").to_string(), t.checkbox),
        help_entry("d", t!("help.bulk_delete").to_string(), t.danger),
        help_entry("u", t!("help.bulk_restore").to_string(), t.success),
        help_entry("Esc", t!("help.clear").to_string(), t.checkbox),
        help_entry("Enter", t!("help.menu").to_string(), t.accent),
        Line::raw(""),
        section_heading(format!("  {}", t!("help.options")), t),
        help_entry("/", t!("help.add_option").to_string(), t.accent_secondary),
        help_entry("  Tab", t!("help.complete").to_string(), t.accent_secondary),
        help_entry("Backspace", t!("help.drop_option").to_string(), t.accent_secondary),
        help_entry("C", t!("help.reset_options").to_string(), t.accent_secondary),
        Line::raw(""),
        help_entry("r", t!("help.refresh").to_string(), t.accent),
        help_entry("T", t!("help.theme").to_string(), t.accent),
        help_entry("L", t!("help.lang").to_string(), t.accent),
        help_entry("q / Ctrl+C", t!("help.quit").to_string(), t.accent),
    ];

    let total = help_text.len();
    let visible_height = popup_area.height.saturating_sub(2) as usize;
    let scroll = state.help_scroll.min(total.saturating_sub(visible_height));

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", t!("help.title")),
                    t.header_style(),
                ))
                .borders(Borders::ALL)
                .border_style(t.border_highlight_style()),
        )
        .scroll((scroll as u16, 0));
    frame.render_widget(help, popup_area);
    render_scrollbar_bordered(frame, popup_area, total, scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn detail_lists_known_and_extra_fields() {
        rust_i18n::set_locale("en");
        let mut alert = Alert::new("a1", "disk", Utc.timestamp_opt(0, 0).unwrap());
        alert.extra.insert("team".into(), "storage".into());
        alert.description = Some("the disk on db-1 is almost full ".repeat(4));
        let lines = detail_lines(&alert, 40, &Theme::default_dark());
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert!(text.iter().any(|l| l.contains("fingerprint") && l.contains("a1")));
        assert!(text.iter().any(|l| l.contains("team") && l.contains("storage")));
        // Wrapped into several lines no wider than the popup
        let wrapped: Vec<&String> = text.iter().filter(|l| l.contains("disk on")).collect();
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 40));
    }
}
