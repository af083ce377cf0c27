//! Header bar: logo, preset tab strip, source summary.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::constants::MAX_NUMBERED_TABS;
use crate::ui::state::AppState;
use crate::utils::{spinner_char, truncate_str};

const MAX_TAB_LABEL: usize = 20;

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16), // Logo
            Constraint::Min(20),    // Tabs
            Constraint::Length(34), // Source summary
        ])
        .split(area);

    // Logo
    let pulse = if state.loading { "○" } else { "●" };
    let logo = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(pulse, Style::default().fg(t.success)),
        Span::styled(t!("app.name").to_string(), t.header_style()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(logo, chunks[0]);

    // Tabs
    let counts = state.tab_counts();
    let mut tab_spans = vec![Span::raw(" ")];
    for (i, (panel, count)) in state.panels.iter().zip(counts).enumerate() {
        if i > 0 {
            tab_spans.push(Span::styled(" │ ", Style::default().fg(t.text_muted)));
        }
        let number = if i < MAX_NUMBERED_TABS {
            format!("{}:", i + 1)
        } else {
            String::new()
        };
        let label = format!(
            "{}{} ({})",
            number,
            truncate_str(&panel.preset.name, MAX_TAB_LABEL),
            count
        );
        let style = if i == state.active_tab {
            t.tab_active_style()
        } else {
            t.tab_inactive_style()
        };
        tab_spans.push(Span::styled(label, style));
        if !panel.row_selection.is_empty() {
            tab_spans.push(Span::styled(" ✓", Style::default().fg(t.checkbox)));
        }
    }

    if state.loading {
        tab_spans.push(Span::raw("  "));
        tab_spans.push(Span::styled(
            format!(" {} {} ", spinner_char(state.tick_count), t!("header.loading")),
            Style::default()
                .fg(t.bg_dark)
                .bg(t.accent_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let tab_line = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(tab_line, chunks[1]);

    // Source summary
    let summary = match state.last_loaded {
        Some(at) => t!(
            "header.updated",
            time = at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string()
        )
        .to_string(),
        None => t!("header.never_loaded").to_string(),
    };
    let source = truncate_str(&state.source_label, 14);
    let sys_summary = Paragraph::new(vec![Line::from(vec![
        Span::styled(source, Style::default().fg(t.text_dim)),
        Span::raw(" "),
        Span::styled(summary, Style::default().fg(t.text_muted)),
    ])])
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(sys_summary, chunks[2]);
}
