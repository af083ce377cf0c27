//! Active panel: preset bar or bulk-action bar, then the paged alert table.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::alerts::AlertColumn;
use crate::constants::EXTRA_COLUMN_WIDTH;
use crate::models::Alert;
use crate::ui::panel::{ActionBar, AlertTablePanel, PanelView};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::ui::widgets::OptionChips;
use crate::utils::{single_line, spinner_char};

use super::helpers::{key_badge, key_label};

pub fn render_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let panel = state.active_panel();
    let view = panel.view(&state.alerts);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    match view.action_bar() {
        ActionBar::Presets => render_preset_bar(frame, chunks[0], panel, &view, state),
        ActionBar::BulkActions => render_bulk_bar(frame, chunks[0], &view, state),
    }
    render_table(frame, chunks[1], panel, &view, state);
}

fn render_preset_bar(
    frame: &mut Frame,
    area: Rect,
    panel: &AlertTablePanel,
    view: &PanelView,
    state: &AppState,
) {
    let t = &state.theme;
    let mut title = vec![
        Span::styled(format!(" {} ", panel.preset.name), t.header_style()),
        Span::styled(
            format!("{} ", t!("bar.in_view", count = view.alerts.len())),
            Style::default().fg(t.text_dim),
        ),
    ];
    if state.loading {
        title.push(Span::styled(
            format!("{} ", spinner_char(state.tick_count)),
            Style::default().fg(t.accent_secondary),
        ));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(if panel.is_editing_option() {
            t.border_highlight_style()
        } else {
            t.border_style()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(input) = &panel.option_input {
        let line = Line::from(vec![
            Span::styled(
                t!("bar.option_prompt").to_string(),
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(input.clone(), Style::default().fg(t.text_primary)),
            Span::styled("▏", Style::default().fg(t.accent)),
            Span::styled(
                format!("   {}", t!("bar.option_hint")),
                Style::default().fg(t.text_muted),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    if panel.selected_options.is_empty() {
        let hint = Paragraph::new(Span::styled(
            t!("bar.no_options").to_string(),
            Style::default().fg(t.text_muted),
        ));
        frame.render_widget(hint, inner);
    } else {
        frame.render_widget(OptionChips::new(&panel.selected_options, t), inner);
    }
}

fn render_bulk_bar(frame: &mut Frame, area: Rect, view: &PanelView, state: &AppState) {
    let t = &state.theme;
    let in_view = view
        .alerts
        .iter()
        .filter(|a| view.selected_ids.contains(&a.id))
        .count();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.checkbox));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", t!("bulk.selected", count = view.selected_ids.len())),
            Style::default().fg(t.checkbox).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{}  ", t!("bulk.in_view", count = in_view)),
            Style::default().fg(t.text_dim),
        ),
        key_badge("d", t.danger, t),
        key_label(format!(" {}  ", t!("bulk.delete")), t),
        key_badge("u", t.success, t),
        key_label(format!(" {}  ", t!("bulk.restore")), t),
        key_badge("Esc", t.accent, t),
        key_label(format!(" {} ", t!("bulk.clear")), t),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn column_width(column: &AlertColumn) -> Constraint {
    match column {
        AlertColumn::Checkbox => Constraint::Length(3),
        AlertColumn::Severity => Constraint::Length(10),
        AlertColumn::Name => Constraint::Fill(2),
        AlertColumn::Description => Constraint::Fill(3),
        AlertColumn::Status => Constraint::Length(13),
        AlertColumn::LastReceived => Constraint::Length(10),
        AlertColumn::Source => Constraint::Length(14),
        AlertColumn::Extra(_) => Constraint::Length(EXTRA_COLUMN_WIDTH),
        AlertColumn::Menu => Constraint::Length(1),
    }
}

fn cell<'a>(
    column: &AlertColumn,
    alert: &Alert,
    panel: &AlertTablePanel,
    t: &Theme,
    now: chrono::DateTime<Utc>,
) -> Cell<'a> {
    match column {
        AlertColumn::Checkbox => {
            if panel.row_selection.is_selected(&alert.id) {
                Cell::from(Span::styled("[x]", Style::default().fg(t.checkbox)))
            } else {
                Cell::from(Span::styled("[ ]", Style::default().fg(t.text_muted)))
            }
        }
        AlertColumn::Severity => Cell::from(Span::styled(
            format!(" {} ", alert.severity),
            t.severity_badge_style(&alert.severity),
        )),
        AlertColumn::Name => Cell::from(alert.name.clone()),
        AlertColumn::Description => {
            let text = alert
                .description
                .as_deref()
                .or(alert.message.as_deref())
                .unwrap_or_default();
            Cell::from(Span::styled(single_line(text), Style::default().fg(t.text_dim)))
        }
        AlertColumn::Status => {
            Cell::from(Span::styled(alert.status.to_string(), t.status_style(&alert.status)))
        }
        AlertColumn::LastReceived => Cell::from(Span::styled(
            alert.age_display(now),
            Style::default().fg(t.text_dim),
        )),
        AlertColumn::Source => Cell::from(alert.source.join(",")),
        AlertColumn::Extra(key) => Cell::from(single_line(&alert.extra_display(key))),
        AlertColumn::Menu => Cell::from(Span::styled("⋮", Style::default().fg(t.text_muted))),
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    panel: &AlertTablePanel,
    view: &PanelView,
    state: &AppState,
) {
    let t = &state.theme;
    let total = view.alerts.len();
    let pagination = panel.pagination;
    let range = pagination.page_range(total);

    let footer = if total == 0 {
        t!(
            "table.footer_empty",
            size = pagination.page_size
        )
        .to_string()
    } else {
        t!(
            "table.footer",
            page = pagination.page_index + 1,
            pages = pagination.page_count(total),
            from = range.start + 1,
            to = range.end,
            total = total,
            size = pagination.page_size
        )
        .to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(t.border_style())
        .title_bottom(
            Line::from(Span::styled(format!(" {} ", footer), Style::default().fg(t.text_dim)))
                .alignment(Alignment::Right),
        );

    if total == 0 {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let msg = if state.loading {
            Span::styled(
                format!("{} {}", spinner_char(state.tick_count), t!("table.loading")),
                Style::default().fg(t.accent_secondary),
            )
        } else {
            Span::styled(t!("table.empty").to_string(), Style::default().fg(t.text_dim))
        };
        frame.render_widget(
            Paragraph::new(vec![Line::raw(""), Line::from(msg)]).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(
        view.columns
            .iter()
            .map(|c| Cell::from(c.header()))
            .collect::<Vec<_>>(),
    )
    .style(t.table_header_style());

    let now = Utc::now();
    let rows: Vec<Row> = view.alerts[range]
        .iter()
        .map(|alert| {
            let style = if alert.deleted && !panel.shows_checkboxes() {
                Style::default().fg(t.text_dim)
            } else {
                t.table_row_normal()
            };
            Row::new(
                view.columns
                    .iter()
                    .map(|c| cell(c, alert, panel, t, now))
                    .collect::<Vec<_>>(),
            )
            .style(style)
        })
        .collect();

    let widths: Vec<Constraint> = view.columns.iter().map(column_width).collect();
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(t.table_row_cursor());

    let mut table_state = TableState::default().with_selected(Some(panel.cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}
