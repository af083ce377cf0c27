//! Shared rendering helpers: key badges, section headings, scrollbar, centered rect.

use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::ui::theme::Theme;

/// A reversed key badge such as ` q `.
pub fn key_badge<'a>(key: &str, color: Color, t: &Theme) -> Span<'a> {
    Span::styled(
        format!(" {} ", key),
        Style::default()
            .fg(t.bg_dark)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )
}

/// Dim label text placed after a key badge.
pub fn key_label<'a>(text: String, t: &Theme) -> Span<'a> {
    Span::styled(text, Style::default().fg(t.text_dim))
}

/// Bold accent heading line used inside popups.
pub fn section_heading<'a>(text: String, t: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
    ))
}

/// Render a vertical scrollbar inside a bordered area (1px vertical margin).
///
/// Only renders if `total` exceeds the inner height.
pub fn render_scrollbar_bordered(frame: &mut Frame, area: Rect, total: usize, position: usize) {
    let visible_height = area.height.saturating_sub(2) as usize;
    if total <= visible_height {
        return;
    }
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"));
    let mut scrollbar_state = ScrollbarState::new(total).position(position);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Return a `Rect` centered within `area` with the given dimensions.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_normal() {
        let r = centered_rect(40, 20, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(30, 15, 40, 20));
    }

    #[test]
    fn centered_rect_larger_than_area() {
        let r = centered_rect(40, 30, Rect::new(0, 0, 20, 10));
        assert_eq!(r, Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn centered_rect_with_offset_area() {
        let r = centered_rect(20, 10, Rect::new(10, 5, 80, 40));
        assert_eq!(r, Rect::new(40, 20, 20, 10));
    }

    #[test]
    fn key_badge_pads_key() {
        let t = Theme::default_dark();
        assert_eq!(key_badge("q", t.accent, &t).content, " q ");
    }
}
