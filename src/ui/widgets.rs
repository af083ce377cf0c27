use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::UnicodeWidthStr;

use crate::models::FilterOption;

use super::theme::Theme;

/// A single row of filter options drawn as chips: ` env=prod ` ` team=db `.
///
/// Chips that do not fit are replaced by a `+N` counter.
pub struct OptionChips<'a> {
    pub options: &'a [FilterOption],
    pub theme: &'a Theme,
}

impl<'a> OptionChips<'a> {
    pub fn new(options: &'a [FilterOption], theme: &'a Theme) -> Self {
        Self { options, theme }
    }
}

impl Widget for OptionChips<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 1 {
            return;
        }

        let right = area.x + area.width;
        let mut x = area.x;

        for (i, option) in self.options.iter().enumerate() {
            let chip = format!(" {} ", option.as_str());
            let chip_width = chip.width() as u16;
            let remaining = self.options.len() - i - 1;
            // Room needed for a trailing "+N" when more chips follow
            let reserve = if remaining > 0 {
                format!(" +{}", remaining).len() as u16
            } else {
                0
            };

            if x + chip_width + reserve > right {
                let more = format!("+{}", self.options.len() - i);
                buf.set_string(x, area.y, &more, Style::default().fg(self.theme.text_muted));
                return;
            }

            buf.set_string(x, area.y, &chip, self.theme.chip_style());
            x += chip_width + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn renders_all_chips_when_they_fit() {
        let theme = Theme::default_dark();
        let options = vec![FilterOption::new("env=prod"), FilterOption::new("team=db")];
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        OptionChips::new(&options, &theme).render(area, &mut buf);
        assert!(row(&buf, 30).starts_with(" env=prod   team=db "));
    }

    #[test]
    fn overflow_shows_counter() {
        let theme = Theme::default_dark();
        let options = vec![
            FilterOption::new("environment=production"),
            FilterOption::new("team=db"),
        ];
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        OptionChips::new(&options, &theme).render(area, &mut buf);
        assert!(row(&buf, 12).starts_with("+2"));
    }
}
