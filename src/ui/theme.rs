use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::models::{AlertSeverity, AlertStatus};

/// All available built-in theme names.
pub const BUILTIN_THEME_NAMES: &[&str] = &["default", "gruvbox", "nord"];

/// Data-driven theme: every color in one struct.
/// Constructed from built-in presets or loaded from TOML files.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ── Brand / Primary ──────────────────────────────────────
    pub accent: Color,
    pub accent_secondary: Color,
    pub bg_dark: Color,

    // ── Text ─────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // ── Semantic ─────────────────────────────────────────────
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub critical: Color,
    pub info: Color,

    // ── Table ────────────────────────────────────────────────
    pub table_row_cursor_bg: Color,
    pub checkbox: Color,
    pub chip_bg: Color,

    // ── Borders ──────────────────────────────────────────────
    pub border: Color,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────

    /// Default dark theme.
    pub fn default_dark() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::Rgb(99, 179, 237),
            accent_secondary: Color::Rgb(129, 230, 217),
            bg_dark: Color::Rgb(22, 22, 30),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            text_muted: Color::Rgb(80, 80, 100),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            critical: Color::Rgb(255, 136, 0),
            info: Color::Rgb(99, 179, 237),
            table_row_cursor_bg: Color::Rgb(40, 40, 60),
            checkbox: Color::Rgb(217, 143, 255),
            chip_bg: Color::Rgb(45, 45, 58),
            border: Color::Rgb(55, 55, 75),
        }
    }

    /// Gruvbox dark palette.
    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            accent: Color::Rgb(215, 153, 33),            // yellow
            accent_secondary: Color::Rgb(142, 192, 124), // green
            bg_dark: Color::Rgb(40, 40, 40),             // bg0
            text_primary: Color::Rgb(235, 219, 178),     // fg
            text_dim: Color::Rgb(168, 153, 132),         // fg4
            text_muted: Color::Rgb(102, 92, 84),         // bg4
            success: Color::Rgb(142, 192, 124),
            warning: Color::Rgb(250, 189, 47),
            danger: Color::Rgb(251, 73, 52),
            critical: Color::Rgb(254, 128, 25),
            info: Color::Rgb(131, 165, 152),
            table_row_cursor_bg: Color::Rgb(60, 56, 54),
            checkbox: Color::Rgb(211, 134, 155), // purple
            chip_bg: Color::Rgb(60, 56, 54),
            border: Color::Rgb(80, 73, 69),
        }
    }

    /// Nord palette.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::Rgb(136, 192, 208),           // nord8 frost
            accent_secondary: Color::Rgb(143, 188, 187), // nord7
            bg_dark: Color::Rgb(46, 52, 64),             // nord0
            text_primary: Color::Rgb(229, 233, 240),     // nord5
            text_dim: Color::Rgb(182, 191, 204),
            text_muted: Color::Rgb(107, 112, 127),
            success: Color::Rgb(163, 190, 140), // nord14
            warning: Color::Rgb(235, 203, 139), // nord13
            danger: Color::Rgb(191, 97, 106),   // nord11
            critical: Color::Rgb(208, 135, 112), // nord12
            info: Color::Rgb(129, 161, 193),    // nord9
            table_row_cursor_bg: Color::Rgb(67, 76, 94),
            checkbox: Color::Rgb(180, 142, 173), // nord15
            chip_bg: Color::Rgb(59, 66, 82),
            border: Color::Rgb(76, 86, 106),
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            _ => None,
        }
    }

    /// Cycle to the next built-in theme. Custom themes cycle to the first one.
    pub fn next_builtin(&self) -> Self {
        let next_idx = BUILTIN_THEME_NAMES
            .iter()
            .position(|&n| n == self.name)
            .map(|idx| (idx + 1) % BUILTIN_THEME_NAMES.len())
            .unwrap_or(0);
        Self::by_name(BUILTIN_THEME_NAMES[next_idx]).unwrap_or_default()
    }

    /// Load a custom theme from a TOML file, falling back to default for missing fields.
    pub fn from_toml_file(path: &std::path::Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let file: ThemeFile = toml::from_str(&content).ok()?;
        Some(
            file.into_theme(
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("custom"),
            ),
        )
    }

    // ── Computed Styles ──────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.bg_dark)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn table_header_style(&self) -> Style {
        Style::default()
            .fg(self.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_row_normal(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn table_row_cursor(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.table_row_cursor_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn severity_color(&self, severity: &AlertSeverity) -> Color {
        match severity {
            AlertSeverity::Low => self.text_dim,
            AlertSeverity::Info => self.info,
            AlertSeverity::Warning => self.warning,
            AlertSeverity::High => self.critical,
            AlertSeverity::Critical => self.danger,
            AlertSeverity::Other(_) => self.text_muted,
        }
    }

    pub fn severity_badge_style(&self, severity: &AlertSeverity) -> Style {
        let fg = match severity {
            AlertSeverity::Critical => Color::White,
            _ => self.bg_dark,
        };
        Style::default()
            .fg(fg)
            .bg(self.severity_color(severity))
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_style(&self, status: &AlertStatus) -> Style {
        let color = match status {
            AlertStatus::Firing => self.danger,
            AlertStatus::Resolved => self.success,
            AlertStatus::Acknowledged => self.info,
            AlertStatus::Suppressed | AlertStatus::Pending | AlertStatus::Other(_) => self.text_dim,
        };
        Style::default().fg(color)
    }

    pub fn chip_style(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.chip_bg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_highlight_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// ── TOML deserialization for custom themes ──────────────────

/// Intermediate struct for parsing theme TOML files.
/// All fields are optional; missing fields inherit from the default theme.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThemeFile {
    accent: Option<String>,
    accent_secondary: Option<String>,
    bg_dark: Option<String>,
    text_primary: Option<String>,
    text_dim: Option<String>,
    text_muted: Option<String>,
    success: Option<String>,
    warning: Option<String>,
    danger: Option<String>,
    critical: Option<String>,
    info: Option<String>,
    table_row_cursor_bg: Option<String>,
    checkbox: Option<String>,
    chip_bg: Option<String>,
    border: Option<String>,
}

impl ThemeFile {
    fn into_theme(self, name: &str) -> Theme {
        let base = Theme::default_dark();
        Theme {
            name: name.to_string(),
            accent: parse_color(&self.accent).unwrap_or(base.accent),
            accent_secondary: parse_color(&self.accent_secondary).unwrap_or(base.accent_secondary),
            bg_dark: parse_color(&self.bg_dark).unwrap_or(base.bg_dark),
            text_primary: parse_color(&self.text_primary).unwrap_or(base.text_primary),
            text_dim: parse_color(&self.text_dim).unwrap_or(base.text_dim),
            text_muted: parse_color(&self.text_muted).unwrap_or(base.text_muted),
            success: parse_color(&self.success).unwrap_or(base.success),
            warning: parse_color(&self.warning).unwrap_or(base.warning),
            danger: parse_color(&self.danger).unwrap_or(base.danger),
            critical: parse_color(&self.critical).unwrap_or(base.critical),
            info: parse_color(&self.info).unwrap_or(base.info),
            table_row_cursor_bg: parse_color(&self.table_row_cursor_bg)
                .unwrap_or(base.table_row_cursor_bg),
            checkbox: parse_color(&self.checkbox).unwrap_or(base.checkbox),
            chip_bg: parse_color(&self.chip_bg).unwrap_or(base.chip_bg),
            border: parse_color(&self.border).unwrap_or(base.border),
        }
    }
}

/// Parse a hex color string like "#FF8800" or "FF8800" into a ratatui Color.
fn parse_color(opt: &Option<String>) -> Option<Color> {
    let s = opt.as_ref()?;
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
