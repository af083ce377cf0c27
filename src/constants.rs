//! Application-wide constants.
//!
//! Centralizes magic numbers, defaults and well-known paths.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Event poll timeout (ms) -- how often the UI checks for input.
pub const EVENT_POLL_MS: u64 = 50;
/// Default alert refresh interval (seconds, 0 = disabled).
pub const DEFAULT_REFRESH_SECS: u64 = 30;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;
/// How long each spinner frame stays on screen (ms).
pub const SPINNER_FRAME_MS: u128 = 150;

// ── Presets ───────────────────────────────────────────────────────
/// Preset showing every alert that has not been deleted.
pub const PRESET_FEED: &str = "Feed";
/// Preset showing only deleted alerts.
pub const PRESET_DELETED: &str = "Deleted";
/// Preset showing only grouped alerts.
pub const PRESET_GROUPS: &str = "Groups";
/// Built-in presets, in tab order.
pub const BUILTIN_PRESETS: &[&str] = &[PRESET_FEED, PRESET_DELETED, PRESET_GROUPS];

// ── Pagination ────────────────────────────────────────────────────
/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Page sizes cycled with `p`.
pub const PAGE_SIZES: &[usize] = &[10, 20, 50, 100];
/// Upper bound for a configured page size.
pub const MAX_PAGE_SIZE: usize = 500;

// ── Options ───────────────────────────────────────────────────────
/// Separator between key and value in a filter option.
pub const OPTION_KV_SEPARATOR: char = '=';
/// Separator between allowed values for list-valued fields.
pub const OPTION_VALUE_SEPARATOR: char = ',';
/// Maximum suggestions kept for option completion.
pub const MAX_OPTION_SUGGESTIONS: usize = 200;

// ── UI Layout ─────────────────────────────────────────────────────
/// Width of an extra (dynamic) column.
pub const EXTRA_COLUMN_WIDTH: u16 = 16;
/// Maximum tabs addressable with the number keys.
pub const MAX_NUMBERED_TABS: usize = 9;
/// Alert detail popup max width.
pub const DETAIL_POPUP_WIDTH: u16 = 90;
/// Alert detail popup max height.
pub const DETAIL_POPUP_HEIGHT: u16 = 40;
/// Scroll step for PageUp/PageDown in the detail popup.
pub const DETAIL_PAGE_STEP: usize = 10;
/// Help overlay width.
pub const HELP_POPUP_WIDTH: u16 = 58;
/// Help overlay height.
pub const HELP_POPUP_HEIGHT: u16 = 32;
/// Row menu popup width.
pub const ROW_MENU_WIDTH: u16 = 30;

// ── Keep API ──────────────────────────────────────────────────────
/// Environment variable holding the Keep API key.
pub const API_KEY_ENV: &str = "KEEP_API_KEY";
/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";
/// HTTP request timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// ── Logging ───────────────────────────────────────────────────────
/// Default log filter when RUST_LOG is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log file name prefix (the appender adds the date).
pub const LOG_FILE_PREFIX: &str = "alertdesk.log";

// ── Spinner Animation ─────────────────────────────────────────────
/// Spinner character sequence for loading indicators.
pub const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── Supported Languages ───────────────────────────────────────────
/// Available UI languages for cycling.
pub const LANGUAGES: &[&str] = &["en", "de"];

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/alertdesk/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("alertdesk")
}

/// Returns `~/.config/alertdesk/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.config/alertdesk/themes/<name>.toml`.
pub fn custom_theme_path(name: &str) -> PathBuf {
    config_dir().join("themes").join(format!("{}.toml", name))
}

/// Returns `~/.config/alertdesk/.env` (API key, never committed).
pub fn env_file_path() -> PathBuf {
    config_dir().join(".env")
}

/// Returns `~/.local/share/alertdesk/logs/`.
pub fn log_dir() -> PathBuf {
    home_dir()
        .join(".local")
        .join("share")
        .join("alertdesk")
        .join("logs")
}
