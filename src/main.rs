//! # alertdesk - terminal alert console
//!
//! Browse alerts from a JSON file or a Keep-compatible API through preset
//! tabs, narrow them with `key=value` options, page through the table and
//! delete or restore alerts in bulk.

#[macro_use]
extern crate rust_i18n;

// Load locale files from `locales/` directory, default to English
i18n!("locales", fallback = "en");

mod alerts;
mod app;
mod config;
pub mod constants;
mod logging;
mod models;
mod source;
mod ui;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use config::Config;
use constants::*;
use source::{AlertSource, KeepClient};

/// alertdesk - preset alert views in your terminal
#[derive(Parser, Debug)]
#[command(name = "alertdesk", version, about = "A terminal alert console with preset views, option filters and bulk actions")]
struct Cli {
    /// Load alerts from a JSON file (array of alert objects)
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Load alerts from a Keep-compatible API (wins over --file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Preset tab to open first
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Color theme (default, gruvbox, nord, or a custom theme name)
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// UI language (en, de)
    #[arg(long, short = 'l', value_name = "LANG")]
    lang: Option<String>,

    /// Refresh interval in seconds (0 disables periodic refresh)
    #[arg(long, short = 'r', value_name = "SECS")]
    refresh: Option<u64>,

    /// Rows per table page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,
}

impl Cli {
    /// CLI values win over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.file {
            config.source.file = Some(path.clone());
        }
        if let Some(url) = &self.api_url {
            config.source.api_url = Some(url.clone());
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(lang) = &self.lang {
            config.lang = lang.clone();
        }
        if let Some(secs) = self.refresh {
            config.refresh_interval_secs = secs;
        }
        if let Some(n) = self.page_size {
            config.page_size = n.clamp(1, MAX_PAGE_SIZE);
        }
    }
}

/// Pick the alert source: API first, then file, else none.
fn build_source(config: &Config) -> Result<Option<AlertSource>> {
    if let Some(url) = &config.source.api_url {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!("{} is not set, calling the API without a key", API_KEY_ENV);
        }
        let client = KeepClient::new(url, api_key).context("failed to build HTTP client")?;
        return Ok(Some(AlertSource::Keep(client)));
    }
    Ok(config.source.file.clone().map(AlertSource::File))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and apply CLI overrides to config
    let mut config = Config::load();
    cli.apply(&mut config);

    // Optional, never committed
    let _ = dotenvy::from_path(env_file_path());

    let _log_guard = logging::init(&log_dir(), &config.log_level)?;
    if let Some(warning) = &config.parse_warning {
        warn!("{}", warning);
    }

    // Set UI language (CLI > config > default "en")
    rust_i18n::set_locale(&config.lang);

    let source = build_source(&config)?;
    let label = source
        .as_ref()
        .map(AlertSource::describe)
        .unwrap_or_else(|| "none".to_string());
    info!(source = %label, presets = config.presets.len(), "starting");

    let mut app = app::App::new(&config, source, cli.preset.as_deref());
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "alertdesk",
            "--file",
            "alerts.json",
            "-t",
            "nord",
            "-r",
            "0",
            "--page-size",
            "100000",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.source.file, Some(PathBuf::from("alerts.json")));
        assert_eq!(config.theme, "nord");
        assert_eq!(config.refresh_interval_secs, 0);
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn api_url_wins_over_file() {
        let mut config = Config::default();
        config.source.file = Some(PathBuf::from("alerts.json"));
        config.source.api_url = Some("http://keep:8080".into());
        let source = build_source(&config).unwrap();
        assert!(matches!(source, Some(AlertSource::Keep(_))));

        config.source.api_url = None;
        let source = build_source(&config).unwrap();
        assert!(matches!(source, Some(AlertSource::File(_))));

        config.source.file = None;
        assert!(build_source(&config).unwrap().is_none());
    }
}
