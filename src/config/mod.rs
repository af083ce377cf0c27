use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::*;
use crate::models::{FilterOption, Preset};

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/alertdesk/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// Alert refresh interval in seconds (0 = only on demand)
    pub refresh_interval_secs: u64,
    /// Rows per table page
    pub page_size: usize,
    /// Theme name (built-in or custom)
    pub theme: String,
    /// UI language (en, de)
    pub lang: String,
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
    /// Where alerts come from
    pub source: SourceConfig,
    /// Tab order: built-in presets, then configured ones
    pub presets: Vec<Preset>,
    /// Set when the config file failed to parse; reported once logging is up.
    pub parse_warning: Option<String>,
}

/// Alert source settings. `api_url` wins when both are set.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    pub file: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            theme: "default".to_string(),
            lang: "en".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            source: SourceConfig::default(),
            presets: Preset::builtin(),
            parse_warning: None,
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    refresh_interval_secs: Option<u64>,
    page_size: Option<usize>,
    theme: Option<String>,
    lang: Option<String>,
    log_level: Option<String>,
    source: Option<FileSourceConfig>,
    presets: Option<Vec<FilePresetConfig>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileSourceConfig {
    file: Option<PathBuf>,
    api_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilePresetConfig {
    name: String,
    #[serde(default)]
    options: Vec<String>,
}

impl Config {
    /// Load config from ~/.config/alertdesk/config.toml, falling back to
    /// defaults for any missing fields.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path. A missing or unparsable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return config, // No config file, use defaults
        };

        match toml::from_str::<FileConfig>(&content) {
            Ok(fc) => config.merge(fc),
            Err(e) => {
                config.parse_warning = Some(format!(
                    "Failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                ));
                config
            }
        }
    }

    fn merge(mut self, file_config: FileConfig) -> Self {
        if let Some(v) = file_config.refresh_interval_secs {
            self.refresh_interval_secs = v; // 0 = disabled
        }
        if let Some(v) = file_config.page_size {
            self.page_size = v.clamp(1, MAX_PAGE_SIZE);
        }
        if let Some(v) = file_config.theme {
            if !v.is_empty() {
                self.theme = v;
            }
        }
        if let Some(v) = file_config.lang {
            if !v.is_empty() {
                self.lang = v;
            }
        }
        if let Some(v) = file_config.log_level {
            if !v.is_empty() {
                self.log_level = v;
            }
        }

        if let Some(s) = file_config.source {
            if let Some(v) = s.file {
                self.source.file = Some(v);
            }
            if let Some(v) = s.api_url {
                if !v.is_empty() {
                    self.source.api_url = Some(v);
                }
            }
        }

        for p in file_config.presets.unwrap_or_default() {
            if p.name.is_empty() {
                continue;
            }
            let options: Vec<FilterOption> =
                p.options.iter().map(|o| FilterOption::new(o.as_str())).collect();
            match self.presets.iter_mut().find(|existing| existing.name == p.name) {
                Some(existing) => existing.options = options,
                None => self.presets.push(Preset::new(p.name, options)),
            }
        }

        self
    }
}
