//! Settings configuration
//!
//! Manages user-configurable settings for the input method.
//! Default values are defined in `config/default.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use mabiao_engine::{ChineseMode, Orientation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default configuration TOML embedded from config/default.toml
const DEFAULT_CONFIG_TOML: &str = include_str!("../../config/default.toml");

/// Configuration settings for the input method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Table selection
    pub table: TableSettings,
    /// Input-mode toggles
    pub mode: ModeSettings,
    /// Full/halfwidth preferences, indexed by input mode
    pub width: WidthSettings,
    /// Lookup-table presentation
    pub lookup: LookupSettings,
    /// Usage-sync batching
    pub usage: UsageSettings,
}

/// Table file selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSettings {
    /// Path to the table file (optional; the host may supply one)
    pub path: Option<String>,
}

/// Mode toggles persisted across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSettings {
    /// Table input (false = direct passthrough)
    pub table_input: bool,
    /// Pinyin sub-mode
    pub pinyin: bool,
    /// Chinese-variant filter
    pub chinese_mode: ChineseMode,
    /// Restrict matches to single-character phrases
    pub onechar: bool,
    /// Implicitly pick the best candidate at a boundary
    pub auto_select: bool,
    /// Deliver boundary-finalized segments straight to the application
    pub auto_commit: bool,
    /// Relax exact lookups with an implicit trailing wildcard
    pub auto_wildcard: bool,
}

/// Width preferences are independently configurable for direct and table
/// mode, so each is a 2-element array indexed by the input mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidthSettings {
    pub full_width_letter: [bool; 2],
    pub full_width_punct: [bool; 2],
}

/// Lookup-table presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSettings {
    /// Candidates per page; clamped to the number of select keys
    pub page_size: usize,
    pub orientation: Orientation,
    /// Keep the lookup table visible while composing even with no matches
    pub always_show: bool,
}

/// Usage-sync batching thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSettings {
    pub max_pending: usize,
    pub max_age_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("embedded default.toml must be valid")
    }
}

/// Recursively merge `overlay` TOML values on top of `base`.
fn merge_toml(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key.clone(), value.clone());
                }
            }
        }
        (base, _) => {
            *base = overlay.clone();
        }
    }
}

/// Parse user TOML content merged on top of default.toml.
fn parse_with_defaults(user_content: &str) -> Result<Settings> {
    let mut base: toml::Value = toml::from_str(DEFAULT_CONFIG_TOML)?;
    let user: toml::Value = toml::from_str(user_content)?;
    merge_toml(&mut base, &user);
    let settings: Settings = base.try_into()?;
    Ok(settings)
}

/// Get the project directories for mabiao-im.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "mabiao", "mabiao-im")
}

impl Settings {
    /// Get the data directory path
    pub fn data_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the directory scanned for table files.
    ///
    /// Default: `~/.local/share/mabiao-im/tables/`
    pub fn tables_dir() -> Option<PathBuf> {
        Self::data_dir().map(|dir| dir.join("tables"))
    }

    /// Load settings from the default configuration file.
    /// Falls back to embedded default.toml if the config file does not exist.
    pub fn load() -> Result<Self> {
        let Some(config_file) = Self::config_file() else {
            warn!("Could not determine config directory, using defaults");
            return Ok(Self::default());
        };

        if !config_file.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading config from {:?}", config_file);
        let content = fs::read_to_string(&config_file)?;
        parse_with_defaults(&content)
    }

    /// Load settings from a specific file, merged on top of defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        parse_with_defaults(&content)
    }

    /// Save settings to the default configuration file
    pub fn save(&self) -> Result<()> {
        let Some(config_file) = Self::config_file() else {
            anyhow::bail!("Could not determine config directory");
        };

        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }

        debug!("Saving config to {:?}", config_file);
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_file, content)?;
        Ok(())
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
