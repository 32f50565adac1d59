//! Persistent CLI defaults.

use std::path::{Path, PathBuf};

use lss_core::export::TableFormat;
use lss_core::projection::ProjectionOptions;
use lss_core::TimeKind;
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "lss";
const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub table: TableDefaults,
}

/// Defaults for `lss table` and `lss stats`. Every option can be switched
/// either way from the command line (`--cumulative` / `--no-cumulative`).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableDefaults {
    pub time_kind: TimeKind,
    pub include_fraction: bool,
    pub allow_partial: bool,
    pub allow_empty: bool,
    pub cumulative: bool,
    pub format: TableFormat,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            time_kind: TimeKind::RealTime,
            include_fraction: true,
            allow_partial: false,
            allow_empty: false,
            cumulative: false,
            format: TableFormat::Csv,
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl CliConfig {
    /// Load from `explicit` or the default location. A missing default file
    /// yields the built-in defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(format!("Config file not found: {}", path.display()));
            }
            return Self::load_from_path(path);
        }
        default_config_path().map_or_else(|| Ok(Self::default()), |path| Self::load_from_path(&path))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        tracing::debug!("Loaded CLI config from {}", path.display());
        Ok(config)
    }
}

/// Table options given on the command line; `None` keeps the config value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableFlags {
    pub time_kind: Option<TimeKind>,
    pub allow_partial: Option<bool>,
    pub allow_empty: Option<bool>,
    pub cumulative: Option<bool>,
    pub include_fraction: Option<bool>,
    pub format: Option<TableFormat>,
}

/// Effective table settings after applying flags on top of config defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSettings {
    pub projection: ProjectionOptions,
    pub include_fraction: bool,
    pub format: TableFormat,
}

impl TableDefaults {
    pub fn resolve(&self, flags: TableFlags) -> TableSettings {
        TableSettings {
            projection: ProjectionOptions {
                time_kind: flags.time_kind.unwrap_or(self.time_kind),
                allow_partial: flags.allow_partial.unwrap_or(self.allow_partial),
                allow_empty: flags.allow_empty.unwrap_or(self.allow_empty),
                cumulative: flags.cumulative.unwrap_or(self.cumulative),
            },
            include_fraction: flags.include_fraction.unwrap_or(self.include_fraction),
            format: flags.format.unwrap_or(self.format),
        }
    }
}
