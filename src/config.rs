//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/hierarchy/hierarchy.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `HIERARCHY_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DEFAULT_MAX_HOPS;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_hops: Option<usize>,
    pub reject_duplicate_codes: Option<bool>,
}

/// Unified configuration for hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Hop ceiling for depth and ancestor walks
    pub max_hops: usize,
    /// Fail record loading when a code appears twice in one batch
    pub reject_duplicate_codes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            reject_duplicate_codes: true,
        }
    }
}

/// Get the XDG config directory for hierarchy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hierarchy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hierarchy.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn optional<T>(value: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match value {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("HIERARCHY")
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_hops: overlay.max_hops.unwrap_or(self.max_hops),
            reject_duplicate_codes: overlay
                .reject_duplicate_codes
                .unwrap_or(self.reject_duplicate_codes),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_layers(global.as_deref(), explicit)
    }

    /// Load settings from the given files, then apply environment overrides.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load_layers(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(explicit_path) = explicit {
            debug!("explicit config: {}", explicit_path.display());
            current = current.merge_with(&load_raw_settings(explicit_path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply HIERARCHY_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_overrides_from(settings, env_source())
    }

    /// Present but unparseable values are errors, absent keys keep `settings`.
    fn apply_overrides_from(
        mut settings: Self,
        source: Environment,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_int("max_hops"))? {
            settings.max_hops = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("max_hops must not be negative: {}", val),
            })?;
        }
        if let Some(val) = optional(config.get_bool("reject_duplicate_codes"))? {
            settings.reject_duplicate_codes = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_hops == 0 {
            return Err(ApplicationError::Config {
                message: "max_hops must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML (for `config show`-style output).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
