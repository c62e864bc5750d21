//! Window and loop settings.
//!
//! Defaults come from the application's compile-time constants. An optional
//! JSON file may override individual fields; any field it omits keeps the
//! default. A missing file is not an error, a malformed one is.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Frame-rate cap. `None` runs uncapped.
    pub fps_cap: Option<u32>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Stagecraft".to_string(),
            width: 640,
            height: 480,
            resizable: false,
            fps_cap: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PlatformConfigFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    resizable: Option<bool>,
    #[serde(default)]
    fps_cap: Option<u32>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_platform_config(
    path: &Path,
    defaults: PlatformConfig,
) -> Result<PlatformConfig, ConfigError> {
    if !path.exists() {
        log::info!(
            "No platform config at '{}', using built-in defaults",
            path.display()
        );
        return Ok(defaults);
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: PlatformConfigFile =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let config = apply_overrides(defaults, file);
    validate_config(&config)?;
    log::info!(
        "Loaded platform config '{}': {}x{}, fps cap {:?}",
        path.display(),
        config.width,
        config.height,
        config.fps_cap
    );
    Ok(config)
}

fn apply_overrides(mut config: PlatformConfig, file: PlatformConfigFile) -> PlatformConfig {
    if let Some(title) = file.title {
        config.title = title;
    }
    if let Some(width) = file.width {
        config.width = width;
    }
    if let Some(height) = file.height {
        config.height = height;
    }
    if let Some(resizable) = file.resizable {
        config.resizable = resizable;
    }
    if file.fps_cap.is_some() {
        config.fps_cap = file.fps_cap.filter(|&fps| fps > 0);
    }
    config
}

fn validate_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    if config.width == 0 || config.height == 0 {
        return Err(ConfigError::Invalid(format!(
            "window size must be > 0, got {}x{}",
            config.width, config.height
        )));
    }
    if config.title.trim().is_empty() {
        log::warn!("Platform config has an empty window title");
    }
    Ok(())
}
