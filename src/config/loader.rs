//! Configuration loading and discovery for `svgsprite.toml`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::{LogLevel, SpriteConfig};

/// Name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = "svgsprite.toml";

/// Configuration loading error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("failed to parse svgsprite.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("config validation failed:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub root_dir: Option<String>,
    pub css_files: Vec<String>,
    pub ignored_dirs: Vec<String>,
    pub sprite_dir: Option<String>,
    pub sprite_file_suffix: Option<String>,
    pub document_root: Option<String>,
    pub css_file_suffix: Option<String>,
    pub log_level: Option<LogLevel>,
}

/// Find `svgsprite.toml` by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find `svgsprite.toml` by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut dir = Some(start.as_path());
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// Load configuration from `path`, or return defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<SpriteConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => SpriteConfig::default(),
    };
    validate(&config)?;
    Ok(config)
}

/// Default configuration, validated.
pub fn default_config() -> SpriteConfig {
    SpriteConfig::default()
}

/// Apply CLI overrides on top of a loaded config.
pub fn merge_cli_overrides(config: &mut SpriteConfig, overrides: &CliOverrides) {
    if let Some(root_dir) = &overrides.root_dir {
        config.root_dir = Some(root_dir.clone());
    }
    if !overrides.css_files.is_empty() {
        config.css_files = overrides.css_files.clone();
    }
    if !overrides.ignored_dirs.is_empty() {
        config.ignored_dirs = overrides.ignored_dirs.clone();
    }
    if let Some(sprite_dir) = &overrides.sprite_dir {
        config.sprite_dir = sprite_dir.clone();
    }
    if let Some(suffix) = &overrides.sprite_file_suffix {
        config.sprite_file_suffix = suffix.clone();
    }
    if let Some(document_root) = &overrides.document_root {
        config.document_root = Some(document_root.clone());
    }
    if let Some(suffix) = &overrides.css_file_suffix {
        config.css_file_suffix = suffix.clone();
    }
    if let Some(level) = overrides.log_level {
        config.log_level = level;
    }
}

fn validate(config: &SpriteConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.sprite_dir.starts_with('/') || config.sprite_dir.starts_with('\\') {
        errors.push(format!(
            "sprite_dir must be relative to each stylesheet's directory, got {:?}",
            config.sprite_dir
        ));
    }
    if config.sprite_file_suffix.contains('/') || config.sprite_file_suffix.contains('\\') {
        errors.push(format!(
            "sprite_file_suffix must not contain path separators, got {:?}",
            config.sprite_file_suffix
        ));
    }
    if config.css_file_suffix.contains('/') || config.css_file_suffix.contains('\\') {
        errors.push(format!(
            "css_file_suffix must not contain path separators, got {:?}",
            config.css_file_suffix
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}
