//! Configuration schema types for `svgsprite.toml`.

use serde::{Deserialize, Serialize};

use crate::messages::Level;

/// Minimum message level to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => Level::Info,
            LogLevel::Warning => Level::Warning,
            LogLevel::Error => Level::Error,
        }
    }
}

/// Run parameters for a sprite build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Directory scanned recursively for stylesheets.
    #[serde(default)]
    pub root_dir: Option<String>,
    /// Explicit stylesheet paths; when non-empty, discovery is skipped.
    #[serde(default)]
    pub css_files: Vec<String>,
    /// Directory names excluded from stylesheet discovery.
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
    /// Directory for default-convention sprites, relative to each
    /// stylesheet's directory.
    #[serde(default = "default_sprite_dir")]
    pub sprite_dir: String,
    /// Suffix appended to a stylesheet's basename when deriving its
    /// default-convention sprite file name.
    #[serde(default = "default_sprite_file_suffix")]
    pub sprite_file_suffix: String,
    /// Root against which explicit sprite directives and fragment
    /// references are resolved. Falls back to `root_dir`.
    #[serde(default)]
    pub document_root: Option<String>,
    /// Configurable stylesheet suffix option. Note that the rewritten-CSS
    /// file name uses the fixed [`crate::rewriter::OUTPUT_CSS_SUFFIX`]
    /// policy instead; this option exists for embedders that derive their
    /// own names.
    #[serde(default = "default_css_file_suffix")]
    pub css_file_suffix: String,
    /// Minimum message level to report.
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_ignored_dirs() -> Vec<String> {
    vec!["lib".to_string()]
}

fn default_sprite_dir() -> String {
    "sprites".to_string()
}

fn default_sprite_file_suffix() -> String {
    "-sprite".to_string()
}

fn default_css_file_suffix() -> String {
    "-sprite".to_string()
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            root_dir: None,
            css_files: Vec::new(),
            ignored_dirs: default_ignored_dirs(),
            sprite_dir: default_sprite_dir(),
            sprite_file_suffix: default_sprite_file_suffix(),
            document_root: None,
            css_file_suffix: default_css_file_suffix(),
            log_level: LogLevel::default(),
        }
    }
}

impl SpriteConfig {
    /// Document root used for directive resolution and fragment references:
    /// the explicit `document_root` if set, else `root_dir`, else empty
    /// (paths stay relative to the working directory).
    pub fn effective_document_root(&self) -> String {
        self.document_root
            .clone()
            .or_else(|| self.root_dir.clone())
            .unwrap_or_default()
    }
}
