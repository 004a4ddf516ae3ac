//! Command-line interface implementation.
//!
//! The tool is single-purpose: one invocation runs one sprite build.
//! Stylesheet discovery and parameter validation live here; the build
//! itself is [`crate::builder::SpriteBuilder`].

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use glob::glob;

use crate::builder::SpriteBuilder;
use crate::config::loader::{find_config, load_config, merge_cli_overrides, CliOverrides};
use crate::config::LogLevel;
use crate::messages::ConsoleSink;
use crate::paths;
use crate::resource::FilesystemHandler;
use crate::rewriter::OUTPUT_CSS_SUFFIX;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// svgsprite - merge SVG icons referenced from CSS into composite sprites
#[derive(Parser, Debug)]
#[command(name = "svgsprite")]
#[command(about = "Merge SVG icons referenced from CSS into composite sprite sheets")]
#[command(version)]
pub struct Cli {
    /// Directory scanned recursively for *.css files
    #[arg(long)]
    pub root_dir: Option<String>,

    /// Explicit stylesheet paths (bypasses discovery)
    #[arg(long = "css-files", num_args = 1..)]
    pub css_files: Vec<String>,

    /// Directory names excluded from discovery
    #[arg(long = "ignored-dirs", num_args = 1..)]
    pub ignored_dirs: Vec<String>,

    /// Sprite directory, relative to each stylesheet's directory
    #[arg(long)]
    pub sprite_dir: Option<String>,

    /// Suffix for default-convention sprite file names
    #[arg(long)]
    pub sprite_file_suffix: Option<String>,

    /// Root for sprite directives and fragment references
    #[arg(long)]
    pub document_root: Option<String>,

    /// Configurable stylesheet suffix option
    #[arg(long)]
    pub css_file_suffix: Option<String>,

    /// Minimum message level (info, warning, error)
    #[arg(long, value_enum)]
    pub log_level: Option<CliLogLevel>,

    /// Path to svgsprite.toml (default: walk up from the working directory)
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliLogLevel {
    Info,
    Warning,
    Error,
}

impl From<CliLogLevel> for LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Warning => LogLevel::Warning,
            CliLogLevel::Error => LogLevel::Error,
        }
    }
}

/// CLI entry point.
pub fn run() -> ExitCode {
    // Invoked bare, print usage instead of an error, like the usual
    // single-purpose build tools do.
    if std::env::args().len() <= 1 {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        return ExitCode::from(EXIT_SUCCESS);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders --help/--version through the error path too
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::from(EXIT_SUCCESS)
                }
                _ => ExitCode::from(EXIT_INVALID_ARGS),
            };
        }
    };

    run_build(cli)
}

fn run_build(cli: Cli) -> ExitCode {
    let config_path = cli.config.as_ref().map(|p| Path::new(p).to_path_buf()).or_else(find_config);
    let mut config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error loading config: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides {
        root_dir: cli.root_dir,
        css_files: cli.css_files,
        ignored_dirs: cli.ignored_dirs,
        sprite_dir: cli.sprite_dir,
        sprite_file_suffix: cli.sprite_file_suffix,
        document_root: cli.document_root,
        css_file_suffix: cli.css_file_suffix,
        log_level: cli.log_level.map(LogLevel::from),
    };
    merge_cli_overrides(&mut config, &overrides);

    if config.css_files.is_empty() && config.root_dir.is_none() {
        eprintln!("error: either --root-dir or --css-files is required");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let stylesheets = if config.css_files.is_empty() {
        match config.root_dir.as_deref() {
            Some(root) => find_stylesheets(root, &config.ignored_dirs),
            None => Vec::new(),
        }
    } else {
        config.css_files.iter().map(|p| paths::canonicalize_slashes(p)).collect()
    };

    if stylesheets.is_empty() {
        eprintln!("no stylesheets found");
        return ExitCode::from(EXIT_SUCCESS);
    }

    let sink = ConsoleSink::new(config.log_level.into());
    let builder = SpriteBuilder::new(&config, &sink, &FilesystemHandler);
    match builder.build_sprites(&stylesheets) {
        Ok(summary) => {
            println!(
                "Scanned {} stylesheet(s), wrote {} sprite(s), rewrote {} stylesheet(s) ({}/{} rules resolved)",
                summary.stylesheets_scanned,
                summary.sprites_written,
                summary.stylesheets_rewritten,
                summary.directives_resolved,
                summary.directives_total,
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("build failed: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Recursively find stylesheets under `root`, skipping ignored directories
/// and previously generated `*-sprite.css` outputs (so a re-run sees the
/// same input set).
pub fn find_stylesheets(root: &str, ignored_dirs: &[String]) -> Vec<String> {
    let pattern = format!("{}/**/*.css", root.trim_end_matches(['/', '\\']));
    let mut stylesheets = Vec::new();
    if let Ok(entries) = glob(&pattern) {
        for path in entries.filter_map(Result::ok) {
            if is_ignored(&path, ignored_dirs) || is_generated_output(&path) {
                continue;
            }
            stylesheets.push(paths::canonicalize_slashes(&path.to_string_lossy()));
        }
    }
    stylesheets
}

fn is_ignored(path: &Path, ignored_dirs: &[String]) -> bool {
    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .map(|name| ignored_dirs.iter().any(|dir| dir == name))
            .unwrap_or(false)
    })
}

fn is_generated_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.ends_with(OUTPUT_CSS_SUFFIX))
        .unwrap_or(false)
}
