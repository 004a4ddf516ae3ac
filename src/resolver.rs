//! Per-stylesheet reference resolution into sprite groups.
//!
//! For each stylesheet this finds the destination sprite (explicit
//! `svg-sprite-image` directive or default convention), scans the qualifying
//! image-url rules, drops excluded ones, and appends one unresolved
//! directive per surviving rule to the destination's group.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::SpriteConfig;
use crate::messages::{MessageKind, MessageSink};
use crate::models::{ScannedDirective, SpriteGroups};
use crate::paths;
use crate::resource::ResourceHandler;
use crate::scanner::{self, ScanError};

/// Unrecoverable failure while scanning a stylesheet. Aborts the run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read stylesheet {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Scan(#[from] ScanError),
}

pub struct ReferenceResolver<'a> {
    config: &'a SpriteConfig,
    sink: &'a dyn MessageSink,
    resources: &'a dyn ResourceHandler,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        config: &'a SpriteConfig,
        sink: &'a dyn MessageSink,
        resources: &'a dyn ResourceHandler,
    ) -> Self {
        Self { config, sink, resources }
    }

    /// Scan one stylesheet and append its directives to `groups`.
    ///
    /// A stylesheet producing zero directives is not an error and creates
    /// no group entry.
    pub fn scan_stylesheet(
        &self,
        stylesheet: &str,
        groups: &mut SpriteGroups,
    ) -> Result<(), ResolveError> {
        let content = fs::read_to_string(stylesheet).map_err(|source| ResolveError::Read {
            path: stylesheet.to_string(),
            source,
        })?;

        let destination = self.destination_sprite(stylesheet, &content)?;

        for rule in scanner::extract_matches(scanner::image_rule_re(), &content) {
            let comment = scanner::extract_trailing_comment(rule);
            if scanner::is_excluded(&comment) {
                continue;
            }

            let url = scanner::extract_url_content(rule)?;
            let asset = self.resources.resolve(Path::new(stylesheet), &url);
            let asset = paths::canonicalize_slashes(&asset.to_string_lossy());

            groups.entry(destination.clone()).or_default().push(ScannedDirective {
                matched_text: url,
                important: scanner::has_important(rule),
                source_asset: asset,
                source_stylesheet: stylesheet.to_string(),
            });
        }

        Ok(())
    }

    /// Destination sprite path for one stylesheet: the first explicit
    /// directive's URL resolved against the document root, else
    /// `<stylesheet dir>/<sprite_dir>/<basename><sprite_file_suffix>.svg`.
    fn destination_sprite(&self, stylesheet: &str, content: &str) -> Result<String, ResolveError> {
        let directives = scanner::extract_matches(scanner::directive_rule_re(), content);
        if directives.len() > 1 {
            self.sink.warning(
                MessageKind::MultipleDirectiveRules,
                &format!("{stylesheet}: multiple svg-sprite-image rules found, using the first"),
            );
        }

        let destination = match directives.first() {
            Some(directive) => {
                let location = scanner::extract_url_content(directive)?;
                paths::connect(&self.config.effective_document_root(), &location)
            }
            None => {
                let normalized = paths::normalize_separators(stylesheet);
                let (dir, file) = match normalized.rsplit_once('/') {
                    Some((dir, file)) => (dir, file),
                    None => ("", normalized.as_str()),
                };
                let stem = file.split(".css").next().unwrap_or(file);
                let name = format!("{stem}{}.svg", self.config.sprite_file_suffix);
                paths::connect(&paths::connect(dir, &self.config.sprite_dir), &name)
            }
        };

        Ok(paths::canonicalize_slashes(&destination))
    }
}
