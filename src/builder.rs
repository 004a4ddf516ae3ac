//! Three-phase sprite build orchestration.
//!
//! The phases form a strict barrier: every stylesheet is scanned before any
//! sprite is assembled, and every sprite is assembled before any stylesheet
//! is rewritten. That ordering is what guarantees each substitution has its
//! resolved reference available, at the cost of holding the full run's
//! directive set in memory. Execution is single-threaded and blocking
//! throughout.

use indexmap::IndexMap;
use thiserror::Error;

use crate::assembler::{AssembleError, SpriteAssembler};
use crate::config::SpriteConfig;
use crate::messages::{MessageKind, MessageSink};
use crate::models::{RewriteSets, SpriteGroups};
use crate::resolver::{ReferenceResolver, ResolveError};
use crate::resource::ResourceHandler;
use crate::rewriter::{RewriteEngine, RewriteError};

/// Unrecoverable build failure. Recoverable conditions (missing assets,
/// malformed sources, empty stylesheets) are warnings on the sink instead
/// and never surface here.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Counters for one completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub stylesheets_scanned: usize,
    pub sprites_written: usize,
    pub stylesheets_rewritten: usize,
    pub directives_total: usize,
    pub directives_resolved: usize,
}

pub struct SpriteBuilder<'a> {
    config: &'a SpriteConfig,
    sink: &'a dyn MessageSink,
    resources: &'a dyn ResourceHandler,
}

impl<'a> SpriteBuilder<'a> {
    pub fn new(
        config: &'a SpriteConfig,
        sink: &'a dyn MessageSink,
        resources: &'a dyn ResourceHandler,
    ) -> Self {
        Self { config, sink, resources }
    }

    /// Run the full scan / assemble / rewrite pipeline over `stylesheets`.
    ///
    /// Any error aborts the whole run; there is no partial-success
    /// reporting beyond warnings already emitted through the sink.
    pub fn build_sprites(&self, stylesheets: &[String]) -> Result<BuildSummary, BuildError> {
        let mut summary = BuildSummary::default();

        // Phase 1: scan every stylesheet into one shared grouping.
        let resolver = ReferenceResolver::new(self.config, self.sink, self.resources);
        let mut groups: SpriteGroups = IndexMap::new();
        for stylesheet in stylesheets {
            resolver.scan_stylesheet(stylesheet, &mut groups)?;
            summary.stylesheets_scanned += 1;
        }

        // Phase 2: assemble every destination sprite, re-keying the
        // resolved directives by originating stylesheet as we go.
        let assembler = SpriteAssembler::new(self.config, self.sink);
        let mut rewrite_sets: RewriteSets = IndexMap::new();
        for (destination, directives) in &groups {
            let resolved = assembler.assemble(destination, directives)?;
            if !resolved.is_empty() {
                summary.sprites_written += 1;
                self.sink.info(
                    MessageKind::Generic,
                    &format!("wrote sprite {destination}"),
                );
            }
            for directive in resolved {
                summary.directives_total += 1;
                if directive.reference.is_some() {
                    summary.directives_resolved += 1;
                }
                rewrite_sets
                    .entry(directive.scanned.source_stylesheet.clone())
                    .or_default()
                    .push(directive);
            }
        }

        // Phase 3: rewrite every stylesheet that produced directives.
        let engine = RewriteEngine::new(self.sink);
        for (stylesheet, directives) in &rewrite_sets {
            if engine.rewrite_stylesheet(stylesheet, directives)?.is_some() {
                summary.stylesheets_rewritten += 1;
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::RecordingSink;
    use crate::resource::FilesystemHandler;
    use crate::paths;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><g><path d="M0 0"/></g></svg>"#;

    fn write(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        paths::canonicalize_slashes(&path.to_string_lossy())
    }

    #[test]
    fn summary_counts_all_three_phases() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "icon.svg", ICON);
        let css = write(temp.path(), "a.css", ".a { background: url('icon.svg'); }");
        let root = paths::canonicalize_slashes(&temp.path().to_string_lossy());
        let config = SpriteConfig { document_root: Some(root), ..Default::default() };
        let sink = RecordingSink::new();

        let summary = SpriteBuilder::new(&config, &sink, &FilesystemHandler)
            .build_sprites(&[css])
            .unwrap();

        assert_eq!(summary.stylesheets_scanned, 1);
        assert_eq!(summary.sprites_written, 1);
        assert_eq!(summary.stylesheets_rewritten, 1);
        assert_eq!(summary.directives_total, 1);
        assert_eq!(summary.directives_resolved, 1);
    }

    #[test]
    fn unreadable_stylesheet_aborts_the_run() {
        let config = SpriteConfig::default();
        let sink = RecordingSink::new();
        let result = SpriteBuilder::new(&config, &sink, &FilesystemHandler)
            .build_sprites(&["missing/a.css".to_string()]);
        assert!(matches!(result, Err(BuildError::Resolve(_))));
    }

    #[test]
    fn run_with_no_stylesheets_is_empty_success() {
        let config = SpriteConfig::default();
        let sink = RecordingSink::new();
        let summary = SpriteBuilder::new(&config, &sink, &FilesystemHandler)
            .build_sprites(&[])
            .unwrap();
        assert_eq!(summary, BuildSummary::default());
    }
}
