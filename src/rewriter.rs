//! Stylesheet rewriting with resolved sprite references.
//!
//! Substitution is literal text replacement applied sequentially, so later
//! directives see the output of earlier ones. The input stylesheet is never
//! modified; the result goes to a sibling file named by a fixed policy.

use std::fs;

use thiserror::Error;

use crate::messages::{MessageKind, MessageSink};
use crate::models::ResolvedDirective;

/// Suffix inserted before `.css` on rewritten stylesheets.
///
/// This is a fixed naming policy, deliberately independent of the
/// configurable `css_file_suffix` option (which embedders may use for their
/// own derived names). Changing one does not change the other.
pub const OUTPUT_CSS_SUFFIX: &str = "-sprite";

/// Unrecoverable failure while rewriting a stylesheet. Aborts the run.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to read stylesheet {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write stylesheet {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Output path for a rewritten stylesheet: [`OUTPUT_CSS_SUFFIX`] inserted
/// before the `.css` extension.
pub fn output_path(stylesheet: &str) -> String {
    let stem = stylesheet.split(".css").next().unwrap_or(stylesheet);
    format!("{stem}{OUTPUT_CSS_SUFFIX}.css")
}

pub struct RewriteEngine<'a> {
    sink: &'a dyn MessageSink,
}

impl<'a> RewriteEngine<'a> {
    pub fn new(sink: &'a dyn MessageSink) -> Self {
        Self { sink }
    }

    /// Rewrite one stylesheet, returning the output path if a file was
    /// written. Empty directive lists and empty stylesheets are skipped.
    pub fn rewrite_stylesheet(
        &self,
        stylesheet: &str,
        directives: &[ResolvedDirective],
    ) -> Result<Option<String>, RewriteError> {
        if directives.is_empty() {
            return Ok(None);
        }

        let content = fs::read_to_string(stylesheet).map_err(|source| RewriteError::Read {
            path: stylesheet.to_string(),
            source,
        })?;
        if content.trim().is_empty() {
            self.sink.warning(
                MessageKind::EmptyStylesheet,
                &format!("empty stylesheet found: {stylesheet}"),
            );
            return Ok(None);
        }

        let mut rewritten = content;
        for directive in directives {
            let matched = directive.scanned.matched_text.as_str();
            let reference = match directive.reference.as_deref() {
                Some(reference) if !matched.is_empty() => reference,
                _ => {
                    self.sink.warning(
                        MessageKind::EmptyReplacement,
                        &format!(
                            "{stylesheet}: no sprite reference for {:?}, rule left as-is",
                            matched
                        ),
                    );
                    continue;
                }
            };
            rewritten = rewritten.replace(matched, reference);
        }

        let output = output_path(stylesheet);
        fs::write(&output, rewritten).map_err(|source| RewriteError::Write {
            path: output.clone(),
            source,
        })?;
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::RecordingSink;
    use crate::models::ScannedDirective;
    use std::path::Path;
    use tempfile::TempDir;

    fn resolved(matched: &str, reference: Option<&str>, stylesheet: &str) -> ResolvedDirective {
        ResolvedDirective {
            scanned: ScannedDirective {
                matched_text: matched.to_string(),
                important: false,
                source_asset: "icon.svg".to_string(),
                source_stylesheet: stylesheet.to_string(),
            },
            reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn output_naming_policy_is_fixed() {
        assert_eq!(output_path("site/css/a.css"), "site/css/a-sprite.css");
        assert_eq!(output_path("a.min.css"), "a.min-sprite.css");
    }

    #[test]
    fn output_naming_ignores_configurable_suffix_option() {
        // The css_file_suffix config option exists, but the rewritten file
        // name always uses the fixed policy.
        let config = crate::config::SpriteConfig {
            css_file_suffix: "-custom".to_string(),
            ..Default::default()
        };
        assert_eq!(config.css_file_suffix, "-custom");
        assert_eq!(output_path("a.css"), "a-sprite.css");
    }

    #[test]
    fn substitutes_resolved_directives() {
        let temp = TempDir::new().unwrap();
        let css = temp.path().join("a.css");
        fs::write(&css, ".a { background: url('icon.svg'); }").unwrap();
        let css = css.to_string_lossy().to_string();

        let sink = RecordingSink::new();
        let output = RewriteEngine::new(&sink)
            .rewrite_stylesheet(&css, &[resolved("icon.svg", Some("/s.svg#0"), &css)])
            .unwrap()
            .unwrap();

        let rewritten = fs::read_to_string(&output).unwrap();
        assert_eq!(rewritten, ".a { background: url('/s.svg#0'); }");
        // the source stylesheet is untouched
        assert!(fs::read_to_string(&css).unwrap().contains("icon.svg"));
    }

    #[test]
    fn unresolved_directive_warns_and_is_skipped() {
        let temp = TempDir::new().unwrap();
        let css = temp.path().join("a.css");
        fs::write(&css, ".a { background: url('gone.svg'); }").unwrap();
        let css = css.to_string_lossy().to_string();

        let sink = RecordingSink::new();
        let output = RewriteEngine::new(&sink)
            .rewrite_stylesheet(&css, &[resolved("gone.svg", None, &css)])
            .unwrap()
            .unwrap();

        assert_eq!(sink.of_kind(MessageKind::EmptyReplacement).len(), 1);
        assert!(fs::read_to_string(output).unwrap().contains("gone.svg"));
    }

    #[test]
    fn empty_stylesheet_warns_and_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let css = temp.path().join("a.css");
        fs::write(&css, "   \n\t").unwrap();
        let css = css.to_string_lossy().to_string();

        let sink = RecordingSink::new();
        let output = RewriteEngine::new(&sink)
            .rewrite_stylesheet(&css, &[resolved("icon.svg", Some("/s.svg#0"), &css)])
            .unwrap();

        assert_eq!(output, None);
        assert_eq!(sink.of_kind(MessageKind::EmptyStylesheet).len(), 1);
        assert!(!Path::new(&output_path(&css)).exists());
    }

    #[test]
    fn no_directives_is_a_silent_skip() {
        let sink = RecordingSink::new();
        let output = RewriteEngine::new(&sink)
            .rewrite_stylesheet("never/read.css", &[])
            .unwrap();
        assert_eq!(output, None);
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn substitutions_apply_sequentially() {
        let temp = TempDir::new().unwrap();
        let css = temp.path().join("a.css");
        fs::write(&css, ".a { background: url('one.svg'); } .b { background: url('two.svg'); }")
            .unwrap();
        let css = css.to_string_lossy().to_string();

        let sink = RecordingSink::new();
        let output = RewriteEngine::new(&sink)
            .rewrite_stylesheet(
                &css,
                &[
                    resolved("one.svg", Some("/s.svg#0"), &css),
                    resolved("two.svg", Some("/s.svg#1"), &css),
                ],
            )
            .unwrap()
            .unwrap();

        let rewritten = fs::read_to_string(output).unwrap();
        assert!(rewritten.contains("/s.svg#0"));
        assert!(rewritten.contains("/s.svg#1"));
    }
}
