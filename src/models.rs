//! Directive records passed between the scan, assemble, and rewrite phases.
//!
//! Each phase produces new values instead of back-patching shared state: a
//! [`ScannedDirective`] never changes once created, and sprite assembly
//! wraps it into a [`ResolvedDirective`] exactly once.
//!
//! All paths here are slash-normalized, lexically canonicalized strings
//! (see [`crate::paths`]); they double as grouping keys.

use indexmap::IndexMap;

/// A qualifying url rule captured while scanning a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDirective {
    /// Literal url content later substituted verbatim. Assumed unambiguous
    /// within its stylesheet; there is no escaping or overlap protection.
    pub matched_text: String,
    /// Whether the declaration carried a trailing `!important`.
    pub important: bool,
    /// Canonical path of the referenced SVG asset.
    pub source_asset: String,
    /// Canonical path of the stylesheet the rule came from.
    pub source_stylesheet: String,
}

/// A directive after sprite assembly.
///
/// `reference` is present iff the directive's asset was accepted into a
/// composite; directives whose asset was rejected or missing stay
/// permanently unresolved and are skipped (with a warning) at rewrite time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirective {
    pub scanned: ScannedDirective,
    /// Root-relative fragment reference, e.g. `/img/all-sprite.svg#2`.
    pub reference: Option<String>,
}

/// Destination sprite path -> scanned directives, in scan order across all
/// stylesheets. Insertion order is load-bearing: it determines which sprite
/// is assembled first and, within a group, the ordinal IDs of its assets.
pub type SpriteGroups = IndexMap<String, Vec<ScannedDirective>>;

/// Source stylesheet path -> resolved directives, preserving the original
/// relative order. Drives one output-file write per entry.
pub type RewriteSets = IndexMap<String, Vec<ResolvedDirective>>;
