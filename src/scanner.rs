//! Pattern-based scanning of raw stylesheet text.
//!
//! The scanner does not parse CSS; it extracts declarations of known shapes
//! from free-form text, the same way the rest of the pipeline treats
//! stylesheets as opaque strings to be rewritten literally.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// A `{ ... }` rule block.
pub const CSS_DEFINITION: &str = r"\{[^{}]*\}";
/// A `/* ... */` comment block, possibly spanning lines.
pub const CSS_COMMENT: &str = r"(?s)/\*.*?\*/";
/// A sprite-location directive, e.g. `svg-sprite-image: url(../s.svg);`.
pub const SPRITE_IMAGE_DIRECTIVE: &str = r"svg-sprite-image\s*:[^;]*;";
/// Exclusion declaration inside a rule's trailing comment.
pub const EXCLUDE_FROM_SPRITE: &str = r"exclude-from-sprite\s*:\s*true";
/// Any qualifying image-url declaration with a `.svg` target, captured
/// through the end of its line so the trailing comment rides along.
pub const SVG_IMAGE_RULE: &str =
    r#"(background(-image)?|(-webkit-)?mask-image)\s*:\s*url.*\.svg['")].*"#;

const TRAILING_COMMENT: &str = r"/\*.*";
const IMPORTANT_TAG: &str = r"!important\s*;";

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// Compiled [`SPRITE_IMAGE_DIRECTIVE`].
pub fn directive_rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, SPRITE_IMAGE_DIRECTIVE)
}

/// Compiled [`SVG_IMAGE_RULE`].
pub fn image_rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, SVG_IMAGE_RULE)
}

/// Compiled [`CSS_DEFINITION`].
pub fn definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, CSS_DEFINITION)
}

/// Compiled [`CSS_COMMENT`].
pub fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, CSS_COMMENT)
}

fn trailing_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, TRAILING_COMMENT)
}

fn important_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, IMPORTANT_TAG)
}

/// Scanning failure on text that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The rule text carries no `url(...)` literal.
    #[error("no url(...) literal in rule: {0}")]
    MissingUrl(String),
    /// The `url(` opener is never closed.
    #[error("unterminated url(...) literal in rule: {0}")]
    UnterminatedUrl(String),
}

/// All non-overlapping matches of `pattern` in `text`, in order.
pub fn extract_matches<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern.find_iter(text).map(|m| m.as_str()).collect()
}

/// The literal inside the first `url(...)` of `rule_text`, quotes stripped.
///
/// Rule text that never matched a url-bearing pattern yields a [`ScanError`]
/// rather than slicing blind.
pub fn extract_url_content(rule_text: &str) -> Result<String, ScanError> {
    let start = rule_text
        .find("url(")
        .ok_or_else(|| ScanError::MissingUrl(rule_text.to_string()))?;
    let rest = &rule_text[start + 4..];
    let end = rest
        .find(')')
        .ok_or_else(|| ScanError::UnterminatedUrl(rule_text.to_string()))?;
    Ok(rest[..end].trim().replace(['\'', '"'], ""))
}

/// Concatenation of every comment-shaped suffix in `rule_text`. A rule can
/// carry more than one trailing comment; all of them count.
pub fn extract_trailing_comment(rule_text: &str) -> String {
    trailing_comment_re()
        .find_iter(rule_text)
        .map(|m| m.as_str())
        .collect()
}

/// Whether a comment opts its rule out of sprite generation.
pub fn is_excluded(comment_text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, EXCLUDE_FROM_SPRITE).is_match(comment_text)
}

/// Whether the rule text ends its declaration with `!important`.
pub fn has_important(rule_text: &str) -> bool {
    important_re().is_match(rule_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_matches_in_order() {
        let css = ".a { color: red; } .b { color: blue; }";
        let blocks = extract_matches(definition_re(), css);
        assert_eq!(blocks, vec!["{ color: red; }", "{ color: blue; }"]);
    }

    #[test]
    fn comment_block_matches_across_lines() {
        let css = "/* a\n b */ .x {} /* c */";
        let comments = extract_matches(comment_re(), css);
        assert_eq!(comments, vec!["/* a\n b */", "/* c */"]);
    }

    #[test]
    fn image_rule_matches_all_four_properties() {
        let css = "\
.a { background: url('a.svg'); }
.b { background-image: url(\"b.svg\"); }
.c { mask-image: url(c.svg); }
.d { -webkit-mask-image: url('d.svg'); }
.e { background-image: url('e.png'); }";
        let rules = extract_matches(image_rule_re(), css);
        assert_eq!(rules.len(), 4);
        assert!(rules[0].starts_with("background"));
        assert!(rules[3].starts_with("-webkit-mask-image"));
    }

    #[test]
    fn image_rule_captures_through_trailing_comment() {
        let css = "background-image: url('a.svg'); /* exclude-from-sprite: true */";
        let rules = extract_matches(image_rule_re(), css);
        assert_eq!(rules, vec![css]);
    }

    #[test]
    fn directive_rule_matches_inside_comment() {
        let css = "/* svg-sprite-image: url('../sprites/all.svg'); */\n.a {}";
        let rules = extract_matches(directive_rule_re(), css);
        assert_eq!(rules, vec!["svg-sprite-image: url('../sprites/all.svg');"]);
    }

    #[test]
    fn url_content_strips_quotes() {
        assert_eq!(extract_url_content("background: url('a.svg');").unwrap(), "a.svg");
        assert_eq!(extract_url_content("background: url(\"a.svg\");").unwrap(), "a.svg");
        assert_eq!(extract_url_content("background: url(a.svg);").unwrap(), "a.svg");
    }

    #[test]
    fn url_content_rejects_text_without_url() {
        assert_eq!(
            extract_url_content("color: red;"),
            Err(ScanError::MissingUrl("color: red;".to_string()))
        );
    }

    #[test]
    fn url_content_rejects_unterminated_url() {
        assert!(matches!(
            extract_url_content("background: url('a.svg"),
            Err(ScanError::UnterminatedUrl(_))
        ));
    }

    #[test]
    fn trailing_comment_concatenates_multiple_comments() {
        let rule = "background: url('a.svg'); /* one */ /* two */";
        assert_eq!(extract_trailing_comment(rule), "/* one */ /* two */");
    }

    #[test]
    fn trailing_comment_empty_when_absent() {
        assert_eq!(extract_trailing_comment("background: url('a.svg');"), "");
    }

    #[test]
    fn exclusion_is_whitespace_insensitive() {
        assert!(is_excluded("/* exclude-from-sprite: true */"));
        assert!(is_excluded("/*exclude-from-sprite:true*/"));
        assert!(is_excluded("/* exclude-from-sprite  :  true */"));
        assert!(!is_excluded("/* exclude-from-sprite: false */"));
        assert!(!is_excluded("/* keep me */"));
    }

    #[test]
    fn important_detection() {
        assert!(has_important("background: url('a.svg') !important;"));
        assert!(has_important("background: url('a.svg') !important ;"));
        assert!(!has_important("background: url('a.svg');"));
    }
}
