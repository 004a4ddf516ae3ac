//! Path normalization for sprite and stylesheet locations.
//!
//! All sprite bookkeeping happens on forward-slash strings, independent of
//! the platform separator. Canonicalization is purely lexical: `.` and `..`
//! components are folded without touching the filesystem, so destination
//! sprites that do not exist yet can still be normalized and compared.

/// Replace backslash separators with forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically canonicalize a path: normalize separators, drop `.` and empty
/// components, and fold `..` against preceding components.
///
/// Leading `..` components of a relative path are preserved; an absolute
/// path cannot climb above its root.
pub fn canonicalize_slashes(path: &str) -> String {
    let normalized = normalize_separators(path);
    let absolute = normalized.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for component in normalized.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&"..") => parts.push(".."),
                Some(_) => {
                    parts.pop();
                }
                None => {
                    if !absolute {
                        parts.push("..");
                    }
                }
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Join two path fragments with exactly one `/` between them.
///
/// An empty first fragment yields the second unchanged, so a relative
/// location under an unset document root stays relative.
pub fn connect(first: &str, second: &str) -> String {
    let head = normalize_separators(first);
    let tail = normalize_separators(second);
    if head.is_empty() {
        return tail;
    }
    if head.ends_with('/') || tail.starts_with('/') {
        format!("{head}{tail}")
    } else {
        format!("{head}/{tail}")
    }
}

/// Compute `target` relative to the directory `base`, both given as
/// slash-normalized paths. Shared leading components are stripped and each
/// remaining `base` component becomes a `..` hop.
pub fn relative_from(base: &str, target: &str) -> String {
    let base = canonicalize_slashes(base);
    let target = canonicalize_slashes(target);

    let base_parts: Vec<&str> = base.split('/').filter(|c| !c.is_empty()).collect();
    let target_parts: Vec<&str> = target.split('/').filter(|c| !c.is_empty()).collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(base_parts.len() - common + target_parts.len());
    for _ in common..base_parts.len() {
        parts.push("..");
    }
    parts.extend(&target_parts[common..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        assert_eq!(normalize_separators(r"a\b\c.css"), "a/b/c.css");
    }

    #[test]
    fn canonicalize_folds_dot_and_dotdot() {
        assert_eq!(canonicalize_slashes("a/./b/../c"), "a/c");
        assert_eq!(canonicalize_slashes("a//b///c"), "a/b/c");
        assert_eq!(canonicalize_slashes("/root/x/../y"), "/root/y");
    }

    #[test]
    fn canonicalize_keeps_leading_parent_hops() {
        assert_eq!(canonicalize_slashes("../../img/icon.svg"), "../../img/icon.svg");
        assert_eq!(canonicalize_slashes("a/../../b"), "../b");
    }

    #[test]
    fn canonicalize_cannot_climb_above_root() {
        assert_eq!(canonicalize_slashes("/../a"), "/a");
    }

    #[test]
    fn canonicalize_mixed_separators() {
        assert_eq!(canonicalize_slashes(r"css\..\img\icon.svg"), "img/icon.svg");
    }

    #[test]
    fn connect_inserts_single_slash() {
        assert_eq!(connect("a", "b"), "a/b");
        assert_eq!(connect("a/", "b"), "a/b");
        assert_eq!(connect("a", "/b"), "a/b");
        assert_eq!(connect("a/", "/b"), "a//b");
    }

    #[test]
    fn connect_with_empty_head_stays_relative() {
        assert_eq!(connect("", "sprites/a.svg"), "sprites/a.svg");
    }

    #[test]
    fn relative_from_strips_common_prefix() {
        assert_eq!(relative_from("/site", "/site/img/sprite.svg"), "img/sprite.svg");
    }

    #[test]
    fn relative_from_climbs_out_of_base() {
        assert_eq!(relative_from("/site/css", "/site/img/sprite.svg"), "../img/sprite.svg");
    }

    #[test]
    fn relative_from_same_path_is_dot() {
        assert_eq!(relative_from("/site", "/site"), ".");
    }
}
