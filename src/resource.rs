//! Resolution of raw CSS url literals to filesystem asset paths.
//!
//! The pipeline never interprets url literals itself; it goes through this
//! contract once per qualifying image-url rule, so embedders can plug in
//! webroot-aware or virtual-filesystem resolution.

use std::path::{Path, PathBuf};

/// Maps a raw `url(...)` literal found in a stylesheet to a real asset path.
pub trait ResourceHandler {
    fn resolve(&self, stylesheet: &Path, raw_url: &str) -> PathBuf;
}

/// Default handler: resolves url literals against the stylesheet's parent
/// directory, dropping any query string or fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemHandler;

impl ResourceHandler for FilesystemHandler {
    fn resolve(&self, stylesheet: &Path, raw_url: &str) -> PathBuf {
        let trimmed = raw_url
            .split(['?', '#'])
            .next()
            .unwrap_or(raw_url);
        match stylesheet.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(trimmed),
            _ => PathBuf::from(trimmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_to_stylesheet_dir() {
        let handler = FilesystemHandler;
        let path = handler.resolve(Path::new("site/css/a.css"), "icons/x.svg");
        assert_eq!(path, PathBuf::from("site/css/icons/x.svg"));
    }

    #[test]
    fn strips_query_and_fragment() {
        let handler = FilesystemHandler;
        let path = handler.resolve(Path::new("site/css/a.css"), "x.svg?v=2#top");
        assert_eq!(path, PathBuf::from("site/css/x.svg"));
    }

    #[test]
    fn bare_stylesheet_name_resolves_in_place() {
        let handler = FilesystemHandler;
        let path = handler.resolve(Path::new("a.css"), "x.svg");
        assert_eq!(path, PathBuf::from("x.svg"));
    }
}
