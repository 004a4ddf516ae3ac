//! Composite sprite assembly.
//!
//! One assembler run takes the scanned directives of a single destination
//! sprite, validates the deduplicated source assets, merges the accepted
//! ones into one composite SVG document, and hands back resolved directives
//! carrying each asset's fragment reference.
//!
//! The composite hides every `icon`-classed element by default and reveals
//! one at a time through the `:target` pseudo-class, so a fragment like
//! `sprite.svg#2` renders exactly one icon.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::config::SpriteConfig;
use crate::messages::{MessageKind, MessageSink};
use crate::models::{ResolvedDirective, ScannedDirective};
use crate::paths;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Fixed show/hide-by-target rule embedded in every composite.
const SPRITE_STYLE_RULES: &str = "\n.icon {\n  display: none;\n}\n.icon:target {\n  display: inline;\n}\n";

/// Unrecoverable failure while assembling a sprite. Aborts the run.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("failed to read svg asset {path}: {source}")]
    ReadAsset {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed xml in {path}: {source}")]
    Xml {
        path: String,
        #[source]
        source: quick_xml::Error,
    },
    #[error("failed to serialize sprite {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create sprite directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write sprite {path}: {source}")]
    WriteSprite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Structural reasons an asset is rejected from a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SvgDefect {
    /// A `path` element is a direct child of the root.
    TopLevelPath,
    /// More than one `g` element is a direct child of the root.
    MultipleTopLevelGroups,
    /// No `g` element anywhere; there is nothing to address by fragment.
    NoGroup,
}

impl fmt::Display for SvgDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgDefect::TopLevelPath => {
                write!(f, "<svg> contains a <path> element as a direct child")
            }
            SvgDefect::MultipleTopLevelGroups => {
                write!(f, "<svg> contains multiple <g> elements as direct children")
            }
            SvgDefect::NoGroup => write!(f, "<svg> contains no <g> element"),
        }
    }
}

struct LoadedAsset {
    path: String,
    content: String,
}

enum AppendError {
    Read(quick_xml::Error),
    Write(std::io::Error),
}

pub struct SpriteAssembler<'a> {
    config: &'a SpriteConfig,
    sink: &'a dyn MessageSink,
}

impl<'a> SpriteAssembler<'a> {
    pub fn new(config: &'a SpriteConfig, sink: &'a dyn MessageSink) -> Self {
        Self { config, sink }
    }

    /// Assemble the composite for `destination` and resolve its directives.
    ///
    /// No-op on an empty directive list. Assets that are missing or fail
    /// validation are dropped with a warning; their directives come back
    /// unresolved. The composite is written even if every asset was
    /// dropped, so a non-empty group always yields exactly one document.
    pub fn assemble(
        &self,
        destination: &str,
        directives: &[ScannedDirective],
    ) -> Result<Vec<ResolvedDirective>, AssembleError> {
        if directives.is_empty() {
            return Ok(Vec::new());
        }

        // Deduplicate assets, preserving first-seen order.
        let mut candidates: Vec<&str> = Vec::new();
        for directive in directives {
            if !candidates.contains(&directive.source_asset.as_str()) {
                candidates.push(directive.source_asset.as_str());
            }
        }

        let mut accepted: Vec<LoadedAsset> = Vec::new();
        for asset in candidates {
            let path = Path::new(asset);
            if !path.exists() {
                self.sink.warning(
                    MessageKind::MissingSourceAsset,
                    &format!("{asset} does not exist"),
                );
                continue;
            }
            let content = fs::read_to_string(path).map_err(|source| AssembleError::ReadAsset {
                path: asset.to_string(),
                source,
            })?;
            let defect = classify(&content).map_err(|source| AssembleError::Xml {
                path: asset.to_string(),
                source,
            })?;
            match defect {
                Some(defect) => self.sink.warning(
                    MessageKind::MalformedSvgSource,
                    &format!("{asset}: {defect}, dropped from sprite"),
                ),
                None => accepted.push(LoadedAsset { path: asset.to_string(), content }),
            }
        }

        let composite = self.render_composite(destination, &accepted)?;
        self.persist(destination, &composite)?;

        // Ordinal IDs are the rank among accepted assets, so a rejected
        // candidate never leaves a gap in the fragment numbering.
        let document_root = paths::canonicalize_slashes(&self.config.effective_document_root());
        let sprite_path = paths::relative_from(&document_root, destination);
        let mut references: HashMap<&str, String> = HashMap::new();
        for (ordinal, asset) in accepted.iter().enumerate() {
            references.insert(asset.path.as_str(), format!("/{sprite_path}#{ordinal}"));
        }

        Ok(directives
            .iter()
            .map(|directive| ResolvedDirective {
                reference: references.get(directive.source_asset.as_str()).cloned(),
                scanned: directive.clone(),
            })
            .collect())
    }

    fn render_composite(
        &self,
        destination: &str,
        accepted: &[LoadedAsset],
    ) -> Result<Vec<u8>, AssembleError> {
        let serialize = |source: std::io::Error| AssembleError::Serialize {
            path: destination.to_string(),
            source,
        };

        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
            .map_err(&serialize)?;

        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NS));
        root.push_attribute(("xmlns:xlink", XLINK_NS));
        writer.write_event(Event::Start(root)).map_err(&serialize)?;

        writer.write_event(Event::Start(BytesStart::new("defs"))).map_err(&serialize)?;
        writer.write_event(Event::Start(BytesStart::new("style"))).map_err(&serialize)?;
        writer
            .write_event(Event::Text(BytesText::new(SPRITE_STYLE_RULES)))
            .map_err(&serialize)?;
        writer.write_event(Event::End(BytesEnd::new("style"))).map_err(&serialize)?;
        writer.write_event(Event::End(BytesEnd::new("defs"))).map_err(&serialize)?;

        for (ordinal, asset) in accepted.iter().enumerate() {
            append_asset(&mut writer, &asset.content, ordinal).map_err(|e| match e {
                AppendError::Read(source) => AssembleError::Xml {
                    path: asset.path.clone(),
                    source,
                },
                AppendError::Write(source) => serialize(source),
            })?;
        }

        writer.write_event(Event::End(BytesEnd::new("svg"))).map_err(&serialize)?;
        Ok(writer.into_inner())
    }

    fn persist(&self, destination: &str, composite: &[u8]) -> Result<(), AssembleError> {
        let dest_path = Path::new(destination);
        if let Some(parent) = dest_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| AssembleError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }
        fs::write(dest_path, composite).map_err(|source| AssembleError::WriteSprite {
            path: destination.to_string(),
            source,
        })
    }
}

/// Walk the direct children of the root element and report the first
/// structural defect, if any.
fn classify(content: &str) -> Result<Option<SvgDefect>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    let mut depth = 0usize;
    let mut top_level_groups = 0usize;
    let mut has_any_group = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if let Some(defect) =
                    inspect_child(&element, depth, &mut top_level_groups, &mut has_any_group)
                {
                    return Ok(Some(defect));
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if let Some(defect) =
                    inspect_child(&element, depth, &mut top_level_groups, &mut has_any_group)
                {
                    return Ok(Some(defect));
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if has_any_group {
        Ok(None)
    } else {
        Ok(Some(SvgDefect::NoGroup))
    }
}

fn inspect_child(
    element: &BytesStart<'_>,
    depth: usize,
    top_level_groups: &mut usize,
    has_any_group: &mut bool,
) -> Option<SvgDefect> {
    let name = element.local_name();
    let name = name.as_ref();
    let is_group = name.eq_ignore_ascii_case(b"g");
    if is_group {
        *has_any_group = true;
    }
    // depth 1 means a direct child of the root element
    if depth == 1 {
        if name.eq_ignore_ascii_case(b"path") {
            return Some(SvgDefect::TopLevelPath);
        }
        if is_group {
            *top_level_groups += 1;
            if *top_level_groups > 1 {
                return Some(SvgDefect::MultipleTopLevelGroups);
            }
        }
    }
    None
}

/// Copy the asset's entire root element into the composite, tagging the
/// first `g` element in document order with `id="<ordinal>" class="icon"`.
/// The XML prolog and anything outside the root element are not copied.
fn append_asset(
    writer: &mut Writer<Vec<u8>>,
    content: &str,
    ordinal: usize,
) -> Result<(), AppendError> {
    let mut reader = Reader::from_str(content);
    let mut started = false;
    let mut depth = 0usize;
    let mut tagged = false;

    loop {
        let event = reader.read_event().map_err(AppendError::Read)?;
        match event {
            Event::Eof => break,
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Start(element) => {
                if !started {
                    started = true;
                    depth = 1;
                    writer.write_event(Event::Start(element)).map_err(AppendError::Write)?;
                    continue;
                }
                depth += 1;
                if !tagged && is_group(&element) {
                    tagged = true;
                    writer
                        .write_event(Event::Start(retag_group(&element, ordinal)))
                        .map_err(AppendError::Write)?;
                } else {
                    writer.write_event(Event::Start(element)).map_err(AppendError::Write)?;
                }
            }
            Event::Empty(element) => {
                if !started {
                    continue;
                }
                if !tagged && is_group(&element) {
                    tagged = true;
                    writer
                        .write_event(Event::Empty(retag_group(&element, ordinal)))
                        .map_err(AppendError::Write)?;
                } else {
                    writer.write_event(Event::Empty(element)).map_err(AppendError::Write)?;
                }
            }
            Event::End(end) => {
                if !started {
                    continue;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(end)).map_err(AppendError::Write)?;
                if depth == 0 {
                    break;
                }
            }
            other => {
                if started {
                    writer.write_event(other).map_err(AppendError::Write)?;
                }
            }
        }
    }

    Ok(())
}

fn is_group(element: &BytesStart<'_>) -> bool {
    element.local_name().as_ref().eq_ignore_ascii_case(b"g")
}

/// Rebuild a `g` start tag with `id` and `class` replaced, other
/// attributes preserved in order.
fn retag_group(element: &BytesStart<'_>, ordinal: usize) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut tagged = BytesStart::new(name);
    for attribute in element.attributes().flatten() {
        let key = attribute.key.as_ref();
        if key == b"id" || key == b"class" {
            continue;
        }
        tagged.push_attribute(attribute);
    }
    tagged.push_attribute(("id", ordinal.to_string().as_str()));
    tagged.push_attribute(("class", "icon"));
    tagged
}
