//! Manifest parsing: XML bytes -> tracked library versions.
//!
//! Both formats share the same well-formedness rules, so a document that is not XML fails
//! the same way no matter which parser reads it.

mod ivy;
mod maven;

pub use maven::MAVEN_POM_NS;

use libdrift_domain::model::{LibraryFilter, Version, VersionMapping};
use libdrift_types::ManifestFormat;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesRef, BytesStart};
use std::collections::BTreeMap;
use std::fmt;

/// The manifest is not well-formed XML.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct MalformedManifest {
    pub reason: String,
}

impl MalformedManifest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

fn malformed(err: impl fmt::Display) -> MalformedManifest {
    MalformedManifest::new(err.to_string())
}

/// Parse one manifest. Dependencies outside the filter, or missing a name or version, are
/// skipped; a document that is not well-formed is an error.
pub fn parse_manifest(
    bytes: &[u8],
    format: ManifestFormat,
    filter: &LibraryFilter<'_>,
) -> Result<VersionMapping, MalformedManifest> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| MalformedManifest::new(format!("manifest is not valid UTF-8: {e}")))?;

    match format {
        ManifestFormat::Maven => maven::parse(text, filter),
        ManifestFormat::Ivy => ivy::parse(text, filter),
    }
}

/// Element nesting bookkeeping shared by the format parsers.
#[derive(Debug, Default)]
struct Structure {
    depth: usize,
    root_seen: bool,
}

impl Structure {
    /// Enter an element; returns its depth (root = 1).
    fn open(&mut self) -> Result<usize, MalformedManifest> {
        if self.depth == 0 {
            if self.root_seen {
                return Err(MalformedManifest::new("more than one root element"));
            }
            self.root_seen = true;
        }
        self.depth += 1;
        Ok(self.depth)
    }

    fn close(&mut self) -> Result<(), MalformedManifest> {
        if self.depth == 0 {
            return Err(MalformedManifest::new("closing tag without an open element"));
        }
        self.depth -= 1;
        Ok(())
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn text(&self, text: &str) -> Result<(), MalformedManifest> {
        if self.depth == 0 && !text.trim().is_empty() {
            return Err(MalformedManifest::new("text outside the root element"));
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), MalformedManifest> {
        if !self.root_seen {
            return Err(MalformedManifest::new("document has no root element"));
        }
        if self.depth != 0 {
            return Err(MalformedManifest::new(format!(
                "unexpected end of document: {} element(s) left open",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Attributes are parsed lazily by quick-xml; walk them so broken ones surface as errors.
fn check_attributes(e: &BytesStart<'_>) -> Result<(), MalformedManifest> {
    for attr in e.attributes() {
        attr.map_err(malformed)?;
    }
    Ok(())
}

/// General entities from the internal DTD subset, on top of the five predefined ones.
///
/// Only internal text entities are expanded. External entities are never fetched, so a
/// reference to one is reported as undefined.
#[derive(Debug, Default)]
struct Entities(BTreeMap<String, String>);

impl Entities {
    const DECL: &'static str = "<!ENTITY";

    /// Collect `<!ENTITY name "value">` declarations from the body of a `<!DOCTYPE ...>`.
    fn from_doctype(doctype: &str) -> Result<Self, MalformedManifest> {
        let mut entities = Self::default();
        let mut rest = doctype;
        while let Some(at) = rest.find(Self::DECL) {
            rest = rest[at + Self::DECL.len()..].trim_start();
            // Parameter entities only feed the DTD itself.
            if rest.starts_with('%') {
                continue;
            }
            let name_end = rest
                .find(char::is_whitespace)
                .ok_or_else(|| MalformedManifest::new("truncated entity declaration"))?;
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start();

            let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                tracing::debug!(name, "ignoring external entity declaration");
                continue;
            };
            let body = &rest[1..];
            let close = body.find(quote).ok_or_else(|| {
                MalformedManifest::new(format!("unterminated value for entity `{name}`"))
            })?;
            let raw = &body[..close];
            rest = &body[close + 1..];

            if raw.contains('<') {
                return Err(MalformedManifest::new(format!(
                    "entity `{name}` contains markup"
                )));
            }
            let value = unescape_with(raw, |n| entities.lookup(n))
                .map_err(malformed)?
                .into_owned();
            // The first declaration of a name is binding.
            entities.0.entry(name.to_string()).or_insert(value);
        }
        Ok(entities)
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.0.get(name).map(String::as_str))
    }
}

fn attribute(
    e: &BytesStart<'_>,
    name: &[u8],
    entities: &Entities,
) -> Result<Option<String>, MalformedManifest> {
    match e.try_get_attribute(name).map_err(malformed)? {
        Some(attr) => Ok(Some(
            attr.unescape_value_with(|n| entities.lookup(n))
                .map_err(malformed)?
                .into_owned(),
        )),
        None => Ok(None),
    }
}

fn resolve_reference(r: &BytesRef<'_>, entities: &Entities) -> Result<String, MalformedManifest> {
    if let Some(ch) = r.resolve_char_ref().map_err(malformed)? {
        return Ok(ch.to_string());
    }
    let name = r.decode().map_err(malformed)?;
    entities
        .lookup(&name)
        .map(str::to_string)
        .ok_or_else(|| MalformedManifest::new(format!("undefined entity `&{name};`")))
}

/// Record one declaration if it names a tracked library and carries a version.
fn declare(
    out: &mut VersionMapping,
    filter: &LibraryFilter<'_>,
    name: Option<&str>,
    version: Option<&str>,
) {
    let name = name.map(str::trim).unwrap_or_default();
    let version = version.map(str::trim).unwrap_or_default();
    if name.is_empty() || version.is_empty() {
        tracing::debug!(name, "skipping dependency without a name or version");
        return;
    }
    match filter.resolve(name) {
        Some(library) => {
            if let Some(previous) = out.insert(library.clone(), Version::new(version)) {
                tracing::debug!(%library, %previous, version, "library declared twice; last wins");
            }
        }
        None => tracing::trace!(name, "ignoring untracked dependency"),
    }
}
