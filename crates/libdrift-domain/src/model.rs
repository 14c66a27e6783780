use libdrift_types::{ManifestFormat, RepoPath, ids};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Canonical identifier of a shared library (`common`, `fire-rating`, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryId(String);

impl LibraryId {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LibraryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LibraryId {
    fn from(value: &str) -> Self {
        LibraryId::new(value)
    }
}

/// Declared version. Opaque: two versions are either the same string or different.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(String);

impl Version {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Version::new(value)
    }
}

/// The ordered allow-list of libraries a run cares about.
///
/// Order is significant: every result is reported in this order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackedLibraries {
    order: Vec<LibraryId>,
}

impl TrackedLibraries {
    /// Builds the list, dropping blanks and repeated ids (first occurrence wins).
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let order = ids
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .map(LibraryId::new)
            .collect();
        Self { order }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryId> {
        self.order.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|l| l.as_str() == id)
    }

    pub fn get(&self, id: &str) -> Option<&LibraryId> {
        self.order.iter().find(|l| l.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.order.iter().map(|l| l.as_str().to_string()).collect()
    }
}

/// Per-repository display name -> canonical library id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Aliases(BTreeMap<String, LibraryId>);

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<A: Into<String>>(&mut self, alias: A, canonical: LibraryId) {
        self.0.insert(alias.into(), canonical);
    }

    pub fn get(&self, alias: &str) -> Option<&LibraryId> {
        self.0.get(alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LibraryId)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: Into<String>, C: AsRef<str>> FromIterator<(A, C)> for Aliases {
    fn from_iter<T: IntoIterator<Item = (A, C)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(a, c)| (a.into(), LibraryId::new(c.as_ref())))
                .collect(),
        )
    }
}

/// Decides which raw manifest names count, and under which canonical id.
#[derive(Clone, Copy, Debug)]
pub struct LibraryFilter<'a> {
    tracked: &'a TrackedLibraries,
    aliases: Option<&'a Aliases>,
}

impl<'a> LibraryFilter<'a> {
    pub fn new(tracked: &'a TrackedLibraries) -> Self {
        Self {
            tracked,
            aliases: None,
        }
    }

    pub fn with_aliases(tracked: &'a TrackedLibraries, aliases: &'a Aliases) -> Self {
        Self {
            tracked,
            aliases: Some(aliases),
        }
    }

    pub fn tracked(&self) -> &'a TrackedLibraries {
        self.tracked
    }

    /// Map a name as written in a manifest to a tracked id, if it is one.
    pub fn resolve(&self, raw: &str) -> Option<LibraryId> {
        let raw = raw.trim();
        let canonical = self
            .aliases
            .and_then(|a| a.get(raw))
            .map(|id| id.as_str())
            .unwrap_or(raw);
        self.tracked.get(canonical).cloned()
    }
}

/// Tracked library -> declared version, for one manifest at one revision.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionMapping(BTreeMap<LibraryId, Version>);

impl VersionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later declarations replace earlier ones; returns the replaced version.
    pub fn insert(&mut self, library: LibraryId, version: Version) -> Option<Version> {
        self.0.insert(library, version)
    }

    pub fn get(&self, library: &str) -> Option<&Version> {
        self.0.get(library)
    }

    pub fn contains(&self, library: &str) -> bool {
        self.0.contains_key(library)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LibraryId, &Version)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &LibraryId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(LibraryId, Version)> for VersionMapping {
    fn from_iter<T: IntoIterator<Item = (LibraryId, Version)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Parsed,
    /// The manifest file does not exist. Not an error: the repository declares nothing yet.
    Absent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub repository: String,
    pub manifest: RepoPath,
    pub format: ManifestFormat,
    pub versions: VersionMapping,
    pub presence: Presence,
}

impl RepositorySnapshot {
    pub fn parsed(
        repository: impl Into<String>,
        manifest: RepoPath,
        format: ManifestFormat,
        versions: VersionMapping,
    ) -> Self {
        Self {
            repository: repository.into(),
            manifest,
            format,
            versions,
            presence: Presence::Parsed,
        }
    }

    pub fn absent(repository: impl Into<String>, manifest: RepoPath, format: ManifestFormat) -> Self {
        Self {
            repository: repository.into(),
            manifest,
            format,
            versions: VersionMapping::new(),
            presence: Presence::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.presence == Presence::Absent
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoDeclaration {
    pub repository: String,
    pub version: Version,
}

/// A tracked library declared with two or more distinct versions across repositories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MismatchReport {
    pub library: LibraryId,
    /// Every repository that declares the library, in snapshot order.
    pub versions: Vec<RepoDeclaration>,
}

impl MismatchReport {
    /// Distinct versions in first-seen order.
    pub fn distinct_versions(&self) -> Vec<&Version> {
        let mut out: Vec<&Version> = Vec::new();
        for d in &self.versions {
            if !out.contains(&&d.version) {
                out.push(&d.version);
            }
        }
        out
    }

    pub fn version_of(&self, repository: &str) -> Option<&Version> {
        self.versions
            .iter()
            .find(|d| d.repository == repository)
            .map(|d| &d.version)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriftKind {
    Changed,
    Added,
    Removed,
}

/// One tracked library whose declaration differs between the base and current revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriftEntry {
    pub library: LibraryId,
    pub before: Option<Version>,
    pub after: Option<Version>,
}

impl DriftEntry {
    pub fn kind(&self) -> DriftKind {
        match (&self.before, &self.after) {
            (None, _) => DriftKind::Added,
            (_, None) => DriftKind::Removed,
            _ => DriftKind::Changed,
        }
    }

    /// Base version, or `NOT_FOUND` when the library is new.
    pub fn before_label(&self) -> &str {
        self.before
            .as_ref()
            .map(|v| v.as_str())
            .unwrap_or(ids::SENTINEL_NOT_FOUND)
    }

    /// Current version, or `REMOVED` when the library was dropped.
    pub fn after_label(&self) -> &str {
        self.after
            .as_ref()
            .map(|v| v.as_str())
            .unwrap_or(ids::SENTINEL_REMOVED)
    }
}
