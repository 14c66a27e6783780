use crate::model::{
    LibraryId, RepositorySnapshot, TrackedLibraries, Version, VersionMapping,
};
use libdrift_types::{ManifestFormat, RepoPath};

pub fn tracked(ids: &[&str]) -> TrackedLibraries {
    TrackedLibraries::new(ids.iter().copied())
}

pub fn mapping(entries: &[(&str, &str)]) -> VersionMapping {
    entries
        .iter()
        .map(|(l, v)| (LibraryId::new(*l), Version::new(*v)))
        .collect()
}

/// Parsed Maven snapshot at `<repo>/pom.xml`. Entries bypass the tracked filter on purpose.
pub fn snapshot(repo: &str, entries: &[(&str, &str)]) -> RepositorySnapshot {
    RepositorySnapshot::parsed(
        repo,
        RepoPath::new(format!("{repo}/pom.xml")),
        ManifestFormat::Maven,
        mapping(entries),
    )
}

pub fn ivy_snapshot(repo: &str, entries: &[(&str, &str)]) -> RepositorySnapshot {
    RepositorySnapshot::parsed(
        repo,
        RepoPath::new(format!("{repo}/ivy.xml")),
        ManifestFormat::Ivy,
        mapping(entries),
    )
}

pub fn absent(repo: &str) -> RepositorySnapshot {
    RepositorySnapshot::absent(
        repo,
        RepoPath::new(format!("{repo}/pom.xml")),
        ManifestFormat::Maven,
    )
}
