//! Repository adapters: detect manifest formats, read and parse Maven/Ivy manifests.
//!
//! This crate is allowed to do filesystem IO. It should not spawn external processes;
//! materializing an older revision of a manifest is the caller's job.

#![forbid(unsafe_code)]

mod format;
mod parse;
mod snapshot;

pub use format::detect_format;
pub use parse::{MAVEN_POM_NS, MalformedManifest, parse_manifest};
pub use snapshot::{ManifestSource, SnapshotError, load_snapshot, load_snapshot_from};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;
    use libdrift_domain::model::{LibraryFilter, TrackedLibraries};
    use libdrift_types::ManifestFormat;

    fn fuzz_tracked() -> TrackedLibraries {
        TrackedLibraries::new(["Util", "common", "occupancy", "fire-rating", "csm", "rating"])
    }

    /// Parse arbitrary bytes as a Maven POM.
    ///
    /// Returns the number of tracked libraries found. **Never panics** on any input.
    pub fn parse_maven(data: &[u8]) -> anyhow::Result<usize> {
        let tracked = fuzz_tracked();
        let m = parse_manifest(data, ManifestFormat::Maven, &LibraryFilter::new(&tracked))?;
        Ok(m.len())
    }

    /// Parse arbitrary bytes as an Ivy module descriptor. **Never panics** on any input.
    pub fn parse_ivy(data: &[u8]) -> anyhow::Result<usize> {
        let tracked = fuzz_tracked();
        let m = parse_manifest(data, ManifestFormat::Ivy, &LibraryFilter::new(&tracked))?;
        Ok(m.len())
    }
}
