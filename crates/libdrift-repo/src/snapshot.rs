use crate::format::detect_format;
use crate::parse::{MalformedManifest, parse_manifest};
use camino::{Utf8Path, Utf8PathBuf};
use libdrift_domain::model::{LibraryFilter, RepositorySnapshot};
use libdrift_types::{ManifestFormat, RepoPath, ids};

/// Where one repository's manifest lives, and how to read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestSource {
    pub repository: Option<String>,
    pub manifest: RepoPath,
    /// Overrides file-name detection.
    pub format: Option<ManifestFormat>,
}

impl ManifestSource {
    pub fn new(manifest: impl Into<RepoPath>) -> Self {
        Self {
            repository: None,
            manifest: manifest.into(),
            format: None,
        }
    }

    pub fn named(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_format(mut self, format: ManifestFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Explicit name, else the manifest's parent directory, else `main`.
    pub fn repository_name(&self) -> String {
        self.repository
            .clone()
            .or_else(|| self.manifest.parent_dir_name().map(str::to_string))
            .unwrap_or_else(|| ids::DEFAULT_REPOSITORY_NAME.to_string())
    }

    pub fn resolve_format(&self) -> Result<ManifestFormat, SnapshotError> {
        self.format
            .or_else(|| detect_format(&self.manifest))
            .ok_or_else(|| SnapshotError::UnknownFormat {
                path: self.manifest.clone(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(
        "unknown manifest format for {path} (expected pom.xml, *.pom, ivy.xml or ivy-*.xml, or an explicit format)"
    )]
    UnknownFormat { path: RepoPath },

    #[error("malformed manifest {path}")]
    Malformed {
        path: RepoPath,
        #[source]
        source: MalformedManifest,
    },

    #[error("failed to read manifest {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load `source.manifest`, resolved against `root`.
pub fn load_snapshot(
    root: &Utf8Path,
    source: &ManifestSource,
    filter: &LibraryFilter<'_>,
) -> Result<RepositorySnapshot, SnapshotError> {
    let file = root.join(source.manifest.as_utf8_path());
    load_snapshot_from(&file, source, filter)
}

/// Load a snapshot from `file` while reporting it as `source.manifest`.
///
/// Used for a base revision that was already materialized somewhere else on disk.
pub fn load_snapshot_from(
    file: &Utf8Path,
    source: &ManifestSource,
    filter: &LibraryFilter<'_>,
) -> Result<RepositorySnapshot, SnapshotError> {
    // Before any IO: an unknown format is a usage error even if the file is missing.
    let format = source.resolve_format()?;
    let repository = source.repository_name();

    let bytes = match std::fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%repository, manifest = %source.manifest, "manifest absent");
            return Ok(RepositorySnapshot::absent(
                repository,
                source.manifest.clone(),
                format,
            ));
        }
        Err(source_err) => {
            return Err(SnapshotError::Io {
                path: file.to_path_buf(),
                source: source_err,
            });
        }
    };

    let versions =
        parse_manifest(&bytes, format, filter).map_err(|e| SnapshotError::Malformed {
            path: source.manifest.clone(),
            source: e,
        })?;

    tracing::debug!(
        %repository,
        manifest = %source.manifest,
        %format,
        libraries = versions.len(),
        "loaded manifest"
    );
    Ok(RepositorySnapshot::parsed(
        repository,
        source.manifest.clone(),
        format,
        versions,
    ))
}
