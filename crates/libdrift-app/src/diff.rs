use crate::check::manifest_source;
use crate::checkout::{RevisionSource, with_base_revision};
use crate::config::{ConfigInput, load_effective_config};
use crate::report::build_report;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use libdrift_domain::model::{Aliases, LibraryFilter, RepositorySnapshot};
use libdrift_repo::ManifestSource;
use libdrift_settings::{EffectiveConfig, Overrides, RepoSettings};
use libdrift_types::{LibdriftReport, RepoPath, RunGit};
use time::OffsetDateTime;

/// What the current manifest is compared against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BaseSource {
    /// A revision materialized through the [`RevisionSource`].
    Revision(String),
    /// A manifest file already checked out somewhere; no version control is involved.
    Manifest(Utf8PathBuf),
}

#[derive(Clone, Debug)]
pub struct DiffInput<'a> {
    pub repo_root: &'a Utf8Path,
    pub config_text: Option<&'a str>,
    pub overrides: Overrides,
    /// Manifest to diff; defaults to the configured `current` repository.
    pub manifest: Option<RepoPath>,
    /// Defaults to `<remote>/<base_ref>`.
    pub base: Option<BaseSource>,
    pub git: Option<RunGit>,
}

#[derive(Clone, Debug)]
pub struct DiffOutput {
    pub report: LibdriftReport,
    pub config: EffectiveConfig,
    /// Name of the repository that was diffed.
    pub repository: String,
}

/// Revision drift of one manifest against its base.
pub fn run_diff<S: RevisionSource + ?Sized>(
    input: DiffInput<'_>,
    vcs: &S,
) -> anyhow::Result<DiffOutput> {
    let started_at = OffsetDateTime::now_utc();

    let has_manifest = input.manifest.is_some() || !input.overrides.manifests.is_empty();
    let config = load_effective_config(ConfigInput {
        config_text: input.config_text,
        overrides: input.overrides,
        has_manifest,
    })?;

    let current = select_current(&config, input.manifest.as_ref())?;
    let filter = LibraryFilter::with_aliases(&config.tracked, &current.aliases);
    let source = manifest_source(&current);

    let head = libdrift_repo::load_snapshot(input.repo_root, &source, &filter)
        .with_context(|| format!("load current manifest of {}", current.name))?;

    let (base, base_revision) = match input.base {
        Some(BaseSource::Manifest(file)) => {
            let snapshot = libdrift_repo::load_snapshot_from(&file, &source, &filter)
                .with_context(|| format!("load base manifest {file}"))?;
            (snapshot, file.to_string())
        }
        Some(BaseSource::Revision(rev)) => {
            let snapshot = load_at_revision(vcs, input.repo_root, &rev, &source, &filter, &head)?;
            (snapshot, rev)
        }
        None => {
            let rev = config.base_revision();
            let snapshot = load_at_revision(vcs, input.repo_root, &rev, &source, &filter, &head)?;
            (snapshot, rev)
        }
    };

    let domain = libdrift_domain::evaluate_revision(&head, &base, &config.tracked);
    let report = build_report(domain, started_at, input.git, Some(base_revision));

    Ok(DiffOutput {
        report,
        repository: current.name,
        config,
    })
}

fn load_at_revision<S: RevisionSource + ?Sized>(
    vcs: &S,
    root: &Utf8Path,
    revision: &str,
    source: &ManifestSource,
    filter: &LibraryFilter<'_>,
    head: &RepositorySnapshot,
) -> anyhow::Result<RepositorySnapshot> {
    let loaded = with_base_revision(vcs, root, revision, &source.manifest, || {
        libdrift_repo::load_snapshot(root, source, filter).map_err(anyhow::Error::from)
    })
    .with_context(|| format!("load {} at {revision}", source.manifest))?;

    Ok(loaded.unwrap_or_else(|| {
        RepositorySnapshot::absent(head.repository.clone(), head.manifest.clone(), head.format)
    }))
}

/// The explicit `--manifest`, else `current`, else the only configured repository.
fn select_current(
    config: &EffectiveConfig,
    manifest: Option<&RepoPath>,
) -> anyhow::Result<RepoSettings> {
    if let Some(m) = manifest {
        if let Some(repo) = config.repo_for_manifest(m) {
            return Ok(repo.clone());
        }
        return Ok(RepoSettings {
            name: ManifestSource::new(m.clone()).repository_name(),
            manifest: m.clone(),
            format: None,
            aliases: Aliases::new(),
        });
    }

    if let Some(name) = config.current.as_deref() {
        return config
            .repo(name)
            .cloned()
            .with_context(|| format!("`current` names an unknown repository: {name}"));
    }

    match config.repos.as_slice() {
        [only] => Ok(only.clone()),
        [] => anyhow::bail!("no manifest to diff (pass --manifest or configure [[repos]])"),
        _ => anyhow::bail!(
            "{} repositories configured; set `current` in libdrift.toml or pass --manifest",
            config.repos.len()
        ),
    }
}
