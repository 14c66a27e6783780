use crate::config::{ConfigInput, load_effective_config};
use crate::report::build_report;
use anyhow::Context;
use camino::Utf8Path;
use libdrift_domain::model::LibraryFilter;
use libdrift_repo::ManifestSource;
use libdrift_settings::{EffectiveConfig, Overrides, RepoSettings};
use libdrift_types::{LibdriftReport, RunGit};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    pub repo_root: &'a Utf8Path,
    /// Contents of the config file, `None` when it does not exist.
    pub config_text: Option<&'a str>,
    pub overrides: Overrides,
    pub git: Option<RunGit>,
}

#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: LibdriftReport,
    pub config: EffectiveConfig,
}

/// Cross-repository reconciliation over every configured (or overridden) manifest.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let has_manifest = !input.overrides.manifests.is_empty();
    let config = load_effective_config(ConfigInput {
        config_text: input.config_text,
        overrides: input.overrides,
        has_manifest,
    })?;

    if config.repos.is_empty() {
        anyhow::bail!("no repositories to reconcile (add [[repos]] to libdrift.toml or pass --manifest)");
    }

    let mut snapshots = Vec::with_capacity(config.repos.len());
    for repo in &config.repos {
        let filter = LibraryFilter::with_aliases(&config.tracked, &repo.aliases);
        let snapshot = libdrift_repo::load_snapshot(input.repo_root, &manifest_source(repo), &filter)
            .with_context(|| format!("load repository {}", repo.name))?;
        snapshots.push(snapshot);
    }

    let domain = libdrift_domain::evaluate_reconcile(&snapshots, &config.tracked);
    let report = build_report(domain, started_at, input.git, None);

    Ok(CheckOutput { report, config })
}

pub(crate) fn manifest_source(repo: &RepoSettings) -> ManifestSource {
    let source = ManifestSource::new(repo.manifest.clone()).named(repo.name.clone());
    match repo.format {
        Some(format) => source.with_format(format),
        None => source,
    }
}
