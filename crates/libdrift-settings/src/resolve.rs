use crate::model::{LibdriftConfigV1, RepoConfig};
use anyhow::Context;
use libdrift_domain::model::{Aliases, LibraryId, TrackedLibraries};
use libdrift_types::{ManifestFormat, RepoPath, ids};
use std::collections::BTreeSet;

pub const DEFAULT_BASE_REF: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";

/// Command-line values; each one replaces its config counterpart when set.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub tracked: Vec<String>,
    pub base_ref: Option<String>,
    pub remote: Option<String>,
    /// Replaces `[[repos]]`. A path that matches a configured manifest keeps that entry's
    /// name, format and aliases.
    pub manifests: Vec<RepoPath>,
}

/// One repository, fully resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoSettings {
    pub name: String,
    pub manifest: RepoPath,
    pub format: Option<ManifestFormat>,
    pub aliases: Aliases,
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub tracked: TrackedLibraries,
    pub base_ref: String,
    pub remote: String,
    pub current: Option<String>,
    pub repos: Vec<RepoSettings>,
}

impl EffectiveConfig {
    /// `<remote>/<base_ref>`, the revision `diff` compares against by default.
    pub fn base_revision(&self) -> String {
        format!("{}/{}", self.remote, self.base_ref)
    }

    pub fn repo(&self, name: &str) -> Option<&RepoSettings> {
        self.repos.iter().find(|r| r.name == name)
    }

    pub fn repo_for_manifest(&self, manifest: &RepoPath) -> Option<&RepoSettings> {
        self.repos.iter().find(|r| &r.manifest == manifest)
    }

    /// Every configured repository except `name`, in config order.
    pub fn counterparts(&self, name: &str) -> Vec<&RepoSettings> {
        self.repos.iter().filter(|r| r.name != name).collect()
    }
}

pub fn resolve_config(
    cfg: LibdriftConfigV1,
    overrides: Overrides,
) -> anyhow::Result<EffectiveConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != ids::SCHEMA_CONFIG_V1
    {
        anyhow::bail!(
            "unsupported config schema: {schema} (expected {})",
            ids::SCHEMA_CONFIG_V1
        );
    }

    let raw_tracked = if overrides.tracked.is_empty() {
        cfg.tracked.clone()
    } else {
        overrides.tracked.clone()
    };
    let tracked = resolve_tracked(&raw_tracked)?;

    // `--tracked` may narrow the set; aliases written against the config's own list stay valid.
    let known: BTreeSet<&str> = cfg
        .tracked
        .iter()
        .chain(&overrides.tracked)
        .map(|id| id.trim())
        .collect();

    let mut repos = Vec::with_capacity(cfg.repos.len());
    for (i, rc) in cfg.repos.iter().enumerate() {
        let repo = resolve_repo(rc, &known)
            .with_context(|| format!("invalid repos[{i}] ({})", rc.manifest))?;
        repos.push(repo);
    }

    if let Some(current) = cfg.current.as_deref()
        && !repos.is_empty()
        && !repos.iter().any(|r| r.name == current)
    {
        anyhow::bail!("`current` names an unknown repository: {current}");
    }

    if !overrides.manifests.is_empty() {
        repos = overrides
            .manifests
            .iter()
            .map(|m| {
                repos
                    .iter()
                    .find(|r| &r.manifest == m)
                    .cloned()
                    .unwrap_or_else(|| RepoSettings {
                        name: default_repository_name(m),
                        manifest: m.clone(),
                        format: None,
                        aliases: Aliases::new(),
                    })
            })
            .collect();
    }

    let mut names = BTreeSet::new();
    for r in &repos {
        if !names.insert(r.name.as_str()) {
            anyhow::bail!(
                "duplicate repository name: {} (set `name` on one of the [[repos]] entries)",
                r.name
            );
        }
    }

    Ok(EffectiveConfig {
        tracked,
        base_ref: non_empty(overrides.base_ref)
            .or(non_empty(cfg.base_ref))
            .unwrap_or_else(|| DEFAULT_BASE_REF.to_string()),
        remote: non_empty(overrides.remote)
            .or(non_empty(cfg.remote))
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
        current: cfg.current,
        repos,
    })
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn resolve_tracked(raw: &[String]) -> anyhow::Result<TrackedLibraries> {
    let mut seen = BTreeSet::new();
    for id in raw {
        let id = id.trim();
        if id.is_empty() {
            anyhow::bail!("tracked library ids must not be empty");
        }
        if !seen.insert(id) {
            anyhow::bail!("tracked library listed twice: {id}");
        }
    }
    if seen.is_empty() {
        anyhow::bail!("no tracked libraries (set `tracked` in libdrift.toml or pass --tracked)");
    }
    Ok(TrackedLibraries::new(raw))
}

fn resolve_repo(rc: &RepoConfig, known: &BTreeSet<&str>) -> anyhow::Result<RepoSettings> {
    if rc.manifest.trim().is_empty() {
        anyhow::bail!("`manifest` must not be empty");
    }
    let manifest = RepoPath::new(&rc.manifest);

    let format = rc
        .format
        .as_deref()
        .map(|f| f.parse::<ManifestFormat>())
        .transpose()
        .context("invalid `format`")?;

    let mut aliases = Aliases::new();
    for (alias, target) in &rc.aliases {
        if !known.contains(target.trim()) {
            anyhow::bail!("alias {alias} points at untracked library {target}");
        }
        aliases.insert(alias.clone(), LibraryId::new(target.as_str()));
    }

    let name = non_empty(rc.name.clone()).unwrap_or_else(|| default_repository_name(&manifest));

    Ok(RepoSettings {
        name,
        manifest,
        format,
        aliases,
    })
}

fn default_repository_name(manifest: &RepoPath) -> String {
    manifest
        .parent_dir_name()
        .unwrap_or(ids::DEFAULT_REPOSITORY_NAME)
        .to_string()
}
