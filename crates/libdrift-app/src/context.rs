use libdrift_render::{NotificationContext, RenderableCounterpart};
use libdrift_settings::EffectiveConfig;
use libdrift_types::RunGit;

/// CI environment values that feed notification text. Defaults are applied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationEnv {
    pub actor: String,
    /// `owner/name`.
    pub repository: String,
    pub pr_number: String,
    pub server_url: String,
    pub base_ref: Option<String>,
}

impl Default for NotificationEnv {
    fn default() -> Self {
        Self {
            actor: "Unknown".to_string(),
            repository: "unknown/unknown".to_string(),
            pr_number: "0".to_string(),
            server_url: "https://github.com".to_string(),
            base_ref: None,
        }
    }
}

impl NotificationEnv {
    pub fn pr_url(&self) -> String {
        format!(
            "{}/{}/pull/{}",
            self.server_url.trim_end_matches('/'),
            self.repository,
            self.pr_number
        )
    }

    /// Git metadata recorded in the report's `run` block.
    pub fn run_git(&self) -> RunGit {
        RunGit {
            repo: Some(self.repository.clone()),
            base_ref: self.base_ref.clone(),
            pull_request: Some(self.pr_number.clone()),
            actor: Some(self.actor.clone()),
        }
    }
}

/// Configured repositories other than `current`, with their manifest file names.
pub fn counterparts_for(config: &EffectiveConfig, current: Option<&str>) -> Vec<RenderableCounterpart> {
    let others = match current {
        Some(name) => config.counterparts(name),
        None => config.repos.iter().collect(),
    };
    others
        .into_iter()
        .map(|r| RenderableCounterpart {
            name: r.name.clone(),
            manifest_file: r.manifest.file_name().unwrap_or(r.manifest.as_str()).to_string(),
        })
        .collect()
}

pub fn notification_context(
    repository: &str,
    env: &NotificationEnv,
    counterparts: Vec<RenderableCounterpart>,
) -> NotificationContext {
    NotificationContext {
        repository: repository.to_string(),
        pr_author: env.actor.clone(),
        pr_url: env.pr_url(),
        counterparts,
    }
}
