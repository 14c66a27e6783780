use anyhow::Context;
use libdrift_settings::{EffectiveConfig, Overrides};

/// Config file contents (if the file exists) plus command-line overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigInput<'a> {
    pub config_text: Option<&'a str>,
    pub overrides: Overrides,
    /// A manifest was named on the command line.
    pub has_manifest: bool,
}

/// Parse and resolve configuration.
///
/// Running without a config file is allowed only when the command line names both the tracked
/// libraries and at least one manifest.
pub fn load_effective_config(input: ConfigInput<'_>) -> anyhow::Result<EffectiveConfig> {
    let cfg = match input.config_text {
        Some(text) => Some(libdrift_settings::parse_config_toml(text).context("parse config")?),
        None => {
            if input.overrides.tracked.is_empty() || !input.has_manifest {
                anyhow::bail!(
                    "no config file found; pass --tracked and --manifest to run without one"
                );
            }
            None
        }
    };

    libdrift_settings::resolve_config(cfg, input.overrides).context("resolve config")
}
