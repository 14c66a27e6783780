//! Config parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{LibdriftConfigV1, RepoConfig};
pub use resolve::{DEFAULT_BASE_REF, DEFAULT_REMOTE, EffectiveConfig, Overrides, RepoSettings};

/// Parse `libdrift.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LibdriftConfigV1> {
    let cfg: LibdriftConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (config file, if any, plus command-line overrides).
pub fn resolve_config(
    cfg: Option<LibdriftConfigV1>,
    overrides: Overrides,
) -> anyhow::Result<EffectiveConfig> {
    resolve::resolve_config(cfg.unwrap_or_default(), overrides)
}
