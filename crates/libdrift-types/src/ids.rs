//! Stable identifiers for checks, finding codes and status tokens.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_DRIFT_CROSS_REPO: &str = "drift.cross_repo";
pub const CHECK_DRIFT_REVISION: &str = "drift.revision";

// Codes: drift.cross_repo
pub const CODE_VERSION_MISMATCH: &str = "version_mismatch";

// Codes: drift.revision
pub const CODE_VERSION_CHANGED: &str = "version_changed";
pub const CODE_LIBRARY_ADDED: &str = "library_added";
pub const CODE_LIBRARY_REMOVED: &str = "library_removed";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

// First line of the status text. CI steps grep for these, so they never change.
pub const STATUS_MISMATCH: &str = "LIB_VERSION_MISMATCH";
pub const STATUS_ALIGNED: &str = "All shared library versions are aligned.";
pub const STATUS_CHANGED: &str = "LIB_VERSION_CHANGED";
pub const STATUS_UNCHANGED: &str = "NO_VERSION_CHANGE";

// Placeholders for a version that is absent on one side of a revision diff.
pub const SENTINEL_NOT_FOUND: &str = "NOT_FOUND";
pub const SENTINEL_REMOVED: &str = "REMOVED";

// Repository name used when a manifest sits directly under the root.
pub const DEFAULT_REPOSITORY_NAME: &str = "main";

// Schema identifier accepted in `libdrift.toml`.
pub const SCHEMA_CONFIG_V1: &str = "libdrift.config.v1";
