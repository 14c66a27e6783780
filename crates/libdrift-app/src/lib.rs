//! Use case orchestration for libdrift.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo,
//! settings and render layers. It is intentionally thin and delegates heavy lifting to them.
//!
//! The CLI crate depends on this; it only handles argument parsing, environment and exit codes.

#![forbid(unsafe_code)]

mod check;
mod checkout;
mod config;
mod context;
mod diff;
mod render;
mod report;

pub use check::{CheckInput, CheckOutput, run_check};
pub use checkout::{GitCli, RevisionSource, WorkingTreeCheckout, with_base_revision};
pub use config::{ConfigInput, load_effective_config};
pub use context::{NotificationEnv, counterparts_for, notification_context};
pub use diff::{BaseSource, DiffInput, DiffOutput, run_diff};
pub use libdrift_render::NotificationContext;
pub use render::{Notifications, render_annotations, render_notifications, render_pr_comment};
pub use report::{
    build_report, parse_report_json, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code,
};
