//! Rendering utilities for CI surfaces (status text, PR comment, email body, GitHub annotations).
//!
//! Everything here is pure string assembly over [`RenderableReport`]; there are no error cases.

#![forbid(unsafe_code)]

mod email;
mod gha;
mod markdown;
mod model;
mod text;

pub use email::render_email_body;
pub use gha::{render_github_annotations, render_github_output};
pub use markdown::render_pr_comment;
pub use model::{
    NotificationContext, RenderableChange, RenderableCounterpart, RenderableFinding,
    RenderableLocation, RenderableMismatch, RenderableMode, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
pub use text::render_status_text;

#[cfg(test)]
pub(crate) mod fixtures;
