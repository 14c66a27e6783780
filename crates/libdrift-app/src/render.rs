use crate::report::to_renderable;
use libdrift_render::NotificationContext;
use libdrift_types::LibdriftReport;

/// Every text surface produced from one report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notifications {
    /// Stdout text, starting with the status token.
    pub status: String,
    pub pr_comment: String,
    pub email_body: String,
}

impl Notifications {
    /// `$GITHUB_OUTPUT` block carrying the PR comment and email body.
    pub fn github_output(&self) -> String {
        libdrift_render::render_github_output(&[
            ("pr_comment", self.pr_comment.as_str()),
            ("email_body", self.email_body.as_str()),
        ])
    }
}

pub fn render_notifications(report: &LibdriftReport, ctx: &NotificationContext) -> Notifications {
    let renderable = to_renderable(report);
    Notifications {
        status: libdrift_render::render_status_text(&renderable),
        pr_comment: libdrift_render::render_pr_comment(&renderable, ctx),
        email_body: libdrift_render::render_email_body(&renderable, ctx),
    }
}

pub fn render_pr_comment(report: &LibdriftReport, ctx: &NotificationContext) -> String {
    libdrift_render::render_pr_comment(&to_renderable(report), ctx)
}

/// GitHub annotations, at most `max` of them.
pub fn render_annotations(report: &LibdriftReport, max: usize) -> Vec<String> {
    let mut lines = libdrift_render::render_github_annotations(&to_renderable(report));
    lines.truncate(max);
    lines
}
