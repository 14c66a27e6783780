use crate::{NotificationContext, RenderableMode, RenderableReport};

/// Plain-text email body for the team distribution list.
pub fn render_email_body(report: &RenderableReport, ctx: &NotificationContext) -> String {
    let mut body = String::from("Hello Team,\n\n");

    match report.mode {
        RenderableMode::Revision => {
            body.push_str(&format!(
                "Shared library versions have been updated in the {} repository.\n\n",
                ctx.repository
            ));
        }
        RenderableMode::Reconcile => {
            body.push_str(&format!(
                "Shared library versions are out of sync across repositories (checked from {}).\n\n",
                ctx.repository
            ));
        }
    }

    body.push_str(&format!("PR Author: {}\n", ctx.pr_author));
    body.push_str(&format!("PR URL: {}\n\n", ctx.pr_url));

    match report.mode {
        RenderableMode::Revision => {
            body.push_str("Changed Libraries:\n");
            for c in &report.changes {
                body.push_str(&format!("• {}: {} → {}\n", c.library, c.before, c.after));
            }
        }
        RenderableMode::Reconcile => {
            body.push_str("Mismatched Libraries:\n");
            for m in &report.mismatches {
                let versions = m
                    .versions
                    .iter()
                    .map(|(repo, v)| format!("{repo} {v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                body.push_str(&format!("• {}: {}\n", m.library, versions));
            }
        }
    }

    if !ctx.counterparts.is_empty() {
        body.push_str("\nPlease update the corresponding versions in:\n");
        for c in &ctx.counterparts {
            body.push_str(&format!("- {} ({})\n", c.name, c.manifest_file));
        }
    }

    body.push_str("\nKeeping these aligned prevents runtime incompatibilities.\n\n");
    body.push_str("Best regards,\n");
    body.push_str("Automated CI/CD System");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{changed, context, mismatched};

    #[test]
    fn revision_email_matches_layout() {
        let body = render_email_body(&changed(), &context());
        let expected = "Hello Team,\n\
\n\
Shared library versions have been updated in the cl-clpss repository.\n\
\n\
PR Author: octocat\n\
PR URL: https://github.com/acme/cl-clpss/pull/42\n\
\n\
Changed Libraries:\n\
• fire-rating: 4.2.0 → 4.3.0\n\
• csm: NOT_FOUND → 1.0.0\n\
\n\
Please update the corresponding versions in:\n\
- cl-ccl1 (pom.xml)\n\
- cl-jobserver (ivy.xml)\n\
\n\
Keeping these aligned prevents runtime incompatibilities.\n\
\n\
Best regards,\n\
Automated CI/CD System";
        assert_eq!(body, expected);
    }

    #[test]
    fn reconcile_email_lists_versions_per_repository() {
        let body = render_email_body(&mismatched(), &context());
        assert!(body.contains("Mismatched Libraries:\n• common: repo1 3.1.0, repo2 3.0.5\n"));
        assert!(body.ends_with("Automated CI/CD System"));
    }
}
