use crate::{NotificationContext, RenderableMode, RenderableReport};

/// Pull-request comment body (GitHub-flavoured Markdown).
pub fn render_pr_comment(report: &RenderableReport, ctx: &NotificationContext) -> String {
    let mut out = String::new();

    match report.mode {
        RenderableMode::Revision => {
            if report.changes.is_empty() {
                out.push_str("✅ **No shared library version changes detected.**\n");
                return out;
            }
            let manifest = report.manifest.as_deref().unwrap_or("the manifest");
            out.push_str("🚨 **Shared Library Version Changes Detected** 🚨\n\n");
            out.push_str(&format!(
                "The following shared libraries have been updated in `{manifest}`:\n\n"
            ));
            for c in &report.changes {
                out.push_str(&format!(
                    "• **{}**: `{}` → `{}`\n",
                    c.library, c.before, c.after
                ));
            }
        }
        RenderableMode::Reconcile => {
            if report.mismatches.is_empty() {
                out.push_str("✅ **All shared library versions are aligned.**\n");
                return out;
            }
            out.push_str("🚨 **Shared Library Version Mismatch Detected** 🚨\n\n");
            out.push_str("The following shared libraries are declared with different versions:\n\n");
            for m in &report.mismatches {
                let versions = m
                    .versions
                    .iter()
                    .map(|(repo, v)| format!("{repo} `{v}`"))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("• **{}**: {}\n", m.library, versions));
            }
        }
    }

    out.push_str("\n⚠️ **Action Required:**\n");
    if ctx.counterparts.is_empty() {
        out.push_str("Please align the versions above across all repositories.\n");
    } else {
        out.push_str("Please ensure you also update the corresponding versions in:\n");
        for c in &ctx.counterparts {
            out.push_str(&format!("- **{}** ({})\n", c.name, c.manifest_file));
        }
    }
    out.push('\n');
    out.push_str("Keeping these aligned prevents runtime incompatibilities.\n");
    out.push_str("Thank you for keeping our dependencies in sync! 🙏\n\n");
    out.push_str("---\n");
    out.push_str("*This is an automated notification from the CI/CD pipeline.*");

    out
}
