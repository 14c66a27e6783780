use crate::{RenderableMode, RenderableReport};
use libdrift_types::ids;

/// Console output. The first line is always one of the stable status tokens.
pub fn render_status_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    match report.mode {
        RenderableMode::Reconcile => {
            if report.mismatches.is_empty() {
                out.push_str(ids::STATUS_ALIGNED);
                out.push('\n');
                return out;
            }
            out.push_str(ids::STATUS_MISMATCH);
            out.push('\n');
            for m in &report.mismatches {
                out.push_str(&format!("Mismatch for {}:\n", m.library));
                for (repo, version) in &m.versions {
                    out.push_str(&format!("  {repo}: {version}\n"));
                }
            }
        }
        RenderableMode::Revision => {
            if report.changes.is_empty() {
                out.push_str(ids::STATUS_UNCHANGED);
                out.push_str("\nNo shared library version changes detected.\n");
                return out;
            }
            out.push_str(ids::STATUS_CHANGED);
            out.push('\n');
            out.push_str(&format!(
                "Found {} changed libraries:\n",
                report.changes.len()
            ));
            for c in &report.changes {
                out.push_str(&format!("  {}: {} → {}\n", c.library, c.before, c.after));
            }
        }
    }

    out
}
