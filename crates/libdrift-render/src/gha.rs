use crate::{RenderableReport, RenderableSeverity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Error => "error",
        };

        let mut meta = String::new();
        if let Some(loc) = &f.location {
            meta.push_str(&format!("file={}", loc.path));
            if let Some(line) = loc.line {
                meta.push_str(&format!(",line={line}"));
            }
            if let Some(col) = loc.col {
                meta.push_str(&format!(",col={col}"));
            }
        }

        let check_id = f.check_id.as_deref().unwrap_or("libdrift");
        let message = escape_data(&format!("[{}:{}] {}", check_id, f.code, f.message));

        if meta.is_empty() {
            out.push(format!("::{level}::{message}"));
        } else {
            out.push(format!("::{level} {meta}::{message}"));
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Multi-line `$GITHUB_OUTPUT` entries: `name<<DELIM\nvalue\nDELIM\n` per pair.
///
/// The delimiter starts as `EOF` and grows a numeric suffix until no line of the value equals it.
pub fn render_github_output(entries: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (name, value) in entries {
        let delimiter = delimiter_for(value);
        out.push_str(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"));
    }
    out
}

fn delimiter_for(value: &str) -> String {
    let mut delimiter = "EOF".to_string();
    let mut n = 0u32;
    while value.lines().any(|l| l.trim_end_matches('\r') == delimiter) {
        n += 1;
        delimiter = format!("EOF_{n}");
    }
    delimiter
}
