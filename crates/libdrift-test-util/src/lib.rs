//! Shared test utilities for the libdrift workspace.
//!
//! `xtask` uses `normalize_nondeterministic` at runtime, so this cannot live behind
//! `#[cfg(test)]` in another crate.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// `tool.version` is replaced with `"__VERSION__"` only on a root report envelope, so finding
/// payloads that happen to carry `name`/`version` keys are left alone. Timestamps
/// (`started_at`, `ended_at`) and `duration_ms` are normalized at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "verdict", "findings"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "ended_at"] {
                if let Some(v) = map.get_mut(key)
                    && !v.is_null()
                {
                    *v = Value::String("__TIMESTAMP__".to_string());
                }
            }
            if let Some(v) = map.get_mut("duration_ms")
                && !v.is_null()
            {
                *v = Value::Number(0.into());
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

/// Maven POM in the standard namespace declaring `(artifactId, version)` pairs.
pub fn pom_xml(deps: &[(&str, &str)]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <modelVersion>4.0.0</modelVersion>\n  <dependencies>\n",
    );
    for (artifact, version) in deps {
        out.push_str(&format!(
            "    <dependency>\n      <groupId>com.example</groupId>\n      <artifactId>{artifact}</artifactId>\n      <version>{version}</version>\n    </dependency>\n"
        ));
    }
    out.push_str("  </dependencies>\n</project>\n");
    out
}

/// Ivy module declaring `(name, rev)` pairs.
pub fn ivy_xml(deps: &[(&str, &str)]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ivy-module version=\"2.0\">\n  <info organisation=\"com.example\" module=\"app\"/>\n  <dependencies>\n",
    );
    for (name, rev) in deps {
        out.push_str(&format!(
            "    <dependency org=\"com.example\" name=\"{name}\" rev=\"{rev}\"/>\n"
        ));
    }
    out.push_str("  </dependencies>\n</ivy-module>\n");
    out
}

/// A temporary directory tree standing in for `--repo-root`.
pub struct TempRepo {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl TempRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `text` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, text: &str) -> Utf8PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, text).expect("write fixture");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel)).expect("read fixture")
    }
}

impl Default for TempRepo {
    fn default() -> Self {
        Self::new()
    }
}
