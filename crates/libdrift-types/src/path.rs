use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Manifest path relative to the directory libdrift runs from (`--repo-root`).
///
/// Normalization is simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - `..` segments are kept: sibling checkouts such as `../server/ivy.xml` are normal input
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().trim().replace('\\', "/");
        while let Some(rest) = v.strip_prefix("./") {
            v = rest.to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_utf8_path(&self) -> &Utf8Path {
        Utf8Path::new(&self.0)
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// Final path component (`pom.xml` for `cl-clpss/pom.xml`).
    pub fn file_name(&self) -> Option<&str> {
        self.as_utf8_path().file_name()
    }

    /// Name of the directory holding the file, skipping `.`/`..` components.
    ///
    /// `ccl1/pom.xml` -> `ccl1`, `../server/ivy.xml` -> `server`, `pom.xml` -> `None`.
    pub fn parent_dir_name(&self) -> Option<&str> {
        self.as_utf8_path()
            .parent()?
            .components()
            .next_back()
            .map(|c| c.as_str())
            .filter(|c| *c != "." && *c != ".." && !c.is_empty() && *c != "/")
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoPath {
    fn from(value: &str) -> Self {
        RepoPath::new(value)
    }
}

impl From<String> for RepoPath {
    fn from(value: String) -> Self {
        RepoPath::new(value)
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}
