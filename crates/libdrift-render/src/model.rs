#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableMode {
    Reconcile,
    Revision,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: Option<String>,
    pub code: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub help: Option<String>,
}

/// One library declared with different versions; `versions` is `(repository, version)` in
/// repository order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableMismatch {
    pub library: String,
    pub versions: Vec<(String, String)>,
}

/// One library that changed between revisions. Absent sides are already replaced by their
/// sentinel (`NOT_FOUND` / `REMOVED`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableChange {
    pub library: String,
    pub before: String,
    pub after: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub mode: RenderableMode,
    pub findings: Vec<RenderableFinding>,
    pub mismatches: Vec<RenderableMismatch>,
    pub changes: Vec<RenderableChange>,
    /// Manifest file the revision diff was taken on (`pom.xml`).
    pub manifest: Option<String>,
}

/// A repository that has to follow the change, e.g. `cl-jobserver (ivy.xml)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableCounterpart {
    pub name: String,
    pub manifest_file: String,
}

/// Who/where context for the notification texts. None of it affects the verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationContext {
    /// Repository the change happened in (`cl-clpss`).
    pub repository: String,
    pub pr_author: String,
    pub pr_url: String,
    pub counterparts: Vec<RenderableCounterpart>,
}
