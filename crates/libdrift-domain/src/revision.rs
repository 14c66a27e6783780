use crate::model::{DriftEntry, RepositorySnapshot, TrackedLibraries};

/// Same manifest, two revisions: what changed for the tracked libraries.
#[derive(Clone, Debug)]
pub struct RevisionComparator {
    tracked: TrackedLibraries,
}

impl RevisionComparator {
    pub fn new(tracked: TrackedLibraries) -> Self {
        Self { tracked }
    }

    pub fn tracked(&self) -> &TrackedLibraries {
        &self.tracked
    }

    /// Drift from `base` to `current`, in allow-list order.
    ///
    /// Pure: both snapshots are already materialized and nothing here touches the filesystem.
    pub fn compare(&self, current: &RepositorySnapshot, base: &RepositorySnapshot) -> Vec<DriftEntry> {
        self.tracked
            .iter()
            .filter_map(|library| {
                let before = base.versions.get(library.as_str());
                let after = current.versions.get(library.as_str());
                match (before, after) {
                    (Some(b), Some(a)) if b == a => None,
                    (None, None) => None,
                    _ => Some(DriftEntry {
                        library: library.clone(),
                        before: before.cloned(),
                        after: after.cloned(),
                    }),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DriftKind;
    use crate::test_support::{absent, snapshot, tracked};

    #[test]
    fn identical_snapshots_have_no_drift() {
        let c = RevisionComparator::new(tracked(&["common", "csm"]));
        let s = snapshot("cl-clpss", &[("common", "3.0.5"), ("csm", "1.0.0")]);
        assert!(c.compare(&s, &s).is_empty());
    }

    #[test]
    fn changed_version_reports_base_then_current() {
        let c = RevisionComparator::new(tracked(&["fire-rating"]));
        let base = snapshot("cl-clpss", &[("fire-rating", "4.2.0")]);
        let current = snapshot("cl-clpss", &[("fire-rating", "4.3.0")]);

        let out = c.compare(&current, &base);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), DriftKind::Changed);
        assert_eq!(out[0].library.as_str(), "fire-rating");
        assert_eq!(out[0].before_label(), "4.2.0");
        assert_eq!(out[0].after_label(), "4.3.0");
    }

    #[test]
    fn new_library_against_empty_base() {
        let c = RevisionComparator::new(tracked(&["csm"]));
        let base = absent("cl-clpss");
        let current = snapshot("cl-clpss", &[("csm", "1.0.0")]);

        let out = c.compare(&current, &base);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), DriftKind::Added);
        assert_eq!(out[0].before_label(), "NOT_FOUND");
        assert_eq!(out[0].after_label(), "1.0.0");
    }

    #[test]
    fn removed_library_uses_removed_sentinel() {
        let c = RevisionComparator::new(tracked(&["rating"]));
        let base = snapshot("cl-clpss", &[("rating", "2.0")]);
        let current = snapshot("cl-clpss", &[]);

        let out = c.compare(&current, &base);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), DriftKind::Removed);
        assert_eq!(out[0].before_label(), "2.0");
        assert_eq!(out[0].after_label(), "REMOVED");
    }

    #[test]
    fn entries_follow_allow_list_order_and_skip_untracked() {
        let c = RevisionComparator::new(tracked(&["rating", "common"]));
        let base = snapshot("r", &[("common", "1"), ("rating", "1"), ("other", "1")]);
        let current = snapshot("r", &[("common", "2"), ("rating", "2"), ("other", "2")]);

        let libs: Vec<String> = c
            .compare(&current, &base)
            .into_iter()
            .map(|d| d.library.to_string())
            .collect();
        assert_eq!(libs, vec!["rating", "common"]);
    }
}
