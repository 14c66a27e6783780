use crate::model::{MismatchReport, RepoDeclaration, RepositorySnapshot, TrackedLibraries};
use std::collections::BTreeSet;

/// Cross-repository comparison of declared versions.
#[derive(Clone, Debug)]
pub struct Reconciler {
    tracked: TrackedLibraries,
}

impl Reconciler {
    pub fn new(tracked: TrackedLibraries) -> Self {
        Self { tracked }
    }

    pub fn tracked(&self) -> &TrackedLibraries {
        &self.tracked
    }

    /// One report per tracked library declared with more than one distinct version.
    ///
    /// Results follow the allow-list order, never the order of `snapshots`; inside a
    /// report, repositories appear in snapshot order.
    pub fn reconcile(&self, snapshots: &[RepositorySnapshot]) -> Vec<MismatchReport> {
        self.tracked
            .iter()
            .filter_map(|library| {
                let versions: Vec<RepoDeclaration> = snapshots
                    .iter()
                    .filter_map(|s| {
                        s.versions.get(library.as_str()).map(|v| RepoDeclaration {
                            repository: s.repository.clone(),
                            version: v.clone(),
                        })
                    })
                    .collect();

                let distinct = versions
                    .iter()
                    .map(|d| &d.version)
                    .collect::<BTreeSet<_>>()
                    .len();
                (distinct > 1).then(|| MismatchReport {
                    library: library.clone(),
                    versions,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{snapshot, tracked};

    #[test]
    fn aligned_repositories_produce_nothing() {
        let r = Reconciler::new(tracked(&["common"]));
        let out = r.reconcile(&[
            snapshot("repo1", &[("common", "3.0.5")]),
            snapshot("repo2", &[("common", "3.0.5")]),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn one_divergent_repository_lists_every_declaration() {
        let r = Reconciler::new(tracked(&["common"]));
        let out = r.reconcile(&[
            snapshot("repo1", &[("common", "3.1.0")]),
            snapshot("repo2", &[("common", "3.0.5")]),
            snapshot("repo3", &[("common", "3.0.5")]),
        ]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].library.as_str(), "common");
        let pairs: Vec<(&str, &str)> = out[0]
            .versions
            .iter()
            .map(|d| (d.repository.as_str(), d.version.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("repo1", "3.1.0"), ("repo2", "3.0.5"), ("repo3", "3.0.5")]
        );
    }

    #[test]
    fn libraries_declared_once_or_never_are_skipped() {
        let r = Reconciler::new(tracked(&["common", "csm", "rating"]));
        let out = r.reconcile(&[
            snapshot("repo1", &[("common", "1"), ("csm", "1")]),
            snapshot("repo2", &[("common", "1")]),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn untracked_libraries_never_reported() {
        let r = Reconciler::new(tracked(&["common"]));
        let out = r.reconcile(&[
            snapshot("repo1", &[("other", "1")]),
            snapshot("repo2", &[("other", "2")]),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn output_follows_allow_list_order() {
        let r = Reconciler::new(tracked(&["rating", "Util", "common"]));
        let a = snapshot("a", &[("common", "1"), ("Util", "1"), ("rating", "1")]);
        let b = snapshot("b", &[("common", "2"), ("Util", "2"), ("rating", "2")]);

        let forward: Vec<String> = r
            .reconcile(&[a.clone(), b.clone()])
            .into_iter()
            .map(|m| m.library.to_string())
            .collect();
        let backward: Vec<String> = r
            .reconcile(&[b, a])
            .into_iter()
            .map(|m| m.library.to_string())
            .collect();

        assert_eq!(forward, vec!["rating", "Util", "common"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn absent_snapshots_do_not_participate() {
        let r = Reconciler::new(tracked(&["common"]));
        let out = r.reconcile(&[
            snapshot("repo1", &[("common", "1")]),
            crate::test_support::absent("repo2"),
        ]);
        assert!(out.is_empty());
    }
}
