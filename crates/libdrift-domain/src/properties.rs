//! Property-based tests for the domain crate.
//!
//! Invariants covered:
//! - aligned repositories never produce a mismatch
//! - a single divergent repository always surfaces the library
//! - output order follows the allow-list, not snapshot order
//! - a snapshot compared with itself never drifts

use crate::engine::{evaluate_reconcile, evaluate_revision};
use crate::model::{LibraryId, RepositorySnapshot, TrackedLibraries, Version, VersionMapping};
use crate::reconcile::Reconciler;
use crate::revision::RevisionComparator;
use libdrift_types::{ManifestFormat, RepoPath, VerdictStatus};
use proptest::prelude::*;

fn arb_library() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9_-]{0,15}").unwrap()
}

fn arb_version() -> impl Strategy<Value = String> {
    (0u32..20, 0u32..20, 0u32..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}"))
}

fn arb_tracked() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(arb_library(), 1..6).prop_map(|s| s.into_iter().collect())
}

fn build(repo: &str, entries: &[(String, String)]) -> RepositorySnapshot {
    let versions: VersionMapping = entries
        .iter()
        .map(|(l, v)| (LibraryId::new(l.as_str()), Version::new(v.as_str())))
        .collect();
    RepositorySnapshot::parsed(
        repo,
        RepoPath::new(format!("{repo}/pom.xml")),
        ManifestFormat::Maven,
        versions,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn aligned_versions_never_mismatch(
        libs in arb_tracked(),
        version in arb_version(),
        repos in 1usize..5,
    ) {
        let entries: Vec<(String, String)> =
            libs.iter().map(|l| (l.clone(), version.clone())).collect();
        let snapshots: Vec<RepositorySnapshot> =
            (0..repos).map(|i| build(&format!("repo{i}"), &entries)).collect();

        let tracked = TrackedLibraries::new(&libs);
        let report = evaluate_reconcile(&snapshots, &tracked);
        prop_assert!(report.findings.is_empty());
        prop_assert_eq!(report.verdict.status, VerdictStatus::Pass);
    }

    #[test]
    fn one_divergent_repository_surfaces_the_library(
        libs in arb_tracked(),
        version in arb_version(),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = pick.get(&libs).clone();
        let base: Vec<(String, String)> =
            libs.iter().map(|l| (l.clone(), version.clone())).collect();
        let changed: Vec<(String, String)> = base
            .iter()
            .map(|(l, v)| {
                let v = if *l == target { format!("{v}-next") } else { v.clone() };
                (l.clone(), v)
            })
            .collect();

        let tracked = TrackedLibraries::new(&libs);
        let out = Reconciler::new(tracked)
            .reconcile(&[build("a", &base), build("b", &changed)]);

        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].library.as_str(), target.as_str());
        prop_assert_eq!(out[0].versions.len(), 2);
    }

    #[test]
    fn library_order_is_independent_of_snapshot_order(
        libs in arb_tracked(),
        v1 in arb_version(),
    ) {
        let a: Vec<(String, String)> = libs.iter().map(|l| (l.clone(), v1.clone())).collect();
        let b: Vec<(String, String)> =
            libs.iter().map(|l| (l.clone(), format!("{v1}.1"))).collect();
        let reconciler = Reconciler::new(TrackedLibraries::new(&libs));

        let forward = reconciler.reconcile(&[build("a", &a), build("b", &b)]);
        let backward = reconciler.reconcile(&[build("b", &b), build("a", &a)]);

        let names = |r: &[crate::model::MismatchReport]| {
            r.iter().map(|m| m.library.to_string()).collect::<Vec<_>>()
        };
        prop_assert_eq!(names(&forward), libs.clone());
        prop_assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn snapshot_compared_with_itself_is_clean(
        libs in arb_tracked(),
        entries in prop::collection::vec((arb_library(), arb_version()), 0..8),
    ) {
        let tracked = TrackedLibraries::new(libs.iter().chain(entries.iter().map(|(l, _)| l)));
        let snap = build("repo", &entries);

        prop_assert!(RevisionComparator::new(tracked.clone()).compare(&snap, &snap).is_empty());
        let report = evaluate_revision(&snap, &snap, &tracked);
        prop_assert_eq!(report.verdict.status, VerdictStatus::Pass);
    }
}
