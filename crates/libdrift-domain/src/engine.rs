use crate::fingerprint::fingerprint_for_library;
use crate::model::{
    DriftEntry, DriftKind, MismatchReport, Presence, RepositorySnapshot, TrackedLibraries,
};
use crate::reconcile::Reconciler;
use crate::report::{DomainReport, Outcome};
use crate::revision::RevisionComparator;
use libdrift_types::{
    DriftData, Finding, LibdriftData, Location, ManifestStatus, MismatchData, RepoVersion,
    RepositorySummary, RunMode, Severity, Verdict, VerdictCounts, VerdictStatus, ids,
};

/// Cross-repository check: one `version_mismatch` finding per mismatched library.
pub fn evaluate_reconcile(
    snapshots: &[RepositorySnapshot],
    tracked: &TrackedLibraries,
) -> DomainReport {
    let mismatches = Reconciler::new(tracked.clone()).reconcile(snapshots);
    let findings: Vec<Finding> = mismatches
        .iter()
        .map(|m| mismatch_finding(m, snapshots))
        .collect();

    finish(
        RunMode::Reconcile,
        tracked,
        snapshots.iter(),
        findings,
        Outcome::Reconcile(mismatches),
    )
}

/// Single-repository check of `current` against `base`.
pub fn evaluate_revision(
    current: &RepositorySnapshot,
    base: &RepositorySnapshot,
    tracked: &TrackedLibraries,
) -> DomainReport {
    let drift = RevisionComparator::new(tracked.clone()).compare(current, base);
    let findings: Vec<Finding> = drift.iter().map(|d| drift_finding(d, current)).collect();

    // Only the working-tree manifest is listed; the base is recorded as `base_revision`.
    finish(
        RunMode::Revision,
        tracked,
        std::iter::once(current),
        findings,
        Outcome::Revision(drift),
    )
}

fn finish<'a>(
    mode: RunMode,
    tracked: &TrackedLibraries,
    snapshots: impl Iterator<Item = &'a RepositorySnapshot>,
    findings: Vec<Finding>,
    outcome: Outcome,
) -> DomainReport {
    let verdict = compute_verdict(&findings);
    let data = LibdriftData {
        mode,
        tracked: tracked.to_strings(),
        repositories: snapshots.map(summarize).collect(),
        base_revision: None,
        findings_total: findings.len() as u32,
    };

    DomainReport {
        verdict,
        findings,
        outcome,
        data,
    }
}

fn compute_verdict(findings: &[Finding]) -> Verdict {
    let counts = VerdictCounts::from_findings(findings);
    let (status, reasons) = if findings.is_empty() {
        (VerdictStatus::Pass, Vec::new())
    } else {
        // Any drift at all is a failure: the pipeline step keys its notification off it.
        let mut codes: Vec<String> = findings.iter().map(|f| f.code.clone()).collect();
        codes.sort();
        codes.dedup();
        (VerdictStatus::Fail, codes)
    };
    Verdict {
        status,
        counts,
        reasons,
    }
}

fn summarize(s: &RepositorySnapshot) -> RepositorySummary {
    RepositorySummary {
        name: s.repository.clone(),
        manifest: s.manifest.clone(),
        format: s.format,
        status: match s.presence {
            Presence::Parsed => ManifestStatus::Parsed,
            Presence::Absent => ManifestStatus::Absent,
        },
        libraries: s.versions.len() as u32,
    }
}

fn mismatch_finding(m: &MismatchReport, snapshots: &[RepositorySnapshot]) -> Finding {
    let listed = m
        .versions
        .iter()
        .map(|d| format!("{}={}", d.repository, d.version))
        .collect::<Vec<_>>()
        .join(", ");

    let manifests: Vec<&str> = m
        .versions
        .iter()
        .filter_map(|d| {
            snapshots
                .iter()
                .find(|s| s.repository == d.repository)
                .map(|s| s.manifest.as_str())
        })
        .collect();

    let data = MismatchData {
        library: m.library.to_string(),
        versions: m
            .versions
            .iter()
            .map(|d| RepoVersion {
                repository: d.repository.clone(),
                version: d.version.to_string(),
            })
            .collect(),
    };

    Finding {
        severity: Severity::Error,
        check_id: ids::CHECK_DRIFT_CROSS_REPO.to_string(),
        code: ids::CODE_VERSION_MISMATCH.to_string(),
        message: format!(
            "library '{}' has {} different versions across repositories: {}",
            m.library,
            m.distinct_versions().len(),
            listed
        ),
        // Spans several manifests, so no single location.
        location: None,
        help: Some(format!(
            "Align every repository on a single version of '{}'.",
            m.library
        )),
        fingerprint: Some(fingerprint_for_library(
            ids::CHECK_DRIFT_CROSS_REPO,
            ids::CODE_VERSION_MISMATCH,
            m.library.as_str(),
            &manifests,
        )),
        data: serde_json::to_value(data).unwrap_or_default(),
    }
}

fn drift_finding(d: &DriftEntry, current: &RepositorySnapshot) -> Finding {
    let manifest = current.manifest.as_str();
    let (code, message) = match d.kind() {
        DriftKind::Changed => (
            ids::CODE_VERSION_CHANGED,
            format!(
                "library '{}' changed from {} to {} in {}",
                d.library,
                d.before_label(),
                d.after_label(),
                manifest
            ),
        ),
        DriftKind::Added => (
            ids::CODE_LIBRARY_ADDED,
            format!(
                "library '{}' added at {} in {} (not declared at base)",
                d.library,
                d.after_label(),
                manifest
            ),
        ),
        DriftKind::Removed => (
            ids::CODE_LIBRARY_REMOVED,
            format!(
                "library '{}' removed from {} (was {})",
                d.library,
                manifest,
                d.before_label()
            ),
        ),
    };

    let data = DriftData {
        library: d.library.to_string(),
        before: d.before.as_ref().map(|v| v.to_string()),
        after: d.after.as_ref().map(|v| v.to_string()),
    };

    Finding {
        severity: Severity::Error,
        check_id: ids::CHECK_DRIFT_REVISION.to_string(),
        code: code.to_string(),
        message,
        location: Some(Location::file(current.manifest.clone())),
        help: Some(
            "Update the same library in every counterpart repository so versions stay aligned."
                .to_string(),
        ),
        fingerprint: Some(fingerprint_for_library(
            ids::CHECK_DRIFT_REVISION,
            code,
            d.library.as_str(),
            &[manifest],
        )),
        data: serde_json::to_value(data).unwrap_or_default(),
    }
}
