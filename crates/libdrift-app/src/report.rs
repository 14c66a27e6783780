use anyhow::Context;
use libdrift_domain::report::DomainReport;
use libdrift_render::{
    RenderableChange, RenderableFinding, RenderableLocation, RenderableMismatch, RenderableMode,
    RenderableReport, RenderableSeverity, RenderableVerdictStatus,
};
use libdrift_types::{
    DriftData, Finding, LibdriftData, LibdriftReport, MismatchData, RunGit, RunMeta, RunMode,
    SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, VerdictCounts, VerdictStatus, ids,
};
use time::OffsetDateTime;

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "libdrift".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Wrap a domain report in the versioned envelope.
pub fn build_report(
    domain: DomainReport,
    started_at: OffsetDateTime,
    git: Option<RunGit>,
    base_revision: Option<String>,
) -> LibdriftReport {
    let DomainReport {
        verdict,
        findings,
        data,
        ..
    } = domain;

    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;

    LibdriftReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at,
            ended_at: Some(ended_at),
            duration_ms: Some(duration_ms),
            git,
        },
        verdict,
        findings,
        data: LibdriftData {
            base_revision,
            ..data
        },
    }
}

/// Report written when the run itself failed; the verdict is `fail` with a single tool finding.
pub fn runtime_error_report(mode: RunMode, message: &str) -> LibdriftReport {
    let now = OffsetDateTime::now_utc();
    let findings = vec![Finding {
        severity: Severity::Error,
        check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
        code: ids::CODE_RUNTIME_ERROR.to_string(),
        message: message.to_string(),
        location: None,
        help: Some("Fix the tool error and re-run libdrift.".to_string()),
        fingerprint: None,
        data: serde_json::Value::Null,
    }];

    LibdriftReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
            git: None,
        },
        verdict: Verdict {
            status: VerdictStatus::Fail,
            counts: VerdictCounts::from_findings(&findings),
            reasons: vec![ids::CODE_RUNTIME_ERROR.to_string()],
        },
        findings,
        data: LibdriftData {
            mode,
            findings_total: 1,
            ..LibdriftData::default()
        },
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<LibdriftReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse libdrift report")
}

pub fn serialize_report(report: &LibdriftReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Map verdict to exit code: 0 = pass, 2 = mismatch or drift found.
pub fn verdict_exit_code(status: VerdictStatus) -> i32 {
    match status {
        VerdictStatus::Pass => 0,
        VerdictStatus::Fail => 2,
    }
}

/// Flatten a report (fresh or read back from disk) into the renderer model.
///
/// Mismatches and changes are rebuilt from the structured `data` of each finding, so the
/// renderers never parse messages.
pub fn to_renderable(report: &LibdriftReport) -> RenderableReport {
    let mut mismatches = Vec::new();
    let mut changes = Vec::new();

    for f in &report.findings {
        match f.check_id.as_str() {
            ids::CHECK_DRIFT_CROSS_REPO => {
                if let Ok(d) = serde_json::from_value::<MismatchData>(f.data.clone()) {
                    mismatches.push(RenderableMismatch {
                        library: d.library,
                        versions: d
                            .versions
                            .into_iter()
                            .map(|v| (v.repository, v.version))
                            .collect(),
                    });
                }
            }
            ids::CHECK_DRIFT_REVISION => {
                if let Ok(d) = serde_json::from_value::<DriftData>(f.data.clone()) {
                    changes.push(RenderableChange {
                        library: d.library,
                        before: d
                            .before
                            .unwrap_or_else(|| ids::SENTINEL_NOT_FOUND.to_string()),
                        after: d.after.unwrap_or_else(|| ids::SENTINEL_REMOVED.to_string()),
                    });
                }
            }
            _ => {}
        }
    }

    let mode = match report.data.mode {
        RunMode::Reconcile => RenderableMode::Reconcile,
        RunMode::Revision => RenderableMode::Revision,
    };
    let manifest = match report.data.mode {
        RunMode::Revision => report
            .data
            .repositories
            .first()
            .and_then(|r| r.manifest.file_name())
            .map(str::to_string),
        RunMode::Reconcile => None,
    };

    RenderableReport {
        verdict: match report.verdict.status {
            VerdictStatus::Pass => RenderableVerdictStatus::Pass,
            VerdictStatus::Fail => RenderableVerdictStatus::Fail,
        },
        mode,
        findings: report.findings.iter().map(renderable_finding).collect(),
        mismatches,
        changes,
        manifest,
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: Some(f.check_id.clone()),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
        }),
        help: f.help.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libdrift_domain::model::{
        LibraryId, RepositorySnapshot, TrackedLibraries, Version, VersionMapping,
    };
    use libdrift_types::{ManifestFormat, RepoPath};

    fn snap(repo: &str, entries: &[(&str, &str)]) -> RepositorySnapshot {
        let versions: VersionMapping = entries
            .iter()
            .map(|(l, v)| (LibraryId::new(*l), Version::new(*v)))
            .collect();
        RepositorySnapshot::parsed(
            repo,
            RepoPath::new(format!("{repo}/pom.xml")),
            ManifestFormat::Maven,
            versions,
        )
    }

    #[test]
    fn report_round_trips_through_json_into_renderable() {
        let tracked = TrackedLibraries::new(["common", "csm"]);
        let domain = libdrift_domain::evaluate_reconcile(
            &[
                snap("repo1", &[("common", "3.1.0")]),
                snap("repo2", &[("common", "3.0.5")]),
            ],
            &tracked,
        );
        let report = build_report(domain, OffsetDateTime::now_utc(), None, None);

        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let back = parse_report_json(&text).expect("parse");
        assert_eq!(back, report);

        let renderable = to_renderable(&back);
        assert_eq!(renderable.mode, RenderableMode::Reconcile);
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Fail);
        assert_eq!(
            renderable.mismatches,
            vec![RenderableMismatch {
                library: "common".to_string(),
                versions: vec![
                    ("repo1".to_string(), "3.1.0".to_string()),
                    ("repo2".to_string(), "3.0.5".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn revision_report_restores_sentinels() {
        let tracked = TrackedLibraries::new(["fire-rating", "csm", "rating"]);
        let domain = libdrift_domain::evaluate_revision(
            &snap("cl-clpss", &[("fire-rating", "4.3.0"), ("csm", "1.0.0")]),
            &snap("cl-clpss", &[("fire-rating", "4.2.0"), ("rating", "2.0")]),
            &tracked,
        );
        let report = build_report(
            domain,
            OffsetDateTime::now_utc(),
            None,
            Some("origin/main".to_string()),
        );
        assert_eq!(report.data.base_revision.as_deref(), Some("origin/main"));

        let r = to_renderable(&report);
        assert_eq!(r.manifest.as_deref(), Some("pom.xml"));
        let labels: Vec<(&str, &str, &str)> = r
            .changes
            .iter()
            .map(|c| (c.library.as_str(), c.before.as_str(), c.after.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("fire-rating", "4.2.0", "4.3.0"),
                ("csm", "NOT_FOUND", "1.0.0"),
                ("rating", "2.0", "REMOVED"),
            ]
        );
    }

    #[test]
    fn runtime_error_report_fails_with_tool_finding() {
        let report = runtime_error_report(RunMode::Revision, "boom");
        assert_eq!(report.verdict.status, VerdictStatus::Fail);
        assert_eq!(report.findings[0].check_id, ids::CHECK_TOOL_RUNTIME);
        assert_eq!(report.data.mode, RunMode::Revision);

        let r = to_renderable(&report);
        assert!(r.mismatches.is_empty() && r.changes.is_empty());
        assert_eq!(r.findings.len(), 1);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema": "cargo.report.v2"}"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(verdict_exit_code(VerdictStatus::Pass), 0);
        assert_eq!(verdict_exit_code(VerdictStatus::Fail), 2);
    }
}
