use crate::{
    NotificationContext, RenderableChange, RenderableCounterpart, RenderableFinding,
    RenderableLocation, RenderableMismatch, RenderableMode, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};

fn report(mode: RenderableMode) -> RenderableReport {
    RenderableReport {
        verdict: RenderableVerdictStatus::Pass,
        mode,
        findings: Vec::new(),
        mismatches: Vec::new(),
        changes: Vec::new(),
        manifest: None,
    }
}

pub fn aligned() -> RenderableReport {
    report(RenderableMode::Reconcile)
}

pub fn unchanged() -> RenderableReport {
    RenderableReport {
        manifest: Some("pom.xml".to_string()),
        ..report(RenderableMode::Revision)
    }
}

pub fn mismatched() -> RenderableReport {
    RenderableReport {
        verdict: RenderableVerdictStatus::Fail,
        findings: vec![RenderableFinding {
            severity: RenderableSeverity::Error,
            check_id: Some("drift.cross_repo".to_string()),
            code: "version_mismatch".to_string(),
            message: "library 'common' has 2 different versions across repositories: repo1=3.1.0, repo2=3.0.5".to_string(),
            location: None,
            help: Some("Align every repository on a single version of 'common'.".to_string()),
        }],
        mismatches: vec![RenderableMismatch {
            library: "common".to_string(),
            versions: vec![
                ("repo1".to_string(), "3.1.0".to_string()),
                ("repo2".to_string(), "3.0.5".to_string()),
            ],
        }],
        ..report(RenderableMode::Reconcile)
    }
}

pub fn changed() -> RenderableReport {
    let finding = |code: &str, message: &str| RenderableFinding {
        severity: RenderableSeverity::Error,
        check_id: Some("drift.revision".to_string()),
        code: code.to_string(),
        message: message.to_string(),
        location: Some(RenderableLocation {
            path: "pom.xml".to_string(),
            line: None,
            col: None,
        }),
        help: None,
    };
    RenderableReport {
        verdict: RenderableVerdictStatus::Fail,
        findings: vec![
            finding(
                "version_changed",
                "library 'fire-rating' changed from 4.2.0 to 4.3.0 in pom.xml",
            ),
            finding(
                "library_added",
                "library 'csm' added at 1.0.0 in pom.xml (not declared at base)",
            ),
        ],
        changes: vec![
            RenderableChange {
                library: "fire-rating".to_string(),
                before: "4.2.0".to_string(),
                after: "4.3.0".to_string(),
            },
            RenderableChange {
                library: "csm".to_string(),
                before: "NOT_FOUND".to_string(),
                after: "1.0.0".to_string(),
            },
        ],
        manifest: Some("pom.xml".to_string()),
        ..report(RenderableMode::Revision)
    }
}

pub fn context() -> NotificationContext {
    NotificationContext {
        repository: "cl-clpss".to_string(),
        pr_author: "octocat".to_string(),
        pr_url: "https://github.com/acme/cl-clpss/pull/42".to_string(),
        counterparts: vec![
            RenderableCounterpart {
                name: "cl-ccl1".to_string(),
                manifest_file: "pom.xml".to_string(),
            },
            RenderableCounterpart {
                name: "cl-jobserver".to_string(),
                manifest_file: "ivy.xml".to_string(),
            },
        ],
    }
}
