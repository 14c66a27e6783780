//! `diff` against a real git repository. Skipped when `git` is not on PATH.

use libdrift_app::{BaseSource, DiffInput, GitCli, run_diff};
use libdrift_settings::Overrides;
use libdrift_test_util::{TempRepo, normalize_nondeterministic, pom_xml};
use camino::Utf8Path;
use libdrift_types::{RepoPath, VerdictStatus};
use std::process::Command;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(repo: &TempRepo, args: &[&str]) {
    git_in(repo.root(), args);
}

fn git_in(dir: &Utf8Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=libdrift", "-c", "user.email=libdrift@example.com"])
        .args(args)
        .status()
        .expect("spawn git");
    assert!(status.success(), "git {args:?} failed");
}

fn committed_repo(base: &str) -> TempRepo {
    let repo = TempRepo::new();
    git(&repo, &["init", "--quiet"]);
    repo.write("pom.xml", base);
    git(&repo, &["add", "pom.xml"]);
    git(&repo, &["commit", "--quiet", "-m", "base"]);
    repo
}

fn input<'a>(repo: &'a TempRepo, rev: &str) -> DiffInput<'a> {
    DiffInput {
        repo_root: repo.root(),
        config_text: None,
        overrides: Overrides {
            tracked: vec!["fire-rating".to_string(), "csm".to_string()],
            ..Overrides::default()
        },
        manifest: Some(RepoPath::new("pom.xml")),
        base: Some(BaseSource::Revision(rev.to_string())),
        git: None,
    }
}

#[test]
fn diff_against_head_restores_uncommitted_edits() {
    if !git_available() {
        return;
    }
    let repo = committed_repo(&pom_xml(&[("fire-rating", "4.2.0")]));
    let edited = pom_xml(&[("fire-rating", "4.3.0"), ("csm", "1.0.0")]);
    repo.write("pom.xml", &edited);

    let out = run_diff(input(&repo, "HEAD"), &GitCli::new(repo.root())).expect("diff");

    assert_eq!(out.report.verdict.status, VerdictStatus::Fail);
    let messages: Vec<&str> = out.report.findings.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "library 'fire-rating' changed from 4.2.0 to 4.3.0 in pom.xml",
            "library 'csm' added at 1.0.0 in pom.xml (not declared at base)",
        ]
    );
    assert_eq!(repo.read("pom.xml"), edited);

    let json = serde_json::to_value(&out.report).expect("to json");
    let json = normalize_nondeterministic(json);
    assert_eq!(json["run"]["started_at"], "__TIMESTAMP__");
    assert_eq!(json["data"]["base_revision"], "HEAD");
}

#[test]
fn unknown_revision_fails_without_touching_the_file() {
    if !git_available() {
        return;
    }
    let repo = committed_repo(&pom_xml(&[("fire-rating", "4.2.0")]));
    let edited = pom_xml(&[("fire-rating", "4.3.0")]);
    repo.write("pom.xml", &edited);

    let err = run_diff(input(&repo, "no-such-branch"), &GitCli::new(repo.root()))
        .expect_err("unknown revision");

    assert!(format!("{err:#}").contains("unknown revision: no-such-branch"));
    assert_eq!(repo.read("pom.xml"), edited);
}

#[test]
fn malformed_base_is_an_error_and_the_edit_survives() {
    if !git_available() {
        return;
    }
    let repo = committed_repo("<project xmlns=\"http://maven.apache.org/POM/4.0.0\"><dependencies>");
    let edited = pom_xml(&[("csm", "1.0.0")]);
    repo.write("pom.xml", &edited);

    let err = run_diff(input(&repo, "HEAD"), &GitCli::new(repo.root())).expect_err("malformed");

    assert!(format!("{err:#}").contains("malformed manifest pom.xml"));
    assert_eq!(repo.read("pom.xml"), edited);
}

#[test]
fn manifest_added_since_base_reports_every_library_as_added() {
    if !git_available() {
        return;
    }
    let repo = committed_repo(&pom_xml(&[("fire-rating", "4.2.0")]));
    repo.write("web/pom.xml", &pom_xml(&[("csm", "1.0.0")]));

    let mut input = input(&repo, "HEAD");
    input.manifest = Some(RepoPath::new("web/pom.xml"));
    let out = run_diff(input, &GitCli::new(repo.root())).expect("diff");

    let messages: Vec<&str> = out.report.findings.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["library 'csm' added at 1.0.0 in web/pom.xml (not declared at base)"]
    );
    assert!(repo.root().join("web/pom.xml").exists());
}

#[test]
fn sibling_manifest_outside_the_repository_is_an_error() {
    if !git_available() {
        return;
    }
    let tmp = TempRepo::new();
    tmp.write("repo/README", "readme\n");
    let root = tmp.root().join("repo");
    git_in(&root, &["init", "--quiet"]);
    git_in(&root, &["add", "README"]);
    git_in(&root, &["commit", "--quiet", "-m", "base"]);
    let sibling = pom_xml(&[("csm", "1.0.0")]);
    tmp.write("server/pom.xml", &sibling);

    let input = DiffInput {
        repo_root: &root,
        config_text: None,
        overrides: Overrides {
            tracked: vec!["csm".to_string()],
            ..Overrides::default()
        },
        manifest: Some(RepoPath::new("../server/pom.xml")),
        base: Some(BaseSource::Revision("HEAD".to_string())),
        git: None,
    };
    let err = run_diff(input, &GitCli::new(root.clone())).expect_err("outside work tree");

    assert!(
        format!("{err:#}").contains("outside the git work tree"),
        "unexpected error: {err:#}"
    );
    assert_eq!(tmp.read("server/pom.xml"), sibling);
}
