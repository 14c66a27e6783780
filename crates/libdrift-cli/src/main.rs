//! CLI entry point for libdrift.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `libdrift-app` crate.

mod logging;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use libdrift_app::{
    BaseSource, CheckInput, DiffInput, GitCli, NotificationContext, NotificationEnv,
    counterparts_for, notification_context, parse_report_json, render_annotations,
    render_notifications, render_pr_comment, run_check, run_diff, runtime_error_report,
    serialize_report, verdict_exit_code,
};
use libdrift_settings::Overrides;
use libdrift_types::{LibdriftReport, RepoPath, RunMode, VerdictStatus};
use std::io::Write;

#[derive(Parser, Debug)]
#[command(
    name = "libdrift",
    version,
    about = "Shared library version drift detector for Maven and Ivy repositories"
)]
struct Cli {
    /// Repository root; manifest and config paths are relative to it.
    #[arg(long, default_value = ".", global = true)]
    repo_root: Utf8PathBuf,

    /// Path to libdrift config TOML.
    #[arg(long, default_value = "libdrift.toml", global = true)]
    config: Utf8PathBuf,

    /// Tracked library id (repeatable). Replaces `tracked` from the config.
    #[arg(long = "tracked", value_name = "LIB", global = true)]
    tracked: Vec<String>,

    /// Base branch compared against by `diff`.
    #[arg(long, env = "GITHUB_BASE_REF", global = true)]
    base_ref: Option<String>,

    /// Remote that holds the base branch.
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(flatten)]
    github: GithubEnv,

    #[command(subcommand)]
    cmd: Commands,
}

/// CI context. Only feeds notification text.
#[derive(Args, Debug)]
struct GithubEnv {
    #[arg(
        long = "pr-author",
        env = "GITHUB_ACTOR",
        default_value = "Unknown",
        hide = true,
        global = true
    )]
    actor: String,

    #[arg(
        long = "github-repository",
        env = "GITHUB_REPOSITORY",
        default_value = "unknown/unknown",
        hide = true,
        global = true
    )]
    repository: String,

    #[arg(
        long = "pr-number",
        env = "GITHUB_PR_NUMBER",
        default_value = "0",
        hide = true,
        global = true
    )]
    pr_number: String,

    #[arg(
        long = "server-url",
        env = "GITHUB_SERVER_URL",
        default_value = "https://github.com",
        hide = true,
        global = true
    )]
    server_url: String,
}

#[derive(Args, Debug)]
struct Outputs {
    /// Where to write the JSON report.
    #[arg(long)]
    report_out: Option<Utf8PathBuf>,

    /// Where to write the PR comment (Markdown).
    #[arg(long)]
    comment_out: Option<Utf8PathBuf>,

    /// Where to write the email body.
    #[arg(long)]
    email_out: Option<Utf8PathBuf>,

    /// GitHub Actions output file; `pr_comment` and `email_body` are appended when drift is found.
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<Utf8PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare tracked library versions across repositories.
    Check {
        /// Manifest to reconcile (repeatable). Replaces `[[repos]]` from the config.
        #[arg(long = "manifest", value_name = "PATH")]
        manifests: Vec<String>,

        #[command(flatten)]
        out: Outputs,
    },

    /// Compare one manifest against its base revision.
    Diff {
        /// Manifest to diff (defaults to the configured `current` repository).
        #[arg(long)]
        manifest: Option<String>,

        /// Git revision to compare against (default `<remote>/<base_ref>`).
        #[arg(long, conflicts_with = "base_manifest")]
        base_rev: Option<String>,

        /// Already checked-out base manifest; no git call is made.
        #[arg(long)]
        base_manifest: Option<Utf8PathBuf>,

        #[command(flatten)]
        out: Outputs,
    },

    /// Render the PR comment from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/libdrift/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/libdrift/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("libdrift: {err:#}");
    }

    let cli = Cli::parse();

    match &cli.cmd {
        Commands::Check { manifests, out } => cmd_check(&cli, manifests, out),
        Commands::Diff {
            manifest,
            base_rev,
            base_manifest,
            out,
        } => {
            let base = match (base_rev, base_manifest) {
                (Some(rev), _) => Some(BaseSource::Revision(rev.clone())),
                (None, Some(path)) => Some(BaseSource::Manifest(path.clone())),
                (None, None) => None,
            };
            cmd_diff(&cli, manifest.as_deref(), base, out)
        }
        Commands::Md { report, output } => cmd_md(&cli, report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
    }
}

fn notification_env(cli: &Cli) -> NotificationEnv {
    NotificationEnv {
        actor: cli.github.actor.clone(),
        repository: cli.github.repository.clone(),
        pr_number: cli.github.pr_number.clone(),
        server_url: cli.github.server_url.clone(),
        base_ref: cli.base_ref.clone().filter(|r| !r.trim().is_empty()),
    }
}

fn repo_root(cli: &Cli) -> Utf8PathBuf {
    cli.repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone())
}

/// Config file contents; a missing file is `None` and left to config resolution to judge.
fn read_config(repo_root: &Utf8Path, config: &Utf8Path) -> anyhow::Result<Option<String>> {
    let path = repo_root.join(config);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%path, "no config file");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("read config: {path}")),
    }
}

fn overrides(cli: &Cli, manifests: &[String]) -> Overrides {
    Overrides {
        tracked: cli.tracked.clone(),
        base_ref: cli.base_ref.clone(),
        remote: cli.remote.clone(),
        manifests: manifests.iter().map(RepoPath::new).collect(),
    }
}

fn cmd_check(cli: &Cli, manifests: &[String], out: &Outputs) -> anyhow::Result<()> {
    let repo_root = repo_root(cli);
    let env = notification_env(cli);

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.exists() {
            anyhow::bail!("repo root does not exist: {}", repo_root);
        }
        let cfg_text = read_config(&repo_root, &cli.config)?;

        let output = run_check(CheckInput {
            repo_root: &repo_root,
            config_text: cfg_text.as_deref(),
            overrides: overrides(cli, manifests),
            git: Some(env.run_git()),
        })?;

        let counterparts = counterparts_for(&output.config, None);
        let ctx = notification_context(&env.repository, &env, counterparts);
        emit(&output.report, &ctx, out)?;

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    finish(result, RunMode::Reconcile, out)
}

fn cmd_diff(
    cli: &Cli,
    manifest: Option<&str>,
    base: Option<BaseSource>,
    out: &Outputs,
) -> anyhow::Result<()> {
    let repo_root = repo_root(cli);
    let env = notification_env(cli);

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.exists() {
            anyhow::bail!("repo root does not exist: {}", repo_root);
        }
        let cfg_text = read_config(&repo_root, &cli.config)?;

        let input = DiffInput {
            repo_root: &repo_root,
            config_text: cfg_text.as_deref(),
            overrides: overrides(cli, &[]),
            manifest: manifest.map(RepoPath::new),
            base,
            git: Some(env.run_git()),
        };
        let output = run_diff(input, &GitCli::new(repo_root.clone()))?;

        let counterparts = counterparts_for(&output.config, Some(&output.repository));
        let ctx = notification_context(&output.repository, &env, counterparts);
        emit(&output.report, &ctx, out)?;

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    finish(result, RunMode::Revision, out)
}

/// Status text to stdout, then every requested artifact.
fn emit(
    report: &LibdriftReport,
    ctx: &NotificationContext,
    out: &Outputs,
) -> anyhow::Result<()> {
    let notifications = render_notifications(report, ctx);
    print!("{}", notifications.status);

    if let Some(path) = &out.report_out {
        write_report_file(path, report).context("write report json")?;
    }
    if let Some(path) = &out.comment_out {
        write_text_file(path, &notifications.pr_comment).context("write pr comment")?;
    }
    if let Some(path) = &out.email_out {
        write_text_file(path, &notifications.email_body).context("write email body")?;
    }
    if report.verdict.status == VerdictStatus::Fail
        && let Some(path) = &out.github_output
    {
        append_text_file(path, &notifications.github_output()).context("write github output")?;
    }

    Ok(())
}

fn finish(result: anyhow::Result<i32>, mode: RunMode, out: &Outputs) -> anyhow::Result<()> {
    match result {
        Ok(code) => {
            std::io::stdout().flush().context("flush stdout")?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            if let Some(path) = &out.report_out {
                let report = runtime_error_report(mode, &format!("{err:#}"));
                if let Err(write_err) = write_report_file(path, &report) {
                    tracing::warn!(%path, error = %format!("{write_err:#}"), "could not write runtime-error report");
                }
            }
            eprintln!("libdrift error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &LibdriftReport) -> anyhow::Result<()> {
    create_parent(path)?;
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    create_parent(path)?;
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn append_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    create_parent(path)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open for append: {}", path))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("append: {}", path))?;
    Ok(())
}

fn create_parent(path: &Utf8Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<LibdriftReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {}", path))?;
    parse_report_json(&text)
}

fn cmd_md(cli: &Cli, report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let env = notification_env(cli);

    let repo_root = repo_root(cli);
    let counterparts = match read_config(&repo_root, &cli.config)? {
        Some(text) => {
            let cfg = libdrift_settings::parse_config_toml(&text).context("parse config")?;
            let config = libdrift_settings::resolve_config(Some(cfg), overrides(cli, &[]))
                .context("resolve config")?;
            let current = report
                .data
                .repositories
                .first()
                .filter(|_| report.data.mode == RunMode::Revision)
                .map(|r| r.name.clone());
            counterparts_for(&config, current.as_deref())
        }
        None => Vec::new(),
    };
    let repository = match report.data.mode {
        RunMode::Revision => report
            .data
            .repositories
            .first()
            .map(|r| r.name.clone())
            .unwrap_or_else(|| env.repository.clone()),
        RunMode::Reconcile => env.repository.clone(),
    };
    let ctx = notification_context(&repository, &env, counterparts);
    let md = render_pr_comment(&report, &ctx);

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;

    for annotation in render_annotations(&report, max) {
        println!("{}", annotation);
    }

    Ok(())
}
