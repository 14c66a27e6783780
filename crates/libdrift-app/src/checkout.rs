//! Scoped materialization of a manifest at a base revision.
//!
//! The working-tree file is the only shared mutable resource in a run. [`WorkingTreeCheckout`]
//! owns it for the duration of a scope and puts the original bytes back when the scope ends,
//! whether it ends normally, with an error, or by unwinding.

use anyhow::Context;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use libdrift_types::RepoPath;
use std::process::{Command, Output};
use tracing::{debug, info, warn};

/// Version-control operations needed to read a manifest at another revision.
pub trait RevisionSource {
    /// Whether `path` exists at `revision`. An unknown revision, or a path the repository
    /// cannot hold, is an error.
    fn exists_at(&self, revision: &str, path: &RepoPath) -> anyhow::Result<bool>;

    /// Overwrite the working-tree copy of `path` with its content at `revision`.
    fn restore_worktree(&self, revision: &str, path: &RepoPath) -> anyhow::Result<()>;
}

/// [`RevisionSource`] backed by the `git` executable, run in `root`.
#[derive(Clone, Debug)]
pub struct GitCli {
    root: Utf8PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn git(&self, args: &[&str]) -> anyhow::Result<Output> {
        debug!(root = %self.root, ?args, "running git");
        Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .context("spawn git")
    }

    /// Fails unless `path`, taken relative to `root`, lies inside the git work tree.
    ///
    /// Git reports a path outside the repository with the same non-zero exit as a missing
    /// blob, so this has to be settled before asking whether the file exists.
    fn ensure_inside_worktree(&self, path: &RepoPath) -> anyhow::Result<()> {
        let output = self.git(&["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            anyhow::bail!(
                "{} is not inside a git work tree: {}",
                self.root,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let toplevel = String::from_utf8(output.stdout).context("git work tree path is not UTF-8")?;
        let toplevel = Utf8Path::new(toplevel.trim())
            .canonicalize_utf8()
            .with_context(|| format!("resolve git work tree {}", toplevel.trim()))?;
        let root = self
            .root
            .canonicalize_utf8()
            .with_context(|| format!("resolve {}", self.root))?;

        let target = lexical_join(&root, path.as_utf8_path());
        if !target.starts_with(&toplevel) {
            anyhow::bail!(
                "manifest {path} is outside the git work tree at {toplevel}; \
                 run from that repository or pass --base-manifest"
            );
        }
        Ok(())
    }
}

/// Join `rel` onto `base`, folding `.` and `..` without touching the filesystem.
fn lexical_join(base: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

impl RevisionSource for GitCli {
    fn exists_at(&self, revision: &str, path: &RepoPath) -> anyhow::Result<bool> {
        let verify = self.git(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("{revision}^{{commit}}"),
        ])?;
        if !verify.status.success() {
            anyhow::bail!("unknown revision: {revision}");
        }

        self.ensure_inside_worktree(path)?;

        let listed = self.git(&["ls-tree", "--name-only", revision, "--", path.as_str()])?;
        if !listed.status.success() {
            anyhow::bail!(
                "git ls-tree of {path} at {revision} failed: {}",
                String::from_utf8_lossy(&listed.stderr).trim()
            );
        }
        Ok(!listed.stdout.trim_ascii().is_empty())
    }

    fn restore_worktree(&self, revision: &str, path: &RepoPath) -> anyhow::Result<()> {
        let output = self.git(&[
            "restore",
            "--source",
            revision,
            "--worktree",
            "--",
            path.as_str(),
        ])?;
        if !output.status.success() {
            anyhow::bail!(
                "git restore of {path} at {revision} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Original {
    Bytes(Vec<u8>),
    Missing,
}

/// Holds the working-tree manifest at a base revision until released or dropped.
pub struct WorkingTreeCheckout<'a, S: RevisionSource + ?Sized> {
    source: &'a S,
    file: Utf8PathBuf,
    path: RepoPath,
    revision: String,
    original: Original,
    released: bool,
}

impl<'a, S: RevisionSource + ?Sized> WorkingTreeCheckout<'a, S> {
    /// Capture the current bytes of `root/path`, then materialize `revision` into it.
    ///
    /// If materialization fails the original bytes are written back before the error is
    /// returned.
    pub fn acquire(
        source: &'a S,
        root: &Utf8Path,
        revision: &str,
        path: &RepoPath,
    ) -> anyhow::Result<Self> {
        let file = root.join(path.as_utf8_path());
        let original = match std::fs::read(&file) {
            Ok(bytes) => Original::Bytes(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Original::Missing,
            Err(e) => return Err(e).with_context(|| format!("read {file}")),
        };

        info!(%path, %revision, "checking out base revision of manifest");
        let mut guard = Self {
            source,
            file,
            path: path.clone(),
            revision: revision.to_string(),
            original,
            released: false,
        };

        if let Err(err) = guard.source.restore_worktree(revision, path) {
            if let Err(restore_err) = guard.release() {
                warn!(path = %guard.path, error = %format!("{restore_err:#}"), "restore after failed checkout failed");
            }
            return Err(err.context(format!("materialize {path} at {revision}")));
        }

        Ok(guard)
    }

    pub fn path(&self) -> &Utf8Path {
        &self.file
    }

    /// Put the original working-tree content back. Idempotent.
    pub fn release(&mut self) -> anyhow::Result<()> {
        if self.released {
            return Ok(());
        }

        match &self.original {
            Original::Bytes(bytes) => std::fs::write(&self.file, bytes)
                .with_context(|| format!("restore {}", self.file))?,
            Original::Missing => match std::fs::remove_file(&self.file) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).with_context(|| format!("remove {}", self.file)),
            },
        }

        self.released = true;
        info!(path = %self.path, revision = %self.revision, "restored working-tree manifest");
        Ok(())
    }

    /// Release and consume the guard.
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.release()
    }
}

impl<S: RevisionSource + ?Sized> Drop for WorkingTreeCheckout<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(path = %self.path, error = %format!("{err:#}"), "failed to restore working-tree manifest");
        }
    }
}

/// Run `f` while `root/path` holds its content at `revision`.
///
/// Returns `Ok(None)` without touching the working tree when the file does not exist at
/// `revision`. An error from `f` takes precedence over a restore failure.
pub fn with_base_revision<S, T, F>(
    source: &S,
    root: &Utf8Path,
    revision: &str,
    path: &RepoPath,
    f: F,
) -> anyhow::Result<Option<T>>
where
    S: RevisionSource + ?Sized,
    F: FnOnce() -> anyhow::Result<T>,
{
    if !source.exists_at(revision, path)? {
        info!(%path, %revision, "manifest does not exist at base revision");
        return Ok(None);
    }

    let guard = WorkingTreeCheckout::acquire(source, root, revision, path)?;
    let result = f();
    let restored = guard.finish();

    let value = result?;
    restored?;
    Ok(Some(value))
}
