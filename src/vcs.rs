use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use desc::{PathOpts, RunDesc};

use crate::fs::Fs;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown version control system \"{0}\" in \"vcs revisions\"; expected git or hg")]
    UnknownVcs(String),
    #[error("Repository to record revision of not found: {0}")]
    RepoNotFound(String),
    #[error("\"{cmd}\" failed in {repo}: {stderr}")]
    CommandFailed {
        cmd: String,
        repo: String,
        stderr: String,
    },
}

/// Revision details of a repo's working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    pub changeset: String,
    pub author: String,
    pub date: String,
    pub summary: String,
    /// status lines for files changed since `changeset`
    pub uncommitted: Vec<String>,
}

impl Revision {
    /// Contents of a `<repo>_rev.txt` file.
    pub fn to_rev_txt(&self) -> String {
        let mut text = String::with_capacity(256);
        for (label, value) in [
            ("changeset:", &self.changeset),
            ("author:", &self.author),
            ("date:", &self.date),
            ("summary:", &self.summary),
        ] {
            text.push_str(&format!("{label:<13}{value}\n"));
        }
        if !self.uncommitted.is_empty() {
            text.push_str("uncommitted changes:\n");
            for line in &self.uncommitted {
                text.push_str(line);
                text.push('\n');
            }
        }
        text
    }
}

/// Reads the current revision of a repo checkout.
pub trait RevisionReader {
    fn read(&self, repo: &Path) -> Result<Revision>;
}

/// Reads revisions by running `git`.
#[derive(Debug, Default)]
pub struct Git;

/// Reads revisions by running `hg`.
#[derive(Debug, Default)]
pub struct Hg;

impl RevisionReader for Git {
    fn read(&self, repo: &Path) -> Result<Revision> {
        let log = output(
            Command::new("git")
                .arg("-C")
                .arg(repo)
                .args(["log", "-1", "--format=%H%n%an <%ae>%n%cd%n%s"]),
            repo,
        )?;
        let status = output(
            Command::new("git")
                .arg("-C")
                .arg(repo)
                .args(["status", "--porcelain"]),
            repo,
        )?;
        Ok(parse_log(&log, &status))
    }
}

impl RevisionReader for Hg {
    fn read(&self, repo: &Path) -> Result<Revision> {
        let log = output(
            Command::new("hg").arg("-R").arg(repo).args([
                "log",
                "-r",
                ".",
                "--template",
                "{node}\n{author}\n{date|date}\n{desc|firstline}\n",
            ]),
            repo,
        )?;
        let status = output(
            Command::new("hg")
                .arg("-R")
                .arg(repo)
                .args(["status", "--modified", "--added", "--removed", "--deleted"]),
            repo,
        )?;
        Ok(parse_log(&log, &status))
    }
}

fn output(cmd: &mut Command, repo: &Path) -> Result<String> {
    let cmd_str = format!("{:?}", cmd);
    let out = cmd
        .output()
        .with_context(|| format!("running {cmd_str}"))?;
    if !out.status.success() {
        return Err(Error::CommandFailed {
            cmd: cmd_str,
            repo: repo.display().to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// `log` is four lines: id, author, date, summary.
fn parse_log(log: &str, status: &str) -> Revision {
    let mut lines = log.lines().map(str::trim);
    let mut next = || lines.next().unwrap_or_default().to_owned();
    Revision {
        changeset: next(),
        author: next(),
        date: next(),
        summary: next(),
        uncommitted: status
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_end().to_owned())
            .collect(),
    }
}

/// Records `<repo>_rev.txt` files for the repos a run or job depends on.
pub struct Revisions {
    git: Box<dyn RevisionReader>,
    hg: Box<dyn RevisionReader>,
}

impl Default for Revisions {
    fn default() -> Self {
        Self::new(Box::new(Git), Box::new(Hg))
    }
}

impl Revisions {
    pub fn new(git: Box<dyn RevisionReader>, hg: Box<dyn RevisionReader>) -> Self {
        Self { git, hg }
    }

    fn reader(&self, kind: &str) -> Result<&dyn RevisionReader, Error> {
        match kind {
            "git" => Ok(self.git.as_ref()),
            "hg" => Ok(self.hg.as_ref()),
            other => Err(Error::UnknownVcs(other.to_owned())),
        }
    }

    /// Write `<repo>_rev.txt` for `repo` into `dest_dir`.
    pub fn write_rev_file(
        &self,
        fs: &Fs,
        kind: &str,
        repo: &Path,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let reader = self.reader(kind)?;
        if !repo.exists() {
            return Err(Error::RepoNotFound(repo.display().to_string()).into());
        }
        let name = repo
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(util::PathEncodingError)?;
        let revision = reader
            .read(repo)
            .with_context(|| format!("while reading {kind} revision of {}", repo.display()))?;
        let rev_file = fs.rev_file(dest_dir, name);
        fs.write_file(&rev_file, &revision.to_rev_txt())?;
        Ok(rev_file)
    }

    /// Record the revision of `primary` (when it's a git or hg checkout),
    /// then of every repo listed under `vcs revisions` in `desc`.
    pub fn record(
        &self,
        fs: &Fs,
        desc: &RunDesc,
        primary: Option<&Path>,
        dest_dir: &Path,
    ) -> Result<()> {
        if let Some(repo) = primary {
            match detect_kind(repo) {
                Some(kind) => {
                    self.write_rev_file(fs, kind, repo, dest_dir)?;
                }
                None => log::warn!(
                    "{} is not a git or hg repository; not recording its revision",
                    repo.display()
                ),
            }
        }

        if desc.get_opt(&["vcs revisions"]).is_none() {
            return Ok(());
        }
        for (kind, _) in desc.get_mapping(&["vcs revisions"])? {
            self.reader(&kind)?;
            for repo in desc.get_seq(&["vcs revisions", kind.as_str()])? {
                let repo = desc::scalar_str(repo).ok_or_else(|| desc::Error::TypeMismatch {
                    key: desc::key_path(&["vcs revisions", kind.as_str()]),
                    expected: "a list of repository paths",
                    file: desc.file().display().to_string(),
                })?;
                let repo = PathOpts::default().apply(&repo);
                self.write_rev_file(fs, &kind, &repo, dest_dir)?;
            }
        }
        Ok(())
    }
}

fn detect_kind(repo: &Path) -> Option<&'static str> {
    if repo.join(".git").exists() {
        Some("git")
    } else if repo.join(".hg").exists() {
        Some("hg")
    } else {
        None
    }
}
