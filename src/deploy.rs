//! Publishing the output directory with git.
//!
//! The output directory is its own repository, separate from whatever
//! repository the project lives in. A deploy run:
//!
//! ```text
//! git init                          # only when output/.git is absent
//! git remote add|set-url origin <repo>
//! git add -A
//! git commit -m "Updated 2024-05-01 18:30:00"   # skipped when clean
//! git rev-parse --verify --quiet HEAD           # must exist to push
//! git push origin HEAD:refs/heads/<branch>
//! ```
//!
//! Git is driven as an external program. Authentication, identity and
//! signing all come from the user's git setup.

use crate::config::{ConfigError, SiteConfig};
use chrono::NaiveDateTime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use thiserror::Error;

const REMOTE: &str = "origin";

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Output directory not found: {0} (run `arco generate` first)")]
    MissingOutput(PathBuf),
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("Nothing to deploy: {0} has no commits (is the output empty?)")]
    NothingToDeploy(PathBuf),
    #[error("Push rejected: {stderr}")]
    PushRejected { stderr: String },
}

/// A git executable plus the environment it runs with.
#[derive(Debug, Clone)]
pub struct Git {
    program: OsString,
    envs: Vec<(OsString, OsString)>,
}

impl Default for Git {
    fn default() -> Self {
        Self::with_program("git")
    }
}

impl Git {
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable for every git invocation.
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.program.to_string_lossy().into_owned();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }

    /// Run git in `dir`, returning the raw output whatever the exit status.
    fn output(&self, dir: &Path, args: &[&str]) -> Result<Output, DeployError> {
        tracing::debug!(dir = %dir.display(), command = %self.describe(args), "git");
        Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .envs(self.envs.iter().cloned())
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DeployError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })
    }

    /// Run git in `dir` and return its stdout, failing on non-zero exit.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, DeployError> {
        let output = self.output(dir, args)?;
        if !output.status.success() {
            return Err(DeployError::CommandFailed {
                command: self.describe(args),
                stderr: stderr_of(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Commit message for a deploy made at `time`.
pub fn commit_message(time: NaiveDateTime) -> String {
    format!("Updated {}", time.format("%Y-%m-%d %H:%M:%S"))
}

/// What a deploy run did.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployReport {
    pub repo: String,
    pub branch: String,
    /// Whether a fresh repository was initialised.
    pub initialized: bool,
    /// The commit message, or `None` when there was nothing to commit.
    pub commit: Option<String>,
}

pub struct Deployer<'a> {
    config: &'a SiteConfig,
    git: Git,
}

impl<'a> Deployer<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            git: Git::default(),
        }
    }

    pub fn with_git(mut self, git: Git) -> Self {
        self.git = git;
        self
    }

    /// Commit everything in `output_dir` and push it to the configured
    /// repository and branch.
    pub fn deploy(&self, output_dir: &Path) -> Result<DeployReport, DeployError> {
        let repo = self.config.require_repo()?;
        let branch = self.config.branch.as_str();
        if !output_dir.is_dir() {
            return Err(DeployError::MissingOutput(output_dir.to_path_buf()));
        }
        tracing::info!(repo, branch, output = %output_dir.display(), "deploying");

        let initialized = !output_dir.join(".git").exists();
        if initialized {
            self.git.run(output_dir, &["init", "--quiet"])?;
        }
        self.configure_remote(output_dir, repo)?;

        self.git.run(output_dir, &["add", "-A"])?;
        let commit = if self.git.run(output_dir, &["status", "--porcelain"])?.trim().is_empty() {
            tracing::info!("nothing to commit, pushing existing history");
            None
        } else {
            let message = commit_message(chrono::Local::now().naive_local());
            self.git.run(output_dir, &["commit", "--quiet", "-m", message.as_str()])?;
            Some(message)
        };

        // An empty output on a fresh repository leaves no HEAD to push.
        let head = self.git.output(output_dir, &["rev-parse", "--verify", "--quiet", "HEAD"])?;
        if !head.status.success() {
            return Err(DeployError::NothingToDeploy(output_dir.to_path_buf()));
        }

        let refspec = format!("HEAD:refs/heads/{branch}");
        let push = self.git.output(output_dir, &["push", REMOTE, refspec.as_str()])?;
        if !push.status.success() {
            return Err(DeployError::PushRejected {
                stderr: stderr_of(&push),
            });
        }

        tracing::info!(repo, branch, "deployed");
        Ok(DeployReport {
            repo: repo.to_string(),
            branch: branch.to_string(),
            initialized,
            commit,
        })
    }

    /// Point `origin` at `repo`, adding the remote if it does not exist.
    fn configure_remote(&self, dir: &Path, repo: &str) -> Result<(), DeployError> {
        let remotes = self.git.run(dir, &["remote"])?;
        let action = if remotes.lines().any(|r| r.trim() == REMOTE) {
            "set-url"
        } else {
            "add"
        };
        self.git.run(dir, &["remote", action, REMOTE, repo])?;
        Ok(())
    }
}
