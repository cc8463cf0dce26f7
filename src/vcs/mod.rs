//! Version-control client abstraction.
//!
//! Production operations shell out to the `git` binary using
//! `tokio::process::Command`. The trait covers exactly the capabilities the
//! synchronization layer needs (clone, pull, add, commit, push) so tests can
//! substitute a double that fails at any chosen step.

pub mod git;

pub use git::GitCli;

use std::path::Path;

use async_trait::async_trait;

use crate::error::AppError;

#[derive(Debug)]
pub enum VcsError {
    Command { command: String, stderr: String },
    Io(std::io::Error),
}

impl std::fmt::Display for VcsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VcsError::Command { command, stderr } => {
                write!(f, "`{command}` exited with an error: {stderr}")
            }
            VcsError::Io(err) => write!(f, "failed to spawn command: {err}"),
        }
    }
}

impl From<std::io::Error> for VcsError {
    fn from(err: std::io::Error) -> Self {
        VcsError::Io(err)
    }
}

impl From<VcsError> for AppError {
    fn from(err: VcsError) -> Self {
        match err {
            VcsError::Io(io) => AppError::Io(io),
            other => AppError::Command(other.to_string()),
        }
    }
}

#[async_trait]
pub trait VcsClient: Send + Sync {
    async fn clone_repo(&self, remote: &str, branch: &str, dest: &Path) -> Result<(), VcsError>;
    async fn pull(&self, workdir: &Path) -> Result<(), VcsError>;
    async fn add(&self, workdir: &Path, file: &str) -> Result<(), VcsError>;
    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), VcsError>;
    async fn push(&self, workdir: &Path) -> Result<(), VcsError>;
}
