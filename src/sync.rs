use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::GitRemoteConfig;
use crate::error::AppError;
use crate::store;
use crate::vcs::{git, VcsClient};

/// Synchronization context for the repository-backed variant. Owns the
/// process-local clone and the initialization state, and is constructed
/// explicitly so tests can build one deterministically.
pub struct RepoSync {
    client: Arc<dyn VcsClient>,
    state: SyncState,
}

enum SyncState {
    Uninitialized,
    Ready { workdir: TempDir },
}

impl RepoSync {
    /// Clones the remote once into a fresh temporary directory and becomes
    /// READY. Without a credential token the context stays uninitialized for
    /// the process lifetime and the clone directory is never created; writes
    /// will fail with a configuration error, reads fall back to the local
    /// file.
    pub async fn bootstrap(
        cfg: &GitRemoteConfig,
        client: Arc<dyn VcsClient>,
    ) -> Result<Self, AppError> {
        let Some(token) = cfg.token.as_deref() else {
            tracing::warn!("GITHUB_TOKEN not set; repository synchronization disabled");
            return Ok(Self {
                client,
                state: SyncState::Uninitialized,
            });
        };

        let workdir = tempfile::tempdir()?;
        let remote = git::with_token(&cfg.remote_url, token);
        client.clone_repo(&remote, &cfg.branch, workdir.path()).await?;
        tracing::info!(path = %workdir.path().display(), "Cloned data repository");

        Ok(Self {
            client,
            state: SyncState::Ready { workdir },
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SyncState::Ready { .. })
    }

    /// Path of the data file inside the clone, once READY.
    pub fn data_path(&self) -> Option<PathBuf> {
        match &self.state {
            SyncState::Ready { workdir } => Some(workdir.path().join(store::DATA_FILE)),
            SyncState::Uninitialized => None,
        }
    }

    /// Read-side synchronization: pull before the file is scanned. A failed
    /// pull fails the whole request. While uninitialized this is a no-op and
    /// the caller reads whatever the local file holds.
    pub async fn refresh(&self) -> Result<(), AppError> {
        match &self.state {
            SyncState::Ready { workdir } => Ok(self.client.pull(workdir.path()).await?),
            SyncState::Uninitialized => Ok(()),
        }
    }

    /// Write-side entry: pull so the append lands on the latest rows. Fails
    /// with a configuration error while uninitialized, before anything is
    /// written.
    pub async fn begin_write(&self) -> Result<(), AppError> {
        match &self.state {
            SyncState::Ready { workdir } => Ok(self.client.pull(workdir.path()).await?),
            SyncState::Uninitialized => Err(uninitialized()),
        }
    }

    /// Publishes an appended row: add, commit, push, in that order. Any
    /// failing step aborts the request with its captured error output and
    /// leaves the clone in whatever partial state the sequence reached.
    pub async fn publish(&self, message: &str) -> Result<(), AppError> {
        let SyncState::Ready { workdir } = &self.state else {
            return Err(uninitialized());
        };
        let dir = workdir.path();
        self.client.add(dir, store::DATA_FILE).await?;
        self.client.commit(dir, message).await?;
        self.client.push(dir).await?;
        Ok(())
    }
}

fn uninitialized() -> AppError {
    AppError::Config(
        "repository synchronization is not initialized; set GITHUB_TOKEN".to_string(),
    )
}
