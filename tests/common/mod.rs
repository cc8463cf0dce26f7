#![allow(dead_code)] // helpers are shared across test binaries

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use formsink::config::{Config, GitRemoteConfig};
use formsink::state::AppState;
use formsink::store::CsvStore;
use formsink::sync::RepoSync;
use formsink::vcs::{VcsClient, VcsError};

/// A running test server instance backed by a temporary data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub csv_path: PathBuf,
    _data_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a well-formed form payload, return (body, status).
    pub async fn submit(&self, endpoint: &str, data: &Value) -> (Value, StatusCode) {
        self.submit_raw(&json!({ "selectedEndpoint": endpoint, "data": data }))
            .await
    }

    /// Post an arbitrary JSON body to the submit route, return (body, status).
    pub async fn submit_raw(&self, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .json(body)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Fetch the accumulated rows, return (body, status).
    pub async fn list(&self) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url("/form-data"))
            .send()
            .await
            .expect("list request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

fn test_config(csv_path: &Path, git: Option<GitRemoteConfig>) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        csv_path: csv_path.to_path_buf(),
        log_level: "warn".to_string(),
        git,
    }
}

pub fn git_config(token: Option<&str>) -> GitRemoteConfig {
    GitRemoteConfig {
        remote_url: "https://github.com/acme/form-data.git".to_string(),
        branch: "main".to_string(),
        token: token.map(String::from),
        author_name: "formsink".to_string(),
        author_email: "formsink@localhost".to_string(),
    }
}

/// Spawn a test app persisting to a CSV file in a fresh temp dir (local
/// variant). The file is created lazily by the first append.
pub async fn spawn_app() -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = data_dir.path().join("form_data.csv");
    let config = test_config(&csv_path, None);
    let store = CsvStore::new(&csv_path);

    serve(
        AppState {
            config,
            store,
            sync: None,
        },
        csv_path,
        data_dir,
    )
    .await
}

/// Spawn a test app with repository synchronization driven by the given
/// client double (extended variant).
pub async fn spawn_app_with_sync(
    git: GitRemoteConfig,
    client: Arc<dyn VcsClient>,
) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let local_path = data_dir.path().join("form_data.csv");

    let sync = RepoSync::bootstrap(&git, client)
        .await
        .expect("Failed to bootstrap repository synchronization");
    let csv_path = sync.data_path().unwrap_or_else(|| local_path.clone());
    let config = test_config(&local_path, Some(git));
    let store = CsvStore::new(&csv_path);

    serve(
        AppState {
            config,
            store,
            sync: Some(sync),
        },
        csv_path,
        data_dir,
    )
    .await
}

async fn serve(state: AppState, csv_path: PathBuf, data_dir: TempDir) -> TestApp {
    let app = formsink::build_app(Arc::new(state));

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        csv_path,
        _data_dir: data_dir,
    }
}

// ── Version-control double ──────────────────────────────────────

/// Scripted stand-in for the git client: records every call in order and
/// fails the step named by `fail_on` with canned stderr output.
pub struct ScriptedVcs {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl ScriptedVcs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        })
    }

    pub fn failing_at(step: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(step),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, step: &str) -> Result<(), VcsError> {
        self.calls.lock().unwrap().push(step.to_string());
        if self.fail_on == Some(step) {
            return Err(VcsError::Command {
                command: format!("git {step}"),
                stderr: format!("simulated {step} failure"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VcsClient for ScriptedVcs {
    async fn clone_repo(
        &self,
        _remote: &str,
        _branch: &str,
        _dest: &Path,
    ) -> Result<(), VcsError> {
        self.record("clone")
    }

    async fn pull(&self, _workdir: &Path) -> Result<(), VcsError> {
        self.record("pull")
    }

    async fn add(&self, _workdir: &Path, _file: &str) -> Result<(), VcsError> {
        self.record("add")
    }

    async fn commit(&self, _workdir: &Path, _message: &str) -> Result<(), VcsError> {
        self.record("commit")
    }

    async fn push(&self, _workdir: &Path) -> Result<(), VcsError> {
        self.record("push")
    }
}
