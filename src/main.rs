use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use formsink::config::Config;
use formsink::state::AppState;
use formsink::store::CsvStore;
use formsink::sync::RepoSync;
use formsink::vcs::{GitCli, VcsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config = Config::from_env().expect("Failed to load configuration");

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting formsink");

    // Clone the data repository once when a remote is configured. Missing
    // credentials leave the context uninitialized rather than failing boot.
    let sync = match &config.git {
        Some(git) => {
            let client: Arc<dyn VcsClient> =
                Arc::new(GitCli::new(git.author_name.clone(), git.author_email.clone()));
            Some(
                RepoSync::bootstrap(git, client)
                    .await
                    .expect("Failed to initialize repository synchronization"),
            )
        }
        None => None,
    };

    // The data file lives inside the clone when synchronization is READY,
    // otherwise at the configured local path.
    let data_path = sync
        .as_ref()
        .and_then(|s| s.data_path())
        .unwrap_or_else(|| config.csv_path.clone());
    let store = CsvStore::new(data_path);
    store.ensure_header().expect("Failed to initialize data file");

    let addr = SocketAddr::new(config.host, config.port);
    let state = Arc::new(AppState { config, store, sync });
    let app = formsink::build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
