use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub csv_path: PathBuf,
    pub log_level: String,
    pub git: Option<GitRemoteConfig>,
}

/// Remote repository settings for the extended variant. Present whenever
/// FORMSINK_GIT_REMOTE is set; the token stays optional so startup can
/// degrade to local-only persistence instead of refusing to boot.
#[derive(Debug, Clone)]
pub struct GitRemoteConfig {
    pub remote_url: String,
    pub branch: String,
    pub token: Option<String>,
    pub author_name: String,
    pub author_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMSINK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_HOST: {e}"))?;

        let port: u16 = env_or("FORMSINK_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_PORT: {e}"))?;

        let csv_path = PathBuf::from(env_or("FORMSINK_CSV_PATH", "form_data.csv"));

        let log_level = env_or("FORMSINK_LOG_LEVEL", "info");

        let git = std::env::var("FORMSINK_GIT_REMOTE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|remote_url| GitRemoteConfig {
                remote_url,
                branch: env_or("FORMSINK_GIT_BRANCH", "main"),
                token: std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty()),
                author_name: env_or("FORMSINK_GIT_AUTHOR_NAME", "formsink"),
                author_email: env_or("FORMSINK_GIT_AUTHOR_EMAIL", "formsink@localhost"),
            });

        Ok(Config {
            host,
            port,
            csv_path,
            log_level,
            git,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
