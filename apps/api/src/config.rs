use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

/// Application configuration loaded from environment variables.
/// Email settings are optional at startup; the contact endpoint reports them as missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_file: PathBuf,
    pub project_assets_dir: PathBuf,
    pub personal_assets_dir: PathBuf,
    pub client_dist_dir: PathBuf,
    pub optimized_assets_dir: PathBuf,
    pub serve_client: bool,
    pub email: EmailConfig,
}

/// Email delivery settings for the contact relay.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub sendgrid_api_key: Option<String>,
    pub from_email: Option<String>,
    pub fallback_to_email: Option<String>,
}

impl EmailConfig {
    /// Names of the variables the contact relay cannot work without.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sendgrid_api_key.is_none() {
            missing.push("SENDGRID_API_KEY");
        }
        if self.from_email.is_none() {
            missing.push("CONTACT_FROM_EMAIL");
        }
        missing
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_file: path_env("PORTFOLIO_DATA_FILE", "portfolio-data.json"),
            project_assets_dir: path_env("PROJECT_ASSETS_DIR", "project_assets"),
            personal_assets_dir: path_env("PERSONAL_ASSETS_DIR", "personal_assets"),
            client_dist_dir: path_env("CLIENT_DIST_DIR", "dist/public"),
            optimized_assets_dir: path_env("OPTIMIZED_ASSETS_DIR", "dist/public/project_assets"),
            serve_client: bool_env("SERVE_CLIENT", true)?,
            email: EmailConfig {
                sendgrid_api_key: optional_env("SENDGRID_API_KEY"),
                from_email: optional_env("CONTACT_FROM_EMAIL"),
                fallback_to_email: optional_env("CONTACT_TO_EMAIL"),
            },
        })
    }

    /// Logs a warning for every email setting the contact endpoint will miss.
    pub fn warn_on_missing_email(&self) {
        let missing = self.email.missing_required();
        if !missing.is_empty() {
            warn!(
                "Contact form delivery is not configured, POST /api/contact will fail with 500. Missing: {}",
                missing.join(", ")
            );
        }
        if self.email.fallback_to_email.is_none() {
            warn!("CONTACT_TO_EMAIL is not set; contact messages go to the sender address unless the request names a recipient");
        }
    }

    /// Root that `/project_assets` and image discovery read from:
    /// the optimizer output when it exists, otherwise the source tree.
    pub fn serving_assets_dir(&self) -> PathBuf {
        if self.optimized_assets_dir.is_dir() {
            self.optimized_assets_dir.clone()
        } else {
            self.project_assets_dir.clone()
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn path_env(key: &str, default: &str) -> PathBuf {
    PathBuf::from(optional_env(key).unwrap_or_else(|| default.to_string()))
}

fn bool_env(key: &str, default: bool) -> Result<bool> {
    match optional_env(key) {
        None => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
        },
    }
}

#[cfg(test)]
impl Config {
    /// Configuration rooted in a scratch directory, with client serving off.
    pub(crate) fn for_tests(root: &std::path::Path) -> Self {
        Config {
            port: 0,
            rust_log: "info".to_string(),
            data_file: root.join("portfolio-data.json"),
            project_assets_dir: root.join("project_assets"),
            personal_assets_dir: root.join("personal_assets"),
            client_dist_dir: root.join("dist/public"),
            optimized_assets_dir: root.join("dist/public/project_assets"),
            serve_client: false,
            email: EmailConfig::default(),
        }
    }
}
