//! Configuration management for the JIRA attachment MCP server
//!
//! Handles loading configuration from environment variables, TOML files,
//! and provides sensible defaults for all settings. The resulting
//! [`JiraConfig`] is built once at startup and shared read-only.

use crate::error::{JiraMcpError, JiraMcpResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Staging directory used when none is configured
pub const DEFAULT_STAGING_DIR: &str = "./tmp";

/// Port for the HTTP surface when `PORT` is not set
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Main configuration structure for the JIRA attachment MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// JIRA instance URL (required)
    pub jira_url: String,

    /// Authentication configuration (required)
    pub auth: AuthConfig,

    /// Project key issues are expected to belong to (e.g. "PROJ")
    pub project_key: Option<String>,

    /// Issue key used when a tool call does not name one
    pub default_issue_key: Option<String>,

    /// Local directory attachments are staged in (default: ./tmp)
    pub staging_dir: PathBuf,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// Port for the bulk download HTTP surface (default: 8000)
    pub http_port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuthConfig {
    /// Basic authentication (Atlassian account e-mail + API token)
    Basic { username: String, api_token: String },

    /// Bearer token (personal access token on JIRA Server / Data Center)
    Bearer(String),

    /// Not configured yet
    Unset,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            jira_url: String::new(),
            auth: AuthConfig::Unset,
            project_key: None,
            default_issue_key: None,
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            request_timeout_seconds: 30,
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

impl JiraConfig {
    /// Load configuration from environment variables, TOML file, and defaults
    /// Priority: env vars > TOML file > defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(file_config) = Self::load_from_file("config/jira-mcp-config.toml") {
            info!("Loaded configuration from TOML file");
            config = file_config;
        } else if let Ok(file_config) = Self::load_from_file("jira-mcp-config.toml") {
            info!("Loaded configuration from TOML file in current directory");
            config = file_config;
        } else {
            debug!("No TOML configuration file found, using defaults and environment variables");
        }

        config.load_from_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    fn load_from_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("JIRA_URL") {
            self.jira_url = url.trim_end_matches('/').to_string();
            debug!("Loaded JIRA_URL from environment");
        }

        let auth_type = env::var("JIRA_AUTH_TYPE").unwrap_or_else(|_| "basic".to_string());
        match auth_type.to_lowercase().as_str() {
            "basic" => {
                if let (Ok(username), Ok(api_token)) =
                    (env::var("JIRA_USERNAME"), env::var("JIRA_API_TOKEN"))
                {
                    self.auth = AuthConfig::Basic {
                        username,
                        api_token,
                    };
                    debug!("Configured basic authentication from environment");
                } else if env::var("JIRA_AUTH_TYPE").is_ok() {
                    return Err(anyhow::anyhow!(
                        "JIRA_USERNAME and JIRA_API_TOKEN are required for basic authentication"
                    ));
                }
            }
            "bearer" | "pat" => {
                let token =
                    env::var("JIRA_TOKEN").context("JIRA_TOKEN required for bearer authentication")?;
                self.auth = AuthConfig::Bearer(token);
                debug!("Configured bearer token authentication from environment");
            }
            other => {
                warn!("Unknown JIRA_AUTH_TYPE: {}, ignoring", other);
            }
        }

        if let Ok(project_key) = env::var("PROJECT_KEY") {
            self.project_key = non_blank(project_key);
            debug!("Loaded PROJECT_KEY from environment");
        }

        if let Ok(issue_key) = env::var("ISSUE_KEY") {
            self.default_issue_key = non_blank(issue_key);
            debug!("Loaded ISSUE_KEY from environment");
        }

        if let Ok(timeout) = env::var("JIRA_REQUEST_TIMEOUT") {
            if let Ok(timeout_seconds) = timeout.parse::<u64>() {
                self.request_timeout_seconds = timeout_seconds;
                debug!(
                    "Set request timeout to {} seconds from environment",
                    timeout_seconds
                );
            }
        }

        if let Ok(port) = env::var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => {
                    self.http_port = port;
                    debug!("Set HTTP port to {} from environment", port);
                }
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.jira_url.is_empty() {
            return Err(anyhow::anyhow!(
                "JIRA URL is required. Set JIRA_URL environment variable or configure in TOML file."
            ));
        }

        if !self.jira_url.starts_with("http://") && !self.jira_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "JIRA URL must start with http:// or https://. Got: {}",
                self.jira_url
            ));
        }

        match &self.auth {
            AuthConfig::Basic {
                username,
                api_token,
            } => {
                if username.is_empty() || api_token.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Username and API token cannot be empty for basic auth"
                    ));
                }
            }
            AuthConfig::Bearer(token) => {
                if token.is_empty() {
                    return Err(anyhow::anyhow!("Bearer token cannot be empty"));
                }
            }
            AuthConfig::Unset => {
                return Err(anyhow::anyhow!(
                    "JIRA credentials are required. Set JIRA_USERNAME and JIRA_API_TOKEN."
                ));
            }
        }

        if self.project_key.is_none() {
            warn!("PROJECT_KEY is not set, issue keys will not be checked against a project");
        }

        info!("Configuration validation successful");
        Ok(())
    }

    /// Get the gouqi Credentials from AuthConfig
    pub fn to_gouqi_credentials(&self) -> gouqi::Credentials {
        match &self.auth {
            AuthConfig::Basic {
                username,
                api_token,
            } => gouqi::Credentials::Basic(username.clone(), api_token.clone()),
            AuthConfig::Bearer(token) => gouqi::Credentials::Bearer(token.clone()),
            AuthConfig::Unset => gouqi::Credentials::Anonymous,
        }
    }

    /// Apply the configured credentials to a raw HTTP request
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            AuthConfig::Basic {
                username,
                api_token,
            } => request.basic_auth(username, Some(api_token)),
            AuthConfig::Bearer(token) => request.bearer_auth(token),
            AuthConfig::Unset => request,
        }
    }

    /// Resolve the issue key a tool call operates on.
    ///
    /// An explicit, non-blank key wins; otherwise the configured default is
    /// returned unchanged. A key outside the configured project is only
    /// logged, never rejected.
    pub fn resolve_issue_key(&self, provided: Option<&str>) -> JiraMcpResult<String> {
        let issue_key = match provided.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => key.to_string(),
            None => {
                let default_key = self.default_issue_key.clone().ok_or_else(|| {
                    tracing::error!("No issue_key provided and ISSUE_KEY is not configured");
                    JiraMcpError::MissingIssueKey
                })?;
                info!(
                    "No issue_key provided, using configured ISSUE_KEY: {}",
                    default_key
                );
                default_key
            }
        };

        if let Some(project_key) = &self.project_key {
            if !issue_key.starts_with(&format!("{}-", project_key)) {
                warn!(
                    "Issue key {} does not belong to configured project {}",
                    issue_key, project_key
                );
            }
        }

        Ok(issue_key)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
