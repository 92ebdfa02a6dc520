//! Error types and handling for the JIRA attachment MCP server
//!
//! Provides structured error types that map to MCP JSON-RPC error codes
//! and converts errors from the JIRA client, HTTP stack and local filesystem
//! into MCP-compatible errors.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the JIRA attachment MCP server
#[derive(Debug, Error)]
pub enum JiraMcpError {
    /// Configuration errors (-32001)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Any failure talking to JIRA: transport, timeout or non-success status (-32003)
    #[error("Remote fetch failed: {message}")]
    RemoteFetch {
        message: String,
        status: Option<u16>,
    },

    /// Expected file is absent from the staging area (-32005)
    #[error("Local file missing: '{}' not found in staging area", path.display())]
    LocalFileMissing { path: PathBuf },

    /// Neither an explicit issue key nor a default one is available (-32006)
    #[error("No issue_key provided and ISSUE_KEY is not configured")]
    MissingIssueKey,

    /// Invalid parameter errors (-32006)
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Local staging directory I/O errors
    #[error("Staging error: {message}")]
    Staging { message: String },

    /// Internal server errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl JiraMcpError {
    /// Get the MCP JSON-RPC error code for this error
    pub fn error_code(&self) -> i32 {
        match self {
            JiraMcpError::Configuration { .. } => -32001,
            JiraMcpError::RemoteFetch { .. } => -32003,
            JiraMcpError::LocalFileMissing { .. } => -32005,
            JiraMcpError::MissingIssueKey => -32006,
            JiraMcpError::InvalidParameter { .. } => -32006,
            JiraMcpError::Staging { .. } => -32603,
            JiraMcpError::Internal { .. } => -32603,
        }
    }

    /// Get the error category for logging and HTTP responses
    pub fn category(&self) -> &'static str {
        match self {
            JiraMcpError::Configuration { .. } => "configuration",
            JiraMcpError::RemoteFetch { .. } => "remote_fetch",
            JiraMcpError::LocalFileMissing { .. } => "local_file_missing",
            JiraMcpError::MissingIssueKey => "missing_issue_key",
            JiraMcpError::InvalidParameter { .. } => "invalid_parameter",
            JiraMcpError::Staging { .. } => "staging",
            JiraMcpError::Internal { .. } => "internal",
        }
    }

    /// Get additional error data for MCP error responses
    pub fn error_data(&self) -> Option<Value> {
        let mut data = serde_json::Map::new();
        data.insert(
            "category".to_string(),
            Value::String(self.category().to_string()),
        );

        match self {
            JiraMcpError::RemoteFetch {
                status: Some(status),
                ..
            } => {
                data.insert("status".to_string(), Value::Number((*status).into()));
            }
            JiraMcpError::LocalFileMissing { path } => {
                data.insert(
                    "path".to_string(),
                    Value::String(path.display().to_string()),
                );
            }
            JiraMcpError::InvalidParameter { parameter, .. } => {
                data.insert("parameter".to_string(), Value::String(parameter.clone()));
            }
            _ => {}
        }

        Some(Value::Object(data))
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        JiraMcpError::Configuration {
            message: message.into(),
        }
    }

    /// Create a remote fetch error without a known HTTP status
    pub fn remote(message: impl Into<String>) -> Self {
        JiraMcpError::RemoteFetch {
            message: message.into(),
            status: None,
        }
    }

    /// Create a remote fetch error for a non-success HTTP status
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        JiraMcpError::RemoteFetch {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a local-file-missing error
    pub fn local_file_missing(path: impl Into<PathBuf>) -> Self {
        JiraMcpError::LocalFileMissing { path: path.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        JiraMcpError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a staging error
    pub fn staging(message: impl Into<String>) -> Self {
        JiraMcpError::Staging {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        JiraMcpError::Internal {
            message: message.into(),
        }
    }
}

/// Convert from gouqi errors to JiraMcpError
impl From<gouqi::Error> for JiraMcpError {
    fn from(err: gouqi::Error) -> Self {
        match err {
            gouqi::Error::Unauthorized => {
                JiraMcpError::remote_status(401, "JIRA authentication failed")
            }
            gouqi::Error::NotFound => JiraMcpError::remote_status(404, "JIRA resource not found"),
            gouqi::Error::Http(_) => JiraMcpError::remote(format!("HTTP error: {}", err)),
            gouqi::Error::IO(_) => JiraMcpError::remote(format!("IO error: {}", err)),
            gouqi::Error::Serde(_) => {
                JiraMcpError::remote(format!("Unexpected JIRA response: {}", err))
            }
            gouqi::Error::Fault { .. } => JiraMcpError::remote(format!("JIRA API error: {}", err)),
            _ => JiraMcpError::remote(format!("JIRA client error: {}", err)),
        }
    }
}

/// Convert from reqwest errors (content downloads, uploads, comments)
impl From<reqwest::Error> for JiraMcpError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => JiraMcpError::remote_status(status.as_u16(), err.to_string()),
            None => JiraMcpError::remote(err.to_string()),
        }
    }
}

/// Convert from local filesystem errors
impl From<std::io::Error> for JiraMcpError {
    fn from(err: std::io::Error) -> Self {
        JiraMcpError::staging(err.to_string())
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for JiraMcpError {
    fn from(err: serde_json::Error) -> Self {
        JiraMcpError::internal(format!("JSON error: {}", err))
    }
}

/// Convert from TOML parsing errors
impl From<toml::de::Error> for JiraMcpError {
    fn from(err: toml::de::Error) -> Self {
        JiraMcpError::config(format!("TOML parsing error: {}", err))
    }
}

/// Convert from generic anyhow errors (configuration loading)
impl From<anyhow::Error> for JiraMcpError {
    fn from(err: anyhow::Error) -> Self {
        JiraMcpError::config(format!("{:#}", err))
    }
}

/// Result type alias for JIRA MCP operations
pub type JiraMcpResult<T> = Result<T, JiraMcpError>;
