//! Add comment tool for adding comments to JIRA issues
//!
//! Comments are sent as Atlassian Document Format: a single paragraph
//! holding the plain comment text.

use crate::config::JiraConfig;
use crate::error::{JiraMcpError, JiraMcpResult};
use crate::jira_client::JiraApi;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Longest comment JIRA accepts
const MAX_COMMENT_LENGTH: usize = 32_768;

/// Parameters for the add_comment tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddCommentParams {
    /// Comment text (required)
    pub comment_text: String,

    /// JIRA issue key (optional, defaults to ISSUE_KEY)
    /// Examples: "PROJ-123", "KEY-456"
    pub issue_key: Option<String>,
}

/// Result from the add_comment tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentResult {
    pub comment_id: Option<String>,
    pub comment_text: String,
    pub message: String,
    pub issue_key: String,
    pub project_key: Option<String>,
    pub created: Option<String>,
    pub author: Option<String>,
}

/// Implementation of the add_comment tool
pub struct AddCommentTool {
    jira_client: Arc<dyn JiraApi>,
    config: Arc<JiraConfig>,
}

impl AddCommentTool {
    /// Create a new add comment tool
    pub fn new(jira_client: Arc<dyn JiraApi>, config: Arc<JiraConfig>) -> Self {
        Self {
            jira_client,
            config,
        }
    }

    /// Execute the add_comment tool
    #[instrument(skip(self, params), fields(comment_length = params.comment_text.len()))]
    pub async fn execute(&self, params: AddCommentParams) -> JiraMcpResult<AddCommentResult> {
        validate_comment(&params.comment_text)?;
        let issue_key = self
            .config
            .resolve_issue_key(params.issue_key.as_deref())?;

        info!("Adding comment to issue: {}", issue_key);

        let comment = self
            .jira_client
            .add_comment(&issue_key, adf_document(&params.comment_text))
            .await?;

        debug!(
            "Added comment to issue {}: {}",
            issue_key,
            params.comment_text.chars().take(50).collect::<String>()
        );

        Ok(AddCommentResult {
            comment_id: comment.id,
            message: format!("Successfully added comment to issue {}", issue_key),
            comment_text: params.comment_text,
            issue_key,
            project_key: self.config.project_key.clone(),
            created: comment.created,
            author: comment.author,
        })
    }
}

/// Wrap plain text in a single-paragraph ADF document
pub fn adf_document(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [
            {
                "type": "paragraph",
                "content": [
                    {
                        "type": "text",
                        "text": text
                    }
                ]
            }
        ]
    })
}

fn validate_comment(text: &str) -> JiraMcpResult<()> {
    if text.trim().is_empty() {
        return Err(JiraMcpError::invalid_param(
            "comment_text",
            "Comment text cannot be empty",
        ));
    }

    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(JiraMcpError::invalid_param(
            "comment_text",
            "Comment text cannot exceed 32,768 characters",
        ));
    }

    Ok(())
}
