//! Project info tool for the configured JIRA project

use crate::config::JiraConfig;
use crate::error::{JiraMcpError, JiraMcpResult};
use crate::jira_client::JiraApi;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Result from the get_project_info tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfoResult {
    pub project_key: String,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub project_type: Option<String>,
    pub description: String,
}

/// Implementation of the get_project_info tool
pub struct GetProjectInfoTool {
    jira_client: Arc<dyn JiraApi>,
    config: Arc<JiraConfig>,
}

impl GetProjectInfoTool {
    pub fn new(jira_client: Arc<dyn JiraApi>, config: Arc<JiraConfig>) -> Self {
        Self {
            jira_client,
            config,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> JiraMcpResult<ProjectInfoResult> {
        let project_key = self.config.project_key.clone().ok_or_else(|| {
            JiraMcpError::config("PROJECT_KEY is not configured, no project to describe")
        })?;

        info!("Fetching project info for {}", project_key);
        let project = self.jira_client.get_project(&project_key).await?;

        Ok(ProjectInfoResult {
            project_key,
            project_name: project.name,
            project_id: project.id,
            project_type: project.project_type,
            description: project
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "No description available".to_string()),
        })
    }
}
