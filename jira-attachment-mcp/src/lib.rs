//! JIRA Attachment MCP Server Library
//!
//! A Model Context Protocol (MCP) server that moves JIRA issue attachments
//! through a local staging directory and exposes a few related issue
//! operations.
//!
//! ## Features
//!
//! - **Attachment staging**: download all or selected attachments of an issue
//!   into `./tmp`, upload staged files back, list what is staged
//! - **Comments**: add plain-text comments as Atlassian Document Format
//! - **Project metadata**: configured project info and the "Epic Name" field id
//! - **Bulk HTTP surface**: download every attachment of an issue over HTTP
//! - **Error Handling**: MCP-compliant error codes and messages

use crate::attachment_sync::{
    AttachmentSync, DownloadAttachmentsResult, ListAttachmentsResult, StagingFilesResult,
    UploadAttachmentResult,
};
use crate::config::JiraConfig;
use crate::error::JiraMcpResult;
use crate::jira_client::{JiraApi, JiraClient};
use crate::tools::{
    AddCommentParams, AddCommentResult, AddCommentTool, DownloadAttachmentsParams,
    EpicNameFieldResult, GetEpicNameFieldTool, GetProjectInfoTool, ListAttachmentsParams,
    ProjectInfoResult, UploadAttachmentParams,
};

use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub mod attachment_sync;
pub mod config;
pub mod error;
pub mod http;
pub mod jira_client;
pub mod staging;
pub mod tools;

/// JIRA Attachment MCP Server
///
/// Uses the #[mcp_server] macro for automatic MCP infrastructure generation.
#[mcp_server(
    name = "JIRA Attachment MCP Server",
    version = "0.10.0",
    description = "Stages JIRA issue attachments in a local directory and adds comments",
    auth = "disabled"
)]
#[derive(Clone)]
pub struct JiraAttachmentServer {
    /// Configuration
    config: Arc<JiraConfig>,

    /// Attachment download/upload and staging
    attachment_sync: Arc<AttachmentSync>,

    /// Tool implementations
    comment_tool: Arc<AddCommentTool>,
    project_tool: Arc<GetProjectInfoTool>,
    epic_field_tool: Arc<GetEpicNameFieldTool>,
}

impl Default for JiraAttachmentServer {
    fn default() -> Self {
        // The macro requires Default; a server without configuration is never valid
        panic!("JiraAttachmentServer cannot be created with default(). Use JiraAttachmentServer::new() instead.")
    }
}

impl JiraAttachmentServer {
    /// Create a new server from configuration loaded from the environment
    #[instrument]
    pub fn new() -> JiraMcpResult<Self> {
        info!("Initializing JIRA Attachment MCP Server");

        let config = Arc::new(JiraConfig::load()?);
        info!("Configuration loaded successfully");

        Self::with_config(config)
    }

    /// Create server with an explicit configuration
    #[instrument(skip(config))]
    pub fn with_config(config: Arc<JiraConfig>) -> JiraMcpResult<Self> {
        let jira_client: Arc<dyn JiraApi> = Arc::new(JiraClient::new(Arc::clone(&config))?);
        info!("JIRA client initialized");

        Ok(Self::with_client(jira_client, config))
    }

    /// Create server on top of any [`JiraApi`] implementation
    pub fn with_client(jira_client: Arc<dyn JiraApi>, config: Arc<JiraConfig>) -> Self {
        let attachment_sync = Arc::new(AttachmentSync::new(
            Arc::clone(&jira_client),
            Arc::clone(&config),
        ));
        let comment_tool = Arc::new(AddCommentTool::new(
            Arc::clone(&jira_client),
            Arc::clone(&config),
        ));
        let project_tool = Arc::new(GetProjectInfoTool::new(
            Arc::clone(&jira_client),
            Arc::clone(&config),
        ));
        let epic_field_tool = Arc::new(GetEpicNameFieldTool::new(jira_client));

        Self {
            config,
            attachment_sync,
            comment_tool,
            project_tool,
            epic_field_tool,
        }
    }

    pub fn config(&self) -> &Arc<JiraConfig> {
        &self.config
    }

    /// Attachment component, shared with the HTTP surface
    pub fn attachment_sync(&self) -> Arc<AttachmentSync> {
        Arc::clone(&self.attachment_sync)
    }
}

/// All public methods in this impl block become MCP tools automatically
#[mcp_tools]
impl JiraAttachmentServer {
    /// Get information about the configured JIRA project
    ///
    /// Returns the project key, name, id, type and description of PROJECT_KEY.
    #[instrument(skip(self))]
    pub async fn get_project_info(&self) -> anyhow::Result<ProjectInfoResult> {
        self.project_tool.execute().await.map_err(|e| {
            error!("get_project_info failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// List the attachments of a JIRA issue
    ///
    /// # Examples
    /// - Default issue: `{}`
    /// - Specific issue: `{"issue_key": "PROJ-123"}`
    #[instrument(skip(self))]
    pub async fn list_attachments(
        &self,
        params: ListAttachmentsParams,
    ) -> anyhow::Result<ListAttachmentsResult> {
        self.attachment_sync
            .list_attachments(params.issue_key.as_deref())
            .await
            .map_err(|e| {
                error!("list_attachments failed: {}", e);
                anyhow::anyhow!(e)
            })
    }

    /// Download attachments of a JIRA issue into the staging directory
    ///
    /// Downloads every attachment, or only the named ones. Names that match no
    /// attachment are listed in `not_found_files`.
    ///
    /// # Examples
    /// - Everything on the default issue: `{}`
    /// - Selected files: `{"issue_key": "PROJ-123", "filenames": ["design.png", "notes.pdf"]}`
    #[instrument(skip(self))]
    pub async fn download_attachments(
        &self,
        params: DownloadAttachmentsParams,
    ) -> anyhow::Result<DownloadAttachmentsResult> {
        self.attachment_sync
            .download_attachments(params.issue_key.as_deref(), params.filenames.as_deref())
            .await
            .map_err(|e| {
                error!("download_attachments failed: {}", e);
                anyhow::anyhow!(e)
            })
    }

    /// Upload a file from the staging directory to a JIRA issue
    ///
    /// # Examples
    /// - `{"filename": "report.pdf", "issue_key": "PROJ-123"}`
    #[instrument(skip(self))]
    pub async fn upload_attachment(
        &self,
        params: UploadAttachmentParams,
    ) -> anyhow::Result<UploadAttachmentResult> {
        self.attachment_sync
            .upload_attachment(&params.filename, params.issue_key.as_deref())
            .await
            .map_err(|e| {
                error!("upload_attachment failed: {}", e);
                anyhow::anyhow!(e)
            })
    }

    /// List the files in the staging directory
    #[instrument(skip(self))]
    pub async fn list_tmp_files(&self) -> anyhow::Result<StagingFilesResult> {
        self.attachment_sync.list_staging_files().await.map_err(|e| {
            error!("list_tmp_files failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Add a comment to a JIRA issue
    ///
    /// # Examples
    /// - `{"comment_text": "Deployed to staging", "issue_key": "PROJ-123"}`
    #[instrument(skip(self))]
    pub async fn add_comment(&self, params: AddCommentParams) -> anyhow::Result<AddCommentResult> {
        self.comment_tool.execute(params).await.map_err(|e| {
            error!("add_comment failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Get the custom field id of the "Epic Name" field
    ///
    /// Falls back to `customfield_10011` when the instance has no such field.
    #[instrument(skip(self))]
    pub async fn get_epic_name_field_id(&self) -> anyhow::Result<EpicNameFieldResult> {
        self.epic_field_tool.execute().await.map_err(|e| {
            error!("get_epic_name_field_id failed: {}", e);
            anyhow::anyhow!(e)
        })
    }
}
