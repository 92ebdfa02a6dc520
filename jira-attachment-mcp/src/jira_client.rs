//! JIRA client wrapper around gouqi and reqwest
//!
//! Metadata reads (issue attachments, fields, projects) go through gouqi's
//! generic REST calls. Transfers that gouqi cannot express go through a
//! plain reqwest client sharing the same credentials: absolute attachment
//! content URLs, multipart uploads that need the `X-Atlassian-Token`
//! header, and v3 comments with Atlassian Document Format bodies.

use crate::config::JiraConfig;
use crate::error::{JiraMcpError, JiraMcpResult};
use async_trait::async_trait;
use gouqi::r#async::Jira;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

/// Path of the REST API version that accepts ADF bodies and multipart uploads
const REST_API_V3: &str = "/rest/api/3";

/// Attachment metadata as listed on an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Option<String>,
    pub filename: String,
    pub content_url: String,
    pub size: Option<u64>,
    pub mime_type: Option<String>,
}

/// Comment created on an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInfo {
    pub id: Option<String>,
    pub created: Option<String>,
    pub author: Option<String>,
}

/// Field descriptor from `GET /field`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub id: String,
    pub name: String,
}

/// Project descriptor from `GET /project/{key}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub id: Option<String>,
    pub name: Option<String>,
    pub project_type: Option<String>,
    pub description: Option<String>,
}

/// The JIRA REST operations this server depends on
#[async_trait]
pub trait JiraApi: Send + Sync {
    /// Attachments currently listed on an issue, in JIRA's order
    async fn issue_attachments(&self, issue_key: &str) -> JiraMcpResult<Vec<Attachment>>;

    /// Raw bytes behind an attachment content URL
    async fn fetch_content(&self, content_url: &str) -> JiraMcpResult<Vec<u8>>;

    /// Upload one file to an issue, returning the created attachments
    async fn upload_attachment(
        &self,
        issue_key: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> JiraMcpResult<Vec<Attachment>>;

    /// Post a comment with an ADF body
    async fn add_comment(&self, issue_key: &str, body: Value) -> JiraMcpResult<CommentInfo>;

    /// All field descriptors of the instance
    async fn list_fields(&self) -> JiraMcpResult<Vec<FieldInfo>>;

    /// Project details by key
    async fn get_project(&self, project_key: &str) -> JiraMcpResult<ProjectDetails>;
}

#[derive(Debug, Deserialize)]
struct RawAttachment {
    id: Option<String>,
    filename: String,
    content: String,
    size: Option<u64>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttachmentFields {
    #[serde(default)]
    attachment: Option<Vec<RawAttachment>>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    fields: RawAttachmentFields,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: Option<String>,
    created: Option<String>,
    author: Option<RawAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "projectTypeKey")]
    project_type_key: Option<String>,
    description: Option<String>,
}

/// JIRA client that implements [`JiraApi`] against a live instance
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: Arc<Jira>,
    http: reqwest::Client,
    config: Arc<JiraConfig>,
}

impl JiraClient {
    /// Create a new JIRA client with the given configuration
    #[instrument(skip_all)]
    pub fn new(config: Arc<JiraConfig>) -> JiraMcpResult<Self> {
        info!("Initializing JIRA client for URL: {}", config.jira_url);

        let client = Jira::new(&config.jira_url, config.to_gouqi_credentials())
            .map_err(JiraMcpError::from)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| JiraMcpError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            http,
            config,
        })
    }

    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_seconds)
    }

    fn v3_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.config.jira_url, REST_API_V3, endpoint)
    }

    /// Run a gouqi call under the configured timeout
    async fn with_timeout<T, F>(&self, what: &str, call: F) -> JiraMcpResult<T>
    where
        F: Future<Output = Result<T, gouqi::Error>>,
    {
        timeout(self.timeout_duration(), call)
            .await
            .map_err(|_| JiraMcpError::remote(format!("Timeout {}", what)))?
            .map_err(JiraMcpError::from)
    }

    /// GET a JSON resource through gouqi
    async fn get_json<D>(&self, what: &str, endpoint: &str) -> JiraMcpResult<D>
    where
        D: DeserializeOwned + Send,
    {
        debug!("GET {}", endpoint);
        self.with_timeout(what, self.client.get("api", endpoint)).await
    }

    /// Check a raw response status, turning failures into `RemoteFetch`
    async fn ensure_success(
        response: reqwest::Response,
        what: &str,
    ) -> JiraMcpResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(JiraMcpError::remote_status(
            status.as_u16(),
            format!("{} returned {}: {}", what, status, body.trim()),
        ))
    }

    fn convert_attachment(raw: RawAttachment) -> Attachment {
        Attachment {
            id: raw.id,
            filename: raw.filename,
            content_url: raw.content,
            size: raw.size,
            mime_type: raw.mime_type,
        }
    }
}

#[async_trait]
impl JiraApi for JiraClient {
    #[instrument(skip(self))]
    async fn issue_attachments(&self, issue_key: &str) -> JiraMcpResult<Vec<Attachment>> {
        let endpoint = format!("/issue/{}?fields=attachment", issue_key);
        let issue: RawIssue = self
            .get_json(&format!("getting issue {}", issue_key), &endpoint)
            .await?;

        Ok(issue
            .fields
            .attachment
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_attachment)
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_content(&self, content_url: &str) -> JiraMcpResult<Vec<u8>> {
        let request = self.config.authorize(self.http.get(content_url));
        let response = request.send().await?;
        let response = Self::ensure_success(response, "Attachment download").await?;
        let bytes = response.bytes().await?;

        debug!("Fetched {} bytes from {}", bytes.len(), content_url);
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_attachment(
        &self,
        issue_key: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> JiraMcpResult<Vec<Attachment>> {
        let url = self.v3_url(&format!("/issue/{}/attachments", issue_key));
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));

        let request = self
            .config
            .authorize(self.http.post(&url))
            .header("X-Atlassian-Token", "no-check")
            .multipart(form);
        let response = request.send().await?;
        let response = Self::ensure_success(response, "Attachment upload").await?;

        let created: Vec<RawAttachment> = response.json().await?;
        Ok(created.into_iter().map(Self::convert_attachment).collect())
    }

    #[instrument(skip(self, body))]
    async fn add_comment(&self, issue_key: &str, body: Value) -> JiraMcpResult<CommentInfo> {
        let url = self.v3_url(&format!("/issue/{}/comment", issue_key));

        let request = self
            .config
            .authorize(self.http.post(&url))
            .header("Accept", "application/json")
            .json(&json!({ "body": body }));
        let response = request.send().await?;
        let response = Self::ensure_success(response, "Adding comment").await?;

        let comment: RawComment = response.json().await?;
        Ok(CommentInfo {
            id: comment.id,
            created: comment.created,
            author: comment.author.and_then(|a| a.display_name),
        })
    }

    #[instrument(skip(self))]
    async fn list_fields(&self) -> JiraMcpResult<Vec<FieldInfo>> {
        let fields: Vec<RawField> = self.get_json("listing fields", "/field").await?;
        Ok(fields
            .into_iter()
            .map(|f| FieldInfo {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_project(&self, project_key: &str) -> JiraMcpResult<ProjectDetails> {
        let endpoint = format!("/project/{}", project_key);
        let project: RawProject = self
            .get_json(&format!("getting project {}", project_key), &endpoint)
            .await?;

        Ok(ProjectDetails {
            id: project.id,
            name: project.name,
            project_type: project.project_type_key,
            description: project.description,
        })
    }
}
