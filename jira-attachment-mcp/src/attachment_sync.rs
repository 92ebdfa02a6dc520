//! Attachment synchronization between JIRA issues and the staging area
//!
//! Lists an issue's attachments, downloads all or a named subset of them into
//! the staging directory, uploads staged files back to an issue and lists
//! what is currently staged.
//!
//! When several attachments on one issue share a filename, selecting by name
//! picks the first one in JIRA's listing order. Downloading everything writes
//! them in listing order, so the last one is what stays staged.

use crate::config::JiraConfig;
use crate::error::{JiraMcpError, JiraMcpResult};
use crate::jira_client::{Attachment, JiraApi};
use crate::staging::StagingArea;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of listing an issue's attachments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAttachmentsResult {
    pub attachments: Vec<Attachment>,
    pub issue_key: String,
    pub total_count: usize,
}

/// Result of downloading attachments into the staging area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadAttachmentsResult {
    /// Paths of the files written to the staging area
    pub downloaded_files: Vec<String>,

    /// Requested filenames with no matching attachment
    pub not_found_files: Vec<String>,

    pub message: String,
    pub issue_key: String,
    pub project_key: Option<String>,
}

/// Result of uploading a staged file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAttachmentResult {
    pub uploaded_file: String,
    pub message: String,
    pub issue_key: String,
    pub project_key: Option<String>,
}

/// Contents of the staging area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingFilesResult {
    pub files: Vec<String>,
    pub count: usize,
    pub message: String,
}

/// Per-file outcome list produced by the bulk download surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDownloadReport {
    pub issue_key: String,

    /// One human-readable line per attachment
    pub results: Vec<String>,

    pub saved: usize,
    pub failed: usize,
}

/// Moves attachment bytes between JIRA and the local staging area
pub struct AttachmentSync {
    api: Arc<dyn JiraApi>,
    config: Arc<JiraConfig>,
    staging: StagingArea,
}

impl AttachmentSync {
    pub fn new(api: Arc<dyn JiraApi>, config: Arc<JiraConfig>) -> Self {
        let staging = StagingArea::new(config.staging_dir.clone());
        Self {
            api,
            config,
            staging,
        }
    }

    /// Use a staging area other than the configured one
    pub fn with_staging(mut self, staging: StagingArea) -> Self {
        self.staging = staging;
        self
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// List attachment metadata for an issue
    #[instrument(skip(self))]
    pub async fn list_attachments(
        &self,
        issue_key: Option<&str>,
    ) -> JiraMcpResult<ListAttachmentsResult> {
        let issue_key = self.config.resolve_issue_key(issue_key)?;
        let attachments = self.api.issue_attachments(&issue_key).await?;

        info!(
            "Found {} attachments for issue {}",
            attachments.len(),
            issue_key
        );

        Ok(ListAttachmentsResult {
            total_count: attachments.len(),
            attachments,
            issue_key,
        })
    }

    /// Download every attachment, or only the named ones, into the staging area.
    ///
    /// Requested names without a match are reported in `not_found_files`
    /// rather than failing the call. Files already written stay in place if a
    /// later download fails.
    #[instrument(skip(self))]
    pub async fn download_attachments(
        &self,
        issue_key: Option<&str>,
        filenames: Option<&[String]>,
    ) -> JiraMcpResult<DownloadAttachmentsResult> {
        let issue_key = self.config.resolve_issue_key(issue_key)?;
        let requested = filenames.map(dedup_preserving_order).unwrap_or_default();

        let attachments = self.api.issue_attachments(&issue_key).await?;
        self.staging.ensure().await?;

        if attachments.is_empty() {
            info!("No attachments found for issue {}", issue_key);
            return Ok(DownloadAttachmentsResult {
                downloaded_files: Vec::new(),
                not_found_files: requested,
                message: format!("No attachments found for issue {}", issue_key),
                issue_key,
                project_key: self.config.project_key.clone(),
            });
        }

        let mut downloaded_files = Vec::new();
        let mut not_found_files = Vec::new();

        if requested.is_empty() {
            for attachment in &attachments {
                downloaded_files.push(self.download_one(attachment).await?);
            }
        } else {
            debug!(
                "Requested files: {:?}, available files: {:?}",
                requested,
                attachments.iter().map(|a| &a.filename).collect::<Vec<_>>()
            );

            for filename in &requested {
                match find_first(&attachments, filename) {
                    Some(attachment) => {
                        downloaded_files.push(self.download_one(attachment).await?);
                    }
                    None => {
                        warn!("File '{}' not found in attachments", filename);
                        not_found_files.push(filename.clone());
                    }
                }
            }
        }

        let message = download_message(
            &issue_key,
            downloaded_files.len(),
            &requested,
            &not_found_files,
        );
        info!("{}", message);

        Ok(DownloadAttachmentsResult {
            downloaded_files,
            not_found_files,
            message,
            issue_key,
            project_key: self.config.project_key.clone(),
        })
    }

    /// Upload a file from the staging area to an issue
    #[instrument(skip(self))]
    pub async fn upload_attachment(
        &self,
        filename: &str,
        issue_key: Option<&str>,
    ) -> JiraMcpResult<UploadAttachmentResult> {
        let issue_key = self.config.resolve_issue_key(issue_key)?;
        let bytes = self.staging.read(filename).await?;
        let size = bytes.len();

        self.api
            .upload_attachment(&issue_key, filename, bytes)
            .await?;

        info!("Uploaded {} ({} bytes) to {}", filename, size, issue_key);

        Ok(UploadAttachmentResult {
            uploaded_file: filename.to_string(),
            message: format!("Successfully uploaded {} to issue {}", filename, issue_key),
            issue_key,
            project_key: self.config.project_key.clone(),
        })
    }

    /// List the files currently staged
    pub async fn list_staging_files(&self) -> JiraMcpResult<StagingFilesResult> {
        let root = self.staging.root().display().to_string();

        match self.staging.list_files().await? {
            None => Ok(StagingFilesResult {
                files: Vec::new(),
                count: 0,
                message: format!("{} directory does not exist", root),
            }),
            Some(files) => Ok(StagingFilesResult {
                count: files.len(),
                message: format!("Found {} files in {} directory", files.len(), root),
                files,
            }),
        }
    }

    /// Download every attachment, recording each file's outcome as a line of text.
    ///
    /// Unlike [`download_attachments`](Self::download_attachments), one failed
    /// file does not abort the rest.
    #[instrument(skip(self))]
    pub async fn download_all_report(&self, issue_key: &str) -> JiraMcpResult<BulkDownloadReport> {
        let attachments = self.api.issue_attachments(issue_key).await?;
        self.staging.ensure().await?;

        let mut results = Vec::with_capacity(attachments.len());
        let mut saved = 0;
        let mut failed = 0;

        for attachment in &attachments {
            match self.download_one(attachment).await {
                Ok(path) => {
                    saved += 1;
                    results.push(format!("Saved {}", path));
                }
                Err(e) => {
                    failed += 1;
                    warn!("Failed to download {}: {}", attachment.filename, e);
                    results.push(format!(
                        "Failed to download {}: {}",
                        attachment.filename, e
                    ));
                }
            }
        }

        info!(
            "Bulk download for {}: {} saved, {} failed",
            issue_key, saved, failed
        );

        Ok(BulkDownloadReport {
            issue_key: issue_key.to_string(),
            results,
            saved,
            failed,
        })
    }

    async fn download_one(&self, attachment: &Attachment) -> JiraMcpResult<String> {
        let path = self.staging.path_for(&attachment.filename)?;
        let bytes = self
            .api
            .fetch_content(&attachment.content_url)
            .await
            .map_err(|e| match e {
                JiraMcpError::RemoteFetch { message, status } => JiraMcpError::RemoteFetch {
                    message: format!("{} ({})", message, attachment.filename),
                    status,
                },
                other => other,
            })?;

        self.staging.write(&attachment.filename, &bytes).await?;
        debug!("Downloaded attachment: {}", path.display());

        Ok(path.display().to_string())
    }
}

fn find_first<'a>(attachments: &'a [Attachment], filename: &str) -> Option<&'a Attachment> {
    attachments.iter().find(|a| a.filename == filename)
}

fn dedup_preserving_order(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

fn download_message(
    issue_key: &str,
    downloaded: usize,
    requested: &[String],
    not_found: &[String],
) -> String {
    if requested.is_empty() {
        format!(
            "Successfully downloaded {} attachments from issue {}",
            downloaded, issue_key
        )
    } else if not_found.is_empty() {
        format!(
            "Successfully downloaded all {} requested files from issue {}",
            downloaded, issue_key
        )
    } else {
        format!(
            "Downloaded {} of {} requested files from issue {}. Not found: {:?}",
            downloaded,
            requested.len(),
            issue_key,
            not_found
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::jira_client::{CommentInfo, FieldInfo, ProjectDetails};
    use assert_matches::assert_matches;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory JIRA used by the unit tests
    #[derive(Default)]
    pub(crate) struct FakeJira {
        pub attachments: Mutex<HashMap<String, Vec<Attachment>>>,
        pub contents: Mutex<HashMap<String, Vec<u8>>>,
        pub uploads: Mutex<Vec<(String, String, Vec<u8>)>>,
        pub comments: Mutex<Vec<(String, Value)>>,
        pub fields: Vec<FieldInfo>,
        pub calls: Mutex<usize>,
    }

    impl FakeJira {
        pub fn with_attachment(self, issue_key: &str, filename: &str, bytes: &[u8]) -> Self {
            let url = format!(
                "https://jira.test/secure/attachment/{}/{}",
                self.contents.lock().unwrap().len(),
                filename
            );
            self.contents
                .lock()
                .unwrap()
                .insert(url.clone(), bytes.to_vec());
            self.attachments
                .lock()
                .unwrap()
                .entry(issue_key.to_string())
                .or_default()
                .push(Attachment {
                    id: None,
                    filename: filename.to_string(),
                    content_url: url,
                    size: Some(bytes.len() as u64),
                    mime_type: None,
                });
            self
        }

        /// Attachment whose content URL is not served
        pub fn with_broken_attachment(self, issue_key: &str, filename: &str) -> Self {
            self.attachments
                .lock()
                .unwrap()
                .entry(issue_key.to_string())
                .or_default()
                .push(Attachment {
                    id: None,
                    filename: filename.to_string(),
                    content_url: format!("https://jira.test/gone/{}", filename),
                    size: None,
                    mime_type: None,
                });
            self
        }

        pub fn replace_content(&self, issue_key: &str, filename: &str, bytes: &[u8]) {
            let attachments = self.attachments.lock().unwrap();
            let url = attachments[issue_key]
                .iter()
                .find(|a| a.filename == filename)
                .map(|a| a.content_url.clone())
                .unwrap();
            self.contents.lock().unwrap().insert(url, bytes.to_vec());
        }

        pub fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }

        fn record_call(&self) {
            *self.calls.lock().unwrap() += 1;
        }
    }

    #[async_trait::async_trait]
    impl JiraApi for FakeJira {
        async fn issue_attachments(&self, issue_key: &str) -> JiraMcpResult<Vec<Attachment>> {
            self.record_call();
            self.attachments
                .lock()
                .unwrap()
                .get(issue_key)
                .cloned()
                .ok_or_else(|| JiraMcpError::remote_status(404, format!("Issue {} not found", issue_key)))
        }

        async fn fetch_content(&self, content_url: &str) -> JiraMcpResult<Vec<u8>> {
            self.record_call();
            self.contents
                .lock()
                .unwrap()
                .get(content_url)
                .cloned()
                .ok_or_else(|| JiraMcpError::remote_status(404, "Attachment content not found"))
        }

        async fn upload_attachment(
            &self,
            issue_key: &str,
            filename: &str,
            bytes: Vec<u8>,
        ) -> JiraMcpResult<Vec<Attachment>> {
            self.record_call();
            self.uploads
                .lock()
                .unwrap()
                .push((issue_key.to_string(), filename.to_string(), bytes));
            Ok(Vec::new())
        }

        async fn add_comment(&self, issue_key: &str, body: Value) -> JiraMcpResult<CommentInfo> {
            self.record_call();
            self.comments
                .lock()
                .unwrap()
                .push((issue_key.to_string(), body));
            Ok(CommentInfo {
                id: Some("10000".to_string()),
                created: Some("2024-05-01T10:00:00.000+0000".to_string()),
                author: Some("Build Bot".to_string()),
            })
        }

        async fn list_fields(&self) -> JiraMcpResult<Vec<FieldInfo>> {
            self.record_call();
            Ok(self.fields.clone())
        }

        async fn get_project(&self, project_key: &str) -> JiraMcpResult<ProjectDetails> {
            self.record_call();
            Ok(ProjectDetails {
                id: Some("10100".to_string()),
                name: Some(format!("{} project", project_key)),
                project_type: Some("software".to_string()),
                description: None,
            })
        }
    }

    pub(crate) fn test_config(default_issue_key: Option<&str>) -> Arc<JiraConfig> {
        Arc::new(JiraConfig {
            jira_url: "https://jira.test".to_string(),
            auth: AuthConfig::Basic {
                username: "bot@example.com".to_string(),
                api_token: "secret".to_string(),
            },
            project_key: Some("PROJ".to_string()),
            default_issue_key: default_issue_key.map(str::to_string),
            ..Default::default()
        })
    }

    fn sync_with(fake: Arc<FakeJira>, dir: &TempDir) -> AttachmentSync {
        AttachmentSync::new(fake, test_config(Some("PROJ-1")))
            .with_staging(StagingArea::new(dir.path().join("tmp")))
    }

    fn staged(dir: &TempDir, name: &str) -> String {
        dir.path().join("tmp").join(name).display().to_string()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_list_staging_files_without_directory() {
        let dir = TempDir::new().unwrap();
        let sync = sync_with(Arc::new(FakeJira::default()), &dir);

        let result = sync.list_staging_files().await.unwrap();

        assert!(result.files.is_empty());
        assert_eq!(result.count, 0);
        assert!(result.message.ends_with("directory does not exist"));
    }

    #[tokio::test]
    async fn test_partial_download_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default().with_attachment("PROJ-1", "a.png", b"aaa"));
        let sync = sync_with(fake, &dir);

        let result = sync
            .download_attachments(Some("PROJ-1"), Some(&names(&["a.png", "ghost.png"])))
            .await
            .unwrap();

        assert_eq!(result.downloaded_files, vec![staged(&dir, "a.png")]);
        assert_eq!(result.not_found_files, names(&["ghost.png"]));
        assert_eq!(
            result.message,
            "Downloaded 1 of 2 requested files from issue PROJ-1. Not found: [\"ghost.png\"]"
        );
        assert_eq!(std::fs::read(staged(&dir, "a.png")).unwrap(), b"aaa");
    }

    #[tokio::test]
    async fn test_download_all_attachments() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_attachment("PROJ-1", "a.png", b"a")
                .with_attachment("PROJ-1", "b.pdf", b"b"),
        );
        let sync = sync_with(fake, &dir);

        let result = sync.download_attachments(Some("PROJ-1"), None).await.unwrap();

        assert_eq!(
            result.downloaded_files,
            vec![staged(&dir, "a.png"), staged(&dir, "b.pdf")]
        );
        assert!(result.not_found_files.is_empty());
        assert_eq!(
            result.message,
            "Successfully downloaded 2 attachments from issue PROJ-1"
        );
        assert_eq!(result.project_key.as_deref(), Some("PROJ"));
    }

    #[tokio::test]
    async fn test_empty_filename_list_downloads_everything() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_attachment("PROJ-1", "a.png", b"a")
                .with_attachment("PROJ-1", "b.pdf", b"b"),
        );
        let sync = sync_with(fake, &dir);

        let result = sync
            .download_attachments(None, Some(&[]))
            .await
            .unwrap();

        assert_eq!(result.downloaded_files.len(), 2);
        assert_eq!(result.issue_key, "PROJ-1");
    }

    #[tokio::test]
    async fn test_all_requested_files_found_message() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_attachment("PROJ-1", "a.png", b"a")
                .with_attachment("PROJ-1", "b.pdf", b"b"),
        );
        let sync = sync_with(fake, &dir);

        let result = sync
            .download_attachments(Some("PROJ-1"), Some(&names(&["b.pdf", "b.pdf"])))
            .await
            .unwrap();

        assert_eq!(result.downloaded_files, vec![staged(&dir, "b.pdf")]);
        assert_eq!(
            result.message,
            "Successfully downloaded all 1 requested files from issue PROJ-1"
        );
    }

    #[tokio::test]
    async fn test_duplicate_filenames_first_match_wins() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_attachment("PROJ-1", "report.txt", b"first")
                .with_attachment("PROJ-1", "report.txt", b"second"),
        );
        let sync = sync_with(fake, &dir);

        sync.download_attachments(Some("PROJ-1"), Some(&names(&["report.txt"])))
            .await
            .unwrap();

        assert_eq!(std::fs::read(staged(&dir, "report.txt")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_redownload_overwrites_with_latest_content() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default().with_attachment("PROJ-1", "log.txt", b"old contents"));
        let sync = sync_with(Arc::clone(&fake), &dir);

        sync.download_attachments(Some("PROJ-1"), None).await.unwrap();
        fake.replace_content("PROJ-1", "log.txt", b"new");
        sync.download_attachments(Some("PROJ-1"), None).await.unwrap();

        assert_eq!(std::fs::read(staged(&dir, "log.txt")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_issue_without_attachments() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default());
        fake.attachments
            .lock()
            .unwrap()
            .insert("PROJ-1".to_string(), Vec::new());
        let sync = sync_with(fake, &dir);

        let result = sync
            .download_attachments(Some("PROJ-1"), Some(&names(&["a.png"])))
            .await
            .unwrap();

        assert!(result.downloaded_files.is_empty());
        assert_eq!(result.not_found_files, names(&["a.png"]));
        assert_eq!(result.message, "No attachments found for issue PROJ-1");
        assert!(dir.path().join("tmp").is_dir());

        let listed = sync.list_attachments(Some("PROJ-1")).await.unwrap();
        assert_eq!(listed.total_count, 0);
    }

    #[tokio::test]
    async fn test_issue_fetch_failure_is_remote_fetch_error() {
        let dir = TempDir::new().unwrap();
        let sync = sync_with(Arc::new(FakeJira::default()), &dir);

        assert_matches!(
            sync.download_attachments(Some("PROJ-404"), None).await,
            Err(JiraMcpError::RemoteFetch {
                status: Some(404),
                ..
            })
        );
        assert_matches!(
            sync.list_attachments(Some("PROJ-404")).await,
            Err(JiraMcpError::RemoteFetch { .. })
        );
    }

    #[tokio::test]
    async fn test_content_failure_aborts_but_keeps_earlier_files() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_attachment("PROJ-1", "a.png", b"a")
                .with_broken_attachment("PROJ-1", "b.png"),
        );
        let sync = sync_with(fake, &dir);

        let result = sync.download_attachments(Some("PROJ-1"), None).await;

        assert_matches!(result, Err(JiraMcpError::RemoteFetch { ref message, .. }) if message.contains("b.png"));
        assert!(dir.path().join("tmp").join("a.png").exists());
    }

    #[tokio::test]
    async fn test_unsafe_attachment_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default().with_attachment("PROJ-1", "../escape.sh", b"#!"));
        let sync = sync_with(Arc::clone(&fake), &dir);

        assert_matches!(
            sync.download_attachments(Some("PROJ-1"), None).await,
            Err(JiraMcpError::InvalidParameter { .. })
        );
        assert!(!dir.path().join("escape.sh").exists());
        // issue fetch only, content never requested
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_download_uses_default_issue_key() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default().with_attachment("PROJ-1", "a.png", b"a"));
        let sync = sync_with(fake, &dir);

        let result = sync.download_attachments(None, None).await.unwrap();

        assert_eq!(result.issue_key, "PROJ-1");
    }

    #[tokio::test]
    async fn test_missing_issue_key() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default());
        let sync = AttachmentSync::new(Arc::clone(&fake) as Arc<dyn JiraApi>, test_config(None))
            .with_staging(StagingArea::new(dir.path().join("tmp")));

        assert_matches!(
            sync.download_attachments(None, None).await,
            Err(JiraMcpError::MissingIssueKey)
        );
        assert_matches!(
            sync.upload_attachment("a.txt", None).await,
            Err(JiraMcpError::MissingIssueKey)
        );
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_missing_file_makes_no_network_call() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default());
        let sync = sync_with(Arc::clone(&fake), &dir);

        assert_matches!(
            sync.upload_attachment("missing.txt", Some("PROJ-1")).await,
            Err(JiraMcpError::LocalFileMissing { .. })
        );
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_staged_file() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeJira::default());
        let sync = sync_with(Arc::clone(&fake), &dir);
        sync.staging().ensure().await.unwrap();
        sync.staging().write("notes.txt", b"hello").await.unwrap();

        let result = sync.upload_attachment("notes.txt", Some("PROJ-2")).await.unwrap();

        assert_eq!(result.uploaded_file, "notes.txt");
        assert_eq!(result.message, "Successfully uploaded notes.txt to issue PROJ-2");
        let uploads = fake.uploads.lock().unwrap();
        assert_eq!(
            uploads.as_slice(),
            &[(
                "PROJ-2".to_string(),
                "notes.txt".to_string(),
                b"hello".to_vec()
            )]
        );
    }

    #[tokio::test]
    async fn test_list_staging_files_after_download() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_attachment("PROJ-1", "b.png", b"b")
                .with_attachment("PROJ-1", "a.png", b"a"),
        );
        let sync = sync_with(fake, &dir);
        sync.download_attachments(None, None).await.unwrap();

        let result = sync.list_staging_files().await.unwrap();

        assert_eq!(result.files, names(&["a.png", "b.png"]));
        assert_eq!(result.count, 2);
        assert!(result.message.starts_with("Found 2 files in"));
    }

    #[tokio::test]
    async fn test_bulk_report_isolates_failures() {
        let dir = TempDir::new().unwrap();
        let fake = Arc::new(
            FakeJira::default()
                .with_broken_attachment("PROJ-1", "gone.png")
                .with_attachment("PROJ-1", "a.png", b"a"),
        );
        let sync = sync_with(fake, &dir);

        let report = sync.download_all_report("PROJ-1").await.unwrap();

        assert_eq!(report.saved, 1);
        assert_eq!(report.failed, 1);
        assert!(report.results[0].starts_with("Failed to download gone.png:"));
        assert_eq!(report.results[1], format!("Saved {}", staged(&dir, "a.png")));
    }

    #[test]
    fn test_dedup_preserving_order() {
        assert_eq!(
            dedup_preserving_order(&names(&["b", "a", "b", "c", "a"])),
            names(&["b", "a", "c"])
        );
    }
}
