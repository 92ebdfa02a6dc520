//! Parameters for the attachment tools
//!
//! The work itself happens in [`crate::attachment_sync::AttachmentSync`];
//! these structs are the JSON shapes MCP clients send.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the list_attachments tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListAttachmentsParams {
    /// JIRA issue key (optional, defaults to ISSUE_KEY)
    /// Examples: "PROJ-123", "KEY-456"
    pub issue_key: Option<String>,
}

/// Parameters for the download_attachments tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DownloadAttachmentsParams {
    /// JIRA issue key (optional, defaults to ISSUE_KEY)
    pub issue_key: Option<String>,

    /// Exact filenames to download (optional)
    /// If omitted or empty, every attachment on the issue is downloaded.
    /// Names that match no attachment are reported back in `not_found_files`.
    pub filenames: Option<Vec<String>>,
}

/// Parameters for the upload_attachment tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UploadAttachmentParams {
    /// Name of a file in the staging directory (required)
    /// Use list_tmp_files to see what is staged.
    pub filename: String,

    /// JIRA issue key (optional, defaults to ISSUE_KEY)
    pub issue_key: Option<String>,
}
