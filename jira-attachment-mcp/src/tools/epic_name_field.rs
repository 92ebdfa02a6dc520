//! Tool for resolving the custom field id of "Epic Name"
//!
//! Company-managed JIRA projects store the epic name in a custom field whose
//! id differs between instances. The id is looked up by field name, falling
//! back to the id JIRA Cloud ships with.

use crate::error::JiraMcpResult;
use crate::jira_client::{FieldInfo, JiraApi};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Field name searched for
pub const EPIC_NAME_FIELD: &str = "Epic Name";

/// Id used when the instance has no field named "Epic Name"
pub const FALLBACK_EPIC_NAME_FIELD_ID: &str = "customfield_10011";

/// Result from the get_epic_name_field_id tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicNameFieldResult {
    pub field_id: String,

    /// True when the id is the fallback rather than a discovered field
    pub is_fallback: bool,
}

pub struct GetEpicNameFieldTool {
    jira_client: Arc<dyn JiraApi>,
}

impl GetEpicNameFieldTool {
    pub fn new(jira_client: Arc<dyn JiraApi>) -> Self {
        Self { jira_client }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> JiraMcpResult<EpicNameFieldResult> {
        let fields = self.jira_client.list_fields().await?;
        let result = find_epic_name_field(&fields);

        if result.is_fallback {
            warn!(
                "No '{}' field among {} fields, using {}",
                EPIC_NAME_FIELD,
                fields.len(),
                result.field_id
            );
        } else {
            info!("Resolved '{}' field to {}", EPIC_NAME_FIELD, result.field_id);
        }

        Ok(result)
    }
}

/// First field named exactly "Epic Name", or the fallback id
pub fn find_epic_name_field(fields: &[FieldInfo]) -> EpicNameFieldResult {
    match fields.iter().find(|f| f.name == EPIC_NAME_FIELD) {
        Some(field) => EpicNameFieldResult {
            field_id: field.id.clone(),
            is_fallback: false,
        },
        None => EpicNameFieldResult {
            field_id: FALLBACK_EPIC_NAME_FIELD_ID.to_string(),
            is_fallback: true,
        },
    }
}
