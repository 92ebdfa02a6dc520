//! Tools module for the JIRA attachment MCP server
//!
//! Parameter and result types for every MCP tool, plus the tools that are
//! not part of attachment synchronization.

pub mod add_comment;
pub mod attachments;
pub mod epic_name_field;
pub mod project_info;

pub use add_comment::*;
pub use attachments::*;
pub use epic_name_field::*;
pub use project_info::*;
