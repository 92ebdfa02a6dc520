//! JIRA Attachment MCP Server
//!
//! Serves the attachment tools over MCP STDIO, or the bulk download surface
//! over HTTP. Pass `stdio` or `http` (`sse` is accepted as an alias) as the
//! first argument to pick one; without an argument HTTP is used when `PORT`
//! is set.

use jira_attachment_mcp::http::{self, HttpState};
use jira_attachment_mcp::JiraAttachmentServer;
use pulseengine_mcp_server::McpServerBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transport {
    Stdio,
    Http,
}

fn select_transport() -> Transport {
    parse_transport(
        std::env::args().nth(1).as_deref(),
        std::env::var("PORT").is_ok(),
    )
}

fn parse_transport(arg: Option<&str>, port_set: bool) -> Transport {
    match arg {
        Some("http") | Some("sse") => Transport::Http,
        Some("stdio") => Transport::Stdio,
        _ if port_set => Transport::Http,
        _ => Transport::Stdio,
    }
}

fn create_server() -> JiraAttachmentServer {
    match JiraAttachmentServer::new() {
        Ok(server) => {
            info!("JIRA Attachment MCP Server created successfully");
            server
        }
        Err(e) => {
            error!("Failed to create JIRA Attachment MCP Server: {}", e);
            eprintln!("❌ Failed to start JIRA Attachment MCP Server: {}", e);
            eprintln!("\nPlease check:");
            eprintln!("  - JIRA_URL environment variable is set");
            eprintln!("  - JIRA_USERNAME and JIRA_API_TOKEN are set");
            eprintln!("  - PROJECT_KEY and ISSUE_KEY are set if tools should default to them");
            eprintln!("\nFor help, see the README.md file.");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match select_transport() {
        Transport::Stdio => {
            // Logging must stay off stdout, which carries the protocol
            JiraAttachmentServer::configure_stdio_logging();

            info!("Starting JIRA Attachment MCP Server...");
            let jira_server = create_server();

            info!("Starting MCP server with STDIO transport...");
            let mut server = jira_server.serve_stdio().await?;

            info!("🚀 JIRA Attachment MCP Server is running and ready to serve requests");
            server.run().await?;
        }
        Transport::Http => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            info!("Starting JIRA Attachment HTTP surface...");
            let jira_server = create_server();
            let config = jira_server.config().clone();

            let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
            http::serve(
                listener,
                HttpState {
                    sync: jira_server.attachment_sync(),
                    config,
                },
            )
            .await?;
        }
    }

    Ok(())
}
