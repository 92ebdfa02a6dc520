/// Common utilities for JIRA Attachment MCP Server integration tests
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// MCP Test Client for sending JSON-RPC requests to the server
#[allow(dead_code)]
pub struct McpTestClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

#[allow(dead_code)]
impl McpTestClient {
    /// Create a new test client against the JIRA instance configured in `.env`
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Tests run from the crate directory, the .env file may sit one level up
        dotenv::from_filename(".env").ok();
        dotenv::from_filename("../.env").ok();

        let mut env = vec![
            ("JIRA_URL".to_string(), std::env::var("JIRA_URL")?),
            ("JIRA_USERNAME".to_string(), std::env::var("JIRA_USERNAME")?),
            ("JIRA_API_TOKEN".to_string(), std::env::var("JIRA_API_TOKEN")?),
        ];
        for optional in ["PROJECT_KEY", "ISSUE_KEY"] {
            if let Ok(value) = std::env::var(optional) {
                env.push((optional.to_string(), value));
            }
        }

        Self::spawn(env, std::env::current_dir()?)
    }

    /// Spawn the server with exactly the given environment, working in `dir`
    ///
    /// No JIRA instance is contacted until a tool needs one.
    pub fn spawn(
        env: Vec<(String, String)>,
        dir: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_jira-attachment-mcp"));
        command
            .arg("stdio")
            .env_clear()
            .env("RUST_LOG", "error")
            .current_dir(dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        for (key, value) in env {
            command.env(key, value);
        }

        let mut child = command.spawn()?;

        let stdin = child.stdin.take().ok_or("Failed to open stdin")?;
        let stdout = child.stdout.take().ok_or("Failed to open stdout")?;
        let stdout = BufReader::new(stdout);

        let mut client = Self {
            child,
            stdin,
            stdout,
        };

        // Initialize the session
        client.initialize()?;

        Ok(client)
    }

    /// Initialize the MCP session
    fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "rust-test-client",
                    "version": "1.0.0"
                }
            }
        });

        self.send_request(&request)?;
        let response = self.read_response()?;

        // Verify initialization was successful
        if response.get("error").is_some() {
            return Err(format!("Initialization failed: {:?}", response["error"]).into());
        }

        Ok(())
    }

    /// Call an MCP tool
    pub fn call_tool(
        &mut self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/call",
            "params": {
                "name": tool_name,
                "arguments": arguments
            }
        });

        self.send_request(&request)?;
        self.read_response()
    }

    /// Send a JSON-RPC request
    fn send_request(&mut self, request: &Value) -> Result<(), Box<dyn std::error::Error>> {
        let request_str = serde_json::to_string(request)?;
        writeln!(self.stdin, "{}", request_str)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Read a JSON-RPC response
    fn read_response(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let mut line = String::new();
        self.stdout.read_line(&mut line)?;

        if line.is_empty() {
            return Err("Server closed connection".into());
        }

        let response: Value = serde_json::from_str(&line)?;
        Ok(response)
    }

    /// Extract the tool result from the response
    pub fn extract_tool_result(response: &Value) -> Result<Value, String> {
        // Debug output
        if std::env::var("RUST_TEST_DEBUG").is_ok() {
            eprintln!(
                "Full response: {}",
                serde_json::to_string_pretty(response).unwrap()
            );
        }

        if let Some(error) = response.get("error") {
            return Err(format!("Tool call failed: {:?}", error));
        }

        let result = response.get("result").ok_or("No result in response")?;

        let content = result
            .get("content")
            .ok_or("No content in result")?
            .as_array()
            .ok_or("Content is not an array")?;

        let text_content = content
            .iter()
            .find(|item| item.get("type") == Some(&Value::String("text".to_string())))
            .ok_or("No text content found")?;

        let text = text_content
            .get("text")
            .ok_or("No text field in content")?
            .as_str()
            .ok_or("Text is not a string")?;

        // Debug output
        if std::env::var("RUST_TEST_DEBUG").is_ok() {
            eprintln!("Tool result text: {}", text);
        }

        let parsed: Value = serde_json::from_str(text).map_err(|e| {
            format!(
                "Failed to parse tool result JSON: {}. Text was: {}",
                e, text
            )
        })?;

        Ok(parsed)
    }

    /// Whether a tool call failed, either as a JSON-RPC error or a tool error result
    pub fn is_tool_error(response: &Value) -> bool {
        response.get("error").is_some() || response["result"]["isError"] == json!(true)
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        // Kill the server process when the client is dropped
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Project key used by the live tests
#[allow(dead_code)]
pub fn test_project_key() -> String {
    std::env::var("PROJECT_KEY").unwrap_or_else(|_| "SCRUM".to_string())
}

/// Issue key used by the live tests
#[allow(dead_code)]
pub fn test_issue_key() -> String {
    std::env::var("ISSUE_KEY").unwrap_or_else(|_| format!("{}-1", test_project_key()))
}
