//! In-process tool execution
//!
//! [`EmbeddableMcp`] lets a host call a server's tools by name without a
//! transport or a child process. Tests in this workspace go through it too,
//! so they see exactly what a connected client would.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server that can be driven in-process
///
/// Implementations delegate `list_tools` to their `ToolRouter` and map tool
/// names onto the handler methods in `call_tool`.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used in client configuration files
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name with a JSON object of parameters
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}
