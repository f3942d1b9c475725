//! Error conversion for MCP servers
//!
//! Tool handlers in this workspace report domain failures inside their
//! result text. What remains for `McpError` is a blocking tool task that
//! panicked or was cancelled.

use rmcp::ErrorData as McpError;

/// Conversion into an MCP internal error
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for tokio::task::JoinError {
    fn into_mcp_error(self) -> McpError {
        let reason = if self.is_panic() {
            "panicked"
        } else {
            "was cancelled"
        };
        McpError::internal_error(format!("Tool task {}", reason), None)
    }
}

/// Extension trait adding `to_mcp_err()` to any convertible `Result`
///
/// ```rust,ignore
/// let text = tokio::task::spawn_blocking(move || gateway.guide(None))
///     .await
///     .to_mcp_err()?;
/// ```
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}
