//! Result helpers for MCP tool responses

use rmcp::model::{CallToolResult, Content, RawContent};

/// Wrap a string as a successful single-item text result
///
/// Servers that hand back pre-serialized payloads use this so the caller
/// receives the exact bytes that were produced.
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Text of the first text item in a tool result, if any
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|c| match &c.raw {
        RawContent::Text(t) => Some(t.text.as_str()),
        _ => None,
    })
}
