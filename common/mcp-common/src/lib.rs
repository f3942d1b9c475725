//! MCP Common - Shared plumbing for MCP servers
//!
//! - **Initialization**: [`init_tracing`] and [`serve_stdio`] for server startup
//! - **Results**: helpers for building and reading text `CallToolResult`s
//! - **Errors**: conversion of runtime failures into MCP errors
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process tool calls
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{init_tracing, serve_stdio};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing("my_mcp", 0)?;
//!     serve_stdio(MyServer::new(), "my_mcp").await
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{IntoMcpError, ResultExt};
pub use init::{init_tracing, serve_stdio};
pub use result::{first_text, text_success};

pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
