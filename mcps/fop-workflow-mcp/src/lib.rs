//! FOP Workflow MCP Library
//!
//! Hands coding agents the versioned JSON rule documents of the FOP
//! development workflow (requirements analysis, code generation, flowchart
//! generation) through one main entry tool and six detailed tools.
//!
//! # Architecture
//!
//! - `config` - Repository location and layout
//! - `store` - Document reads and parsing
//! - `envelope` - Success and error response shapes
//! - `providers` - One provider per detailed tool
//! - `stage` - Identifiers accepted by the main entry tool
//! - `gateway` - Navigation menu and stage dispatch
//! - `server` - MCP server implementation
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use fop_workflow_mcp::{RepositoryConfig, DocumentStore, WorkflowGateway};
//!
//! let config = RepositoryConfig::default().with_root("/path/to/project");
//! let gateway = WorkflowGateway::new(DocumentStore::from_config(&config));
//! println!("{}", gateway.guide(Some("prd_analysis")));
//! ```
//!
//! # Usage as Binary
//!
//! Configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "fop-workflow-mcp": { "command": "./fop-workflow-mcp", "args": ["--root", "."] } } }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod health;
pub mod params;
pub mod providers;
pub mod server;
pub mod stage;
pub mod store;

/// Name this server registers under in client configuration
pub const SERVER_NAME: &str = "fop-workflow-mcp";

pub use config::RepositoryConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::WorkflowGateway;
pub use providers::Provider;
pub use server::FopWorkflowMcpServer;
pub use stage::{Stage, UnsupportedStage};
pub use store::{Document, DocumentSource, DocumentStore, FsSource, MemorySource};

pub use mcp_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
