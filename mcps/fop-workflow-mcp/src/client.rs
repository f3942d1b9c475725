//! MCP client configuration snippet for registering this server

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::SERVER_NAME;

/// Tools a client may call without asking the user
pub const AUTO_APPROVE: [&str; 1] = ["getFopWorkflowGuide"];

/// `mcpServers` entry that launches `command` against the repository at `root`
pub fn client_config(command: &Path, root: &Path) -> Value {
    let entry = json!({
        "command": command.display().to_string(),
        "args": ["--root", root.display().to_string()],
        "autoApprove": AUTO_APPROVE,
    });

    let mut servers = Map::new();
    servers.insert(SERVER_NAME.to_string(), entry);

    json!({ "mcpServers": servers })
}
