//! FOP Workflow MCP Server implementation

use mcp_common::{
    async_trait, text_success, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
    ResultExt,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;

use crate::config::RepositoryConfig;
use crate::gateway::WorkflowGateway;
use crate::params::{AnalysisGuidanceParams, GuideParams};
use crate::store::DocumentStore;

const INSTRUCTIONS: &str = "FOP workflow rules server. Call getFopWorkflowGuide first: without \
                            arguments it returns the workflow configuration and a navigation \
                            menu; with workflowType it returns one stage's rules.";

/// The FOP Workflow MCP Server
#[derive(Clone)]
pub struct FopWorkflowMcpServer {
    gateway: WorkflowGateway,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool answers with the gateway's text verbatim
// ============================================================================

#[tool_router]
impl FopWorkflowMcpServer {
    /// Create a server using config from the standard locations
    pub fn new() -> Self {
        Self::with_config(&RepositoryConfig::load())
    }

    /// Create a server reading the repository described by `config`
    pub fn with_config(config: &RepositoryConfig) -> Self {
        tracing::info!(root = %config.root.display(), "Serving rule repository");
        Self::with_gateway(WorkflowGateway::new(DocumentStore::from_config(config)))
    }

    pub fn with_gateway(gateway: WorkflowGateway) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    /// Run a gateway operation off the async runtime and wrap its text
    async fn answer<F>(&self, op: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&WorkflowGateway) -> String + Send + 'static,
    {
        let gateway = self.gateway.clone();
        let text = tokio::task::spawn_blocking(move || op(&gateway))
            .await
            .to_mcp_err()?;
        Ok(text_success(text))
    }

    #[tool(
        name = "getFopWorkflowGuide",
        description = "[Main entry] Get the complete FOP workflow guide - the combined guide to all rules, preferred over the detailed tools"
    )]
    async fn get_fop_workflow_guide(
        &self,
        Parameters(params): Parameters<GuideParams>,
    ) -> Result<CallToolResult, McpError> {
        self.answer(move |g| g.guide(params.workflow_type.as_deref()))
            .await
    }

    #[tool(
        name = "getPrdAnalysisRules",
        description = "[Detailed tool] Get the PRD analysis rules - prefer getFopWorkflowGuide"
    )]
    async fn get_prd_analysis_rules(&self) -> Result<CallToolResult, McpError> {
        self.answer(|g| g.prd_analysis_rules()).await
    }

    #[tool(
        name = "getCodeGenerationRules",
        description = "[Detailed tool] Get the code generation rules - prefer getFopWorkflowGuide"
    )]
    async fn get_code_generation_rules(&self) -> Result<CallToolResult, McpError> {
        self.answer(|g| g.code_generation_rules()).await
    }

    #[tool(
        name = "getFlowchartGenerationRules",
        description = "[Detailed tool] Get the flowchart generation rules - prefer getFopWorkflowGuide"
    )]
    async fn get_flowchart_generation_rules(&self) -> Result<CallToolResult, McpError> {
        self.answer(|g| g.flowchart_generation_rules()).await
    }

    #[tool(
        name = "getWorkflowConfig",
        description = "[Detailed tool] Get the workflow configuration summary - prefer getFopWorkflowGuide"
    )]
    async fn get_workflow_config(&self) -> Result<CallToolResult, McpError> {
        self.answer(|g| g.workflow_config()).await
    }

    #[tool(
        name = "getIntelligentRetrievalStrategy",
        description = "[Detailed tool] Get the intelligent retrieval optimization strategy - prefer getFopWorkflowGuide"
    )]
    async fn get_intelligent_retrieval_strategy(&self) -> Result<CallToolResult, McpError> {
        self.answer(|g| g.intelligent_retrieval_strategy()).await
    }

    #[tool(
        name = "getCodeAnalysisGuidance",
        description = "[Detailed tool] Get the code analysis guidance - prefer getFopWorkflowGuide"
    )]
    async fn get_code_analysis_guidance(
        &self,
        Parameters(params): Parameters<AnalysisGuidanceParams>,
    ) -> Result<CallToolResult, McpError> {
        self.answer(move |g| g.code_analysis_guidance(params.analysis_type.as_deref()))
            .await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for FopWorkflowMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for FopWorkflowMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for FopWorkflowMcpServer {
    fn server_name(&self) -> &str {
        crate::SERVER_NAME
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "getFopWorkflowGuide" => {
                let params: GuideParams = serde_json::from_value(params)?;
                self.get_fop_workflow_guide(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "getPrdAnalysisRules" => self.get_prd_analysis_rules().await.map_err(Into::into),
            "getCodeGenerationRules" => self.get_code_generation_rules().await.map_err(Into::into),
            "getFlowchartGenerationRules" => self
                .get_flowchart_generation_rules()
                .await
                .map_err(Into::into),
            "getWorkflowConfig" => self.get_workflow_config().await.map_err(Into::into),
            "getIntelligentRetrievalStrategy" => self
                .get_intelligent_retrieval_strategy()
                .await
                .map_err(Into::into),
            "getCodeAnalysisGuidance" => {
                let params: AnalysisGuidanceParams = serde_json::from_value(params)?;
                self.get_code_analysis_guidance(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
