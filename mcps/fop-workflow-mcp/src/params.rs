//! MCP parameter types for the workflow tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for getFopWorkflowGuide
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideParams {
    #[schemars(
        description = "Workflow type: leave empty for the full guide and navigation menu; one of \
                       prd_analysis|code_generation|flowchart_generation|intelligent_retrieval|workflow_config"
    )]
    #[serde(default)]
    pub workflow_type: Option<String>,
}

/// Parameters for getCodeAnalysisGuidance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGuidanceParams {
    #[schemars(description = "Analysis type")]
    #[serde(default)]
    pub analysis_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_params_camel_case() {
        let params: GuideParams =
            serde_json::from_value(serde_json::json!({"workflowType": "prd_analysis"})).unwrap();
        assert_eq!(params.workflow_type.as_deref(), Some("prd_analysis"));
    }

    #[test]
    fn test_params_are_optional() {
        let params: AnalysisGuidanceParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(params.analysis_type.is_none());
    }
}
