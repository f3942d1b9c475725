//! Workflow stage identifiers accepted by the main entry point

use std::fmt;
use std::str::FromStr;

use crate::providers::Provider;

/// A workflow stage the guide can drill into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    PrdAnalysis,
    CodeGeneration,
    FlowchartGeneration,
    IntelligentRetrieval,
    WorkflowConfig,
}

/// Identifier that names no known stage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported workflow type: {0}")]
pub struct UnsupportedStage(pub String);

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::PrdAnalysis,
        Stage::CodeGeneration,
        Stage::FlowchartGeneration,
        Stage::IntelligentRetrieval,
        Stage::WorkflowConfig,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PrdAnalysis => "prd_analysis",
            Stage::CodeGeneration => "code_generation",
            Stage::FlowchartGeneration => "flowchart_generation",
            Stage::IntelligentRetrieval => "intelligent_retrieval",
            Stage::WorkflowConfig => "workflow_config",
        }
    }

    /// The provider that answers for this stage
    pub fn provider(self) -> Provider {
        match self {
            Stage::PrdAnalysis => Provider::PrdAnalysis,
            Stage::CodeGeneration => Provider::CodeGeneration,
            Stage::FlowchartGeneration => Provider::FlowchartGeneration,
            Stage::IntelligentRetrieval => Provider::IntelligentRetrieval,
            Stage::WorkflowConfig => Provider::WorkflowConfig,
        }
    }

    /// All identifiers, in menu order
    pub fn identifiers() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl FromStr for Stage {
    type Err = UnsupportedStage;

    /// Case-insensitive exact match on the whole token
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| UnsupportedStage(s.to_string()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
