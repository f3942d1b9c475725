//! Main entry point: navigation menu or dispatch to a stage provider

use std::collections::BTreeMap;

use crate::envelope::{
    build_error, build_success, timestamp, GuideBody, GuideEnvelope, NavigationGuide,
};
use crate::error::GatewayResult;
use crate::providers::Provider;
use crate::stage::{Stage, UnsupportedStage};
use crate::store::{Document, DocumentStore};

const GUIDE_NAME: &str = "FOP workflow guide";
const GUIDE_VERSION: &str = "3.0.0";
const GUIDE_DESCRIPTION: &str =
    "Complete FOP development workflow rules for AI models to reference while generating";
const GUIDE_FAILURE_TITLE: &str = "Failed to get workflow guide";

const RECOMMENDED_ORDER: [&str; 5] = [
    "1. Read the complete workflow configuration first (the current response)",
    "2. For the PRD analysis rules, call with workflowType=prd_analysis",
    "3. For the code generation rules, call with workflowType=code_generation",
    "4. For the flowchart generation rules, call with workflowType=flowchart_generation",
    "5. For the intelligent retrieval strategy, call with workflowType=intelligent_retrieval",
];

const UNSUPPORTED_INSTRUCTION: &str =
    "Call again with workflowType set to one of supported_types, or leave it empty for the menu";

const NAVIGATION_NOTE: &str = "Prefer this main entry point with a workflowType parameter over \
                               calling the detailed tools directly";

/// Stateless front door over a rule repository
///
/// Cloning is cheap; clones share the document source, never any results.
#[derive(Debug, Clone)]
pub struct WorkflowGateway {
    store: DocumentStore,
}

impl WorkflowGateway {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// `getFopWorkflowGuide`
    ///
    /// Without an identifier, returns the navigation menu. With a known
    /// identifier, returns that stage provider's text unchanged. An unknown
    /// identifier yields a guide envelope carrying `error` and
    /// `supported_types`.
    pub fn guide(&self, workflow_type: Option<&str>) -> String {
        let requested = workflow_type.filter(|s| !s.is_empty());

        let Some(raw) = requested else {
            return self.navigation_menu();
        };

        match raw.parse::<Stage>() {
            Ok(stage) => {
                tracing::debug!(%stage, "Dispatching to stage provider");
                self.provide(stage.provider(), None)
            }
            Err(unsupported) => self.unsupported(&unsupported),
        }
    }

    pub fn prd_analysis_rules(&self) -> String {
        self.provide(Provider::PrdAnalysis, None)
    }

    pub fn code_generation_rules(&self) -> String {
        self.provide(Provider::CodeGeneration, None)
    }

    pub fn flowchart_generation_rules(&self) -> String {
        self.provide(Provider::FlowchartGeneration, None)
    }

    pub fn workflow_config(&self) -> String {
        self.provide(Provider::WorkflowConfig, None)
    }

    pub fn intelligent_retrieval_strategy(&self) -> String {
        self.provide(Provider::IntelligentRetrieval, None)
    }

    pub fn code_analysis_guidance(&self, analysis_type: Option<&str>) -> String {
        self.provide(Provider::CodeAnalysisGuidance, analysis_type)
    }

    fn provide(&self, provider: Provider, refinement: Option<&str>) -> String {
        provider.provide(&self.store, refinement)
    }

    fn navigation_menu(&self) -> String {
        self.try_navigation_menu().unwrap_or_else(|e| {
            tracing::warn!(kind = e.kind(), "{}", e);
            build_error(GUIDE_FAILURE_TITLE, &e.to_string(), Some(&e))
        })
    }

    fn try_navigation_menu(&self) -> GatewayResult<String> {
        let workflow_config = self.store.load_document(Document::WorkflowConfig)?;

        let available_detailed_tools: BTreeMap<_, _> = Provider::ALL
            .iter()
            .map(|p| (p.tool_name(), p.summary()))
            .collect();

        let envelope = guide_envelope(GuideBody::Menu {
            workflow_config,
            usage_instruction: "This is the main entry point of the FOP workflow; use the rules \
                                in the order below"
                .to_string(),
            navigation_guide: NavigationGuide {
                recommended_order: RECOMMENDED_ORDER.iter().map(|s| s.to_string()).collect(),
                available_detailed_tools,
                note: NAVIGATION_NOTE.to_string(),
            },
        });

        build_success(&envelope)
    }

    fn unsupported(&self, unsupported: &UnsupportedStage) -> String {
        tracing::warn!(workflow_type = %unsupported.0, "Unsupported workflow type requested");

        let envelope = guide_envelope(GuideBody::Unsupported {
            error: unsupported.to_string(),
            supported_types: Stage::identifiers(),
            usage_instruction: UNSUPPORTED_INSTRUCTION.to_string(),
        });

        build_success(&envelope)
            .unwrap_or_else(|e| build_error(GUIDE_FAILURE_TITLE, &e.to_string(), Some(&e)))
    }
}

fn guide_envelope(body: GuideBody) -> GuideEnvelope {
    GuideEnvelope {
        guide_name: GUIDE_NAME.to_string(),
        version: GUIDE_VERSION.to_string(),
        description: GUIDE_DESCRIPTION.to_string(),
        timestamp: timestamp(),
        body,
    }
}
