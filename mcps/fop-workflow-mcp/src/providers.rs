//! Per-stage rule providers
//!
//! Every provider reads its own documents on each call. Two providers that
//! share a physical document (code generation and intelligent retrieval)
//! read it independently.
//!
//! Failure shapes differ by provider: the five document-backed providers
//! answer with a plain-text line, while code-analysis guidance answers with
//! a structured error envelope. Existing callers rely on both forms.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::envelope::{
    build_error, build_success, timestamp, ConfigSummaryEnvelope, GuidanceEnvelope, RuleEnvelope,
    StrategyEnvelope,
};
use crate::error::{GatewayError, GatewayResult};
use crate::store::{Document, DocumentStore};

const STRATEGY_VERSION: &str = "3.0.0";
const GUIDANCE_VERSION: &str = "2.0.0";

/// Summary labels paired with the workflow config stage keys
const CONFIG_STAGES: [(&str, &str); 3] = [
    ("stage1", "stage1_prd_analysis"),
    ("stage2", "stage2_code_generation"),
    ("stage3", "stage3_flowchart_generation"),
];

/// One fine-grained tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    PrdAnalysis,
    CodeGeneration,
    FlowchartGeneration,
    IntelligentRetrieval,
    WorkflowConfig,
    CodeAnalysisGuidance,
}

/// Static description of a whole-document rule provider
struct RuleSheet {
    document: Document,
    rule_type: &'static str,
    usage_instruction: &'static str,
}

const PRD_ANALYSIS: RuleSheet = RuleSheet {
    document: Document::PrdAnalysisRules,
    rule_type: "PRD analysis rules",
    usage_instruction: "Use these rules to guide the model in analyzing PRD documents and \
                        producing FOP-compliant requirement analysis reports",
};

const CODE_GENERATION: RuleSheet = RuleSheet {
    document: Document::CodeGenerationRules,
    rule_type: "Code generation rules",
    usage_instruction: "Use these rules to guide the model in generating FOP-compliant Java code",
};

const FLOWCHART_GENERATION: RuleSheet = RuleSheet {
    document: Document::FlowchartGenerationRules,
    rule_type: "Flowchart generation rules",
    usage_instruction: "Use these rules to guide the model in generating Mermaid flowcharts",
};

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::PrdAnalysis,
        Provider::CodeGeneration,
        Provider::FlowchartGeneration,
        Provider::IntelligentRetrieval,
        Provider::WorkflowConfig,
        Provider::CodeAnalysisGuidance,
    ];

    /// MCP tool name
    pub fn tool_name(self) -> &'static str {
        match self {
            Provider::PrdAnalysis => "getPrdAnalysisRules",
            Provider::CodeGeneration => "getCodeGenerationRules",
            Provider::FlowchartGeneration => "getFlowchartGenerationRules",
            Provider::IntelligentRetrieval => "getIntelligentRetrievalStrategy",
            Provider::WorkflowConfig => "getWorkflowConfig",
            Provider::CodeAnalysisGuidance => "getCodeAnalysisGuidance",
        }
    }

    /// One-line description shown in the navigation menu
    pub fn summary(self) -> &'static str {
        match self {
            Provider::PrdAnalysis => "[Detailed tool] Get the PRD analysis rules",
            Provider::CodeGeneration => "[Detailed tool] Get the code generation rules",
            Provider::FlowchartGeneration => "[Detailed tool] Get the flowchart generation rules",
            Provider::IntelligentRetrieval => {
                "[Detailed tool] Get the intelligent retrieval optimization strategy"
            }
            Provider::WorkflowConfig => "[Detailed tool] Get the workflow configuration",
            Provider::CodeAnalysisGuidance => "[Detailed tool] Get the code analysis guidance",
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Provider::PrdAnalysis => "Failed to get PRD analysis rules",
            Provider::CodeGeneration => "Failed to get code generation rules",
            Provider::FlowchartGeneration => "Failed to get flowchart generation rules",
            Provider::IntelligentRetrieval => "Failed to get intelligent retrieval strategy",
            Provider::WorkflowConfig => "Failed to get workflow configuration",
            Provider::CodeAnalysisGuidance => "Failed to get code analysis guidance",
        }
    }

    /// Produce this provider's response text
    ///
    /// `refinement` is accepted for code-analysis guidance and currently does
    /// not change the answer.
    pub fn provide(self, store: &DocumentStore, refinement: Option<&str>) -> String {
        tracing::debug!(tool = self.tool_name(), "Providing rules");

        let rendered = match self {
            Provider::PrdAnalysis => {
                rule_envelope(store, &PRD_ANALYSIS).and_then(|e| build_success(&e))
            }
            Provider::CodeGeneration => {
                rule_envelope(store, &CODE_GENERATION).and_then(|e| build_success(&e))
            }
            Provider::FlowchartGeneration => {
                rule_envelope(store, &FLOWCHART_GENERATION).and_then(|e| build_success(&e))
            }
            Provider::IntelligentRetrieval => {
                strategy_envelope(store).and_then(|e| build_success(&e))
            }
            Provider::WorkflowConfig => config_summary(store).and_then(|e| build_success(&e)),
            Provider::CodeAnalysisGuidance => return self.guidance(refinement),
        };

        self.plain(rendered)
    }

    fn guidance(self, analysis_type: Option<&str>) -> String {
        if let Some(kind) = analysis_type {
            tracing::debug!(analysis_type = kind, "Analysis type requested");
        }
        match build_success(&guidance_envelope()) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(tool = self.tool_name(), "{}", e);
                build_error(self.failure_prefix(), &e.to_string(), Some(&e))
            }
        }
    }

    fn plain(self, result: GatewayResult<String>) -> String {
        result.unwrap_or_else(|e| {
            tracing::warn!(tool = self.tool_name(), kind = e.kind(), "{}", e);
            format!("{}: {}", self.failure_prefix(), e)
        })
    }
}

// ============================================================================
// Envelope assembly
// ============================================================================

fn rule_envelope(store: &DocumentStore, sheet: &RuleSheet) -> GatewayResult<RuleEnvelope> {
    let path = store.path_of(sheet.document);
    let rules = store.load(&path)?;

    Ok(RuleEnvelope {
        rule_type: sheet.rule_type.to_string(),
        version: text(field(&rules, &path, &["version"])?),
        description: text(field(&rules, &path, &["description"])?),
        usage_instruction: sheet.usage_instruction.to_string(),
        rules_content: rules,
    })
}

fn strategy_envelope(store: &DocumentStore) -> GatewayResult<StrategyEnvelope> {
    let path = store.path_of(Document::CodeGenerationRules);
    let rules = store.load(&path)?;
    let strategy = field(&rules, &path, &["intelligentRetrievalStrategy"])?;

    Ok(StrategyEnvelope {
        strategy_name: "Intelligent retrieval strategy".to_string(),
        version: STRATEGY_VERSION.to_string(),
        enabled: flag(field(strategy, &path, &["enabled"])?),
        description: text(field(strategy, &path, &["description"])?),
        strategy_details: strategy.clone(),
        usage_instruction: "Use this strategy to guide the model in efficient code analysis \
                            and retrieval"
            .to_string(),
    })
}

fn config_summary(store: &DocumentStore) -> GatewayResult<ConfigSummaryEnvelope> {
    let path = store.path_of(Document::WorkflowConfig);
    let config = store.load(&path)?;

    let mut stages = BTreeMap::new();
    for (label, key) in CONFIG_STAGES {
        let name = field(&config, &path, &["workflowConfig", key, "name"])?;
        stages.insert(label.to_string(), text(name));
    }

    Ok(ConfigSummaryEnvelope {
        agent_name: text(field(&config, &path, &["agentName"])?),
        version: text(field(&config, &path, &["version"])?),
        description: text(field(&config, &path, &["description"])?),
        stages,
        usage_instruction: "Use this summary to see which stages the FOP workflow runs, then \
                            request each stage's rules"
            .to_string(),
    })
}

fn guidance_envelope() -> GuidanceEnvelope {
    GuidanceEnvelope {
        guidance_name: "Code analysis guidance".to_string(),
        version: GUIDANCE_VERSION.to_string(),
        timestamp: timestamp(),
        usage_instruction: "Use this guidance for systematic code analysis".to_string(),
    }
}

// ============================================================================
// Field access
// ============================================================================

/// Walk `keys` from `value`; a missing or null step is a missing field
fn field<'a>(value: &'a Value, document: &str, keys: &[&str]) -> GatewayResult<&'a Value> {
    let mut current = value;
    for (depth, key) in keys.iter().enumerate() {
        current = match current.get(key) {
            Some(next) if !next.is_null() => next,
            _ => return Err(GatewayError::missing(document, keys[..=depth].join("."))),
        };
    }
    Ok(current)
}

/// Scalars as text; containers have no text form
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryConfig;
    use crate::store::MemorySource;
    use serde_json::json;
    use std::sync::Arc;

    const CONFIG: &str = ".joycode/fop-agent-config.json";
    const PRD: &str = ".joycode/rules/prd-analysis-rules.json";
    const CODEGEN: &str = ".joycode/rules/code-generation-rules.json";

    fn store(source: MemorySource) -> DocumentStore {
        DocumentStore::new(Arc::new(source), &RepositoryConfig::default())
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_rule_provider_wraps_document() {
        let doc = json!({"version": "1.2.0", "description": "PRD rules", "steps": [1, 2]});
        let store = store(MemorySource::new().with_document(PRD, doc.to_string()));

        let value = parse(&Provider::PrdAnalysis.provide(&store, None));
        assert_eq!(value["rule_type"], "PRD analysis rules");
        assert_eq!(value["version"], "1.2.0");
        assert_eq!(value["description"], "PRD rules");
        assert_eq!(value["rules_content"], doc);
        assert!(value["usage_instruction"].as_str().unwrap().contains("PRD"));
    }

    #[test]
    fn test_rule_provider_missing_document_is_plain_text() {
        let text = Provider::FlowchartGeneration.provide(&store(MemorySource::new()), None);
        assert!(text.starts_with("Failed to get flowchart generation rules: document unreadable"));
        assert!(serde_json::from_str::<Value>(&text).is_err());
    }

    #[test]
    fn test_rule_provider_missing_field_is_plain_text() {
        let store = store(MemorySource::new().with_document(PRD, r#"{"version":"1"}"#));
        let text = Provider::PrdAnalysis.provide(&store, None);
        assert_eq!(
            text,
            format!(
                "Failed to get PRD analysis rules: missing required field 'description' in {}",
                PRD
            )
        );
    }

    #[test]
    fn test_numeric_version_rendered_as_text() {
        let store = store(
            MemorySource::new().with_document(CODEGEN, r#"{"version":2,"description":"d"}"#),
        );
        let value = parse(&Provider::CodeGeneration.provide(&store, None));
        assert_eq!(value["version"], "2");
    }

    #[test]
    fn test_strategy_narrows_code_generation_document() {
        let doc = json!({
            "version": "1.0.0",
            "description": "codegen",
            "intelligentRetrievalStrategy": {
                "enabled": true,
                "description": "search smarter",
                "phases": ["index", "rank"]
            }
        });
        let store = store(MemorySource::new().with_document(CODEGEN, doc.to_string()));

        let value = parse(&Provider::IntelligentRetrieval.provide(&store, None));
        assert_eq!(value["version"], STRATEGY_VERSION);
        assert_eq!(value["enabled"], true);
        assert_eq!(value["description"], "search smarter");
        assert_eq!(value["strategy_details"], doc["intelligentRetrievalStrategy"]);
        assert!(value.get("rules_content").is_none());
    }

    #[test]
    fn test_strategy_missing_section() {
        let store = store(
            MemorySource::new().with_document(CODEGEN, r#"{"version":"1","description":"d"}"#),
        );
        let text = Provider::IntelligentRetrieval.provide(&store, None);
        assert!(text.starts_with("Failed to get intelligent retrieval strategy: missing required field 'intelligentRetrievalStrategy'"));
    }

    #[test]
    fn test_config_summary_extracts_stage_names() {
        let config = json!({
            "agentName": "FOP Agent",
            "version": "3.0.0",
            "description": "workflow",
            "workflowConfig": {
                "stage1_prd_analysis": {"name": "PRD"},
                "stage2_code_generation": {"name": "Code"},
                "stage3_flowchart_generation": {"name": "Flow"}
            }
        });
        let store = store(MemorySource::new().with_document(CONFIG, config.to_string()));

        let value = parse(&Provider::WorkflowConfig.provide(&store, None));
        assert_eq!(value["agentName"], "FOP Agent");
        assert_eq!(
            value["stages"],
            json!({"stage1": "PRD", "stage2": "Code", "stage3": "Flow"})
        );
        assert!(value["usage_instruction"].is_string());
    }

    #[test]
    fn test_config_summary_missing_stage_reports_path() {
        let config = json!({
            "agentName": "a", "version": "1", "description": "d",
            "workflowConfig": {"stage1_prd_analysis": {"name": "PRD"}}
        });
        let store = store(MemorySource::new().with_document(CONFIG, config.to_string()));
        let text = Provider::WorkflowConfig.provide(&store, None);
        assert!(text.contains("workflowConfig.stage2_code_generation"));
    }

    #[test]
    fn test_guidance_needs_no_documents() {
        let value = parse(&Provider::CodeAnalysisGuidance.provide(
            &store(MemorySource::new()),
            Some("performance"),
        ));
        assert_eq!(value["guidance_name"], "Code analysis guidance");
        assert_eq!(value["version"], GUIDANCE_VERSION);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_tool_names_are_unique() {
        let mut names: Vec<_> = Provider::ALL.iter().map(|p| p.tool_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_flag_values() {
        assert!(flag(&json!(true)));
        assert!(flag(&json!("TRUE")));
        assert!(flag(&json!(1)));
        assert!(!flag(&json!(0)));
        assert!(!flag(&json!({})));
    }
}
