//! Integration tests against the fixture rule repository on disk

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fop_workflow_mcp::{
    health::check_repository, Document, DocumentStore, EmbeddableMcp, FopWorkflowMcpServer,
    RepositoryConfig, Stage, WorkflowGateway,
};
use mcp_common::first_text;
use serde_json::Value;

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/repo")
}

fn fixture_config() -> RepositoryConfig {
    RepositoryConfig::default().with_root(fixture_root())
}

fn fixture_gateway() -> WorkflowGateway {
    WorkflowGateway::new(DocumentStore::from_config(&fixture_config()))
}

/// Copy the fixture repository so a test can break it
fn scratch_repository() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join(".joycode/rules");
    std::fs::create_dir_all(&rules).unwrap();

    let source = fixture_root().join(".joycode");
    std::fs::copy(
        source.join("fop-agent-config.json"),
        dir.path().join(".joycode/fop-agent-config.json"),
    )
    .unwrap();
    for entry in std::fs::read_dir(source.join("rules")).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), rules.join(entry.file_name())).unwrap();
    }
    dir
}

fn parse(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn guide_dispatch_is_byte_identical_to_direct_calls() {
    let gateway = fixture_gateway();

    for stage in Stage::ALL {
        let direct = match stage {
            Stage::PrdAnalysis => gateway.prd_analysis_rules(),
            Stage::CodeGeneration => gateway.code_generation_rules(),
            Stage::FlowchartGeneration => gateway.flowchart_generation_rules(),
            Stage::IntelligentRetrieval => gateway.intelligent_retrieval_strategy(),
            Stage::WorkflowConfig => gateway.workflow_config(),
        };
        assert_eq!(gateway.guide(Some(stage.as_str())), direct, "{}", stage);
        assert_eq!(
            gateway.guide(Some(&stage.as_str().to_uppercase())),
            direct,
            "{}",
            stage
        );
        assert!(serde_json::from_str::<Value>(&direct).is_ok());
    }
}

#[test]
fn menu_carries_config_and_navigation() {
    let value = parse(&fixture_gateway().guide(None));

    assert_eq!(value["workflow_config"]["agentName"], "FOP Workflow Agent");
    let tools = value["navigation_guide"]["available_detailed_tools"]
        .as_object()
        .unwrap();
    assert_eq!(tools.len(), 6);
    assert!(value["navigation_guide"]["note"].is_string());
}

#[test]
fn provider_exposes_document_version_and_description() {
    let store = DocumentStore::from_config(&fixture_config());
    let gateway = fixture_gateway();

    let cases = [
        (Document::PrdAnalysisRules, gateway.prd_analysis_rules()),
        (Document::CodeGenerationRules, gateway.code_generation_rules()),
        (Document::FlowchartGenerationRules, gateway.flowchart_generation_rules()),
    ];

    for (document, provided) in cases {
        let raw = store.load_document(document).unwrap();
        let provided = parse(&provided);
        assert_eq!(provided["version"], raw["version"]);
        assert_eq!(provided["description"], raw["description"]);
        assert_eq!(provided["rules_content"], raw);
    }
}

#[test]
fn retrieval_strategy_comes_from_code_generation_rules() {
    let value = parse(&fixture_gateway().intelligent_retrieval_strategy());
    assert_eq!(value["enabled"], true);
    assert_eq!(value["strategy_details"]["maxCandidates"], 5);
}

#[test]
fn config_summary_from_fixture() {
    let value = parse(&fixture_gateway().workflow_config());
    assert_eq!(value["stages"]["stage1"], "PRD Analysis");
    assert_eq!(value["stages"]["stage3"], "Flowchart Generation");
}

#[test]
fn missing_document_degrades_and_recovers() {
    let repo = scratch_repository();
    let config = RepositoryConfig::default().with_root(repo.path());
    let gateway = WorkflowGateway::new(DocumentStore::from_config(&config));
    let codegen = repo.path().join(".joycode/rules/code-generation-rules.json");
    let saved = std::fs::read_to_string(&codegen).unwrap();

    std::fs::remove_file(&codegen).unwrap();

    let rules = gateway.code_generation_rules();
    assert!(rules.starts_with("Failed to get code generation rules"));
    let strategy = gateway.guide(Some("intelligent_retrieval"));
    assert!(strategy.starts_with("Failed to get intelligent retrieval strategy"));

    // Unaffected operations keep working
    assert!(parse(&gateway.prd_analysis_rules())["version"].is_string());

    // Nothing was cached, so restoring the file restores the answer
    std::fs::write(&codegen, saved).unwrap();
    assert_eq!(parse(&gateway.code_generation_rules())["version"], "3.0.0");
}

#[test]
fn malformed_config_yields_error_envelope_from_menu() {
    let repo = scratch_repository();
    std::fs::write(repo.path().join(".joycode/fop-agent-config.json"), "{ broken").unwrap();
    let config = RepositoryConfig::default().with_root(repo.path());
    let gateway = WorkflowGateway::new(DocumentStore::from_config(&config));

    let value = parse(&gateway.guide(None));
    assert_eq!(value["error"], true);
    assert_eq!(value["exception_type"], "DocumentMalformed");

    assert!(gateway
        .workflow_config()
        .starts_with("Failed to get workflow configuration: document is not valid JSON"));
}

#[test]
fn fixture_repository_passes_health_check() {
    let report = check_repository(&DocumentStore::from_config(&fixture_config()));
    assert!(report.iter().all(|s| s.ok), "{:?}", report);
}

#[tokio::test]
async fn concurrent_tool_calls_do_not_interfere() {
    let server = Arc::new(FopWorkflowMcpServer::with_config(&fixture_config()));
    let calls = [
        ("getFopWorkflowGuide", serde_json::json!({"workflowType": "prd_analysis"})),
        ("getCodeGenerationRules", serde_json::json!({})),
        ("getFlowchartGenerationRules", serde_json::json!({})),
        ("getIntelligentRetrievalStrategy", serde_json::json!({})),
        ("getWorkflowConfig", serde_json::json!({})),
    ];

    let mut expected = Vec::new();
    for (name, params) in &calls {
        let result = server.call_tool(name, params.clone()).await.unwrap();
        expected.push(first_text(&result).unwrap().to_string());
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        for (name, params) in calls.clone() {
            let server = Arc::clone(&server);
            handles.push(tokio::spawn(async move {
                let result = server.call_tool(name, params).await.unwrap();
                first_text(&result).unwrap().to_string()
            }));
        }
    }

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), expected[i % calls.len()]);
    }
}
