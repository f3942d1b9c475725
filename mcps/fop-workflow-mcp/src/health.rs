//! Repository health check
//!
//! Loads each known document once and reports whether it parses. The
//! gateway itself never calls this; it backs the `check` command, which
//! prints either [`DocumentStatus::line`] or the JSON form.

use serde::Serialize;

use crate::store::{Document, DocumentStore};

#[derive(Debug, Clone, Serialize)]
pub struct DocumentStatus {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl DocumentStatus {
    /// One human-readable report line
    pub fn line(&self) -> String {
        match (&self.error, self.kind) {
            (Some(error), Some(kind)) => format!("FAILED  {} [{}] {}", self.path, kind, error),
            (Some(error), None) => format!("FAILED  {} {}", self.path, error),
            _ => format!("ok      {}", self.path),
        }
    }
}

/// Status of every document in the repository, config first
pub fn check_repository(store: &DocumentStore) -> Vec<DocumentStatus> {
    Document::ALL
        .iter()
        .map(|&document| {
            let path = store.path_of(document);
            match store.load(&path) {
                Ok(_) => DocumentStatus {
                    path,
                    ok: true,
                    error: None,
                    kind: None,
                },
                Err(e) => DocumentStatus {
                    path,
                    ok: false,
                    error: Some(e.to_string()),
                    kind: Some(e.kind()),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryConfig;
    use crate::store::MemorySource;
    use std::sync::Arc;

    #[test]
    fn test_reports_each_document() {
        let source = MemorySource::new()
            .with_document(".joycode/fop-agent-config.json", "{}")
            .with_document(".joycode/rules/prd-analysis-rules.json", "not json");
        let store = DocumentStore::new(Arc::new(source), &RepositoryConfig::default());

        let report = check_repository(&store);
        assert_eq!(report.len(), 4);
        assert!(report[0].ok);
        assert_eq!(report[1].kind, Some("DocumentMalformed"));
        assert_eq!(report[2].kind, Some("DocumentNotFound"));
        assert!(!report[3].ok);

        assert_eq!(report[0].line(), "ok      .joycode/fop-agent-config.json");
        assert!(report[1]
            .line()
            .starts_with("FAILED  .joycode/rules/prd-analysis-rules.json [DocumentMalformed]"));
    }

    #[test]
    fn test_json_report_omits_empty_fields() {
        let source =
            MemorySource::new().with_document(".joycode/fop-agent-config.json", "{}");
        let store = DocumentStore::new(Arc::new(source), &RepositoryConfig::default());

        let report = serde_json::to_value(check_repository(&store)).unwrap();
        assert_eq!(
            report[0],
            serde_json::json!({"path": ".joycode/fop-agent-config.json", "ok": true})
        );
        assert_eq!(report[1]["kind"], "DocumentNotFound");
        assert!(report[1]["error"].is_string());
    }
}
