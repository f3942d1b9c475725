//! Read access to the rule repository
//!
//! [`DocumentStore`] reads a document through a [`DocumentSource`] and parses
//! it as JSON. Nothing is cached: every `load` is a fresh read.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::config::RepositoryConfig;
use crate::error::{GatewayError, GatewayResult};

/// The fixed set of documents the gateway reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    WorkflowConfig,
    PrdAnalysisRules,
    CodeGenerationRules,
    FlowchartGenerationRules,
}

impl Document {
    pub const ALL: [Document; 4] = [
        Document::WorkflowConfig,
        Document::PrdAnalysisRules,
        Document::CodeGenerationRules,
        Document::FlowchartGenerationRules,
    ];

    /// File name inside the rules directory; `None` for the workflow config
    pub fn rule_file(self) -> Option<&'static str> {
        match self {
            Document::WorkflowConfig => None,
            Document::PrdAnalysisRules => Some("prd-analysis-rules.json"),
            Document::CodeGenerationRules => Some("code-generation-rules.json"),
            Document::FlowchartGenerationRules => Some("flowchart-generation-rules.json"),
        }
    }
}

/// Backend that returns the raw text stored at a repository-relative path
pub trait DocumentSource: Send + Sync + fmt::Debug {
    fn read(&self, path: &str) -> io::Result<String>;
}

/// Documents on disk under a root directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for FsSource {
    /// Only plain relative paths are read; anything that would leave `root` is refused
    fn read(&self, path: &str) -> io::Result<String> {
        if !is_contained(Path::new(path)) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path escapes the repository root",
            ));
        }
        std::fs::read_to_string(self.root.join(path))
    }
}

/// Relative, with no `..` and no root or prefix component
pub(crate) fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Documents held in memory, keyed by repository-relative path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents.insert(path.into(), content.into());
        self
    }
}

impl DocumentSource for MemorySource {
    fn read(&self, path: &str) -> io::Result<String> {
        self.documents.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no such document")
        })
    }
}

/// Parsed-document reader over a rule repository
#[derive(Clone)]
pub struct DocumentStore {
    source: Arc<dyn DocumentSource>,
    config_file: String,
    rules_dir: PathBuf,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("source", &self.source)
            .field("config_file", &self.config_file)
            .field("rules_dir", &self.rules_dir)
            .finish()
    }
}

impl DocumentStore {
    /// Store over an arbitrary source, using the layout from `config`
    ///
    /// `config.root` is not consulted; the source decides what a path means.
    pub fn new(source: Arc<dyn DocumentSource>, config: &RepositoryConfig) -> Self {
        Self {
            source,
            config_file: config.config_file.clone(),
            rules_dir: PathBuf::from(&config.rules_dir),
        }
    }

    /// Store reading from disk under `config.root`
    pub fn from_config(config: &RepositoryConfig) -> Self {
        Self::new(Arc::new(FsSource::new(config.root.clone())), config)
    }

    /// Repository-relative path of a known document
    pub fn path_of(&self, document: Document) -> String {
        match document.rule_file() {
            None => self.config_file.clone(),
            Some(file) => self.rules_dir.join(file).to_string_lossy().into_owned(),
        }
    }

    /// Read and parse the document at `path`
    pub fn load(&self, path: &str) -> GatewayResult<Value> {
        tracing::debug!(path, "Reading document");

        let content = self
            .source
            .read(path)
            .map_err(|source| GatewayError::DocumentNotFound {
                path: path.to_string(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| GatewayError::DocumentMalformed {
            path: path.to_string(),
            source,
        })
    }

    /// Read and parse one of the known documents
    pub fn load_document(&self, document: Document) -> GatewayResult<Value> {
        self.load(&self.path_of(document))
    }
}
