//! Response envelopes returned by every tool
//!
//! Each call produces exactly one envelope shape. Success envelopes are
//! serialized with [`build_success`]; failures go through [`build_error`],
//! which always yields parseable JSON.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time in the envelope format
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ============================================================================
// Guide Envelope
// ============================================================================

/// Answer of the main entry point when it does not delegate
#[derive(Debug, Clone, Serialize)]
pub struct GuideEnvelope {
    pub guide_name: String,
    pub version: String,
    pub description: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub body: GuideBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GuideBody {
    /// Full workflow config plus navigation
    Menu {
        workflow_config: Value,
        usage_instruction: String,
        navigation_guide: NavigationGuide,
    },
    /// Soft failure: the requested stage is not known
    Unsupported {
        error: String,
        supported_types: Vec<&'static str>,
        usage_instruction: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationGuide {
    pub recommended_order: Vec<String>,
    pub available_detailed_tools: BTreeMap<&'static str, &'static str>,
    pub note: String,
}

// ============================================================================
// Provider Envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RuleEnvelope {
    pub rule_type: String,
    pub version: String,
    pub description: String,
    pub rules_content: Value,
    pub usage_instruction: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyEnvelope {
    pub strategy_name: String,
    pub version: String,
    pub enabled: bool,
    pub description: String,
    pub strategy_details: Value,
    pub usage_instruction: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummaryEnvelope {
    pub agent_name: String,
    pub version: String,
    pub description: String,
    pub stages: BTreeMap<String, String>,
    #[serde(rename = "usage_instruction")]
    pub usage_instruction: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuidanceEnvelope {
    pub guidance_name: String,
    pub version: String,
    pub timestamp: String,
    pub usage_instruction: String,
}

// ============================================================================
// Error Envelope
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    pub title: String,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<&'static str>,
}

// ============================================================================
// Builders
// ============================================================================

/// Serialize any envelope to its wire text
pub fn build_success<T: Serialize>(envelope: &T) -> GatewayResult<String> {
    serde_json::to_string_pretty(envelope).map_err(GatewayError::Serialization)
}

/// Render a structured error envelope
///
/// Falls back to a hand-built minimal payload if serialization itself fails.
pub fn build_error(title: &str, message: &str, cause: Option<&GatewayError>) -> String {
    let envelope = ErrorEnvelope {
        error: true,
        title: title.to_string(),
        message: message.to_string(),
        timestamp: timestamp(),
        exception_type: cause.map(GatewayError::kind),
    };
    render_error(&envelope, message)
}

fn render_error<T: Serialize>(envelope: &T, message: &str) -> String {
    match build_success(envelope) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error envelope could not be serialized: {}", e);
            fallback_error(message)
        }
    }
}

/// Minimal error payload assembled without the serializer
pub fn fallback_error(message: &str) -> String {
    format!(r#"{{"error": true, "message": "{}"}}"#, escape_json(message))
}

fn escape_json(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
