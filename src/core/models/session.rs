use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of a session, as tagged by the upstream log store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSource {
    ClaudeCode,
    Api,
    #[serde(other)]
    Other,
}

impl SessionSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ClaudeCode => "Claude Code",
            Self::Api => "API",
            Self::Other => "Other",
        }
    }
}

/// Authoritative per-session rollup, materialized out-of-band by the log
/// store. When present its values take precedence over anything derived from
/// a single page of interactions; sessions not yet materialized have none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub profile_name: Option<String>,
    /// Render order is significant; keep as received.
    #[serde(default)]
    pub user_names: Vec<String>,
    #[serde(default)]
    pub session_source: Option<SessionSource>,
    #[serde(default)]
    pub claude_code_title: Option<String>,
    #[serde(default)]
    pub conversation_title: Option<String>,
    #[serde(default)]
    pub total_input_tokens: Option<u64>,
    #[serde(default)]
    pub total_output_tokens: Option<u64>,
    #[serde(default)]
    pub models: Option<Vec<String>>,
    #[serde(default)]
    pub first_request_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_request_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub request_count: Option<u64>,
    #[serde(default)]
    pub total_cost: Option<String>,
    #[serde(default)]
    pub total_baseline_cost: Option<String>,
    #[serde(default)]
    pub total_toon_cost_savings: Option<String>,
}
