use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an interaction is a top-level request or a delegated one.
/// The upstream log omits the field for older records, which means `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Main,
    #[serde(other)]
    Other,
}

/// One logged request/response cycle through the proxy or tool gateway.
///
/// Every field except `id` and `createdAt` may be absent depending on the
/// producing agent; readers must treat absence as "no data", not an error.
/// Money fields (`cost`, `baselineCost`, ...) are decimal strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub baseline_model: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub baseline_cost: Option<String>,
    #[serde(default)]
    pub toon_cost_savings: Option<String>,
    #[serde(default)]
    pub toon_tokens_saved: Option<u64>,
    #[serde(default)]
    pub toon_skip_reason: Option<String>,
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub request_type: Option<RequestType>,
    #[serde(default)]
    pub external_agent_id: Option<String>,
    #[serde(default)]
    pub external_agent_id_label: Option<String>,
    /// Opaque conversational transcript; only the message extractor reads it.
    #[serde(default)]
    pub raw_payload: Option<serde_json::Value>,
}

impl Interaction {
    pub fn request_type(&self) -> RequestType {
        self.request_type.unwrap_or_default()
    }
}

/// Pagination metadata as the API reports it alongside every list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Paginated list envelope: `{ "data": [...], "pagination": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_interaction() {
        let json = r#"{
            "id": "int_1",
            "sessionId": "sess_1",
            "createdAt": "2025-11-02T10:00:00Z",
            "model": "claude-haiku-4-5",
            "baselineModel": "claude-sonnet-4-5",
            "cost": "0.0213",
            "baselineCost": "0.1410",
            "toonCostSavings": "0.0042",
            "toonTokensSaved": 512,
            "inputTokens": 1200,
            "outputTokens": 340,
            "requestType": "main",
            "rawPayload": {"messages": []}
        }"#;
        let i: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(i.id, "int_1");
        assert_eq!(i.session_id.as_deref(), Some("sess_1"));
        assert_eq!(i.request_type(), RequestType::Main);
        assert_eq!(i.toon_tokens_saved, Some(512));
        assert!(i.raw_payload.is_some());
    }

    #[test]
    fn deserialize_sparse_interaction() {
        let json = r#"{ "id": "int_2", "createdAt": "2025-11-02T10:00:00Z" }"#;
        let i: Interaction = serde_json::from_str(json).unwrap();
        assert!(i.session_id.is_none());
        assert!(i.cost.is_none());
        assert!(i.raw_payload.is_none());
        // Absent requestType means a top-level request
        assert_eq!(i.request_type(), RequestType::Main);
    }

    #[test]
    fn unknown_request_type_maps_to_other() {
        let json = r#"{
            "id": "int_3",
            "createdAt": "2025-11-02T10:00:00Z",
            "requestType": "subagent"
        }"#;
        let i: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(i.request_type(), RequestType::Other);
    }

    #[test]
    fn deserialize_paginated_envelope() {
        let json = r#"{
            "data": [{ "id": "int_1", "createdAt": "2025-11-02T10:00:00Z" }],
            "pagination": {
                "currentPage": 1,
                "limit": 20,
                "total": 45,
                "totalPages": 3,
                "hasNext": true,
                "hasPrev": false
            }
        }"#;
        let page: Paginated<Interaction> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total, 45);
        assert!(page.pagination.has_next);
    }
}
