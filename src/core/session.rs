use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::fallback::first_non_empty;
use crate::core::models::interaction::{Interaction, RequestType};
use crate::core::models::session::{SessionSource, SessionSummary};
use crate::core::savings::{calculate_cost_savings, CostSavings};
use crate::core::transcript;

/// Known title-generation prompts are excluded from title fallback by this
/// literal substring. Deliberately not generalized.
const TITLE_PROMPT_MARKER: &str = "Please write a 5-10 word title";
const MIN_TITLE_CHARS: usize = 10;
const MAX_TITLE_CHARS: usize = 100;

/// Marker in `externalAgentIdLabel` for a delegated (non-root) request,
/// e.g. "Planner → Coder".
const DELEGATION_SEPARATOR: &str = "→";

/// Session header metrics for the session detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionHeader {
    pub total_requests: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub models: Vec<String>,
    pub first_request: Option<DateTime<Utc>>,
    pub last_request: Option<DateTime<Utc>>,
    pub total_cost: Option<String>,
    pub total_baseline_cost: Option<String>,
    pub total_toon_cost_savings: Option<String>,
    pub title: Option<String>,
    pub root_interaction_id: Option<String>,
    pub session_source: Option<SessionSource>,
    pub profile_name: Option<String>,
    pub user_names: Vec<String>,
    /// True when no authoritative summary was available and the numeric/set
    /// fields were derived from the current page only. Later pages would
    /// change those values; callers should label them as partial.
    pub page_scoped: bool,
}

/// Build the session header from the current page of interactions plus an
/// optional authoritative summary.
///
/// Summary fields always win; page-derived values are a fallback for sessions
/// whose rollup has not been materialized yet. `page_total` is the pagination
/// total for the session's interaction list, preferred over `page.len()` when
/// counting requests without a summary.
pub fn aggregate_session(
    page: &[Interaction],
    summary: Option<&SessionSummary>,
    page_total: Option<u64>,
) -> SessionHeader {
    let total_requests = summary
        .and_then(|s| s.request_count)
        .or(page_total)
        .unwrap_or(page.len() as u64);

    let total_input_tokens = summary
        .and_then(|s| s.total_input_tokens)
        .unwrap_or_else(|| page.iter().map(|i| i.input_tokens.unwrap_or(0)).sum());
    let total_output_tokens = summary
        .and_then(|s| s.total_output_tokens)
        .unwrap_or_else(|| page.iter().map(|i| i.output_tokens.unwrap_or(0)).sum());

    let models = summary
        .and_then(|s| s.models.clone())
        .unwrap_or_else(|| collect_models(page));

    let first_request = summary
        .and_then(|s| s.first_request_time)
        .or_else(|| page.iter().map(|i| i.created_at).min());
    let last_request = summary
        .and_then(|s| s.last_request_time)
        .or_else(|| page.iter().map(|i| i.created_at).max());

    let total_cost = summary
        .and_then(|s| s.total_cost.clone())
        .or_else(|| sum_amounts(page, |i| i.cost.as_deref()));
    let total_baseline_cost = summary
        .and_then(|s| s.total_baseline_cost.clone())
        .or_else(|| sum_amounts(page, |i| i.baseline_cost.as_deref()));
    let total_toon_cost_savings = summary
        .and_then(|s| s.total_toon_cost_savings.clone())
        .or_else(|| sum_amounts(page, |i| i.toon_cost_savings.as_deref()));

    SessionHeader {
        total_requests,
        total_input_tokens,
        total_output_tokens,
        models,
        first_request,
        last_request,
        total_cost,
        total_baseline_cost,
        total_toon_cost_savings,
        title: derive_title(summary, page),
        root_interaction_id: root_interaction(page).map(|i| i.id.clone()),
        session_source: summary.and_then(|s| s.session_source),
        profile_name: summary.and_then(|s| s.profile_name.clone()),
        user_names: summary.map(|s| s.user_names.clone()).unwrap_or_default(),
        page_scoped: summary.is_none(),
    }
}

/// Session title, first non-empty source wins: machine short title, explicit
/// conversation title, then the first qualifying user message of the page in
/// ascending `createdAt` order. A qualifying message is longer than 10 chars
/// and does not contain the title-generation prompt marker.
pub fn derive_title(summary: Option<&SessionSummary>, page: &[Interaction]) -> Option<String> {
    if let Some(title) = first_non_empty(&[
        summary.and_then(|s| s.claude_code_title.as_deref()),
        summary.and_then(|s| s.conversation_title.as_deref()),
    ]) {
        return Some(title.to_string());
    }

    let mut sorted: Vec<&Interaction> = page.iter().collect();
    sorted.sort_by_key(|i| i.created_at);

    for interaction in sorted {
        let extracted = transcript::extract(interaction.raw_payload.as_ref());
        if let Some(message) = extracted.last_user_message {
            if message.chars().count() > MIN_TITLE_CHARS && !message.contains(TITLE_PROMPT_MARKER) {
                return Some(truncate_title(&message));
            }
        }
    }
    None
}

/// First interaction (in page order) that is a top-level request: either
/// `requestType = main`, or labeled without the delegation separator. The
/// session view links to it; a page of purely delegated requests has none.
pub fn root_interaction(page: &[Interaction]) -> Option<&Interaction> {
    page.iter().find(|i| {
        i.request_type() == RequestType::Main
            || i.external_agent_id_label
                .as_deref()
                .is_some_and(|l| !l.contains(DELEGATION_SEPARATOR))
    })
}

/// Display label for one interaction row: prompt label, raw agent id, then a
/// generic Main/Subagent tag.
pub fn interaction_label(interaction: &Interaction) -> String {
    first_non_empty(&[
        interaction.external_agent_id_label.as_deref(),
        interaction.external_agent_id.as_deref(),
    ])
    .map(str::to_string)
    .unwrap_or_else(|| match interaction.request_type() {
        RequestType::Main => "Main".to_string(),
        RequestType::Other => "Subagent".to_string(),
    })
}

/// Whether the row represents a delegated sub-agent request.
pub fn is_delegated(interaction: &Interaction) -> bool {
    interaction
        .external_agent_id_label
        .as_deref()
        .is_some_and(|l| l.contains(DELEGATION_SEPARATOR))
}

/// Display-ready fields for one interaction row in the log view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionRow {
    pub id: String,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub label: String,
    pub delegated: bool,
    pub model: Option<String>,
    pub baseline_model: Option<String>,
    pub cost: Option<String>,
    pub savings: CostSavings,
    pub toon_skip_reason: Option<String>,
    pub last_user_message: Option<String>,
    pub tools: Vec<String>,
}

/// Flatten one interaction into its display row: label chain, savings math
/// and transcript extraction all resolved up front so rendering stays dumb.
pub fn build_row(interaction: &Interaction) -> InteractionRow {
    let extracted = transcript::extract(interaction.raw_payload.as_ref());
    InteractionRow {
        id: interaction.id.clone(),
        session_id: interaction.session_id.clone(),
        created_at: interaction.created_at,
        label: interaction_label(interaction),
        delegated: is_delegated(interaction),
        model: interaction.model.clone(),
        baseline_model: interaction.baseline_model.clone(),
        cost: interaction.cost.clone(),
        savings: calculate_cost_savings(interaction),
        toon_skip_reason: interaction.toon_skip_reason.clone(),
        last_user_message: extracted.last_user_message,
        tools: extracted.tool_names_used,
    }
}

fn collect_models(page: &[Interaction]) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    for model in page.iter().filter_map(|i| i.model.as_deref()) {
        if !model.is_empty() && !models.iter().any(|m| m == model) {
            models.push(model.to_string());
        }
    }
    models
}

/// Page-scoped sum of a decimal-string money field. `None` when no row on
/// the page carries the field at all, so "no data" stays distinct from $0.
fn sum_amounts<'a>(
    page: &'a [Interaction],
    field: impl Fn(&'a Interaction) -> Option<&'a str>,
) -> Option<String> {
    let values: Vec<f64> = page
        .iter()
        .filter_map(&field)
        .filter_map(|s| s.trim().parse::<f64>().ok())
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(format_amount(values.iter().sum()))
}

fn format_amount(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn truncate_title(message: &str) -> String {
    if message.chars().count() <= MAX_TITLE_CHARS {
        return message.to_string();
    }
    let truncated: String = message.chars().take(MAX_TITLE_CHARS).collect();
    format!("{}...", truncated)
}
