use colored::{control, Colorize};

use crate::core::pagination::PageWindow;
use crate::core::session::{InteractionRow, SessionHeader};

const MAX_MESSAGE_CHARS: usize = 80;
const MAX_VISIBLE_TOOLS: usize = 2;
const EMPTY_CELL: &str = "—";

/// Render the session header block as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Fix the flaky integration test
///   Source    Claude Code · dev
///   Users     alice, bob
///   Requests  45
///   Tokens    1.2K in / 300 out
///   Models    claude-haiku-4-5, claude-sonnet-4-5
///   Cost      $7.77 (saved $1.23, baseline $9.00)
///   First     2025-11-02 10:00:00
///   Last      2025-11-02 11:00:00
///   Root      int_abc
/// ```
pub fn render_session_header(header: &SessionHeader, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    let title = header.title.as_deref().unwrap_or("Session");
    lines.push(format!(" {}", title.bold()));

    let mut source_parts: Vec<String> = Vec::new();
    if let Some(source) = header.session_source {
        source_parts.push(source.display_name().to_string());
    }
    if let Some(profile) = &header.profile_name {
        source_parts.push(profile.clone());
    }
    if !source_parts.is_empty() {
        lines.push(format!("  {}    {}", "Source".cyan(), source_parts.join(" · ")));
    }
    if !header.user_names.is_empty() {
        lines.push(format!("  {}     {}", "Users".cyan(), header.user_names.join(", ")));
    }

    let partial = if header.page_scoped { " (this page only)" } else { "" };
    lines.push(format!(
        "  {}  {}{}",
        "Requests".cyan(),
        header.total_requests,
        partial
    ));
    lines.push(format!(
        "  {}    {} in / {} out",
        "Tokens".cyan(),
        format_tokens(header.total_input_tokens),
        format_tokens(header.total_output_tokens)
    ));

    if !header.models.is_empty() {
        lines.push(format!("  {}    {}", "Models".cyan(), header.models.join(", ")));
    }

    lines.push(format!(
        "  {}      {}",
        "Cost".cyan(),
        session_cost_cell(header)
    ));

    if let Some(first) = header.first_request {
        lines.push(format!(
            "  {}     {}",
            "First".cyan(),
            first.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    if let Some(last) = header.last_request {
        lines.push(format!(
            "  {}      {}",
            "Last".cyan(),
            last.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    if let Some(root) = &header.root_interaction_id {
        lines.push(format!("  {}      {}", "Root".cyan(), root));
    }

    lines.join("\n")
}

/// Render one page of interaction rows, blocks separated by blank lines.
pub fn render_rows(rows: &[InteractionRow], use_color: bool) -> String {
    control::set_override(use_color);

    if rows.is_empty() {
        return " No interactions found.".to_string();
    }
    rows.iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_row(row: &InteractionRow) -> String {
    let mut lines: Vec<String> = Vec::new();

    let time = row.created_at.format("%Y-%m-%d %H:%M:%S");
    let header = if row.delegated {
        format!(" {}  {} {}", time, row.label.bold(), "(delegated)".dimmed())
    } else {
        format!(" {}  {}", time, row.label.bold())
    };
    lines.push(header);

    lines.push(format!(
        "   {}     {}",
        "Model".cyan(),
        row.model.as_deref().unwrap_or(EMPTY_CELL)
    ));
    lines.push(format!("   {}      {}", "Cost".cyan(), row_cost_cell(row)));
    if let Some(reason) = &row.toon_skip_reason {
        lines.push(format!(
            "   {}   {}",
            "Skipped".cyan(),
            reason.dimmed()
        ));
    }
    lines.push(format!(
        "   {}   {}",
        "Message".cyan(),
        row.last_user_message
            .as_deref()
            .map(truncate_message)
            .unwrap_or_else(|| EMPTY_CELL.to_string())
    ));
    lines.push(format!("   {}     {}", "Tools".cyan(), tools_cell(&row.tools)));

    lines.join("\n")
}

/// Pagination footer, or `None` when everything fits on one page.
pub fn render_pagination(window: &PageWindow, total: u64, limit: u64, use_color: bool) -> Option<String> {
    if total <= limit {
        return None;
    }
    control::set_override(use_color);

    let range = match window.visible {
        Some((start, end)) => format!("Showing {} to {} of {} requests", start, end, total),
        None => format!("Showing 0 of {} requests", total),
    };
    let page = format!("Page {} of {}", window.current_page, window.total_pages);
    Some(format!(" {}  {}", range, page.dimmed()))
}

/// Per-row cost cell: the cost plus the savings percent, with "—" standing
/// in for an unknown percent (never "0%").
fn row_cost_cell(row: &InteractionRow) -> String {
    let cost = match row.cost.as_deref() {
        Some(cost) => format!("${}", cost),
        None => EMPTY_CELL.to_string(),
    };
    let percent = match row.savings.percent {
        Some(p) => format!("{:.0}%", p),
        None => EMPTY_CELL.to_string(),
    };
    format!("{} ({} saved)", cost, percent)
}

fn session_cost_cell(header: &SessionHeader) -> String {
    let mut cell = match header.total_cost.as_deref() {
        Some(cost) => format!("${}", cost),
        None => EMPTY_CELL.to_string(),
    };
    let mut extras: Vec<String> = Vec::new();
    if let Some(saved) = &header.total_toon_cost_savings {
        extras.push(format!("saved ${}", saved));
    }
    if let Some(baseline) = &header.total_baseline_cost {
        extras.push(format!("baseline ${}", baseline));
    }
    if !extras.is_empty() {
        cell.push_str(&format!(" ({})", extras.join(", ")));
    }
    cell
}

/// Tool badge cell: up to two names, the rest collapsed into "+N".
fn tools_cell(tools: &[String]) -> String {
    if tools.is_empty() {
        return EMPTY_CELL.to_string();
    }
    let visible: Vec<&str> = tools
        .iter()
        .take(MAX_VISIBLE_TOOLS)
        .map(String::as_str)
        .collect();
    let hidden = tools.len().saturating_sub(MAX_VISIBLE_TOOLS);
    if hidden > 0 {
        format!("{} +{}", visible.join(", "), hidden)
    } else {
        visible.join(", ")
    }
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let truncated: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
    format!("{}...", truncated)
}

fn format_tokens(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("{}", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::session::SessionSource;
    use crate::core::pagination::compute_window;
    use crate::core::savings::CostSavings;
    use chrono::{TimeZone, Utc};

    fn make_header() -> SessionHeader {
        SessionHeader {
            total_requests: 45,
            total_input_tokens: 1_200,
            total_output_tokens: 300,
            models: vec!["claude-haiku-4-5".to_string()],
            first_request: Some(Utc.with_ymd_and_hms(2025, 11, 2, 10, 0, 0).unwrap()),
            last_request: Some(Utc.with_ymd_and_hms(2025, 11, 2, 11, 0, 0).unwrap()),
            total_cost: Some("7.77".to_string()),
            total_baseline_cost: Some("9.00".to_string()),
            total_toon_cost_savings: Some("1.23".to_string()),
            title: Some("Fix the flaky integration test".to_string()),
            root_interaction_id: Some("int_abc".to_string()),
            session_source: Some(SessionSource::ClaudeCode),
            profile_name: Some("dev".to_string()),
            user_names: vec!["alice".to_string()],
            page_scoped: false,
        }
    }

    fn make_row(tools: &[&str]) -> InteractionRow {
        InteractionRow {
            id: "int_1".to_string(),
            session_id: Some("sess_1".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 11, 2, 10, 0, 0).unwrap(),
            label: "Main".to_string(),
            delegated: false,
            model: Some("claude-haiku-4-5".to_string()),
            baseline_model: None,
            cost: Some("0.25".to_string()),
            savings: CostSavings {
                percent: Some(75.0),
                toon_tokens_saved: 0,
                effective_baseline_cost: "1.00".to_string(),
            },
            toon_skip_reason: None,
            last_user_message: Some("Fix the flaky integration test".to_string()),
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn header_contains_title_and_totals() {
        let output = render_session_header(&make_header(), false);
        assert!(output.contains("Fix the flaky integration test"));
        assert!(output.contains("45"));
        assert!(output.contains("1.2K in / 300 out"));
        assert!(output.contains("$7.77 (saved $1.23, baseline $9.00)"));
        assert!(output.contains("Claude Code · dev"));
        assert!(output.contains("int_abc"));
    }

    #[test]
    fn header_without_title_falls_back_to_generic_label() {
        let mut header = make_header();
        header.title = None;
        let output = render_session_header(&header, false);
        assert!(output.contains("Session"));
    }

    #[test]
    fn page_scoped_totals_are_labeled_partial() {
        let mut header = make_header();
        header.page_scoped = true;
        let output = render_session_header(&header, false);
        assert!(output.contains("(this page only)"));
    }

    #[test]
    fn row_contains_cost_with_savings_percent() {
        let output = render_rows(&[make_row(&[])], false);
        assert!(output.contains("$0.25 (75% saved)"));
        assert!(output.contains("Fix the flaky integration test"));
    }

    #[test]
    fn row_without_percent_shows_dash_not_zero() {
        let mut row = make_row(&[]);
        row.savings.percent = None;
        let output = render_rows(&[row], false);
        assert!(output.contains("(— saved)"));
        assert!(!output.contains("0%"));
    }

    #[test]
    fn tool_overflow_is_collapsed() {
        let output = render_rows(&[make_row(&["Bash", "Read", "Edit", "Glob"])], false);
        assert!(output.contains("Bash, Read +2"));
        assert!(!output.contains("Edit"));
    }

    #[test]
    fn two_tools_have_no_overflow_suffix() {
        let output = render_rows(&[make_row(&["Bash", "Read"])], false);
        assert!(output.contains("Bash, Read"));
        assert!(!output.contains('+'));
    }

    #[test]
    fn long_message_is_truncated() {
        let mut row = make_row(&[]);
        row.last_user_message = Some("x".repeat(120));
        let output = render_rows(&[row], false);
        assert!(output.contains(&format!("{}...", "x".repeat(80))));
        assert!(!output.contains(&"x".repeat(81)));
    }

    #[test]
    fn skip_reason_gets_its_own_line() {
        let mut row = make_row(&[]);
        row.toon_skip_reason = Some("payload_too_small".to_string());
        let output = render_rows(&[row], false);
        assert!(output.contains("payload_too_small"));
    }

    #[test]
    fn empty_page_has_a_placeholder() {
        let output = render_rows(&[], false);
        assert!(output.contains("No interactions"));
    }

    #[test]
    fn footer_shows_range_and_page() {
        let window = compute_window(2, 20, 45);
        let footer = render_pagination(&window, 45, 20, false).unwrap();
        assert!(footer.contains("Showing 41 to 45 of 45 requests"));
        assert!(footer.contains("Page 3 of 3"));
    }

    #[test]
    fn footer_suppressed_when_single_page() {
        let window = compute_window(0, 20, 12);
        assert_eq!(render_pagination(&window, 12, 20, false), None);
    }

    #[test]
    fn no_ansi_when_color_false() {
        let output = render_session_header(&make_header(), false);
        assert!(!output.contains('\x1b'), "output should not contain ANSI codes");
    }
}
