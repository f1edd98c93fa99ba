use serde_json::Value;

/// One normalized entry of a conversational transcript.
///
/// Raw payloads vary by producing agent (Anthropic-style content blocks,
/// OpenAI-style `tool_calls`, bare strings). Normalization funnels all of
/// them into this closed shape so extraction can match exhaustively instead
/// of probing optional keys.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    UserText(String),
    AssistantText(String),
    ToolCall { name: String },
    ToolResult { name: Option<String> },
}

/// Fields derived from a raw payload for one interaction row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedMessage {
    pub last_user_message: Option<String>,
    /// De-duplicated, first-seen order. Empty when no tools were used.
    pub tool_names_used: Vec<String>,
}

/// Derive the per-row display fields from an interaction's raw payload.
///
/// Total over any input: a missing, empty or mistyped payload yields
/// `(None, [])` rather than an error, so one malformed record never takes
/// down a whole page.
pub fn extract(payload: Option<&Value>) -> ExtractedMessage {
    let entries = normalize_transcript(payload);

    let last_user_message = entries.iter().rev().find_map(|e| match e {
        TranscriptEntry::UserText(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    });

    let mut tool_names_used: Vec<String> = Vec::new();
    for entry in &entries {
        let name = match entry {
            TranscriptEntry::ToolCall { name } => Some(name.as_str()),
            TranscriptEntry::ToolResult { name: Some(name) } => Some(name.as_str()),
            _ => None,
        };
        if let Some(name) = name {
            if !name.is_empty() && !tool_names_used.iter().any(|n| n == name) {
                tool_names_used.push(name.to_string());
            }
        }
    }

    ExtractedMessage {
        last_user_message,
        tool_names_used,
    }
}

/// Normalize a raw payload into transcript entries, in transcript order.
///
/// Accepted top-level shapes: `{"messages": [...]}` or a bare message array.
/// Anything else normalizes to an empty transcript.
pub fn normalize_transcript(payload: Option<&Value>) -> Vec<TranscriptEntry> {
    let messages = match payload {
        Some(Value::Object(obj)) => obj.get("messages").and_then(Value::as_array),
        Some(Value::Array(arr)) => Some(arr),
        _ => None,
    };
    let Some(messages) = messages else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for message in messages {
        normalize_message(message, &mut entries);
    }
    entries
}

fn normalize_message(message: &Value, entries: &mut Vec<TranscriptEntry>) {
    let Some(obj) = message.as_object() else {
        return;
    };
    let role = obj.get("role").and_then(Value::as_str).unwrap_or("");

    // OpenAI request side: a "tool" message carries one tool result.
    if role == "tool" {
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(|s| s.to_string());
        entries.push(TranscriptEntry::ToolResult { name });
        return;
    }

    match obj.get("content") {
        Some(Value::String(text)) => push_text(role, text, entries),
        Some(Value::Array(blocks)) => {
            // Text blocks of one message flatten into a single entry; tool
            // blocks follow it so first-seen tool order tracks the transcript.
            let text_parts: Vec<&str> = blocks
                .iter()
                .filter_map(|b| b.as_object())
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            if !text_parts.is_empty() {
                push_text(role, &text_parts.join("\n"), entries);
            }
            for block in blocks {
                let Some(block) = block.as_object() else {
                    continue;
                };
                match block.get("type").and_then(Value::as_str) {
                    Some("tool_use") | Some("tool_call") => {
                        if let Some(name) = block.get("name").and_then(Value::as_str) {
                            entries.push(TranscriptEntry::ToolCall {
                                name: name.to_string(),
                            });
                        }
                    }
                    Some("tool_result") => {
                        let name = block
                            .get("name")
                            .and_then(Value::as_str)
                            .map(|s| s.to_string());
                        entries.push(TranscriptEntry::ToolResult { name });
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    // OpenAI response side: assistant messages may carry tool_calls alongside
    // (or instead of) content.
    if let Some(calls) = obj.get("tool_calls").and_then(Value::as_array) {
        for call in calls {
            let name = call
                .get("function")
                .and_then(|f| f.get("name"))
                .or_else(|| call.get("name"))
                .and_then(Value::as_str);
            if let Some(name) = name {
                entries.push(TranscriptEntry::ToolCall {
                    name: name.to_string(),
                });
            }
        }
    }
}

fn push_text(role: &str, text: &str, entries: &mut Vec<TranscriptEntry>) {
    match role {
        "user" => entries.push(TranscriptEntry::UserText(text.to_string())),
        "assistant" => entries.push(TranscriptEntry::AssistantText(text.to_string())),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_payload_degrades_to_no_data() {
        assert_eq!(extract(None), ExtractedMessage::default());
        assert_eq!(extract(Some(&Value::Null)), ExtractedMessage::default());
        assert_eq!(extract(Some(&json!("not a transcript"))), ExtractedMessage::default());
        assert_eq!(extract(Some(&json!({"messages": []}))), ExtractedMessage::default());
    }

    #[test]
    fn last_user_message_from_string_content() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": "first question"},
                {"role": "assistant", "content": "an answer"},
                {"role": "user", "content": "follow-up question"}
            ]
        });
        let got = extract(Some(&payload));
        assert_eq!(got.last_user_message.as_deref(), Some("follow-up question"));
        assert!(got.tool_names_used.is_empty());
    }

    #[test]
    fn user_content_blocks_are_flattened() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": [
                    {"type": "text", "text": "part one"},
                    {"type": "text", "text": "part two"}
                ]}
            ]
        });
        let got = extract(Some(&payload));
        assert_eq!(got.last_user_message.as_deref(), Some("part one\npart two"));
    }

    #[test]
    fn bare_array_payload_is_accepted() {
        let payload = json!([
            {"role": "user", "content": "hello from a bare array"}
        ]);
        let got = extract(Some(&payload));
        assert_eq!(
            got.last_user_message.as_deref(),
            Some("hello from a bare array")
        );
    }

    #[test]
    fn assistant_only_transcript_has_no_user_message() {
        let payload = json!({
            "messages": [{"role": "assistant", "content": "unsolicited"}]
        });
        assert_eq!(extract(Some(&payload)).last_user_message, None);
    }

    #[test]
    fn whitespace_only_user_content_is_skipped() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": "real message"},
                {"role": "user", "content": "   "}
            ]
        });
        let got = extract(Some(&payload));
        assert_eq!(got.last_user_message.as_deref(), Some("real message"));
    }

    #[test]
    fn tool_names_deduped_in_first_seen_order() {
        let payload = json!({
            "messages": [
                {"role": "assistant", "content": [
                    {"type": "tool_use", "name": "read_file", "input": {}},
                    {"type": "tool_use", "name": "search", "input": {}}
                ]},
                {"role": "user", "content": [
                    {"type": "tool_result", "name": "read_file"}
                ]},
                {"role": "assistant", "content": [
                    {"type": "tool_use", "name": "read_file", "input": {}}
                ]}
            ]
        });
        let got = extract(Some(&payload));
        assert_eq!(got.tool_names_used, vec!["read_file", "search"]);
    }

    #[test]
    fn openai_tool_calls_and_tool_role_are_collected() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": "check the weather"},
                {"role": "assistant", "content": null, "tool_calls": [
                    {"function": {"name": "get_weather", "arguments": "{}"}}
                ]},
                {"role": "tool", "name": "get_weather", "content": "{\"temp\": 12}"}
            ]
        });
        let got = extract(Some(&payload));
        assert_eq!(got.tool_names_used, vec!["get_weather"]);
        assert_eq!(got.last_user_message.as_deref(), Some("check the weather"));
    }

    #[test]
    fn mistyped_fields_degrade_instead_of_failing() {
        let payload = json!({
            "messages": [
                42,
                {"role": 7, "content": "ignored, role is not a string"},
                {"role": "user", "content": {"unexpected": "object"}},
                {"role": "user", "content": [
                    {"type": "tool_use", "name": 9},
                    "not a block",
                    {"type": "text", "text": "still extracted"}
                ]}
            ]
        });
        let got = extract(Some(&payload));
        assert_eq!(got.last_user_message.as_deref(), Some("still extracted"));
        assert!(got.tool_names_used.is_empty());
    }

    #[test]
    fn normalize_produces_tagged_entries_in_order() {
        let payload = json!({
            "messages": [
                {"role": "user", "content": "do a thing"},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "on it"},
                    {"type": "tool_use", "name": "shell", "input": {}}
                ]}
            ]
        });
        let entries = normalize_transcript(Some(&payload));
        assert_eq!(
            entries,
            vec![
                TranscriptEntry::UserText("do a thing".into()),
                TranscriptEntry::AssistantText("on it".into()),
                TranscriptEntry::ToolCall {
                    name: "shell".into()
                },
            ]
        );
    }
}
