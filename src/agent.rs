//! Structured "agent" replies: the model is asked to answer inside a small
//! JSON envelope, which is then recovered from whatever prose surrounds it.

use serde::{Deserialize, Serialize};

const DEFAULT_RESPONSE: &str = "I'm here to help.";

fn default_kind() -> String {
    "inquiry".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

fn default_priority() -> String {
    "low".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMeta {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl Default for ReplyMeta {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            category: default_category(),
            priority: default_priority(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredReply {
    pub response: String,
    pub meta: ReplyMeta,
}

#[derive(Deserialize)]
struct Envelope {
    response: Option<String>,
    #[serde(default)]
    meta: Option<ReplyMeta>,
}

/// Instruction wrapper asking the model to classify the message and answer
/// inside a strict JSON envelope.
pub fn agent_prompt(message: &str) -> String {
    format!(
        "The following is a message from a user on our Community Empowering platform.\n\
         \n\
         Analyze the message and provide:\n\
         1. A helpful response.\n\
         2. Categorize it (complaint, inquiry, feedback, or greeting).\n\
         3. Identify the specific category (education, health, finance, etc.).\n\
         4. Determine the priority (high, medium, low).\n\
         \n\
         User Message: {}\n\
         \n\
         Format your output EXACTLY as a JSON object:\n\
         {{\n\
             \"response\": \"your helpful response message here\",\n\
             \"meta\": {{\n\
                 \"type\": \"the type here\",\n\
                 \"category\": \"the category here\",\n\
                 \"priority\": \"the priority here\"\n\
             }}\n\
         }}",
        message
    )
}

/// Recover the structured envelope from a raw model reply. Candidate object
/// spans are located with a string-aware balanced-brace scan and tried in
/// order; a span that does not parse advances to the next candidate instead
/// of being guessed at. With no parseable object, the whole reply becomes
/// the response with default metadata. Never fails.
pub fn extract_structured(raw: &str) -> StructuredReply {
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = balanced_object_end(bytes, i) {
                if let Ok(envelope) = serde_json::from_str::<Envelope>(&raw[i..=end]) {
                    return StructuredReply {
                        response: envelope
                            .response
                            .unwrap_or_else(|| DEFAULT_RESPONSE.to_string()),
                        meta: envelope.meta.unwrap_or_default(),
                    };
                }
            }
        }
        i += 1;
    }

    StructuredReply {
        response: raw.to_string(),
        meta: ReplyMeta::default(),
    }
}

/// Index of the brace closing the object opened at `start`, tracking string
/// literals and escapes so braces inside quoted text do not count.
fn balanced_object_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_envelope_embedded_in_prose() {
        let raw = "Intro: {\"response\":\"hi\",\"meta\":{\"type\":\"greeting\",\"category\":\"general\",\"priority\":\"low\"}} trailing";
        let reply = extract_structured(raw);

        assert_eq!(reply.response, "hi");
        assert_eq!(reply.meta.kind, "greeting");
        assert_eq!(reply.meta.category, "general");
        assert_eq!(reply.meta.priority, "low");
    }

    #[test]
    fn plain_text_becomes_response_with_default_meta() {
        let raw = "Here is some advice without any structure.";
        let reply = extract_structured(raw);

        assert_eq!(reply.response, raw);
        assert_eq!(reply.meta, ReplyMeta::default());
        assert_eq!(reply.meta.kind, "inquiry");
        assert_eq!(reply.meta.category, "general");
        assert_eq!(reply.meta.priority, "low");
    }

    #[test]
    fn missing_meta_fields_take_defaults() {
        let raw = r#"{"response":"ok","meta":{"type":"complaint"}}"#;
        let reply = extract_structured(raw);

        assert_eq!(reply.response, "ok");
        assert_eq!(reply.meta.kind, "complaint");
        assert_eq!(reply.meta.category, "general");
        assert_eq!(reply.meta.priority, "low");
    }

    #[test]
    fn missing_response_uses_help_line() {
        let raw = r#"{"meta":{"type":"feedback","category":"health","priority":"high"}}"#;
        let reply = extract_structured(raw);

        assert_eq!(reply.response, "I'm here to help.");
        assert_eq!(reply.meta.priority, "high");
    }

    #[test]
    fn unparseable_span_advances_to_next_candidate() {
        let raw = r#"set {a: b} then {"response":"found it"} done"#;
        let reply = extract_structured(raw);

        assert_eq!(reply.response, "found it");
    }

    #[test]
    fn braces_inside_strings_do_not_truncate() {
        let raw = r#"{"response":"use {curly} braces","meta":{"type":"inquiry"}}"#;
        let reply = extract_structured(raw);

        assert_eq!(reply.response, "use {curly} braces");
        assert_eq!(reply.meta.kind, "inquiry");
    }

    #[test]
    fn unterminated_object_falls_back_to_raw_text() {
        let raw = r#"truncated {"response":"lost"#;
        let reply = extract_structured(raw);

        assert_eq!(reply.response, raw);
        assert_eq!(reply.meta, ReplyMeta::default());
    }

    #[test]
    fn agent_prompt_embeds_message_and_envelope_shape() {
        let prompt = agent_prompt("water supply issue");
        assert!(prompt.contains("User Message: water supply issue"));
        assert!(prompt.contains("\"response\""));
        assert!(prompt.contains("\"priority\""));
    }
}
