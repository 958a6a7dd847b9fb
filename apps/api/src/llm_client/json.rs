//! Structured-reply extraction: locate the first JSON object or array in free
//! model text and parse it.

use serde::Serialize;
use serde_json::{Map, Value};

/// A successfully parsed structured reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Structured {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

/// Why a structured reply could not be produced, with the raw text for diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub error: String,
    pub raw_response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsing_error: Option<String>,
}

impl ErrorRecord {
    pub fn call_failed(raw_response: &str) -> Self {
        Self {
            error: "LLM API call failed".to_string(),
            raw_response: raw_response.to_string(),
            parsing_error: None,
        }
    }
}

pub type JsonReply = Result<Structured, ErrorRecord>;

/// Slices from the first `{` or `[` (whichever comes first) to the last
/// matching closer and parses that. Text with neither is parsed whole.
pub fn extract_json(raw: &str) -> JsonReply {
    let text = raw.trim();

    let start = match (text.find('{'), text.find('[')) {
        (Some(brace), Some(bracket)) => Some(brace.min(bracket)),
        (brace, bracket) => brace.or(bracket),
    };

    let candidate = match start {
        Some(start) => {
            let closer = if text[start..].starts_with('{') { '}' } else { ']' };
            match text.rfind(closer) {
                Some(end) if end > start => &text[start..=end],
                _ => "",
            }
        }
        None => text,
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(Structured::Object(map)),
        Ok(Value::Array(items)) => Ok(Structured::Array(items)),
        Ok(other) => Err(ErrorRecord {
            error: "Invalid JSON type".to_string(),
            raw_response: match other {
                Value::String(s) => s,
                other => other.to_string(),
            },
            parsing_error: Some("LLM did not return a JSON object or array as requested.".to_string()),
        }),
        Err(e) => Err(ErrorRecord {
            error: "JSON parsing failed".to_string(),
            raw_response: text.to_string(),
            parsing_error: Some(e.to_string()),
        }),
    }
}
