//! Structured-record extraction from free-text model replies.
//!
//! Models asked to "return JSON only" still wrap the object in prose or code fences. The
//! normalizer locates the object, parses it and back-fills every field in
//! [`MEDICINE_FIELDS`](crate::constants::MEDICINE_FIELDS) that the model left out. It never
//! fails: anything it cannot parse comes back as [`NormalizedResponse::Unparsed`] carrying the
//! trimmed reply.

use crate::constants::MEDICINE_FIELDS;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

const FENCE: &str = "```";

/// How the JSON object is located inside the reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Span from the first `{` to the last `}`.
    #[default]
    OuterBraces,
    /// First complete top-level object, found by counting braces outside string literals.
    Balanced,
}

impl FromStr for ExtractionStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outer" => Ok(ExtractionStrategy::OuterBraces),
            "balanced" => Ok(ExtractionStrategy::Balanced),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown extraction strategy {other:?} (expected \"outer\" or \"balanced\")"
            ))),
        }
    }
}

/// Outcome of normalizing a model reply.
///
/// Serializes as `{"parsed": true, "data": {...}}` or `{"parsed": false, "raw": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "NormalizedBody", try_from = "NormalizedBody")]
pub enum NormalizedResponse {
    Parsed(Map<String, Value>),
    Unparsed(String),
}

impl NormalizedResponse {
    pub fn is_parsed(&self) -> bool {
        matches!(self, NormalizedResponse::Parsed(_))
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            NormalizedResponse::Parsed(data) => Some(data),
            NormalizedResponse::Unparsed(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            NormalizedResponse::Parsed(_) => None,
            NormalizedResponse::Unparsed(raw) => Some(raw),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct NormalizedBody {
    parsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl From<NormalizedResponse> for NormalizedBody {
    fn from(value: NormalizedResponse) -> Self {
        match value {
            NormalizedResponse::Parsed(data) => NormalizedBody {
                parsed: true,
                data: Some(data),
                raw: None,
            },
            NormalizedResponse::Unparsed(raw) => NormalizedBody {
                parsed: false,
                data: None,
                raw: Some(raw),
            },
        }
    }
}

impl TryFrom<NormalizedBody> for NormalizedResponse {
    type Error = String;

    fn try_from(body: NormalizedBody) -> Result<Self, Self::Error> {
        match (body.parsed, body.data, body.raw) {
            (true, Some(data), _) => Ok(NormalizedResponse::Parsed(data)),
            (false, _, Some(raw)) => Ok(NormalizedResponse::Unparsed(raw)),
            (true, None, _) => Err("parsed response is missing `data`".into()),
            (false, _, None) => Err("unparsed response is missing `raw`".into()),
        }
    }
}

/// Normalize a reply with the default [`ExtractionStrategy::OuterBraces`].
pub fn normalize(reply: &str) -> NormalizedResponse {
    normalize_with(reply, ExtractionStrategy::default())
}

/// Normalize a reply using the given extraction strategy.
pub fn normalize_with(reply: &str, strategy: ExtractionStrategy) -> NormalizedResponse {
    let trimmed = reply.trim();

    match extract_object(trimmed, strategy) {
        Some(mut data) => {
            complete_record(&mut data);
            NormalizedResponse::Parsed(data)
        }
        None => NormalizedResponse::Unparsed(trimmed.to_string()),
    }
}

fn extract_object(text: &str, strategy: ExtractionStrategy) -> Option<Map<String, Value>> {
    let body = strip_fence(text);
    let span = match strategy {
        ExtractionStrategy::OuterBraces => outer_brace_span(body),
        ExtractionStrategy::Balanced => balanced_object_span(body),
    }?;

    match serde_json::from_str::<Value>(span) {
        // An empty object carries nothing worth showing.
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("model reply did not contain valid JSON: {}", e);
            None
        }
    }
}

/// Drop code-fence backticks and the language tag line that follows an opening fence.
fn strip_fence(text: &str) -> &str {
    if !text.starts_with(FENCE) {
        return text;
    }

    let unfenced = text.trim_matches('`');
    match unfenced.split_once('\n') {
        Some((_tag, rest)) => rest,
        None => unfenced,
    }
}

fn outer_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Insert an empty string for every expected field the model omitted.
fn complete_record(data: &mut Map<String, Value>) {
    for field in MEDICINE_FIELDS {
        data.entry(field)
            .or_insert_with(|| Value::String(String::new()));
    }
}
