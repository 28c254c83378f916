//! Structured-response parsing for free-text generation output.
//!
//! The generation service returns free-form text that is expected to
//! contain a JSON array or object, but may wrap it in code fences, prose,
//! or truncate it with trailing commas. Parsing is a soft operation:
//! failure yields an empty result, never an error. Callers treat an empty
//! result as "no usable candidates this round".
//!
//! Strategy:
//! 1. Strip code-fence markers.
//! 2. Slice between the first `[` and last `]` (resp. `{` / `}`).
//! 3. Strict parse.
//! 4. On failure, one repair pass removing trailing commas before a
//!    closing bracket, then reparse.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Extract a JSON array of values from raw model output.
///
/// Returns an empty vec when no array can be recovered.
pub fn extract_json_array(raw: &str) -> Vec<Value> {
    let cleaned = strip_code_fences(raw);

    let Some(slice) = slice_between(&cleaned, '[', ']') else {
        debug!("no array delimiters in generation output");
        return Vec::new();
    };

    match parse_with_repair(slice) {
        Some(Value::Array(items)) => items,
        Some(_) => Vec::new(),
        None => {
            debug!(len = slice.len(), "array slice unparsable after repair");
            Vec::new()
        }
    }
}

/// Extract a single JSON object from raw model output.
///
/// Returns `None` when no object can be recovered.
pub fn extract_json_object(raw: &str) -> Option<Value> {
    let cleaned = strip_code_fences(raw);
    let slice = slice_between(&cleaned, '{', '}')?;

    match parse_with_repair(slice) {
        Some(value @ Value::Object(_)) => Some(value),
        _ => {
            debug!(len = slice.len(), "object slice unparsable after repair");
            None
        }
    }
}

/// Decode an array of raw values into typed records, dropping any value
/// that does not satisfy the record's shape.
///
/// This is the schema-validation step over parsed JSON: records missing
/// required fields fail deserialization individually and are discarded
/// rather than poisoning the batch.
pub fn decode_records<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if decoded.len() < total {
        debug!(
            dropped = total - decoded.len(),
            kept = decoded.len(),
            "dropped records failing schema validation"
        );
    }

    decoded
}

/// Parse raw output straight into typed records (array extraction + decode).
pub fn parse_records<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    decode_records(extract_json_array(raw))
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "")
}

fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_with_repair(slice: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(slice) {
        return Some(value);
    }
    serde_json::from_str(&remove_trailing_commas(slice)).ok()
}

/// Remove commas that sit (modulo whitespace) immediately before a closing
/// `]` or `}`. String contents are respected.
fn remove_trailing_commas(slice: &str) -> String {
    let mut out = String::with_capacity(slice.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in slice.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ']' | '}' => {
                // Drop a pending comma separated only by whitespace
                let trimmed_len = out.trim_end().len();
                if out[..trimmed_len].ends_with(',') {
                    out.truncate(trimmed_len - 1);
                }
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    out
}
