//! Parse model replies into extraction records

use crate::error::ExtractorError;
use ipovc_domain::{ExtractionRecord, Field};
use serde_json::Value;
use tracing::warn;

/// Parse a model reply into a record
///
/// Every field starts blank; each label present in the reply fills its
/// field. Strings are trimmed, numbers and booleans are stringified, and
/// `null` or missing keys stay empty.
pub fn parse_llm_response(response: &str) -> Result<ExtractionRecord, ExtractorError> {
    let json_str = extract_json(response);
    let json: Value = serde_json::from_str(json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    let mut record = ExtractionRecord::blank();
    for field in Field::ALL {
        match obj.get(field.label()) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => record.set(field, s.trim()),
            Some(Value::Number(n)) => record.set(field, n.to_string()),
            Some(Value::Bool(b)) => record.set(field, if *b { "1" } else { "0" }),
            Some(other) => {
                warn!(field = field.label(), value = %other, "Ignoring non-scalar field value");
            }
        }
    }

    Ok(record)
}

/// Strip a surrounding markdown code fence, if any
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };

    let inner = inner.trim();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
