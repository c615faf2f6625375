//! Decision table for pulling tale text out of a backend response.
//!
//! | Response shape            | Object considered |
//! |---------------------------|-------------------|
//! | object                    | the object        |
//! | non-empty list            | first element     |
//! | empty list / anything else| none: invalid     |
//!
//! Within the object the fields in [`TEXT_FIELDS`] are probed in order and
//! the first non-blank string wins. Nothing else is guessed.

use serde_json::Value;
use storyloom_core::generator::GenerationError;

/// Fields that may hold the tale text, highest priority first.
pub const TEXT_FIELDS: [&str; 4] = ["taleText", "story", "text", "output"];

/// Extracts the tale text from a parsed response body.
///
/// # Errors
///
/// Returns `GenerationError::InvalidResponse` if the shape is outside the
/// table or no field holds a non-blank string.
pub fn extract_tale_text(response: &Value) -> Result<String, GenerationError> {
    let candidate = match response {
        Value::Array(items) => items.first().ok_or_else(|| {
            GenerationError::InvalidResponse("response is an empty list".into())
        })?,
        other => other,
    };

    let Value::Object(fields) = candidate else {
        return Err(GenerationError::InvalidResponse(
            "response is not a JSON object".into(),
        ));
    };

    TEXT_FIELDS
        .iter()
        .find_map(|name| {
            fields
                .get(*name)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
        })
        .map(str::to_owned)
        .ok_or_else(|| {
            GenerationError::InvalidResponse(format!(
                "none of {TEXT_FIELDS:?} holds tale text"
            ))
        })
}
