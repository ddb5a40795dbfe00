//! Array-shaped document helpers

use serde_json::Value;

use super::ExtractError;

/// Returns true iff the trimmed text starts with `[`.
#[must_use]
pub fn is_json_array(text: &str) -> bool {
    text.trim_start().starts_with('[')
}

/// For array-shaped text, returns the first element re-serialized as text;
/// non-array text is returned unchanged, treated as already being a scalar
/// or object.
///
/// # Errors
///
/// `Parse` when array-shaped text is malformed, `PathNotFound` when the
/// array is empty.
pub fn first_element(text: &str) -> Result<String, ExtractError> {
    if !is_json_array(text) {
        return Ok(text.to_string());
    }

    let root: Value = serde_json::from_str(text.trim())?;
    let first = root.get(0).ok_or_else(|| ExtractError::PathNotFound {
        path: "[0]".to_string(),
    })?;
    serde_json::to_string(first).map_err(ExtractError::Parse)
}
