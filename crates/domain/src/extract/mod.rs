//! JSON value extraction
//!
//! A pure, transport-independent extractor: given raw JSON text and a path
//! expression it returns a typed value. Both root shapes are handled — a
//! document starting with `[` is a sequence, anything else a keyed
//! structure — and malformed text always fails loudly.
//!
//! The supported path dialect is deliberately reduced: an optional leading
//! `$`, dot-separated key segments, and chainable `[n]` integer indices
//! (permitted at the very start for array roots, e.g. `[0].name`). No
//! wildcards, filters, slices, or recursive descent.

mod array;
mod path;

pub use array::{first_element, is_json_array};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Failures produced while extracting a value from JSON text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document is not valid JSON.
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The path is syntactically well-formed but selects no node.
    #[error("JSON path '{path}' not found")]
    PathNotFound {
        /// The path that resolved to nothing.
        path: String,
    },

    /// The path expression itself is malformed.
    #[error("invalid JSON path '{path}': {reason}")]
    InvalidPath {
        /// The offending path expression.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The selected node cannot be converted to the requested type.
    #[error("cannot coerce value at '{path}' to {target}: {reason}")]
    Coercion {
        /// The path of the selected node.
        path: String,
        /// The requested target type.
        target: &'static str,
        /// Why the conversion failed.
        reason: String,
    },
}

/// Stateless JSON-path extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    /// Creates an extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Locates the node selected by `path` and returns it as a JSON value.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed documents, `InvalidPath` for malformed path
    /// expressions, `PathNotFound` when the path selects nothing.
    pub fn locate(&self, json: &str, path: &str) -> Result<Value, ExtractError> {
        let root: Value = serde_json::from_str(json.trim())?;
        let segments = path::parse(path)?;
        path::resolve(&root, &segments)
            .cloned()
            .ok_or_else(|| ExtractError::PathNotFound {
                path: path.to_string(),
            })
    }

    /// Extracts the node at `path` coerced into `T`.
    ///
    /// The generic form is strict: the node's JSON shape must match `T`.
    ///
    /// # Errors
    ///
    /// Everything [`locate`](Self::locate) returns, plus `Coercion` when the
    /// node does not deserialize into `T`.
    pub fn extract_value<T: DeserializeOwned>(
        &self,
        json: &str,
        path: &str,
    ) -> Result<T, ExtractError> {
        let node = self.locate(json, path)?;
        serde_json::from_value(node).map_err(|e| ExtractError::Coercion {
            path: path.to_string(),
            target: std::any::type_name::<T>(),
            reason: e.to_string(),
        })
    }

    /// Extracts a string. Numbers and booleans are rendered to text; other
    /// shapes fail.
    ///
    /// # Errors
    ///
    /// See [`locate`](Self::locate); `Coercion` for arrays, objects, null.
    pub fn extract_string(&self, json: &str, path: &str) -> Result<String, ExtractError> {
        match self.locate(json, path)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(coercion_error(path, "string", &other)),
        }
    }

    /// Extracts an integer. Numeric strings are parsed; anything else that
    /// is not a JSON integer fails.
    ///
    /// # Errors
    ///
    /// See [`locate`](Self::locate); `Coercion` for non-integer nodes.
    pub fn extract_int(&self, json: &str, path: &str) -> Result<i64, ExtractError> {
        let node = self.locate(json, path)?;
        match &node {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| coercion_error(path, "integer", &node)),
            Value::String(s) => s
                .parse::<i64>()
                .map_err(|_| coercion_error(path, "integer", &node)),
            _ => Err(coercion_error(path, "integer", &node)),
        }
    }

    /// Extracts a boolean. The strings `"true"` and `"false"` are parsed;
    /// anything else that is not a JSON boolean fails.
    ///
    /// # Errors
    ///
    /// See [`locate`](Self::locate); `Coercion` for non-boolean nodes.
    pub fn extract_bool(&self, json: &str, path: &str) -> Result<bool, ExtractError> {
        let node = self.locate(json, path)?;
        match &node {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => s
                .parse::<bool>()
                .map_err(|_| coercion_error(path, "boolean", &node)),
            _ => Err(coercion_error(path, "boolean", &node)),
        }
    }
}

fn coercion_error(path: &str, target: &'static str, node: &Value) -> ExtractError {
    ExtractError::Coercion {
        path: path.to_string(),
        target,
        reason: format!("found {node}"),
    }
}
