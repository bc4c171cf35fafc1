//! The flat argument map behind every API call.
//!
//! # Design
//! One [`CallArgs`] value feeds both sides of a request: every entry whose
//! name appears as a `:name` token in the path template is substituted into
//! the path, and the whole map — substituted entries included — becomes the
//! JSON request body. The server tolerates the repetition, and some routes
//! rely on the body copy, so both sides are kept in sync by construction.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Named string parameters for a single API call.
///
/// Values are coerced to their string form on insertion, mirroring the wire
/// format: request bodies are JSON objects whose fields are all strings.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    entries: BTreeMap<String, String>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one parameter, coercing the value to its string representation.
    pub fn arg(mut self, name: &str, value: impl ToString) -> Self {
        self.entries.insert(name.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Substitute every `:name` token in `template` that has a matching entry.
    ///
    /// Values are inserted verbatim — no URL-encoding is applied, so values
    /// containing path or query delimiters end up in the URL as-is.
    /// Placeholders without a matching entry are left untouched; a template
    /// that still contains `:name` afterwards is a bug at the call site, not
    /// a checked error.
    pub fn fill_path(&self, template: &str) -> String {
        let mut path = template.to_string();
        for (name, value) in &self.entries {
            let token = format!(":{name}");
            if path.contains(&token) {
                path = path.replace(&token, value);
            }
        }
        path
    }

    /// The JSON request body: one string-valued field per entry.
    ///
    /// Returns `None` for an empty map — such calls are sent without a body
    /// and without a `Content-Type` header.
    pub fn json_body(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let fields: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        Some(Value::Object(fields).to_string())
    }
}
