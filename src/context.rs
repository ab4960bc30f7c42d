//! Rendering context handed over by the host for one render pass.
//!
//! The router reads two things from it: the first positional data value (the
//! template source path) and the subject, which becomes the target of every
//! emitted event. Neither is ever mutated.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subject and positional data of a render event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Object being rendered (typically the view); forwarded as event target.
    pub subject: Value,

    /// Positional event data. Index 0 holds the template source path.
    #[serde(default)]
    pub data: Vec<Value>,
}

impl RenderContext {
    pub fn new(subject: Value, data: Vec<Value>) -> Self {
        Self { subject, data }
    }

    /// Context whose only positional value is the template source path.
    pub fn for_template(subject: Value, source_path: impl Into<String>) -> Self {
        Self::new(subject, vec![Value::String(source_path.into())])
    }

    /// Template source path, if the first positional value is a string.
    pub fn source_path(&self) -> Option<&str> {
        self.data.first().and_then(Value::as_str)
    }

    /// Like [`source_path`](Self::source_path) but fails on a malformed context.
    pub fn require_source_path(&self) -> Result<&str> {
        match self.data.first() {
            Some(Value::String(path)) => Ok(path.as_str()),
            Some(other) => Err(Error::validation(format!(
                "Render source path must be a string, got {}",
                other
            ))),
            None => Err(Error::validation("Render context has no source path")),
        }
    }
}
