//! Value type for lamina
//!
//! The engine stores values without interpreting them. `Value` restricts the
//! payload to UTF-8 strings; equality is bytewise. Multi-versioning happens
//! one level up, in the concurrency crate's version records, so `Value`
//! itself carries no transaction metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque value payload
///
/// Values compare bytewise and are never coerced or parsed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value(String);

impl Value {
    /// Create a value from anything string-like
    pub fn new(raw: impl Into<String>) -> Self {
        Value(raw.into())
    }

    /// View the value as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value, yielding the underlying string
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length of the payload in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
