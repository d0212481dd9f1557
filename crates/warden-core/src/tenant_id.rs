//! The tenant identifier value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, comparable tenant identifier.
///
/// Deployments key tenants either by an integer surrogate or by a string
/// slug/UUID; both are carried verbatim. Immutable once resolved within a
/// unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TenantId {
    Int(i64),
    Str(String),
}

impl TenantId {
    /// Parse a client-supplied header value into a tenant identifier.
    ///
    /// Accepts only a well-formed positive integer: ASCII digits with no
    /// sign and no surrounding whitespace, within `i64` range, parsing to
    /// a value greater than zero. Anything else returns `None`. Header
    /// values are untrusted input and are validated before being believed.
    pub fn parse_header(value: &str) -> Option<TenantId> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match value.parse::<i64>() {
            Ok(n) if n > 0 => Some(TenantId::Int(n)),
            _ => None,
        }
    }

    /// Interpret a loosely-typed value (e.g. a session field) as a tenant
    /// identifier. Integers and non-empty strings are accepted.
    pub fn from_value(value: &serde_json::Value) -> Option<TenantId> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(TenantId::Int),
            serde_json::Value::String(s) if !s.is_empty() => Some(TenantId::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantId::Int(n) => write!(f, "{}", n),
            TenantId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TenantId {
    fn from(n: i64) -> Self {
        TenantId::Int(n)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId::Str(s.to_string())
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        TenantId::Str(s)
    }
}

impl From<TenantId> for serde_json::Value {
    fn from(id: TenantId) -> Self {
        match id {
            TenantId::Int(n) => n.into(),
            TenantId::Str(s) => s.into(),
        }
    }
}

impl From<&TenantId> for serde_json::Value {
    fn from(id: &TenantId) -> Self {
        id.clone().into()
    }
}
