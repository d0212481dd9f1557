//! Per-unit-of-work ambient inputs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read access to the session/identity object attached to a unit of work.
///
/// Implemented by the surrounding application; a lookup that performs I/O
/// should absorb its own failures and return `None`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session value by key.
    async fn get(&self, key: &str) -> Option<serde_json::Value>;
}

/// The ambient inputs a unit of work makes available to resolvers.
///
/// Captured once when the unit of work begins and owned by its context.
/// Background jobs and console invocations use [`RequestFacts::empty`];
/// resolvers treat each missing input as "unknown" rather than an error.
#[derive(Clone, Default)]
pub struct RequestFacts {
    host: Option<String>,
    /// Keys stored lowercased; lookup is ASCII case-insensitive.
    headers: HashMap<String, String>,
    session: Option<Arc<dyn SessionStore>>,
}

impl RequestFacts {
    /// Facts for a unit of work with no ambient request (job, console).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the request host (with or without a port).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Attach the session store for this unit of work.
    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// The request host, if any.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The session store, if the unit of work has one.
    pub fn session(&self) -> Option<&Arc<dyn SessionStore>> {
        self.session.as_ref()
    }
}

impl fmt::Debug for RequestFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFacts")
            .field("host", &self.host)
            .field("headers", &self.headers)
            .field("session", &self.session.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let facts = RequestFacts::empty().with_header("X-Tenant", "7");
        assert_eq!(facts.header("x-tenant"), Some("7"));
        assert_eq!(facts.header("X-TENANT"), Some("7"));
        assert_eq!(facts.header("X-Other"), None);
    }

    #[test]
    fn empty_facts_have_nothing() {
        let facts = RequestFacts::empty();
        assert_eq!(facts.host(), None);
        assert_eq!(facts.header("x-tenant"), None);
        assert!(facts.session().is_none());
    }
}
