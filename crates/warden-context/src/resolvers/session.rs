//! Session-based tenant resolution.

use async_trait::async_trait;
use warden_core::TenantId;

use crate::request::RequestFacts;
use crate::resolver::Resolver;

/// Reads a configured field from the unit of work's session object.
///
/// First in the default chain: an authenticated session is the most
/// specific signal available.
pub struct SessionResolver {
    key: String,
}

impl SessionResolver {
    /// Create a resolver reading `key` from the session.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Resolver for SessionResolver {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn resolve(&self, facts: &RequestFacts) -> Option<TenantId> {
        let session = facts.session()?;
        let value = session.get(&self.key).await?;
        TenantId::from_value(&value)
    }
}
