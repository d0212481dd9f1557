//! Header-based tenant resolution.

use async_trait::async_trait;
use warden_core::TenantId;

use crate::request::RequestFacts;
use crate::resolver::Resolver;

/// Reads a configured request header.
///
/// The value is untrusted client input: only a well-formed positive
/// integer is accepted (see [`TenantId::parse_header`]). Deployments that
/// put a signed token in the header instead plug in their own [`Resolver`].
pub struct HeaderResolver {
    header: String,
}

impl HeaderResolver {
    /// Create a resolver reading the `header` request header.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

#[async_trait]
impl Resolver for HeaderResolver {
    fn name(&self) -> &'static str {
        "header"
    }

    async fn resolve(&self, facts: &RequestFacts) -> Option<TenantId> {
        let value = facts.header(&self.header)?;
        let tenant = TenantId::parse_header(value);
        if tenant.is_none() {
            tracing::debug!(header = %self.header, "rejected malformed tenant header");
        }
        tenant
    }
}
