//! Domain-based tenant resolution.

use async_trait::async_trait;
use std::sync::Arc;
use warden_core::TenantId;

use crate::request::RequestFacts;
use crate::resolver::Resolver;

/// Maps request hosts to tenant identifiers.
///
/// Implemented by the surrounding application, typically backed by a
/// tenant-domains table or a cache in front of one.
#[async_trait]
pub trait DomainDirectory: Send + Sync {
    /// Look up the tenant owning `domain` (host without port).
    async fn tenant_for_domain(&self, domain: &str) -> anyhow::Result<Option<TenantId>>;
}

/// Resolves the tenant from the request host via a [`DomainDirectory`].
///
/// Lookup failures are logged and treated as unknown; the lookup itself may
/// hit tenant-scoped storage, which is safe because an in-flight resolution
/// reads as "no tenant yet" on the owning context.
pub struct DomainResolver {
    directory: Arc<dyn DomainDirectory>,
}

impl DomainResolver {
    /// Create a resolver backed by `directory`.
    pub fn new(directory: Arc<dyn DomainDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Resolver for DomainResolver {
    fn name(&self) -> &'static str {
        "domain"
    }

    async fn resolve(&self, facts: &RequestFacts) -> Option<TenantId> {
        let host = facts.host()?;
        let domain = host.split(':').next().unwrap_or(host);
        if domain.is_empty() {
            return None;
        }

        match self.directory.tenant_for_domain(domain).await {
            Ok(tenant) => tenant,
            Err(error) => {
                tracing::debug!(domain, %error, "domain lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapDirectory(HashMap<String, TenantId>);

    #[async_trait]
    impl DomainDirectory for MapDirectory {
        async fn tenant_for_domain(&self, domain: &str) -> anyhow::Result<Option<TenantId>> {
            Ok(self.0.get(domain).cloned())
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl DomainDirectory for FailingDirectory {
        async fn tenant_for_domain(&self, _domain: &str) -> anyhow::Result<Option<TenantId>> {
            Err(anyhow::anyhow!("directory unavailable"))
        }
    }

    fn directory() -> Arc<MapDirectory> {
        Arc::new(MapDirectory(HashMap::from([(
            "acme.example.com".to_string(),
            TenantId::Int(3),
        )])))
    }

    #[tokio::test]
    async fn resolves_known_host() {
        let resolver = DomainResolver::new(directory());
        let facts = RequestFacts::empty().with_host("acme.example.com");
        assert_eq!(resolver.resolve(&facts).await, Some(TenantId::Int(3)));
    }

    #[tokio::test]
    async fn strips_port_before_lookup() {
        let resolver = DomainResolver::new(directory());
        let facts = RequestFacts::empty().with_host("acme.example.com:8080");
        assert_eq!(resolver.resolve(&facts).await, Some(TenantId::Int(3)));
    }

    #[tokio::test]
    async fn unknown_host_is_unknown() {
        let resolver = DomainResolver::new(directory());
        let facts = RequestFacts::empty().with_host("other.example.com");
        assert_eq!(resolver.resolve(&facts).await, None);
    }

    #[tokio::test]
    async fn no_host_is_unknown() {
        let resolver = DomainResolver::new(directory());
        assert_eq!(resolver.resolve(&RequestFacts::empty()).await, None);
    }

    #[tokio::test]
    async fn lookup_failure_is_unknown_not_an_error() {
        let resolver = DomainResolver::new(Arc::new(FailingDirectory));
        let facts = RequestFacts::empty().with_host("acme.example.com");
        assert_eq!(resolver.resolve(&facts).await, None);
    }
}
