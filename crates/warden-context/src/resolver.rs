//! The resolver contract and the ordered strategy chain.

use async_trait::async_trait;
use std::sync::Arc;
use warden_core::{ResolverConfig, ResolverKind, TenantId};

use crate::request::RequestFacts;
use crate::resolvers::{DomainDirectory, DomainResolver, HeaderResolver, SessionResolver};

/// A strategy that attempts to determine the current tenant from some
/// ambient signal.
///
/// Implementations must not panic and must not propagate errors: a failed
/// or inapplicable attempt is `None`, so one failing strategy never blocks
/// a later one. A resolver whose required input is absent from `facts`
/// (no request host, no session) returns `None` immediately.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Short strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Attempt to identify the tenant for the unit of work described by
    /// `facts`.
    async fn resolve(&self, facts: &RequestFacts) -> Option<TenantId>;
}

/// An ordered, immutable sequence of resolvers.
///
/// Tries each in order and returns the first identifier produced, without
/// invoking later resolvers. Ordering is part of the contract, not an
/// optimization: later strategies may perform network or database I/O
/// that must not run once an earlier strategy has answered.
///
/// Holds no mutable state; a single chain is safely shared across
/// concurrently running units of work.
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolverChain {
    /// Build a chain from an explicit resolver list.
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// Build the stock chain from configuration.
    ///
    /// An empty configured order falls back to the default order:
    /// session, then domain, then header.
    pub fn from_config(config: &ResolverConfig, directory: Arc<dyn DomainDirectory>) -> Self {
        let resolvers = config
            .effective_order()
            .into_iter()
            .map(|kind| -> Arc<dyn Resolver> {
                match kind {
                    ResolverKind::Session => {
                        Arc::new(SessionResolver::new(config.session_key.clone()))
                    }
                    ResolverKind::Domain => Arc::new(DomainResolver::new(directory.clone())),
                    ResolverKind::Header => Arc::new(HeaderResolver::new(config.header.clone())),
                }
            })
            .collect();
        Self { resolvers }
    }

    /// Number of strategies in the chain.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether the chain has no strategies.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

#[async_trait]
impl Resolver for ResolverChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn resolve(&self, facts: &RequestFacts) -> Option<TenantId> {
        for resolver in &self.resolvers {
            if let Some(tenant) = resolver.resolve(facts).await {
                tracing::debug!(resolver = resolver.name(), %tenant, "tenant identified");
                return Some(tenant);
            }
            tracing::trace!(resolver = resolver.name(), "no tenant from resolver");
        }
        None
    }
}
