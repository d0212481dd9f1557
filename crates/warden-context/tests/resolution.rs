//! End-to-end resolution: configured chain + stock strategies + context.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use warden_context::{
    DomainDirectory, RequestFacts, ResolverChain, SessionStore, TenantContext,
};
use warden_core::{ResolverConfig, TenantId};

struct MapSession(HashMap<String, serde_json::Value>);

#[async_trait]
impl SessionStore for MapSession {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.0.get(key).cloned()
    }
}

struct MapDirectory {
    domains: HashMap<String, TenantId>,
    lookups: AtomicUsize,
}

impl MapDirectory {
    fn new(domains: HashMap<String, TenantId>) -> Arc<Self> {
        Arc::new(Self {
            domains,
            lookups: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DomainDirectory for MapDirectory {
    async fn tenant_for_domain(&self, domain: &str) -> anyhow::Result<Option<TenantId>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.domains.get(domain).cloned())
    }
}

fn stock_chain(directory: Arc<MapDirectory>) -> Arc<ResolverChain> {
    Arc::new(ResolverChain::from_config(
        &ResolverConfig::default(),
        directory,
    ))
}

#[tokio::test]
async fn session_beats_domain_and_header() {
    let directory = MapDirectory::new(HashMap::from([(
        "acme.example.com".to_string(),
        TenantId::Int(2),
    )]));
    let facts = RequestFacts::empty()
        .with_host("acme.example.com")
        .with_header("X-Tenant", "3")
        .with_session(Arc::new(MapSession(HashMap::from([(
            "tenant_id".to_string(),
            serde_json::json!(1),
        )]))));

    let ctx = TenantContext::new(stock_chain(directory.clone()), facts);

    assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(1)));
    // The domain strategy never ran: the session answered first.
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn falls_through_to_domain_then_header() {
    let directory = MapDirectory::new(HashMap::from([(
        "acme.example.com".to_string(),
        TenantId::Int(2),
    )]));

    // No session: the domain strategy answers.
    let facts = RequestFacts::empty()
        .with_host("acme.example.com")
        .with_header("X-Tenant", "3");
    let ctx = TenantContext::new(stock_chain(directory.clone()), facts);
    assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(2)));

    // Unknown host as well: the header is the last resort.
    let facts = RequestFacts::empty()
        .with_host("unknown.example.com")
        .with_header("X-Tenant", "3");
    let ctx = TenantContext::new(stock_chain(directory), facts);
    assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(3)));
}

#[tokio::test]
async fn background_unit_of_work_resolves_to_no_tenant() {
    let directory = MapDirectory::new(HashMap::new());
    let ctx = TenantContext::detached(stock_chain(directory.clone()));

    assert_eq!(ctx.get_identifier().await, None);
    assert!(!ctx.has_tenant().await);
    // No ambient host, so the directory was never consulted.
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolution_outcome_is_cached_for_the_unit_of_work() {
    let directory = MapDirectory::new(HashMap::from([(
        "acme.example.com".to_string(),
        TenantId::Int(2),
    )]));
    let facts = RequestFacts::empty().with_host("acme.example.com");
    let ctx = TenantContext::new(stock_chain(directory.clone()), facts);

    for _ in 0..5 {
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(2)));
    }
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn two_units_of_work_are_independent() {
    let directory = MapDirectory::new(HashMap::from([
        ("acme.example.com".to_string(), TenantId::Int(1)),
        ("globex.example.com".to_string(), TenantId::Int(2)),
    ]));
    let chain = stock_chain(directory);

    let ctx_a = TenantContext::new(
        chain.clone(),
        RequestFacts::empty().with_host("acme.example.com"),
    );
    let ctx_b = TenantContext::new(
        chain,
        RequestFacts::empty().with_host("globex.example.com"),
    );

    assert_eq!(ctx_a.get_identifier().await, Some(TenantId::Int(1)));
    assert_eq!(ctx_b.get_identifier().await, Some(TenantId::Int(2)));
    // Overriding one context is invisible to the other.
    ctx_a.set_identifier(None);
    assert_eq!(ctx_b.get_identifier().await, Some(TenantId::Int(2)));
}
