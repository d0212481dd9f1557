//! The per-unit-of-work tenant context.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use warden_core::TenantId;

use crate::request::RequestFacts;
use crate::resolver::{Resolver, ResolverChain};

/// Errors surfaced at the unit-of-work boundary.
#[derive(Debug, Error)]
pub enum ContextError {
    /// No strategy produced a tenant identifier.
    #[error("tenant could not be resolved for the current unit of work")]
    NotResolved,
}

#[derive(Debug, Default)]
struct State {
    cached: Option<TenantId>,
    resolved: bool,
    resolving: bool,
}

/// Single source of truth for "the current tenant" within one unit of work.
///
/// Resolution runs lazily, at most once, through the injected resolver.
/// While a resolution is in flight, identity reads return `None` instead of
/// re-entering the resolver: resolution strategies frequently query
/// tenant-owned data themselves, and that read must see "no tenant yet"
/// rather than recurse.
///
/// A context belongs to exactly one unit of work. Construct it fresh per
/// request/job/command and drop it at the boundary; the resolver it wraps
/// is the shareable part.
pub struct TenantContext {
    resolver: Arc<dyn Resolver>,
    facts: RequestFacts,
    state: Mutex<State>,
}

impl TenantContext {
    /// Create a context for a unit of work with the given ambient inputs.
    pub fn new(resolver: Arc<dyn Resolver>, facts: RequestFacts) -> Self {
        Self {
            resolver,
            facts,
            state: Mutex::new(State::default()),
        }
    }

    /// Create a context for a unit of work with no ambient request
    /// (queued job, console invocation).
    pub fn detached(resolver: Arc<dyn Resolver>) -> Self {
        Self::new(resolver, RequestFacts::empty())
    }

    /// Create a context pre-resolved to a known tenant, e.g. a job that
    /// carries its tenant in its payload.
    pub fn fixed(tenant: impl Into<TenantId>) -> Self {
        let ctx = Self::detached(Arc::new(ResolverChain::new(vec![])));
        ctx.set_identifier(Some(tenant.into()));
        ctx
    }

    /// The current tenant identifier, resolving it on first use.
    ///
    /// Returns `None` while a resolution is already in flight (recursion
    /// guard), and caches the outcome of the first completed resolution,
    /// including a definitive "no tenant", for all subsequent reads.
    pub async fn get_identifier(&self) -> Option<TenantId> {
        {
            let mut state = self.lock();
            if state.resolving {
                return None;
            }
            if state.resolved {
                return state.cached.clone();
            }
            state.resolving = true;
        }

        // The resolving flag must clear on every exit path, including an
        // unwind out of a misbehaving resolver.
        let mut guard = ClearResolvingOnDrop {
            state: &self.state,
            armed: true,
        };
        let tenant = self.resolver.resolve(&self.facts).await;
        {
            let mut state = self.lock();
            state.cached = tenant.clone();
            state.resolved = true;
            state.resolving = false;
        }
        guard.armed = false;
        tenant
    }

    /// Manually override the identifier. Marks the context resolved and
    /// cancels any in-flight resolution's claim on the state.
    pub fn set_identifier(&self, tenant: Option<TenantId>) {
        let mut state = self.lock();
        state.cached = tenant;
        state.resolved = true;
        state.resolving = false;
    }

    /// Whether the unit of work has a tenant. False while mid-resolution.
    pub async fn has_tenant(&self) -> bool {
        self.get_identifier().await.is_some()
    }

    /// Reset to the initial unresolved state; the next read re-resolves.
    pub fn clear(&self) {
        *self.lock() = State::default();
    }

    /// Non-resolving peek: the cached identifier if a resolution or
    /// override has completed, `None` otherwise. Never triggers resolution.
    pub fn identifier_if_resolved(&self) -> Option<TenantId> {
        let state = self.lock();
        if state.resolved && !state.resolving {
            state.cached.clone()
        } else {
            None
        }
    }

    /// The identifier, or [`ContextError::NotResolved`] when no strategy
    /// produced one. For boundaries where a missing tenant is fatal.
    pub async fn require_identifier(&self) -> Result<TenantId, ContextError> {
        self.get_identifier().await.ok_or(ContextError::NotResolved)
    }

    /// Run `fut` with the context resolved to `tenant`, then restore the
    /// exact prior `(identifier, resolved)` pair, including restoring the
    /// unresolved state, on every exit path, unwinds included.
    pub async fn run_for_tenant<F, R>(&self, tenant: impl Into<TenantId>, fut: F) -> R
    where
        F: Future<Output = R>,
    {
        let prior = {
            let mut state = self.lock();
            let prior = (state.cached.take(), state.resolved);
            state.cached = Some(tenant.into());
            state.resolved = true;
            state.resolving = false;
            prior
        };

        let _restore = RestoreOnDrop {
            state: &self.state,
            prior,
        };
        fut.await
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Recover from a poisoned lock instead of propagating the panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct ClearResolvingOnDrop<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl Drop for ClearResolvingOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.resolving = false;
        }
    }
}

struct RestoreOnDrop<'a> {
    state: &'a Mutex<State>,
    prior: (Option<TenantId>, bool),
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.cached = self.prior.0.take();
        state.resolved = self.prior.1;
        state.resolving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::OnceLock;

    struct CountingResolver {
        result: Option<TenantId>,
        calls: AtomicUsize,
    }

    impl CountingResolver {
        fn some(id: i64) -> Arc<Self> {
            Arc::new(Self {
                result: Some(TenantId::Int(id)),
                calls: AtomicUsize::new(0),
            })
        }

        fn none() -> Arc<Self> {
            Arc::new(Self {
                result: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Resolver for CountingResolver {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn resolve(&self, _facts: &RequestFacts) -> Option<TenantId> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    /// Calls back into the owning context mid-resolution, recording what
    /// the nested read observed.
    struct ReentrantResolver {
        ctx: OnceLock<Arc<TenantContext>>,
        nested_read: Mutex<Option<Option<TenantId>>>,
    }

    #[async_trait]
    impl Resolver for ReentrantResolver {
        fn name(&self) -> &'static str {
            "reentrant"
        }

        async fn resolve(&self, _facts: &RequestFacts) -> Option<TenantId> {
            let ctx = self.ctx.get().expect("context wired");
            let nested = ctx.get_identifier().await;
            *self.nested_read.lock().unwrap() = Some(nested);
            Some(TenantId::Int(9))
        }
    }

    #[tokio::test]
    async fn resolves_at_most_once() {
        let resolver = CountingResolver::some(4);
        let ctx = TenantContext::detached(resolver.clone());

        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));
        assert_eq!(resolver.call_count(), 1);
    }

    #[tokio::test]
    async fn definitive_failure_is_cached_too() {
        let resolver = CountingResolver::none();
        let ctx = TenantContext::detached(resolver.clone());

        assert_eq!(ctx.get_identifier().await, None);
        assert_eq!(ctx.get_identifier().await, None);
        assert_eq!(resolver.call_count(), 1);
        assert!(!ctx.has_tenant().await);
    }

    #[tokio::test]
    async fn mid_resolution_reads_are_unknown() {
        let resolver = Arc::new(ReentrantResolver {
            ctx: OnceLock::new(),
            nested_read: Mutex::new(None),
        });
        let ctx = Arc::new(TenantContext::detached(resolver.clone()));
        assert!(resolver.ctx.set(ctx.clone()).is_ok());

        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(9)));
        // The nested read during resolution saw no tenant and did not
        // re-enter the resolver.
        assert_eq!(*resolver.nested_read.lock().unwrap(), Some(None));
    }

    #[tokio::test]
    async fn set_identifier_skips_resolution() {
        let resolver = CountingResolver::some(4);
        let ctx = TenantContext::detached(resolver.clone());

        ctx.set_identifier(Some(TenantId::Str("acme".into())));
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Str("acme".into())));
        assert_eq!(resolver.call_count(), 0);
    }

    #[tokio::test]
    async fn clear_discards_overrides_and_re_resolves() {
        let resolver = CountingResolver::some(4);
        let ctx = TenantContext::detached(resolver.clone());

        ctx.set_identifier(Some(TenantId::Int(99)));
        ctx.clear();
        // Not the stale override; resolution runs again.
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));
        assert_eq!(resolver.call_count(), 1);
    }

    #[tokio::test]
    async fn run_for_tenant_restores_resolved_state() {
        let ctx = TenantContext::detached(CountingResolver::some(4));
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));

        let seen = ctx
            .run_for_tenant(TenantId::Int(8), async { ctx.get_identifier().await })
            .await;

        assert_eq!(seen, Some(TenantId::Int(8)));
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));
    }

    #[tokio::test]
    async fn run_for_tenant_restores_unresolved_state() {
        let resolver = CountingResolver::some(4);
        let ctx = TenantContext::detached(resolver.clone());

        let seen = ctx
            .run_for_tenant(7i64, async { ctx.identifier_if_resolved() })
            .await;
        assert_eq!(seen, Some(TenantId::Int(7)));

        // Prior state was unresolved; the next read resolves for real.
        assert_eq!(resolver.call_count(), 0);
        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(4)));
        assert_eq!(resolver.call_count(), 1);
    }

    #[tokio::test]
    async fn run_for_tenant_restores_after_panic() {
        let ctx = Arc::new(TenantContext::detached(CountingResolver::some(4)));
        ctx.set_identifier(Some(TenantId::Int(1)));

        let inner = ctx.clone();
        let task = tokio::spawn(async move {
            inner
                .run_for_tenant(2i64, async {
                    panic!("wrapped work failed");
                })
                .await
        });
        assert!(task.await.is_err());

        assert_eq!(ctx.get_identifier().await, Some(TenantId::Int(1)));
    }

    #[tokio::test]
    async fn fixed_context_is_pre_resolved() {
        let ctx = TenantContext::fixed("acme");
        assert_eq!(ctx.identifier_if_resolved(), Some(TenantId::Str("acme".into())));
        assert!(ctx.has_tenant().await);
    }

    #[tokio::test]
    async fn require_identifier_surfaces_not_resolved() {
        let ctx = TenantContext::detached(CountingResolver::none());
        let err = ctx.require_identifier().await.unwrap_err();
        assert!(matches!(err, ContextError::NotResolved));
    }

    #[tokio::test]
    async fn identifier_if_resolved_never_triggers_resolution() {
        let resolver = CountingResolver::some(4);
        let ctx = TenantContext::detached(resolver.clone());

        assert_eq!(ctx.identifier_if_resolved(), None);
        assert_eq!(resolver.call_count(), 0);
    }
}
