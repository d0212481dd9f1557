//! # warden-context
//!
//! Tenant identity resolution for Warden.
//!
//! Every unit of work (HTTP request, queued job, console invocation) owns
//! exactly one [`TenantContext`]. The context resolves "who is the current
//! tenant" lazily, at most once, through an injected [`Resolver`], usually
//! a [`ResolverChain`] trying several identification strategies in priority
//! order:
//!
//! 1. [`SessionResolver`]: a configured field on the session object
//! 2. [`DomainResolver`]: the request host, looked up in a domain directory
//! 3. [`HeaderResolver`]: a configured request header, strictly validated
//!
//! The resolved identifier is cached for the life of the unit of work; all
//! subsequent reads observe the same value until an explicit override or
//! [`TenantContext::clear`].
//!
//! ## Sharing rules
//!
//! Resolvers and chains are stateless and safely shared across units of
//! work. The context is not: construct one per request/job/command and drop
//! it at the boundary. Reusing a context across units of work leaks one
//! tenant's identity into the next, the exact failure this crate exists to
//! prevent.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use warden_context::{RequestFacts, ResolverChain, TenantContext};
//! # async fn handle(chain: Arc<ResolverChain>, facts: RequestFacts) {
//! let ctx = TenantContext::new(chain, facts);
//! if let Some(tenant) = ctx.get_identifier().await {
//!     tracing::debug!(%tenant, "tenant resolved");
//! }
//! # }
//! ```

pub mod context;
pub mod request;
pub mod resolver;
pub mod resolvers;

pub use context::{ContextError, TenantContext};
pub use request::{RequestFacts, SessionStore};
pub use resolver::{Resolver, ResolverChain};
pub use resolvers::{DomainDirectory, DomainResolver, HeaderResolver, SessionResolver};
