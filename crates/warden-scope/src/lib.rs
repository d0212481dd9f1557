//! # warden-scope
//!
//! Isolation predicate injection for Warden.
//!
//! The ORM glue hands a [`QueryBuilder`] to [`TenantScope::apply`], which
//! adds an equality predicate binding the table's tenant column to the
//! current context's identifier:
//!
//! **Before:**
//! ```sql
//! SELECT * FROM orders WHERE status = ?
//! ```
//!
//! **After:**
//! ```sql
//! SELECT * FROM orders WHERE status = ? AND orders.tenant_id = ?
//! ```
//!
//! The scope no-ops when the context has no tenant, when the table is
//! exempt or unregistered, or when the caller explicitly opted out with
//! [`QueryBuilder::without_isolation`]. [`TenantScope::fill_on_write`]
//! covers the write path: a record headed for a tenant-owned table gets
//! its tenant column populated from the context unless already set.

pub mod builder;
pub mod scope;

pub use builder::{QueryBuilder, WhereOp, WherePredicate};
pub use scope::TenantScope;
