//! # warden-audit
//!
//! Runtime query auditing for Warden.
//!
//! The auditor observes every executed statement's raw text and flags
//! operations that touch a registered tenant-owned table without a tenant
//! predicate: the tripwire for raw queries and bulk operations that slip
//! past automatic predicate injection.
//!
//! | Operation | Tenant predicate looked for |
//! |-----------|------------------------------|
//! | `SELECT`  | `tenant_column =` / `tenant_column IN (` in the `WHERE` clause |
//! | `INSERT`  | tenant column present in the column list |
//! | `UPDATE`  | `WHERE` tenant test, or a primary-key equality (bypass) |
//! | `DELETE`  | `WHERE` tenant test, or a primary-key equality (bypass) |
//!
//! Detection is targeted pattern matching over the statement text, not SQL
//! parsing: a best-effort tripwire, not a proof of isolation. The
//! primary-key bypass suppresses the overwhelmingly common
//! load-scoped-then-mutate-by-id pattern; it assumes the row was loaded
//! through a scoped read, which the auditor cannot verify.
//!
//! Every detection failure fails open: the auditor never blocks or aborts
//! the underlying data operation.

pub mod auditor;
mod detector;
pub mod error;
pub mod finding;
pub mod sink;
pub mod statement;

pub use auditor::QueryAuditor;
pub use error::AuditError;
pub use finding::Finding;
pub use sink::{FileSink, FindingSink, MemorySink, NullSink, TracingSink};
pub use statement::{ExecutedStatement, StatementKind};
