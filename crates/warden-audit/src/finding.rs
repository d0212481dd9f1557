//! Audit findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::TenantId;

use crate::statement::{ExecutedStatement, StatementKind};

/// One detected unscoped statement against a tenant-owned table.
///
/// Ephemeral: findings are emitted to a sink and never persisted by the
/// engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique finding ID.
    pub id: Uuid,

    /// When the statement was observed.
    pub occurred_at: DateTime<Utc>,

    /// The tenant-owned table the statement touched.
    pub table: String,

    /// The operation role the statement played against that table.
    pub operation: StatementKind,

    /// Raw statement text.
    pub sql: String,

    /// Bound parameters.
    pub bindings: Vec<serde_json::Value>,

    /// Execution time in milliseconds.
    pub elapsed_ms: u64,

    /// Connection the statement ran on.
    pub connection: String,

    /// The tenant the unit of work had resolved when the statement ran.
    pub tenant_id: TenantId,

    /// Best-effort source file of the issuing call site.
    pub source_file: String,

    /// Best-effort source line of the issuing call site.
    pub source_line: u32,
}

impl Finding {
    /// Build a finding for `stmt` playing `operation` against `table`.
    pub fn new(
        table: &str,
        operation: StatementKind,
        stmt: &ExecutedStatement,
        tenant_id: TenantId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            table: table.to_string(),
            operation,
            sql: stmt.sql().to_string(),
            bindings: stmt.bindings().to_vec(),
            elapsed_ms: stmt.elapsed().as_millis() as u64,
            connection: stmt.connection().to_string(),
            tenant_id,
            source_file: stmt.source_file().to_string(),
            source_line: stmt.source_line(),
        }
    }

    /// Format the finding as a human-readable log line.
    ///
    /// Format: `[timestamp] UNSCOPED_QUERY table=... operation=... tenant=... sql="..."`
    pub fn to_log_line(&self) -> String {
        let mut preview: String = self.sql.chars().take(100).collect();
        if preview.len() < self.sql.len() {
            preview.push_str("...");
        }

        format!(
            "[{}] UNSCOPED_QUERY table={} operation={} tenant={} connection={} elapsed_ms={} source={}:{} sql=\"{}\"",
            self.occurred_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.table,
            self.operation,
            self.tenant_id,
            self.connection,
            self.elapsed_ms,
            self.source_file,
            self.source_line,
            preview.replace('\n', " "),
        )
    }
}
