//! Finding sinks.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::error::AuditError;
use crate::finding::Finding;

/// Destination for emitted findings.
///
/// Injected into the auditor; the engine ships a structured-log sink, a
/// JSON-lines file sink, an in-memory sink for tests, and a no-op sink.
/// Applications wanting a different destination (alerting, a metrics
/// pipeline) implement this.
#[async_trait]
pub trait FindingSink: Send + Sync {
    /// Accept one finding.
    async fn emit(&self, finding: Finding) -> Result<(), AuditError>;
}

/// Emits findings as structured `tracing` warnings.
pub struct TracingSink {
    channel: String,
}

impl TracingSink {
    /// Create a sink logging on the given channel.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl FindingSink for TracingSink {
    async fn emit(&self, finding: Finding) -> Result<(), AuditError> {
        tracing::warn!(
            channel = %self.channel,
            table = %finding.table,
            operation = %finding.operation,
            tenant = %finding.tenant_id,
            connection = %finding.connection,
            elapsed_ms = finding.elapsed_ms,
            source_file = %finding.source_file,
            source_line = finding.source_line,
            sql = %finding.sql,
            "statement on tenant-owned table without tenant predicate"
        );
        Ok(())
    }
}

/// Collects findings in memory. Test double.
#[derive(Default)]
pub struct MemorySink {
    findings: Mutex<Vec<Finding>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the findings collected so far.
    pub fn findings(&self) -> Vec<Finding> {
        self.lock().clone()
    }

    /// Number of findings collected so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Finding>> {
        self.findings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FindingSink for MemorySink {
    async fn emit(&self, finding: Finding) -> Result<(), AuditError> {
        self.lock().push(finding);
        Ok(())
    }
}

/// Appends findings to a file as JSON lines.
pub struct FileSink {
    path: std::path::PathBuf,
}

impl FileSink {
    /// Create a sink appending to `path`.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FindingSink for FileSink {
    async fn emit(&self, finding: Finding) -> Result<(), AuditError> {
        use std::io::Write;

        let json = serde_json::to_string(&finding)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

/// Discards everything.
pub struct NullSink;

#[async_trait]
impl FindingSink for NullSink {
    async fn emit(&self, _finding: Finding) -> Result<(), AuditError> {
        Ok(())
    }
}
