//! Error types for the audit crate.

use thiserror::Error;

/// Errors raised by finding sinks.
///
/// These never reach the code executing the audited statement: the
/// auditor swallows them after logging. They exist so sink
/// implementations can report what went wrong.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A finding could not be serialized.
    #[error("failed to serialize finding: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing a finding to a file failed.
    #[error("failed to write finding: {0}")]
    Io(#[from] std::io::Error),

    /// The sink could not accept the finding.
    #[error("finding sink failed: {0}")]
    Sink(String),
}
