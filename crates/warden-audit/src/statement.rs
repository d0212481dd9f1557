//! The executed-statement model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::time::Duration;

/// Operation role a statement plays against a particular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
    Select,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Select => write!(f, "SELECT"),
        }
    }
}

/// A data-access statement as executed: raw text, bound parameters,
/// timing, and the call site that issued it.
///
/// The call site is captured from the constructor's caller via
/// `#[track_caller]`. Best-effort, but usually the data-access helper
/// that ran the query.
#[derive(Debug, Clone)]
pub struct ExecutedStatement {
    sql: String,
    bindings: Vec<serde_json::Value>,
    elapsed: Duration,
    connection: String,
    source_file: String,
    source_line: u32,
}

impl ExecutedStatement {
    /// Record an executed statement.
    #[track_caller]
    pub fn new(sql: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            sql: sql.into(),
            bindings: Vec::new(),
            elapsed: Duration::ZERO,
            connection: "default".to_string(),
            source_file: location.file().to_string(),
            source_line: location.line(),
        }
    }

    /// Attach the bound parameters.
    pub fn with_bindings(mut self, bindings: Vec<serde_json::Value>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Attach the execution time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Attach the connection name (default `"default"`).
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = connection.into();
        self
    }

    /// The raw statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters.
    pub fn bindings(&self) -> &[serde_json::Value] {
        &self.bindings
    }

    /// How long execution took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The connection the statement ran on.
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Source file of the issuing call site.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Source line of the issuing call site.
    pub fn source_line(&self) -> u32 {
        self.source_line
    }
}
