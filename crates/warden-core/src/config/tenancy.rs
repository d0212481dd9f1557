//! The tenant table registry.
//!
//! Declares which tables are tenant-owned, which column carries the tenant
//! value in each, and which tables are exempt from isolation enforcement
//! (shared reference data). Only registered tables are scoped and audited;
//! everything else is ignored by the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ConfigError;

/// Registry of tenant-owned tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Default column name for tenant isolation, used when not overridden
    /// per-table.
    #[serde(default = "default_tenant_column")]
    pub default_column: String,

    /// Registered tables. A table must appear here to be scoped or audited.
    #[serde(default)]
    pub tables: HashMap<String, TableTenancyConfig>,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            default_column: default_tenant_column(),
            tables: HashMap::new(),
        }
    }
}

/// Per-table tenancy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableTenancyConfig {
    /// The column name used for tenant isolation in this table.
    /// Falls back to the registry's `default_column` when unset.
    #[serde(default)]
    pub tenant_column: Option<String>,

    /// Whether this table is exempt from isolation enforcement.
    #[serde(default)]
    pub exempt: bool,
}

impl TenancyConfig {
    /// Load the registry from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse the registry from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Register a table with the default tenant column. Builder-style,
    /// mainly for tests and programmatic setup.
    pub fn register(mut self, table: impl Into<String>) -> Self {
        self.tables
            .insert(table.into(), TableTenancyConfig::default());
        self
    }

    /// Register a table as exempt from isolation enforcement.
    pub fn register_exempt(mut self, table: impl Into<String>) -> Self {
        self.tables.insert(
            table.into(),
            TableTenancyConfig {
                tenant_column: None,
                exempt: true,
            },
        );
        self
    }

    /// Whether the table appears in the registry at all.
    pub fn is_registered(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Whether the table is explicitly exempt from isolation enforcement.
    pub fn is_exempt(&self, table: &str) -> bool {
        self.tables.get(table).is_some_and(|t| t.exempt)
    }

    /// The tenant column for a registered, non-exempt table.
    ///
    /// Returns `None` for unregistered and exempt tables: callers treat
    /// both as "do not enforce here".
    pub fn tenant_column(&self, table: &str) -> Option<&str> {
        let config = self.tables.get(table)?;
        if config.exempt {
            return None;
        }
        Some(
            config
                .tenant_column
                .as_deref()
                .unwrap_or(&self.default_column),
        )
    }

    /// Registered table names in sorted order.
    ///
    /// Sorted so that consumers walking the registry (the auditor's
    /// first-match-wins pass) behave deterministically across runs.
    pub fn registered_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn default_tenant_column() -> String {
    "tenant_id".to_string()
}
