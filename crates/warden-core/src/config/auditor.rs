//! Query auditor configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the runtime query auditor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditorConfig {
    /// Whether auditing is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Log channel name attached to emitted findings.
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Columns treated as bypass-safe in UPDATE/DELETE `WHERE` clauses.
    ///
    /// An equality test on any of these suppresses a finding: the targeted
    /// row is presumed to have been loaded through a tenant-scoped read.
    #[serde(default = "default_primary_key_columns")]
    pub primary_key_columns: Vec<String>,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            channel: default_channel(),
            primary_key_columns: default_primary_key_columns(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_channel() -> String {
    "tenancy".to_string()
}

fn default_primary_key_columns() -> Vec<String> {
    vec!["id".to_string(), "uuid".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AuditorConfig::default();
        assert!(config.enabled);
        assert_eq!(config.channel, "tenancy");
        assert_eq!(config.primary_key_columns, vec!["id", "uuid"]);
    }

    #[test]
    fn parse_partial_yaml_fills_defaults() {
        let config: AuditorConfig = serde_yaml::from_str("enabled: false").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.primary_key_columns, vec!["id", "uuid"]);
    }
}
