//! Configuration types for Warden.
//!
//! Configuration is loaded from YAML (typically a single `warden.yaml`) and
//! split into three concerns:
//!
//! - **tenancy**: the registry of tenant-owned tables and their columns
//! - **auditor**: runtime query-audit settings
//! - **resolvers**: the ordered tenant-identification strategies

pub mod auditor;
pub mod resolver;
pub mod tenancy;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub use auditor::AuditorConfig;
pub use resolver::{ResolverConfig, ResolverKind};
pub use tenancy::{TableTenancyConfig, TenancyConfig};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML content did not parse.
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration is structurally invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Complete Warden configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Tenant table registry.
    #[serde(default)]
    pub tenancy: TenancyConfig,

    /// Query auditor settings.
    #[serde(default)]
    pub auditor: AuditorConfig,

    /// Tenant resolution settings.
    #[serde(default)]
    pub resolvers: ResolverConfig,
}

impl WardenConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}
