//! # warden-core
//!
//! Shared types and configuration for the Warden tenant-isolation engine.
//!
//! This crate is the leaf of the workspace: it defines the [`TenantId`]
//! value type and the configuration surface consumed by the resolution,
//! scoping, and auditing crates:
//!
//! - **tenancy.yaml** (`TenancyConfig`): which tables are tenant-owned,
//!   which column carries the tenant value, and which tables are exempt
//! - **auditor settings** (`AuditorConfig`): enablement, log channel, and
//!   the primary-key columns treated as bypass-safe
//! - **resolver settings** (`ResolverConfig`): the ordered identification
//!   strategies and their inputs (session key, header name)

pub mod config;
mod tenant_id;

pub use config::{
    AuditorConfig, ConfigError, ResolverConfig, ResolverKind, TableTenancyConfig, TenancyConfig,
    WardenConfig,
};
pub use tenant_id::TenantId;
