//! Tenant resolution configuration.

use serde::{Deserialize, Serialize};

/// The stock identification strategies, in declarative form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Read a configured field from the session/identity object.
    Session,
    /// Look up the request host in a tenant domain directory.
    Domain,
    /// Read a configured request header.
    Header,
}

/// Configuration for the resolver chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Strategy order. Empty means the default order:
    /// session, then domain, then header.
    #[serde(default)]
    pub order: Vec<ResolverKind>,

    /// Session field holding the tenant identifier.
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Request header holding the tenant identifier.
    #[serde(default = "default_header")]
    pub header: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            session_key: default_session_key(),
            header: default_header(),
        }
    }
}

impl ResolverConfig {
    /// The effective strategy order: configured order, or the documented
    /// default when none is configured.
    pub fn effective_order(&self) -> Vec<ResolverKind> {
        if self.order.is_empty() {
            vec![
                ResolverKind::Session,
                ResolverKind::Domain,
                ResolverKind::Header,
            ]
        } else {
            self.order.clone()
        }
    }
}

fn default_session_key() -> String {
    "tenant_id".to_string()
}

fn default_header() -> String {
    "X-Tenant".to_string()
}
