//! The query auditor.

use regex::Regex;
use std::sync::Arc;
use warden_context::TenantContext;
use warden_core::{AuditorConfig, TenancyConfig};

use crate::detector::{compile_pk_tests, TableMatcher};
use crate::finding::Finding;
use crate::sink::{FindingSink, NullSink, TracingSink};
use crate::statement::ExecutedStatement;

/// Observes executed statements and emits a [`Finding`] for each one that
/// touches a registered tenant-owned table without a tenant predicate.
///
/// All detection rules are compiled once at construction. Observation
/// never fails and never blocks the data operation being observed: any
/// internal problem is logged at debug level and the statement is skipped.
pub struct QueryAuditor {
    config: AuditorConfig,
    matchers: Vec<TableMatcher>,
    pk_tests: Vec<Regex>,
    sink: Arc<dyn FindingSink>,
}

impl QueryAuditor {
    /// Build an auditor over the given registry, emitting to `sink`.
    pub fn new(config: AuditorConfig, registry: &TenancyConfig, sink: Arc<dyn FindingSink>) -> Self {
        let mut matchers = Vec::new();
        if config.enabled {
            // Sorted registry order keeps first-match-wins deterministic.
            for table in registry.registered_tables() {
                // Exempt tables never produce findings; skip them outright.
                let Some(column) = registry.tenant_column(table) else {
                    continue;
                };
                match TableMatcher::new(table, column) {
                    Ok(matcher) => matchers.push(matcher),
                    Err(error) => {
                        tracing::debug!(table, %error, "skipping table with unusable patterns");
                    }
                }
            }
        }
        let pk_tests = compile_pk_tests(&config.primary_key_columns);

        Self {
            config,
            matchers,
            pk_tests,
            sink,
        }
    }

    /// Build an auditor emitting structured warnings on the configured
    /// log channel.
    pub fn with_tracing_sink(config: AuditorConfig, registry: &TenancyConfig) -> Self {
        let sink = Arc::new(TracingSink::new(config.channel.clone()));
        Self::new(config, registry, sink)
    }

    /// An auditor that observes nothing.
    pub fn disabled() -> Self {
        Self::new(
            AuditorConfig {
                enabled: false,
                ..Default::default()
            },
            &TenancyConfig::default(),
            Arc::new(NullSink),
        )
    }

    /// Whether auditing is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Inspect one executed statement.
    ///
    /// Skips entirely when auditing is disabled or when the unit of work
    /// has no resolved tenant: tenantless console/background work
    /// legitimately runs unfiltered, and a statement executed while
    /// resolution is still in flight reads the same way. At most one
    /// finding is emitted per statement: the first registered table the
    /// statement touches without a tenant predicate.
    pub async fn observe(&self, ctx: &TenantContext, stmt: &ExecutedStatement) {
        if !self.config.enabled {
            return;
        }
        let Some(tenant) = ctx.identifier_if_resolved() else {
            return;
        };

        for matcher in &self.matchers {
            let Some(kind) = matcher.classify(stmt.sql()) else {
                continue;
            };
            if matcher.has_tenant_predicate(stmt.sql(), kind, &self.pk_tests) {
                continue;
            }

            let finding = Finding::new(matcher.table(), kind, stmt, tenant.clone());
            tracing::debug!(
                table = matcher.table(),
                operation = %kind,
                "unscoped statement detected"
            );
            if let Err(error) = self.sink.emit(finding).await {
                // Fail open: a broken sink must not surface to the caller.
                tracing::debug!(%error, "dropping finding after sink failure");
            }
            return;
        }
    }
}
