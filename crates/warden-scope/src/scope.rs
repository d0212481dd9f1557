//! Tenant predicate injection and write-time column fill.

use warden_context::TenantContext;
use warden_core::TenancyConfig;

use crate::builder::QueryBuilder;

/// Injects tenant predicates into query builders and fills the tenant
/// column on records headed for tenant-owned tables.
///
/// Holds only the read-only registry; safe to share across units of work.
#[derive(Debug, Clone)]
pub struct TenantScope {
    registry: TenancyConfig,
}

impl TenantScope {
    /// Create a scope over the given table registry.
    pub fn new(registry: TenancyConfig) -> Self {
        Self { registry }
    }

    /// Add the isolation predicate to `builder` for the current tenant.
    ///
    /// Returns whether a predicate was added. No-ops when:
    /// - the builder opted out via [`QueryBuilder::without_isolation`]
    /// - the target table is unregistered or exempt
    /// - neither the builder override nor the context yields a tenant
    ///
    /// The predicate is qualified with the target table name, scoping the
    /// restriction to this query's own rows rather than the whole join.
    pub async fn apply(&self, ctx: &TenantContext, builder: &mut QueryBuilder) -> bool {
        if builder.isolation_bypassed() {
            return false;
        }

        let Some(column) = self.registry.tenant_column(builder.table()) else {
            return false;
        };

        let tenant = match builder.tenant_override() {
            Some(tenant) => tenant.clone(),
            None => match ctx.get_identifier().await {
                Some(tenant) => tenant,
                None => return false,
            },
        };

        let qualified = format!("{}.{}", builder.table(), column);
        tracing::trace!(table = builder.table(), column = %qualified, %tenant, "scoping query");
        builder.where_eq(qualified, &tenant);
        true
    }

    /// Set the tenant column on a record about to be written, reading the
    /// value from the context at the moment of the write.
    ///
    /// Returns whether the column was filled. An already-present non-null
    /// value is never overwritten; unregistered and exempt tables and
    /// tenantless contexts are left alone.
    pub async fn fill_on_write(
        &self,
        ctx: &TenantContext,
        table: &str,
        record: &mut serde_json::Map<String, serde_json::Value>,
    ) -> bool {
        let Some(column) = self.registry.tenant_column(table) else {
            return false;
        };

        if record.get(column).is_some_and(|v| !v.is_null()) {
            return false;
        }

        let Some(tenant) = ctx.get_identifier().await else {
            return false;
        };

        record.insert(column.to_string(), serde_json::Value::from(&tenant));
        true
    }

    /// The registry this scope enforces.
    pub fn registry(&self) -> &TenancyConfig {
        &self.registry
    }
}
