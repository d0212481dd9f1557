//! A minimal query-builder model.
//!
//! Just enough structure for the scope to inject predicates and for the
//! glue layer to render a parameterized fragment: a target table, ordered
//! `WHERE` predicates, and positional bindings. This is the seam between
//! the engine and whatever data-access layer the application uses.

use warden_core::TenantId;

/// Comparison operator in a `WHERE` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOp {
    Eq,
    In,
}

/// One `WHERE` predicate with its placeholder count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WherePredicate {
    /// Column reference, possibly table-qualified.
    pub column: String,
    pub op: WhereOp,
    /// Number of `?` placeholders this predicate contributes.
    pub placeholders: usize,
}

/// A query under construction against a single target table.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    table: String,
    wheres: Vec<WherePredicate>,
    bindings: Vec<serde_json::Value>,
    bypass_isolation: bool,
    tenant_override: Option<TenantId>,
}

impl QueryBuilder {
    /// Start a query against `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// The target table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Add an equality predicate with its bound value.
    pub fn where_eq(
        &mut self,
        column: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> &mut Self {
        self.wheres.push(WherePredicate {
            column: column.into(),
            op: WhereOp::Eq,
            placeholders: 1,
        });
        self.bindings.push(value.into());
        self
    }

    /// Add a set-membership predicate with its bound values.
    pub fn where_in(
        &mut self,
        column: impl Into<String>,
        values: Vec<serde_json::Value>,
    ) -> &mut Self {
        self.wheres.push(WherePredicate {
            column: column.into(),
            op: WhereOp::In,
            placeholders: values.len(),
        });
        self.bindings.extend(values);
        self
    }

    /// Opt this query out of automatic isolation. Deliberate call-site
    /// syntax; the scope will not touch a bypassed builder.
    pub fn without_isolation(&mut self) -> &mut Self {
        self.bypass_isolation = true;
        self
    }

    /// Scope this query to a specific tenant instead of the context's.
    pub fn for_tenant(&mut self, tenant: impl Into<TenantId>) -> &mut Self {
        self.tenant_override = Some(tenant.into());
        self
    }

    /// Whether the caller opted out of isolation.
    pub fn isolation_bypassed(&self) -> bool {
        self.bypass_isolation
    }

    /// The explicit per-query tenant override, if any.
    pub fn tenant_override(&self) -> Option<&TenantId> {
        self.tenant_override.as_ref()
    }

    /// The accumulated predicates, in insertion order.
    pub fn wheres(&self) -> &[WherePredicate] {
        &self.wheres
    }

    /// The positional bindings, aligned with the rendered placeholders.
    pub fn bindings(&self) -> &[serde_json::Value] {
        &self.bindings
    }

    /// Render the `WHERE` fragment with `?` placeholders, or an empty
    /// string when there are no predicates.
    pub fn where_sql(&self) -> String {
        if self.wheres.is_empty() {
            return String::new();
        }
        let clauses: Vec<String> = self
            .wheres
            .iter()
            .map(|w| match w.op {
                WhereOp::Eq => format!("{} = ?", w.column),
                WhereOp::In => {
                    let marks = vec!["?"; w.placeholders].join(", ");
                    format!("{} IN ({})", w.column, marks)
                }
            })
            .collect();
        format!("WHERE {}", clauses.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_eq_and_in_predicates() {
        let mut builder = QueryBuilder::new("orders");
        builder
            .where_eq("status", json!("pending"))
            .where_in("region", vec![json!("eu"), json!("us")]);

        assert_eq!(
            builder.where_sql(),
            "WHERE status = ? AND region IN (?, ?)"
        );
        assert_eq!(
            builder.bindings(),
            &[json!("pending"), json!("eu"), json!("us")]
        );
    }

    #[test]
    fn empty_builder_renders_nothing() {
        let builder = QueryBuilder::new("orders");
        assert_eq!(builder.where_sql(), "");
        assert!(builder.bindings().is_empty());
    }

    #[test]
    fn bypass_and_override_flags() {
        let mut builder = QueryBuilder::new("orders");
        assert!(!builder.isolation_bypassed());
        assert!(builder.tenant_override().is_none());

        builder.without_isolation();
        builder.for_tenant(9i64);
        assert!(builder.isolation_bypassed());
        assert_eq!(builder.tenant_override(), Some(&TenantId::Int(9)));
    }
}
