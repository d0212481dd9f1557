//! Table-driven statement detection rules.
//!
//! One compiled [`TableMatcher`] per registered table, built once at
//! auditor construction. The rules are deliberately targeted pattern
//! matches over the raw statement text, tolerant of identifier quoting,
//! case, and line breaks. They are not a SQL grammar. Classification
//! checks INSERT, UPDATE, and DELETE before SELECT: `DELETE FROM x`
//! textually contains `FROM x` and must not be misread as a select.

use regex::Regex;

use crate::statement::StatementKind;

/// Reference to `table`, tolerating backtick/double-quote quoting and
/// anchored so `orders` never matches inside `orders_archive`.
fn table_ref(table: &str) -> String {
    let t = regex::escape(table);
    format!(r#"(?:["`]{t}["`]|{t}\b)"#)
}

/// Test for `column = ...` or `column IN (...)`, optionally quoted, never
/// matching inside a longer identifier (`tenant_id` vs `parent_tenant_id`).
fn column_eq_or_in(column: &str) -> String {
    let c = regex::escape(column);
    format!(r#"(?i)(?:["`]{c}["`]|\b{c}\b)\s*(?:=|in\s*\()"#)
}

/// Test for a bare `column = ...` equality.
fn column_eq(column: &str) -> String {
    let c = regex::escape(column);
    format!(r#"(?i)(?:["`]{c}["`]|\b{c}\b)\s*="#)
}

/// Bare occurrence of `column`, for INSERT column lists.
fn column_present(column: &str) -> String {
    let c = regex::escape(column);
    format!(r#"(?i)(?:["`]{c}["`]|\b{c}\b)"#)
}

/// Compile the primary-key equality tests shared by every matcher.
///
/// A column whose pattern fails to compile is dropped with a debug log
/// rather than failing auditor construction.
pub(crate) fn compile_pk_tests(columns: &[String]) -> Vec<Regex> {
    columns
        .iter()
        .filter_map(|column| match Regex::new(&column_eq(column)) {
            Ok(re) => Some(re),
            Err(error) => {
                tracing::debug!(column, %error, "skipping unusable primary-key column");
                None
            }
        })
        .collect()
}

/// Compiled detection rules for one registered tenant-owned table.
pub(crate) struct TableMatcher {
    table: String,
    insert_stmt: Regex,
    update_stmt: Regex,
    delete_stmt: Regex,
    select_stmt: Regex,
    insert_columns: Regex,
    tenant_test: Regex,
    tenant_in_list: Regex,
    where_clause: Regex,
}

impl TableMatcher {
    pub(crate) fn new(table: &str, tenant_column: &str) -> Result<Self, regex::Error> {
        let t = table_ref(table);
        Ok(Self {
            table: table.to_string(),
            insert_stmt: Regex::new(&format!(r"(?i)\binsert\s+into\s+{t}"))?,
            update_stmt: Regex::new(&format!(r"(?i)\bupdate\s+{t}"))?,
            delete_stmt: Regex::new(&format!(r"(?i)\bdelete\s+from\s+{t}"))?,
            select_stmt: Regex::new(&format!(r"(?i)\b(?:from|join)\s+{t}"))?,
            insert_columns: Regex::new(&format!(r"(?is)\binsert\s+into\s+{t}\s*\(([^)]*)\)"))?,
            tenant_test: Regex::new(&column_eq_or_in(tenant_column))?,
            tenant_in_list: Regex::new(&column_present(tenant_column))?,
            where_clause: Regex::new(r"(?is)\bwhere\b(.*)")?,
        })
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    /// The operation role this statement plays against the table, or
    /// `None` when the statement does not reference it.
    pub(crate) fn classify(&self, sql: &str) -> Option<StatementKind> {
        if self.insert_stmt.is_match(sql) {
            Some(StatementKind::Insert)
        } else if self.update_stmt.is_match(sql) {
            Some(StatementKind::Update)
        } else if self.delete_stmt.is_match(sql) {
            Some(StatementKind::Delete)
        } else if self.select_stmt.is_match(sql) {
            Some(StatementKind::Select)
        } else {
            None
        }
    }

    /// Whether the statement carries a tenant predicate for its role.
    pub(crate) fn has_tenant_predicate(
        &self,
        sql: &str,
        kind: StatementKind,
        pk_tests: &[Regex],
    ) -> bool {
        match kind {
            StatementKind::Select => self
                .extract_where(sql)
                .is_some_and(|clause| self.tenant_test.is_match(clause)),
            StatementKind::Insert => self
                .insert_columns
                .captures(sql)
                .and_then(|c| c.get(1))
                .is_some_and(|list| self.tenant_in_list.is_match(list.as_str())),
            StatementKind::Update | StatementKind::Delete => {
                self.extract_where(sql).is_some_and(|clause| {
                    self.tenant_test.is_match(clause)
                        || pk_tests.iter().any(|re| re.is_match(clause))
                })
            }
        }
    }

    fn extract_where<'a>(&self, sql: &'a str) -> Option<&'a str> {
        self.where_clause
            .captures(sql)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}
