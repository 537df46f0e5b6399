//! SELECT statement builder.

use crate::columns::{Column, build_columns};
use crate::condition::{Condition, build_where};
use crate::config::BuilderConfig;
use crate::error::WalkerResult;
use crate::ident::column_sql;
use crate::join::{Join, build_joins};
use crate::qb::filter::impl_filter_methods;
use crate::qb::resolve_table;
use crate::qb::traits::SqlQb;
use crate::statement::{Statement, StatementKind};

/// SELECT builder.
///
/// Clause order is fixed:
/// `SELECT cols FROM table [joins] [WHERE] [GROUP BY] [HAVING] [ORDER BY] [LIMIT] [OFFSET];`
#[derive(Clone, Debug, Default)]
pub struct SelectQb {
    /// Table reference as written (`db.table AS alias`)
    table: String,
    /// Projection; empty means `<table-or-alias>.*`
    columns: Vec<Column>,
    joins: Vec<Join>,
    where_conds: Vec<Condition>,
    group_by: Vec<String>,
    having_conds: Vec<Condition>,
    order_by: Vec<String>,
    /// `0` is treated as "no limit"
    limit: Option<u64>,
    /// Emitted whenever set, including `0`
    offset: Option<u64>,
}

impl SelectQb {
    /// Create a new SELECT builder for a table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    // ==================== Projection ====================

    /// Replace the projection.
    pub fn columns<C: Into<Column>>(mut self, columns: impl IntoIterator<Item = C>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one projected column.
    pub fn column(mut self, column: impl Into<Column>) -> Self {
        self.columns.push(column.into());
        self
    }

    // ==================== JOIN ====================

    /// Add a join; joins render in the order they were added.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn joins(mut self, joins: impl IntoIterator<Item = Join>) -> Self {
        self.joins.extend(joins);
        self
    }

    /// Add `INNER JOIN table ON (...)`.
    pub fn inner_join<C: Into<Condition>>(
        self,
        table: &str,
        on: impl IntoIterator<Item = C>,
    ) -> Self {
        self.join(Join::inner(table).on(on))
    }

    /// Add `LEFT JOIN table ON (...)`.
    pub fn left_join<C: Into<Condition>>(
        self,
        table: &str,
        on: impl IntoIterator<Item = C>,
    ) -> Self {
        self.join(Join::left(table).on(on))
    }

    /// Add `RIGHT JOIN table ON (...)`.
    pub fn right_join<C: Into<Condition>>(
        self,
        table: &str,
        on: impl IntoIterator<Item = C>,
    ) -> Self {
        self.join(Join::right(table).on(on))
    }

    // ==================== GROUP BY / HAVING ====================

    /// Add a GROUP BY column.
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    /// Add a HAVING condition (AND-combined).
    pub fn having(mut self, condition: impl Into<Condition>) -> Self {
        self.having_conds.push(condition.into());
        self
    }

    pub fn havings<C: Into<Condition>>(mut self, conditions: impl IntoIterator<Item = C>) -> Self {
        self.having_conds
            .extend(conditions.into_iter().map(Into::into));
        self
    }

    // ==================== ORDER / LIMIT ====================

    /// Add an ORDER BY item, e.g. `"created_at DESC"`.
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_by.push(clause.to_string());
        self
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(&format!("{column} ASC"))
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(&format!("{column} DESC"))
    }

    /// Set LIMIT. `0` drops the clause.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1) * size);
        self
    }

    fn build_select_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        let table = resolve_table(&self.table)?;
        let columns = build_columns(&self.columns, Some(&table))?;

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), table.fullname());

        if let Some(joins) = build_joins(&self.joins, config)? {
            sql.push(' ');
            sql.push_str(&joins);
        }

        if let Some(where_sql) = build_where(&self.where_conds, config)? {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            let group: Vec<String> = self.group_by.iter().map(|c| column_sql(c)).collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&group.join(", "));
        }

        if let Some(having_sql) = build_where(&self.having_conds, config)? {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self.order_by.iter().map(|c| order_sql(c)).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        if let Some(limit) = self.limit.filter(|n| *n > 0) {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql.push(';');
        Ok(sql)
    }
}

impl_filter_methods!(SelectQb, where_conds);

impl SqlQb for SelectQb {
    fn build_with(&self, config: &BuilderConfig) -> WalkerResult<Statement> {
        let sql = self.build_select_sql(config)?;
        Ok(Statement::new(StatementKind::Select, sql))
    }
}

/// Quote the column part of an ORDER BY item, keeping a trailing direction.
fn order_sql(item: &str) -> String {
    let item = item.trim();
    if let Some((column, direction)) = item.rsplit_once(char::is_whitespace) {
        let direction = direction.to_ascii_uppercase();
        if direction == "ASC" || direction == "DESC" {
            return format!("{} {direction}", column_sql(column));
        }
    }
    column_sql(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_items() {
        assert_eq!(order_sql("created_at"), "`created_at`");
        assert_eq!(order_sql("u.created_at desc"), "`u`.`created_at` DESC");
        assert_eq!(order_sql("FIELD(id, 3, 1) ASC"), "FIELD(id, 3, 1) ASC");
        assert_eq!(order_sql("RAND()"), "RAND()");
    }

    #[test]
    fn paginate_sets_limit_and_offset() {
        let sql = SelectQb::new("t").paginate(3, 20).to_sql().unwrap();
        assert_eq!(sql, "SELECT `t`.* FROM `t` LIMIT 20 OFFSET 40;");
        let sql = SelectQb::new("t").paginate(0, 0).to_sql().unwrap();
        assert_eq!(sql, "SELECT `t`.* FROM `t` LIMIT 1 OFFSET 0;");
    }
}
