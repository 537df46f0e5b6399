//! UPDATE statement builder.

use crate::condition::{Condition, build_where};
use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::ident::quote_column;
use crate::join::{Join, build_joins};
use crate::qb::filter::impl_filter_methods;
use crate::qb::resolve_table;
use crate::qb::traits::SqlQb;
use crate::row::Row;
use crate::statement::{Statement, StatementKind};
use crate::value::{Value, encode};

/// UPDATE builder.
///
/// `UPDATE table [joins] SET col = v, ... [WHERE] [HAVING];`
#[derive(Clone, Debug, Default)]
pub struct UpdateQb {
    table: String,
    data: Row,
    joins: Vec<Join>,
    where_conds: Vec<Condition>,
    having_conds: Vec<Condition>,
}

impl UpdateQb {
    /// Create a new UPDATE builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// SET column = value. Setting a column twice keeps the last value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.data.insert(column, value);
        self
    }

    /// Merge a whole row of assignments.
    pub fn data(mut self, row: Row) -> Self {
        for (column, value) in row.iter() {
            self.data.insert(column, value.clone());
        }
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn joins(mut self, joins: impl IntoIterator<Item = Join>) -> Self {
        self.joins.extend(joins);
        self
    }

    /// Add a HAVING condition.
    pub fn having(mut self, condition: impl Into<Condition>) -> Self {
        self.having_conds.push(condition.into());
        self
    }

    fn build_update_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        let table = resolve_table(&self.table)?;
        if self.data.is_empty() {
            return Err(WalkerError::missing("data"));
        }

        let mut sql = format!("UPDATE {}", table.fullname());

        if let Some(joins) = build_joins(&self.joins, config)? {
            sql.push(' ');
            sql.push_str(&joins);
        }

        let assignments = self
            .data
            .iter()
            .map(|(column, value)| {
                Ok::<_, WalkerError>(format!(
                    "{} = {}",
                    quote_column(column)?,
                    encode(value, config)?
                ))
            })
            .collect::<WalkerResult<Vec<_>>>()?;
        sql.push_str(" SET ");
        sql.push_str(&assignments.join(", "));

        if let Some(where_sql) = build_where(&self.where_conds, config)? {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if let Some(having_sql) = build_where(&self.having_conds, config)? {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        sql.push(';');
        Ok(sql)
    }
}

impl_filter_methods!(UpdateQb, where_conds);

impl SqlQb for UpdateQb {
    fn build_with(&self, config: &BuilderConfig) -> WalkerResult<Statement> {
        let sql = self.build_update_sql(config)?;
        Ok(Statement::new(StatementKind::Update, sql))
    }
}
