//! DELETE statement builder.

use crate::condition::{Condition, build_where};
use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::qb::filter::impl_filter_methods;
use crate::qb::resolve_table;
use crate::qb::traits::SqlQb;
use crate::statement::{Statement, StatementKind};

/// DELETE builder.
#[derive(Clone, Debug, Default)]
pub struct DeleteQb {
    table: String,
    where_conds: Vec<Condition>,
    /// Whether to allow DELETE without WHERE (dangerous!)
    allow_delete_all: bool,
}

impl DeleteQb {
    /// Create a new DELETE builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Allow DELETE without WHERE conditions (dangerous!).
    ///
    /// By default a DELETE with no conditions fails to build.
    pub fn allow_delete_all(mut self, allow: bool) -> Self {
        self.allow_delete_all = allow;
        self
    }

    fn build_delete_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        let table = resolve_table(&self.table)?;
        let mut sql = format!("DELETE FROM {}", table.fullname());

        // A WHERE made only of conditions that hold for every row still deletes everything.
        let unfiltered = self.where_conds.iter().all(Condition::is_always_true);
        if unfiltered && !self.allow_delete_all {
            return Err(WalkerError::missing(
                "where (use allow_delete_all(true) to delete every row)",
            ));
        }

        if let Some(where_sql) = build_where(&self.where_conds, config)? {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        sql.push(';');
        Ok(sql)
    }
}

impl_filter_methods!(DeleteQb, where_conds);

impl SqlQb for DeleteQb {
    fn build_with(&self, config: &BuilderConfig) -> WalkerResult<Statement> {
        let sql = self.build_delete_sql(config)?;
        Ok(Statement::new(StatementKind::Delete, sql))
    }
}
