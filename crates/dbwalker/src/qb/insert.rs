//! INSERT statement builder.

use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::ident::quote_column;
use crate::qb::resolve_table;
use crate::qb::traits::SqlQb;
use crate::row::Row;
use crate::statement::{Statement, StatementKind};
use crate::value::{Value, encode};

/// INSERT builder, one or more rows.
///
/// The column list comes from the first row. Every later row must carry
/// exactly the same columns, in any order.
#[derive(Clone, Debug, Default)]
pub struct InsertQb {
    table: String,
    rows: Vec<Row>,
}

impl InsertQb {
    /// Create a new INSERT builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            rows: Vec::new(),
        }
    }

    /// Set a column on the current (last) row, starting the first row if needed.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        match self.rows.last_mut() {
            Some(row) => row.insert(column, value),
            None => self.rows.push(Row::new().set(column, value)),
        }
        self
    }

    /// Append a full row.
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Append several rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    fn build_insert_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        let table = resolve_table(&self.table)?;

        let columns: Vec<&str> = match self.rows.first() {
            Some(first) if !first.is_empty() => first.columns().collect(),
            _ => return Err(WalkerError::missing("data")),
        };

        let mut tuples = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            if let Some(extra) = row.columns().find(|c| !columns.contains(c)) {
                return Err(WalkerError::RowShapeMismatch {
                    row: index,
                    detail: format!("unexpected column `{extra}`"),
                });
            }
            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = row.get(column).ok_or_else(|| {
                    WalkerError::missing(format!("column `{column}` in insert row {index}"))
                })?;
                values.push(encode(value, config)?);
            }
            tuples.push(format!("({})", values.join(", ")));
        }

        let column_list = columns
            .iter()
            .map(|c| quote_column(c))
            .collect::<WalkerResult<Vec<_>>>()?;
        Ok(format!(
            "INSERT INTO {} ({}) VALUES {};",
            table.name(),
            column_list.join(", "),
            tuples.join(", ")
        ))
    }
}

impl SqlQb for InsertQb {
    fn build_with(&self, config: &BuilderConfig) -> WalkerResult<Statement> {
        let sql = self.build_insert_sql(config)?;
        Ok(Statement::new(StatementKind::Insert, sql))
    }
}
