//! SELECT projection assembly.
//!
//! ```ignore
//! use dbwalker::{Column, ProjectionFn};
//!
//! let cols = vec![
//!     Column::raw("u.id"),
//!     Column::aliased("u.name", "name"),
//!     Column::function(ProjectionFn::CountDistinct("o.id".into()), "orders"),
//! ];
//! // u.id, u.name AS `name`, COUNT(DISTINCT `o`.`id`) AS `orders`
//! ```

use crate::error::{WalkerError, WalkerResult};
use crate::ident::{Identifier, column_sql, is_plain_word, quote};

/// Aggregate / string function wrapping a projected column.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionFn {
    /// `COUNT(DISTINCT `col`)`
    CountDistinct(String),
    /// `CONCAT(a, b, ...)`
    Concat(Vec<String>),
    /// `GROUP_CONCAT(a, ...)`
    GroupConcat(Vec<String>),
    /// `NAME(`col`)` for any other single-argument function.
    Call { name: String, column: String },
}

impl ProjectionFn {
    /// Pick the function for a declarative key: `count_distinct`, `concat`,
    /// `group_concat`, or a generic single-column call.
    pub fn from_key(key: &str, args: Vec<String>) -> WalkerResult<Self> {
        match key {
            "count_distinct" => Ok(ProjectionFn::CountDistinct(single_arg(key, args)?)),
            "concat" => Ok(ProjectionFn::Concat(args)),
            "group_concat" => Ok(ProjectionFn::GroupConcat(args)),
            _ => Ok(ProjectionFn::Call {
                name: key.to_string(),
                column: single_arg(key, args)?,
            }),
        }
    }

    fn to_sql(&self) -> WalkerResult<String> {
        let sql = match self {
            ProjectionFn::CountDistinct(col) => format!("COUNT(DISTINCT {})", column_sql(col)),
            ProjectionFn::Concat(args) => format!("CONCAT({})", render_args("concat", args)?),
            ProjectionFn::GroupConcat(args) => {
                format!("GROUP_CONCAT({})", render_args("group_concat", args)?)
            }
            ProjectionFn::Call { name, column } => {
                if !is_plain_word(name) {
                    return Err(WalkerError::UnsupportedColumnShape(format!(
                        "'{name}' is not a function name"
                    )));
                }
                format!("{}({})", name.to_ascii_uppercase(), column_sql(column))
            }
        };
        Ok(sql)
    }
}

/// One projected column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Emitted verbatim.
    Raw(String),
    /// `<expr> AS `alias``
    Aliased { expr: String, alias: String },
    /// `FUNC(...) AS `alias``
    Function { function: ProjectionFn, alias: String },
}

impl Column {
    pub fn raw(expr: impl Into<String>) -> Self {
        Column::Raw(expr.into())
    }

    pub fn aliased(expr: impl Into<String>, alias: impl Into<String>) -> Self {
        Column::Aliased {
            expr: expr.into(),
            alias: alias.into(),
        }
    }

    pub fn function(function: ProjectionFn, alias: impl Into<String>) -> Self {
        Column::Function {
            function,
            alias: alias.into(),
        }
    }

    pub fn count_distinct(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::function(ProjectionFn::CountDistinct(column.into()), alias)
    }

    pub fn concat<S: Into<String>>(
        args: impl IntoIterator<Item = S>,
        alias: impl Into<String>,
    ) -> Self {
        Self::function(
            ProjectionFn::Concat(args.into_iter().map(Into::into).collect()),
            alias,
        )
    }

    pub fn group_concat<S: Into<String>>(
        args: impl IntoIterator<Item = S>,
        alias: impl Into<String>,
    ) -> Self {
        Self::function(
            ProjectionFn::GroupConcat(args.into_iter().map(Into::into).collect()),
            alias,
        )
    }

    pub fn to_sql(&self) -> WalkerResult<String> {
        match self {
            Column::Raw(expr) => Ok(expr.clone()),
            Column::Aliased { expr, alias } => Ok(format!("{expr} AS {}", alias_sql(alias)?)),
            Column::Function { function, alias } => {
                Ok(format!("{} AS {}", function.to_sql()?, alias_sql(alias)?))
            }
        }
    }
}

impl From<&str> for Column {
    fn from(s: &str) -> Self {
        Column::Raw(s.to_string())
    }
}

impl From<String> for Column {
    fn from(s: String) -> Self {
        Column::Raw(s)
    }
}

/// Render the projection list. An empty list falls back to `<table-or-alias>.*`
/// when the table is known.
pub fn build_columns(columns: &[Column], table: Option<&Identifier>) -> WalkerResult<Vec<String>> {
    let mut out = columns
        .iter()
        .map(Column::to_sql)
        .collect::<WalkerResult<Vec<_>>>()?;
    if out.is_empty() {
        if let Some(table) = table {
            out.push(table.all_columns());
        }
    }
    Ok(out)
}

fn alias_sql(alias: &str) -> WalkerResult<String> {
    let alias = alias.replace('`', "");
    let alias = alias.trim();
    if alias.is_empty() {
        return Err(WalkerError::UnsupportedColumnShape(
            "column alias cannot be empty".to_string(),
        ));
    }
    Ok(quote(alias))
}

fn single_arg(key: &str, mut args: Vec<String>) -> WalkerResult<String> {
    if args.len() != 1 {
        return Err(WalkerError::UnsupportedColumnShape(format!(
            "`{key}` takes exactly one column, got {}",
            args.len()
        )));
    }
    Ok(args.remove(0))
}

fn render_args(key: &str, args: &[String]) -> WalkerResult<String> {
    if args.is_empty() {
        return Err(WalkerError::UnsupportedColumnShape(format!(
            "`{key}` needs at least one argument"
        )));
    }
    Ok(args.iter().map(|a| column_sql(a)).collect::<Vec<_>>().join(", "))
}
