//! The immutable result of a build call.

use serde::Serialize;
use sqlformat::{FormatOptions, Indent, QueryParams};
use std::fmt;

/// The kind of SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Anything else (`DESCRIBE`, `SHOW`, `REPLACE`, ...).
    Raw,
}

impl StatementKind {
    /// Classify hand-written SQL by its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();
        if keyword.eq_ignore_ascii_case("SELECT") {
            StatementKind::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            StatementKind::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            StatementKind::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Raw
        }
    }

    /// Whether the statement modifies rows.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            StatementKind::Insert | StatementKind::Update | StatementKind::Delete
        )
    }
}

/// Fully assembled SQL text for one operation.
///
/// Builders never cache the last statement; each build returns a fresh value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, sql: String) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "dbwalker.sql", kind = ?kind, sql = %sql, "built statement");
        Self { kind, sql }
    }

    /// Wrap hand-written SQL, classified by its leading keyword.
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self::new(StatementKind::from_sql(&sql), sql)
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn into_string(self) -> String {
        self.sql
    }

    /// Multi-line rendering for logs and debugging, indented by four spaces.
    ///
    /// Literals are kept verbatim; only whitespace between tokens changes.
    pub fn pretty(&self) -> String {
        let options = FormatOptions {
            indent: Indent::Spaces(4),
            ..FormatOptions::default()
        };
        sqlformat::format(&self.sql, &QueryParams::None, options)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl AsRef<str> for Statement {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

impl From<Statement> for String {
    fn from(s: Statement) -> Self {
        s.sql
    }
}
