//! Backtick-quoted SQL identifier handling.
//!
//! This module provides [`Identifier`], a table reference of the form
//! `database.table AS alias`, and [`column_sql`] for column references.
//!
//! - Pre-existing backticks are stripped before re-quoting, so resolution is idempotent.
//! - Every dotted segment is quoted on its own: `` `db`.`users` ``, never `` `db.users` ``.
//! - The alias is only recognized through the literal, case-sensitive separator ` AS `.
//!
//! # Example
//! ```ignore
//! use dbwalker::Identifier;
//!
//! let t = Identifier::resolve("shop.users AS u")?;
//! assert_eq!(t.name(), "`shop`.`users`");
//! assert_eq!(t.fullname(), "`shop`.`users` AS `u`");
//! # Ok::<(), dbwalker::WalkerError>(())
//! ```

use crate::error::{WalkerError, WalkerResult};

const QUOTE: char = '`';
const ALIAS_SEPARATOR: &str = " AS ";

/// A table identifier: optional database, mandatory table, optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub database: Option<String>,
    pub table: String,
    pub alias: Option<String>,
}

impl Identifier {
    /// Create an identifier for a bare table name.
    pub fn table(table: impl Into<String>) -> WalkerResult<Self> {
        let table = table.into();
        check_segment(&table, &table)?;
        Ok(Self {
            database: None,
            table,
            alias: None,
        })
    }

    /// Parse a raw identifier string.
    ///
    /// - `users`
    /// - `shop.users`
    /// - `` `shop`.`users` AS `u` ``
    pub fn resolve(raw: &str) -> WalkerResult<Self> {
        let unquoted = raw.replace(QUOTE, "");
        let mut pieces = unquoted.split(ALIAS_SEPARATOR);
        let table_expr = pieces.next().unwrap_or_default().trim();
        let alias = pieces.next().map(str::trim);
        if pieces.next().is_some() {
            return Err(WalkerError::invalid_identifier(raw, "more than one ' AS ' separator"));
        }

        let mut segments = table_expr.split('.').rev();
        let table = segments.next().unwrap_or_default().trim();
        let database = segments.next().map(str::trim);
        if segments.next().is_some() {
            return Err(WalkerError::invalid_identifier(
                raw,
                "expected at most `database.table`",
            ));
        }

        check_segment(raw, table)?;
        if let Some(database) = database {
            check_segment(raw, database)?;
        }
        if let Some(alias) = alias {
            check_segment(raw, alias)?;
        }

        Ok(Self {
            database: database.map(str::to_string),
            table: table.to_string(),
            alias: alias.map(str::to_string),
        })
    }

    /// Attach an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Quoted `` `database`.`table` `` (or just `` `table` ``).
    pub fn name(&self) -> String {
        let mut out = String::with_capacity(self.table.len() + 8);
        if let Some(database) = &self.database {
            push_quoted(&mut out, database);
            out.push('.');
        }
        push_quoted(&mut out, &self.table);
        out
    }

    /// [`Identifier::name`] followed by `` AS `alias` `` when an alias is set.
    pub fn fullname(&self) -> String {
        let mut out = self.name();
        if let Some(alias) = &self.alias {
            out.push_str(ALIAS_SEPARATOR);
            push_quoted(&mut out, alias);
        }
        out
    }

    /// The default projection for this table: `` `alias`.* `` or `` `db`.`table`.* ``.
    pub fn all_columns(&self) -> String {
        let mut out = match &self.alias {
            Some(alias) => quote(alias),
            None => self.name(),
        };
        out.push_str(".*");
        out
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fullname())
    }
}

/// Wrap a single name in backticks.
pub fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    push_quoted(&mut out, name);
    out
}

/// Render a column reference.
///
/// Plain identifier paths (`id`, `u.id`, `shop.users.id`, `u.*`) are re-quoted
/// segment by segment. Anything else (`COUNT(o.id)`, `price * qty`) is treated as a
/// caller-written expression and returned unchanged.
pub fn column_sql(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.replace(QUOTE, "");
    let segments: Vec<&str> = unquoted.split('.').collect();
    let last = segments.len() - 1;

    let is_path = segments.len() <= 3
        && segments
            .iter()
            .enumerate()
            .all(|(i, s)| is_plain_word(s) || (i == last && i > 0 && *s == "*"));
    if !is_path {
        return trimmed.to_string();
    }

    let mut out = String::with_capacity(unquoted.len() + segments.len() * 2);
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        if *segment == "*" {
            out.push('*');
        } else {
            push_quoted(&mut out, segment);
        }
    }
    out
}

/// Quote a name that can only be a column: INSERT columns, SET targets, USING lists.
///
/// Unlike [`column_sql`] nothing is taken as an expression. Backticks are stripped and
/// each of at most three dotted segments is quoted, so `user-name` becomes
/// `` `user-name` `` and `first name` becomes `` `first name` ``.
pub fn quote_column(raw: &str) -> WalkerResult<String> {
    let unquoted = raw.replace(QUOTE, "");
    let segments: Vec<&str> = unquoted.split('.').map(str::trim).collect();
    if segments.len() > 3 {
        return Err(WalkerError::invalid_identifier(
            raw,
            "expected at most `database.table.column`",
        ));
    }

    let mut out = String::with_capacity(unquoted.len() + segments.len() * 2);
    for (i, segment) in segments.iter().enumerate() {
        check_segment(raw, segment)?;
        if i > 0 {
            out.push('.');
        }
        push_quoted(&mut out, segment);
    }
    Ok(out)
}

/// `[A-Za-z_][A-Za-z0-9_$]*`
pub(crate) fn is_plain_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric())
}

fn push_quoted(out: &mut String, name: &str) {
    out.push(QUOTE);
    out.push_str(name);
    out.push(QUOTE);
}

fn check_segment(raw: &str, segment: &str) -> WalkerResult<()> {
    if segment.is_empty() {
        return Err(WalkerError::invalid_identifier(raw, "empty identifier segment"));
    }
    if segment.contains('\0') {
        return Err(WalkerError::invalid_identifier(
            raw,
            "identifier cannot contain NUL character",
        ));
    }
    Ok(())
}
