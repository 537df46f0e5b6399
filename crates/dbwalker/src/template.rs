//! Literal inlining for hand-written SQL.
//!
//! Placeholders are replaced by encoded literals before the text leaves the crate;
//! nothing is bound by the server. Markers inside quoted strings or backticked
//! identifiers are left alone.
//!
//! ```ignore
//! use dbwalker::template;
//!
//! let stmt = template::interpolate("SELECT * FROM t WHERE id = ? AND name = ?", &[5.into(), "o'neil".into()])?;
//! // SELECT * FROM t WHERE id = 5 AND name = 'o\'neil'
//!
//! let stmt = template::interpolate_named(
//!     "UPDATE t SET seen = :now WHERE id = :id",
//!     [("now", "NOW()".into()), ("id", 5.into())],
//! )?;
//! ```

use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::ident::is_plain_word;
use crate::statement::{Statement, StatementKind};
use crate::value::{Value, encode};
use std::collections::HashMap;

/// Replace each positional `?` with the next value, in order.
pub fn interpolate(sql: &str, values: &[Value]) -> WalkerResult<Statement> {
    interpolate_with(sql, values, BuilderConfig::shared())
}

/// [`interpolate`] with an explicit configuration.
pub fn interpolate_with(
    sql: &str,
    values: &[Value],
    config: &BuilderConfig,
) -> WalkerResult<Statement> {
    let mut out = String::with_capacity(sql.len() + values.len() * 8);
    let mut next = values.iter();
    let mut used = 0usize;

    scan(sql, |segment| match segment {
        Segment::Text(text) => {
            out.push_str(text);
            Ok(())
        }
        Segment::Positional => {
            let value = next.next().ok_or_else(|| {
                WalkerError::invalid_value(format!(
                    "template has more `?` markers than the {} values given",
                    values.len()
                ))
            })?;
            out.push_str(&encode(value, config)?);
            used += 1;
            Ok(())
        }
        Segment::Named(name) => {
            out.push(':');
            out.push_str(name);
            Ok(())
        }
    })?;

    if used != values.len() {
        return Err(WalkerError::invalid_value(format!(
            "template has {used} `?` markers but {} values were given",
            values.len()
        )));
    }
    Ok(Statement::new(StatementKind::from_sql(&out), out))
}

/// Replace each `:name` marker with the value of the same name.
///
/// Values that no marker refers to are ignored. `::` and `:=` are not markers.
pub fn interpolate_named<K, I>(sql: &str, values: I) -> WalkerResult<Statement>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    interpolate_named_with(sql, values, BuilderConfig::shared())
}

/// [`interpolate_named`] with an explicit configuration.
pub fn interpolate_named_with<K, I>(
    sql: &str,
    values: I,
    config: &BuilderConfig,
) -> WalkerResult<Statement>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    let values: HashMap<String, Value> = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
    let mut out = String::with_capacity(sql.len());

    scan(sql, |segment| match segment {
        Segment::Text(text) => {
            out.push_str(text);
            Ok(())
        }
        Segment::Positional => {
            out.push('?');
            Ok(())
        }
        Segment::Named(name) => {
            let value = values
                .get(name)
                .ok_or_else(|| WalkerError::missing(format!("value for :{name}")))?;
            out.push_str(&encode(value, config)?);
            Ok(())
        }
    })?;

    Ok(Statement::new(StatementKind::from_sql(&out), out))
}

enum Segment<'a> {
    Text(&'a str),
    Positional,
    Named(&'a str),
}

/// Walk `sql`, reporting literal text runs and placeholder markers outside quotes.
fn scan<'a>(
    sql: &'a str,
    mut emit: impl FnMut(Segment<'a>) -> WalkerResult<()>,
) -> WalkerResult<()> {
    let bytes = sql.as_bytes();
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' && q != b'`' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' | b'`' => {
                quote = Some(b);
                i += 1;
            }
            b'?' => {
                emit(Segment::Text(&sql[start..i]))?;
                emit(Segment::Positional)?;
                i += 1;
                start = i;
            }
            b':' => {
                let prev_colon = i > 0 && bytes[i - 1] == b':';
                let name_len = sql[i + 1..]
                    .find(|c: char| !(c == '_' || c.is_ascii_alphanumeric()))
                    .unwrap_or(sql.len() - i - 1);
                let name = &sql[i + 1..i + 1 + name_len];
                if !prev_colon && is_plain_word(name) {
                    emit(Segment::Text(&sql[start..i]))?;
                    emit(Segment::Named(name))?;
                    i += 1 + name_len;
                    start = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    emit(Segment::Text(&sql[start.min(sql.len())..]))
}
