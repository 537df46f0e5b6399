//! Literal values and their SQL encoding.
//!
//! [`Value`] is the closed set of things that can appear on the right-hand side of a
//! comparison or in an INSERT/UPDATE: scalars, dates and whitelisted function calls.
//! [`encode`] turns one value into SQL text, escaping string content so it can never
//! terminate the literal early.

use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A literal or passthrough expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`
    Null,
    /// Rendered as `1` / `0`
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Escaped and single-quoted, unless it is a backticked identifier or an allowed call.
    Text(String),
    /// Rendered as `'YYYY-MM-DD HH:MM:SS'`
    DateTime(NaiveDateTime),
    /// `FUNCTION(<encoded arg>)`; the function must be in the allowed set.
    Call { function: String, arg: Box<Value> },
}

impl Value {
    /// Wrap a value in a function call: `Value::call("md5", "secret")` → `MD5('secret')`.
    pub fn call(function: impl Into<String>, arg: impl Into<Value>) -> Self {
        Value::Call {
            function: function.into(),
            arg: Box::new(arg.into()),
        }
    }

    /// A column reference used as a value: `u.id` → `` `u`.`id` ``.
    ///
    /// Only identifier paths are accepted; the name is quoted segment by segment and
    /// never read as an expression.
    pub fn column(name: &str) -> WalkerResult<Self> {
        crate::ident::quote_column(name).map(Value::Text)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Plain text of a scalar, used where the operand is spliced into a pattern (`LIKE`).
    pub(crate) fn pattern_text(&self) -> WalkerResult<String> {
        match self {
            Value::Text(s) => Ok(s.clone()),
            Value::Int(n) => Ok(n.to_string()),
            Value::UInt(n) => Ok(n.to_string()),
            Value::Float(f) => format_float(*f),
            Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            Value::DateTime(dt) => Ok(dt.format(DATETIME_FORMAT).to_string()),
            Value::Null | Value::Call { .. } => Err(WalkerError::invalid_value(
                "pattern operand must be a scalar",
            )),
        }
    }
}

/// Encode a value as SQL text.
///
/// Order of precedence:
/// 1. text that is a whole call to an allowed function → name upper-cased, arguments untouched
/// 2. `NULL`
/// 3. dates → quoted `YYYY-MM-DD HH:MM:SS`
/// 4. [`Value::Call`] → `FUNCTION(encoded inner)`
/// 5. a quoted identifier path (`` `t`.`c` ``) passes through; other text is escaped and single-quoted;
///    numbers are normalized; booleans become `1`/`0`
pub fn encode(value: &Value, config: &BuilderConfig) -> WalkerResult<String> {
    match value {
        Value::Text(s) => {
            if let Some((name, args)) = config.match_call(s) {
                return Ok(format!("{name}({args})"));
            }
            if is_quoted_identifier(s) {
                return Ok(s.clone());
            }
            Ok(quote_literal(s))
        }
        Value::Null => Ok("NULL".to_string()),
        Value::DateTime(dt) => Ok(format!("'{}'", dt.format(DATETIME_FORMAT))),
        Value::Call { function, arg } => {
            if !config.is_allowed(function) {
                return Err(WalkerError::invalid_value(format!(
                    "function `{function}` is not in the allowed set"
                )));
            }
            let inner = encode(arg, config)?;
            Ok(format!("{}({inner})", function.trim().to_ascii_uppercase()))
        }
        Value::Int(n) => Ok(n.to_string()),
        Value::UInt(n) => Ok(n.to_string()),
        Value::Float(f) => format_float(*f),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
    }
}

/// Encode each value and join with `", "`.
pub fn encode_list(values: &[Value], config: &BuilderConfig) -> WalkerResult<String> {
    let encoded = values
        .iter()
        .map(|v| encode(v, config))
        .collect::<WalkerResult<Vec<_>>>()?;
    Ok(encoded.join(", "))
}

/// Backslash-escape the characters that could break out of a MySQL string literal.
///
/// `\0 \b \t \x1a \n \r " ' \ %` map one-to-one onto `\0 \b \t \z \n \r \" \' \\ \%`.
pub fn escape_string(s: &str) -> String {
    escape_chars(s, true)
}

/// `'<escaped>'`
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// A literal that keeps `%` as is, for text outside a LIKE pattern whose exact bytes
/// matter (`MD5('50%')`).
pub(crate) fn quote_text(s: &str) -> String {
    format!("'{}'", escape_chars(s, false))
}

fn escape_chars(s: &str, escape_percent: bool) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\x08' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\x1a' => out.push_str("\\z"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' | '\'' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '%' if escape_percent => out.push_str("\\%"),
            _ => out.push(ch),
        }
    }
    out
}

/// `` `a` ``, `` `a`.`b` `` or `` `a`.`b`.`c` ``, and nothing around it.
fn is_quoted_identifier(s: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^`[^`]+`(\.`[^`]+`){0,2}$").expect("invalid built-in identifier regex")
        })
        .is_match(s)
}

fn format_float(f: f64) -> WalkerResult<String> {
    if !f.is_finite() {
        return Err(WalkerError::invalid_value(format!(
            "cannot encode non-finite number {f}"
        )));
    }
    // `{}` on f64 already drops a zero fraction (`3.0` → `3`) and never uses exponents.
    Ok(format!("{f}"))
}

// ==================== Conversions ====================

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt(u64::from(v))
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::DateTime(v.and_time(chrono::NaiveTime::MIN))
    }
}

/// Zoned timestamps are rendered in UTC.
impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::DateTime(v.with_timezone(&Utc).naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
