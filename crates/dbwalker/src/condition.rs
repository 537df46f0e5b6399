//! Condition primitives for WHERE / HAVING / ON clauses.
//!
//! A [`Predicate`] is one boolean test: a trusted raw SQL fragment or a column
//! compared through exactly one [`Op`]. A [`Condition`] is either a single predicate
//! or an OR-group of predicates. A list of conditions is AND-joined by [`build_where`],
//! so `[a, any_of(b, c)]` renders `a AND (b OR c)`. Groups cannot nest further.
//!
//! # Example
//! ```ignore
//! use dbwalker::{Condition, Predicate};
//!
//! let conds = vec![
//!     Predicate::is("id", 5).into(),
//!     Condition::any_of([Predicate::is("x", 1), Predicate::is("y", 2)]),
//! ];
//! // `id` = 5 AND (`x` = 1 OR `y` = 2)
//! ```

use crate::config::BuilderConfig;
use crate::error::WalkerResult;
use crate::ident::column_sql;
use crate::value::{Value, encode, encode_list, escape_string};

/// Comparison operator, one per condition key.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `= v`
    Is(Value),
    /// `!= v`
    NotIs(Value),
    /// `LIKE '%x%'`
    Like(String),
    /// `NOT LIKE '%x%'`
    NotLike(String),
    /// `LIKE 'x%'`
    StartWith(String),
    /// `LIKE '%x'`
    EndWith(String),
    /// `IN (a, b, ...)`
    In(Vec<Value>),
    /// `NOT IN (a, b, ...)`
    NotIn(Vec<Value>),
    /// `BETWEEN a AND b`
    Between(Value, Value),
    /// `NOT BETWEEN a AND b`
    NotBetween(Value, Value),
    IsNull,
    NotNull,
    /// `= ''`
    IsEmpty,
    /// `!= ''`
    NotEmpty,
    /// `FIND_IN_SET(v, column)`
    FindInSet(Value),
}

impl Op {
    /// The declarative key this operator is spelled with.
    pub fn key(&self) -> &'static str {
        match self {
            Op::Is(_) => "is",
            Op::NotIs(_) => "not_is",
            Op::Like(_) => "like",
            Op::NotLike(_) => "not_like",
            Op::StartWith(_) => "start_with",
            Op::EndWith(_) => "end_with",
            Op::In(_) => "in",
            Op::NotIn(_) => "not_in",
            Op::Between(..) => "between",
            Op::NotBetween(..) => "not_between",
            Op::IsNull => "is_null",
            Op::NotNull => "not_null",
            Op::IsEmpty => "is_empty",
            Op::NotEmpty => "not_empty",
            Op::FindInSet(_) => "find_in_set",
        }
    }
}

/// A column compared through one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub op: Op,
}

impl Comparison {
    pub fn new(column: impl Into<String>, op: Op) -> Self {
        Self {
            column: column.into(),
            op,
        }
    }

    /// Render `<column> <op> <operand>`.
    pub fn to_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        let col = column_sql(&self.column);
        let sql = match &self.op {
            Op::Is(v) => format!("{col} = {}", encode(v, config)?),
            Op::NotIs(v) => format!("{col} != {}", encode(v, config)?),
            Op::Like(p) => format!("{col} LIKE '%{}%'", escape_string(p.trim_matches('%'))),
            Op::NotLike(p) => {
                format!("{col} NOT LIKE '%{}%'", escape_string(p.trim_matches('%')))
            }
            Op::StartWith(p) => format!("{col} LIKE '{}%'", escape_string(p)),
            Op::EndWith(p) => format!("{col} LIKE '%{}'", escape_string(p)),
            // Empty lists can never / always hold.
            Op::In(vals) if vals.is_empty() => "1=0".to_string(),
            Op::NotIn(vals) if vals.is_empty() => "1=1".to_string(),
            Op::In(vals) => format!("{col} IN ({})", encode_list(vals, config)?),
            Op::NotIn(vals) => format!("{col} NOT IN ({})", encode_list(vals, config)?),
            Op::Between(a, b) => format!(
                "{col} BETWEEN {} AND {}",
                encode(a, config)?,
                encode(b, config)?
            ),
            Op::NotBetween(a, b) => format!(
                "{col} NOT BETWEEN {} AND {}",
                encode(a, config)?,
                encode(b, config)?
            ),
            Op::IsNull => format!("{col} IS NULL"),
            Op::NotNull => format!("{col} IS NOT NULL"),
            Op::IsEmpty => format!("{col} = ''"),
            Op::NotEmpty => format!("{col} != ''"),
            Op::FindInSet(v) => format!("FIND_IN_SET({}, {col})", encode(v, config)?),
        };
        Ok(sql)
    }
}

/// One boolean test.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Trusted SQL, emitted verbatim.
    Raw(String),
    Compare(Comparison),
}

impl Predicate {
    /// Raw SQL condition (escape hatch).
    ///
    /// # Safety
    /// The text is not escaped; never build it from user input.
    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    /// Structured comparison.
    pub fn new(column: impl Into<String>, op: Op) -> Self {
        Predicate::Compare(Comparison::new(column, op))
    }

    /// column = value
    pub fn is(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Is(value.into()))
    }

    /// column != value
    pub fn not_is(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Op::NotIs(value.into()))
    }

    /// column LIKE '%text%'
    pub fn like(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(column, Op::Like(text.into()))
    }

    /// column NOT LIKE '%text%'
    pub fn not_like(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(column, Op::NotLike(text.into()))
    }

    /// column LIKE 'text%'
    pub fn start_with(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(column, Op::StartWith(text.into()))
    }

    /// column LIKE '%text'
    pub fn end_with(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(column, Op::EndWith(text.into()))
    }

    /// column IN (values...)
    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(column, Op::In(values.into_iter().map(Into::into).collect()))
    }

    /// column NOT IN (values...)
    pub fn not_in<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(column, Op::NotIn(values.into_iter().map(Into::into).collect()))
    }

    /// column BETWEEN from AND to
    pub fn between(column: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::new(column, Op::Between(from.into(), to.into()))
    }

    /// column NOT BETWEEN from AND to
    pub fn not_between(
        column: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Self::new(column, Op::NotBetween(from.into(), to.into()))
    }

    /// column IS NULL
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, Op::IsNull)
    }

    /// column IS NOT NULL
    pub fn not_null(column: impl Into<String>) -> Self {
        Self::new(column, Op::NotNull)
    }

    /// column = ''
    pub fn is_empty(column: impl Into<String>) -> Self {
        Self::new(column, Op::IsEmpty)
    }

    /// column != ''
    pub fn not_empty(column: impl Into<String>) -> Self {
        Self::new(column, Op::NotEmpty)
    }

    /// FIND_IN_SET(value, column)
    pub fn find_in_set(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Op::FindInSet(value.into()))
    }

    /// Holds for every row without reading it (`NOT IN ()`).
    pub fn is_always_true(&self) -> bool {
        matches!(self, Predicate::Compare(Comparison { op: Op::NotIn(vals), .. }) if vals.is_empty())
    }

    pub fn to_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        match self {
            Predicate::Raw(sql) => Ok(sql.clone()),
            Predicate::Compare(cmp) => cmp.to_sql(config),
        }
    }
}

/// A single predicate or an OR-group of predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Single(Predicate),
    AnyOf(Vec<Predicate>),
}

impl Condition {
    /// Raw SQL condition (escape hatch).
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Single(Predicate::raw(sql))
    }

    /// OR-group: `(a OR b OR ...)`.
    pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Condition::AnyOf(predicates.into_iter().collect())
    }

    /// Holds for every row: an always-true predicate, or a group containing one.
    pub fn is_always_true(&self) -> bool {
        match self {
            Condition::Single(p) => p.is_always_true(),
            Condition::AnyOf(preds) => preds.iter().any(Predicate::is_always_true),
        }
    }

    /// Render this condition. An empty OR-group renders `1=0`.
    pub fn to_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        match self {
            Condition::Single(p) => p.to_sql(config),
            Condition::AnyOf(preds) if preds.is_empty() => Ok("1=0".to_string()),
            Condition::AnyOf(preds) => {
                let parts = preds
                    .iter()
                    .map(|p| p.to_sql(config))
                    .collect::<WalkerResult<Vec<_>>>()?;
                Ok(format!("({})", parts.join(" OR ")))
            }
        }
    }
}

impl From<Predicate> for Condition {
    fn from(p: Predicate) -> Self {
        Condition::Single(p)
    }
}

impl From<Comparison> for Condition {
    fn from(c: Comparison) -> Self {
        Condition::Single(Predicate::Compare(c))
    }
}

/// AND-join a list of conditions. Returns `None` for an empty list so the caller
/// can drop the whole clause.
pub fn build_where(
    conditions: &[Condition],
    config: &BuilderConfig,
) -> WalkerResult<Option<String>> {
    if conditions.is_empty() {
        return Ok(None);
    }
    let parts = conditions
        .iter()
        .map(|c| c.to_sql(config))
        .collect::<WalkerResult<Vec<_>>>()?;
    Ok(Some(parts.join(" AND ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(p: Predicate) -> String {
        p.to_sql(BuilderConfig::shared()).unwrap()
    }

    #[test]
    fn equality_and_inequality() {
        assert_eq!(sql(Predicate::is("id", 5)), "`id` = 5");
        assert_eq!(sql(Predicate::not_is("status", "gone")), "`status` != 'gone'");
        assert_eq!(sql(Predicate::is("u.id", 5)), "`u`.`id` = 5");
        assert_eq!(sql(Predicate::is("deleted_at", Value::Null)), "`deleted_at` = NULL");
    }

    #[test]
    fn like_family() {
        assert_eq!(sql(Predicate::like("name", "%ali%")), "`name` LIKE '%ali%'");
        assert_eq!(sql(Predicate::like("name", "ali")), "`name` LIKE '%ali%'");
        assert_eq!(sql(Predicate::not_like("name", "bob")), "`name` NOT LIKE '%bob%'");
        assert_eq!(sql(Predicate::start_with("name", "al")), "`name` LIKE 'al%'");
        assert_eq!(sql(Predicate::end_with("email", "@x.io")), "`email` LIKE '%@x.io'");
        assert_eq!(sql(Predicate::like("name", "o'neil")), r"`name` LIKE '%o\'neil%'");
        assert_eq!(sql(Predicate::like("rate", "5%x")), r"`rate` LIKE '%5\%x%'");
    }

    #[test]
    fn in_lists() {
        assert_eq!(sql(Predicate::in_list("id", [1, 2, 3])), "`id` IN (1, 2, 3)");
        assert_eq!(
            sql(Predicate::not_in("role", ["a", "b"])),
            "`role` NOT IN ('a', 'b')"
        );
        assert_eq!(sql(Predicate::in_list("id", Vec::<i32>::new())), "1=0");
        assert_eq!(sql(Predicate::not_in("id", Vec::<i32>::new())), "1=1");
    }

    #[test]
    fn between_literals() {
        assert_eq!(
            sql(Predicate::between("created_at", "2022-01-01", "2022-01-31")),
            "`created_at` BETWEEN '2022-01-01' AND '2022-01-31'"
        );
        assert_eq!(
            sql(Predicate::not_between("age", 18, 65)),
            "`age` NOT BETWEEN 18 AND 65"
        );
    }

    #[test]
    fn null_and_empty_checks() {
        assert_eq!(sql(Predicate::is_null("deleted_at")), "`deleted_at` IS NULL");
        assert_eq!(sql(Predicate::not_null("deleted_at")), "`deleted_at` IS NOT NULL");
        assert_eq!(sql(Predicate::is_empty("email")), "`email` = ''");
        assert_eq!(sql(Predicate::not_empty("email")), "`email` != ''");
    }

    #[test]
    fn find_in_set() {
        assert_eq!(
            sql(Predicate::find_in_set("tags", "red")),
            "FIND_IN_SET('red', `tags`)"
        );
    }

    #[test]
    fn expression_columns_are_not_quoted() {
        assert_eq!(sql(Predicate::is("COUNT(o.id)", 5)), "COUNT(o.id) = 5");
    }

    #[test]
    fn raw_passes_through() {
        assert_eq!(sql(Predicate::raw("a.id = b.a_id")), "a.id = b.a_id");
    }

    #[test]
    fn and_or_composition() {
        let conds = vec![
            Predicate::is("id", 5).into(),
            Condition::any_of([Predicate::is("x", 1), Predicate::is("y", 2)]),
        ];
        let out = build_where(&conds, BuilderConfig::shared()).unwrap();
        assert_eq!(out.as_deref(), Some("`id` = 5 AND (`x` = 1 OR `y` = 2)"));
    }

    #[test]
    fn empty_where_is_none() {
        assert_eq!(build_where(&[], BuilderConfig::shared()).unwrap(), None);
    }

    #[test]
    fn empty_group_never_holds() {
        let conds = vec![Condition::any_of([])];
        let out = build_where(&conds, BuilderConfig::shared()).unwrap();
        assert_eq!(out.as_deref(), Some("1=0"));
    }

    #[test]
    fn always_true_conditions() {
        assert!(Condition::from(Predicate::not_in("id", Vec::<i32>::new())).is_always_true());
        assert!(
            Condition::any_of([Predicate::is("a", 1), Predicate::not_in("b", Vec::<i32>::new())])
                .is_always_true()
        );
        assert!(!Condition::from(Predicate::in_list("id", Vec::<i32>::new())).is_always_true());
        assert!(!Condition::from(Predicate::not_in("id", [1])).is_always_true());
        assert!(!Condition::any_of([]).is_always_true());
    }

    #[test]
    fn errors_propagate_from_values() {
        let conds = vec![Condition::from(Predicate::is("x", Value::call("sleep", 1)))];
        assert!(build_where(&conds, BuilderConfig::shared()).is_err());
    }
}
