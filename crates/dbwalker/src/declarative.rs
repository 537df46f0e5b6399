//! JSON front end for the statement builders.
//!
//! Accepts loosely-typed parameter objects and normalizes them into the typed
//! model before any SQL is produced. Shapes that could be read more than one way
//! are rejected instead of guessed.
//!
//! ```ignore
//! use dbwalker::declarative;
//! use serde_json::json;
//!
//! let stmt = declarative::build_select(&json!({
//!     "table": "users AS u",
//!     "columns": ["u.id", {"field": "u.name", "alias": "name"}],
//!     "joins": [["LEFT", "orders AS o", [{"field": "o.user_id", "is": "`u`.`id`"}]]],
//!     "where": [
//!         {"field": "u.status", "is": "active"},
//!         [{"field": "u.role", "is": "admin"}, {"field": "u.role", "is": "owner"}]
//!     ],
//!     "order_by": "u.id DESC",
//!     "limit": 10
//! }))?;
//! ```
//!
//! Condition entries:
//!
//! | shape | meaning |
//! |---|---|
//! | `"a = b"` | raw SQL |
//! | `{"field": "c", "<op>": v}` | comparison, exactly one operator key |
//! | `{"is_null": "c"}` | null / empty check on column `c` |
//! | `{"c": v}` | `c = v` |
//! | `[entry, entry]` | OR-group |

use crate::columns::{Column, ProjectionFn};
use crate::condition::{Condition, Op, Predicate};
use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::join::{Join, JoinKind};
use crate::qb::{DeleteQb, InsertQb, SelectQb, SqlQb, UpdateQb};
use crate::row::Row;
use crate::statement::Statement;
use crate::value::Value;
use serde_json::{Map, Number, Value as JsonValue};

type JsonMap = Map<String, JsonValue>;

/// Keys naming the compared column.
const FIELD_KEYS: &[&str] = &["field", "column"];

/// Recognized operator keys, aliases included.
const OPERATOR_KEYS: &[&str] = &[
    "is",
    "not_is",
    "like",
    "not_like",
    "start_with",
    "end_with",
    "in",
    "not_in",
    "between",
    "is_between",
    "not_between",
    "is_null",
    "not_null",
    "is_not_null",
    "is_empty",
    "not_empty",
    "find_in_set",
];

const SELECT_KEYS: &[&str] = &[
    "table", "columns", "fields", "joins", "where", "having", "group_by", "order_by", "limit",
    "offset",
];
const INSERT_KEYS: &[&str] = &["table", "data"];
const UPDATE_KEYS: &[&str] = &["table", "data", "joins", "where", "having"];
const DELETE_KEYS: &[&str] = &["table", "where", "allow_delete_all", "secure"];

// ==================== Values ====================

/// Convert one JSON operand into a [`Value`].
///
/// A single-key object is a function wrapper: `{"md5": "x"}` → `MD5('x')`. Whether
/// the function is allowed is checked when the value is encoded.
pub fn value_from_json(json: &JsonValue) -> WalkerResult<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => number_value(n),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Object(map) => {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (Some((function, arg)), None) => {
                    Ok(Value::call(function.as_str(), value_from_json(arg)?))
                }
                _ => Err(WalkerError::invalid_value(
                    "a function value must be an object with exactly one key",
                )),
            }
        }
        JsonValue::Array(_) => Err(WalkerError::invalid_value(
            "a list is only valid as an `in`, `not_in` or `between` operand",
        )),
    }
}

fn number_value(n: &Number) -> WalkerResult<Value> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Int(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::UInt(u))
    } else if let Some(f) = n.as_f64() {
        Ok(Value::Float(f))
    } else {
        Err(WalkerError::invalid_value(format!("unsupported number {n}")))
    }
}

// ==================== Conditions ====================

/// Parse a `where` / `having` / `on` parameter into AND-combined conditions.
///
/// `null` means no conditions; a string is one raw condition; an object is one
/// comparison; an array holds entries, where a nested array is an OR-group.
pub fn conditions_from_json(json: &JsonValue) -> WalkerResult<Vec<Condition>> {
    match json {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        JsonValue::String(s) => Ok(vec![Condition::raw(s.clone())]),
        JsonValue::Object(map) => Ok(vec![Condition::Single(predicate_from_map(map)?)]),
        JsonValue::Array(items) => items.iter().map(condition_from_json).collect(),
        other => Err(WalkerError::condition_shape(format!(
            "expected a string, object or array of conditions, got {}",
            kind_of(other)
        ))),
    }
}

/// Parse one condition entry. An array is an OR-group of raw strings and objects.
pub fn condition_from_json(json: &JsonValue) -> WalkerResult<Condition> {
    match json {
        JsonValue::String(s) => Ok(Condition::raw(s.clone())),
        JsonValue::Object(map) => Ok(Condition::Single(predicate_from_map(map)?)),
        JsonValue::Array(items) => items
            .iter()
            .map(group_member)
            .collect::<WalkerResult<Vec<_>>>()
            .map(Condition::AnyOf),
        other => Err(WalkerError::condition_shape(format!(
            "a condition must be a string, object or array, got {}",
            kind_of(other)
        ))),
    }
}

fn group_member(json: &JsonValue) -> WalkerResult<Predicate> {
    match json {
        JsonValue::String(s) => Ok(Predicate::raw(s.clone())),
        JsonValue::Object(map) => predicate_from_map(map),
        JsonValue::Array(_) => Err(WalkerError::condition_shape(
            "OR-groups cannot be nested",
        )),
        other => Err(WalkerError::condition_shape(format!(
            "an OR-group member must be a string or object, got {}",
            kind_of(other)
        ))),
    }
}

/// Parse one comparison object.
fn predicate_from_map(map: &JsonMap) -> WalkerResult<Predicate> {
    let field = field_of(map)?;
    let operators: Vec<(&str, &JsonValue)> = map
        .iter()
        .filter(|(k, _)| OPERATOR_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    let others: Vec<(&str, &JsonValue)> = map
        .iter()
        .filter(|(k, _)| {
            !OPERATOR_KEYS.contains(&k.as_str()) && !FIELD_KEYS.contains(&k.as_str())
        })
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    if operators.len() > 1 {
        let keys: Vec<&str> = operators.iter().map(|(k, _)| *k).collect();
        return Err(WalkerError::ambiguous(format!(
            "one operator expected, found {}",
            keys.join(", ")
        )));
    }

    match (field, operators.first(), others.as_slice()) {
        (Some(field), Some(&(key, operand)), []) => operator_predicate(field, key, operand),
        (Some(field), None, []) => Err(WalkerError::missing(format!(
            "operator for field `{field}`"
        ))),
        (Some(_), _, [(key, _), ..]) => Err(WalkerError::condition_shape(format!(
            "unknown condition key `{key}`"
        ))),
        (None, Some(&(key, operand)), []) => column_check(key, operand),
        (None, None, [(column, value)]) => Ok(Predicate::is(*column, value_from_json(value)?)),
        (None, None, []) => Err(WalkerError::condition_shape("empty condition object")),
        (None, _, _) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(WalkerError::ambiguous(format!(
                "condition without `field` must have a single key, found {}",
                keys.join(", ")
            )))
        }
    }
}

fn field_of(map: &JsonMap) -> WalkerResult<Option<&str>> {
    let raw = match (map.get("field"), map.get("column")) {
        (Some(_), Some(_)) => {
            return Err(WalkerError::ambiguous("both `field` and `column` given"));
        }
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => return Ok(None),
    };
    match raw.as_str().map(str::trim) {
        Some("") => Err(WalkerError::missing("field")),
        Some(field) => Ok(Some(field)),
        None => Err(WalkerError::condition_shape("`field` must be a string")),
    }
}

fn operator_predicate(field: &str, key: &str, operand: &JsonValue) -> WalkerResult<Predicate> {
    let op = match key {
        "is" => Op::Is(value_from_json(operand)?),
        "not_is" => Op::NotIs(value_from_json(operand)?),
        "like" => Op::Like(pattern_from_json(key, operand)?),
        "not_like" => Op::NotLike(pattern_from_json(key, operand)?),
        "start_with" => Op::StartWith(pattern_from_json(key, operand)?),
        "end_with" => Op::EndWith(pattern_from_json(key, operand)?),
        "in" => Op::In(list_from_json(key, operand)?),
        "not_in" => Op::NotIn(list_from_json(key, operand)?),
        "between" | "is_between" => {
            let (from, to) = bounds_from_json(key, operand)?;
            Op::Between(from, to)
        }
        "not_between" => {
            let (from, to) = bounds_from_json(key, operand)?;
            Op::NotBetween(from, to)
        }
        "is_null" => flag(key, operand, Op::IsNull, Op::NotNull)?,
        "not_null" | "is_not_null" => flag(key, operand, Op::NotNull, Op::IsNull)?,
        "is_empty" => flag(key, operand, Op::IsEmpty, Op::NotEmpty)?,
        "not_empty" => flag(key, operand, Op::NotEmpty, Op::IsEmpty)?,
        "find_in_set" => Op::FindInSet(value_from_json(operand)?),
        _ => {
            return Err(WalkerError::condition_shape(format!(
                "unknown operator `{key}`"
            )));
        }
    };
    Ok(Predicate::new(field, op))
}

/// `{"is_null": "deleted_at"}`: the operand names the column.
fn column_check(key: &str, operand: &JsonValue) -> WalkerResult<Predicate> {
    let column = match operand.as_str().map(str::trim) {
        Some(column) if !column.is_empty() => column,
        _ => return Err(WalkerError::missing(format!("field for `{key}`"))),
    };
    match key {
        "is_null" => Ok(Predicate::is_null(column)),
        "not_null" | "is_not_null" => Ok(Predicate::not_null(column)),
        "is_empty" => Ok(Predicate::is_empty(column)),
        "not_empty" => Ok(Predicate::not_empty(column)),
        _ => Err(WalkerError::missing(format!("field for `{key}`"))),
    }
}

/// `true` selects the operator, `false` its negation.
fn flag(key: &str, operand: &JsonValue, yes: Op, no: Op) -> WalkerResult<Op> {
    match operand {
        JsonValue::Bool(true) => Ok(yes),
        JsonValue::Bool(false) => Ok(no),
        other => Err(WalkerError::condition_shape(format!(
            "`{key}` with a field expects true or false, got {}",
            kind_of(other)
        ))),
    }
}

fn pattern_from_json(key: &str, operand: &JsonValue) -> WalkerResult<String> {
    match operand {
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_) => {
            value_from_json(operand)?.pattern_text()
        }
        other => Err(WalkerError::condition_shape(format!(
            "`{key}` expects text, got {}",
            kind_of(other)
        ))),
    }
}

fn list_from_json(key: &str, operand: &JsonValue) -> WalkerResult<Vec<Value>> {
    match operand {
        JsonValue::Array(items) => items.iter().map(value_from_json).collect(),
        JsonValue::Null => Err(WalkerError::condition_shape(format!(
            "`{key}` expects a list of values"
        ))),
        scalar => Ok(vec![value_from_json(scalar)?]),
    }
}

fn bounds_from_json(key: &str, operand: &JsonValue) -> WalkerResult<(Value, Value)> {
    match operand.as_array().map(Vec::as_slice) {
        Some([from, to]) => Ok((value_from_json(from)?, value_from_json(to)?)),
        _ => Err(WalkerError::condition_shape(format!(
            "`{key}` expects a two-element array"
        ))),
    }
}

// ==================== Joins ====================

/// Parse a `joins` parameter: one join object, or an array of tuples / objects.
pub fn joins_from_json(json: &JsonValue) -> WalkerResult<Vec<Join>> {
    match json {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Object(_) => Ok(vec![join_from_json(json)?]),
        JsonValue::Array(items) => items.iter().map(join_from_json).collect(),
        other => Err(WalkerError::UnsupportedJoinShape(format!(
            "expected an array of joins, got {}",
            kind_of(other)
        ))),
    }
}

/// Parse one join: `["LEFT", "orders AS o", on]` or
/// `{"type": "inner", "table": "orders", "on": ..., "using": ...}`.
pub fn join_from_json(json: &JsonValue) -> WalkerResult<Join> {
    match json {
        JsonValue::Array(items) => match items.as_slice() {
            [kind, table, on] => {
                let kind = kind.as_str().ok_or_else(|| {
                    WalkerError::UnsupportedJoinShape("join type must be a string".to_string())
                })?;
                let table = join_table(table)?;
                Ok(Join::new(JoinKind::parse(kind)?, table).on(conditions_from_json(on)?))
            }
            _ => Err(WalkerError::UnsupportedJoinShape(format!(
                "a join tuple is [type, table, on], got {} elements",
                items.len()
            ))),
        },
        JsonValue::Object(map) => join_from_map(map),
        other => Err(WalkerError::UnsupportedJoinShape(format!(
            "a join must be a tuple or an object, got {}",
            kind_of(other)
        ))),
    }
}

fn join_from_map(map: &JsonMap) -> WalkerResult<Join> {
    if let Some(key) = map
        .keys()
        .find(|k| !["type", "table", "on", "using"].contains(&k.as_str()))
    {
        return Err(WalkerError::UnsupportedJoinShape(format!(
            "unknown join key `{key}`"
        )));
    }

    let kind = match map.get("type") {
        None | Some(JsonValue::Null) => JoinKind::default(),
        Some(JsonValue::String(s)) => JoinKind::parse(s)?,
        Some(_) => {
            return Err(WalkerError::UnsupportedJoinShape(
                "join type must be a string".to_string(),
            ));
        }
    };
    let table = map
        .get("table")
        .ok_or_else(|| WalkerError::missing("join table"))
        .and_then(join_table)?;
    let join = Join::new(kind, table);

    let on = map.get("on").filter(|v| !v.is_null());
    let using = map.get("using").filter(|v| !v.is_null());
    match (on, using) {
        (Some(_), Some(_)) => Err(WalkerError::ambiguous(format!(
            "join {table} has both `on` and `using`"
        ))),
        (Some(on), None) => Ok(join.on(conditions_from_json(on)?)),
        (None, Some(using)) => Ok(join.using(using_columns(using)?)),
        (None, None) => Ok(join),
    }
}

fn join_table(json: &JsonValue) -> WalkerResult<&str> {
    match json.as_str().map(str::trim) {
        Some(table) if !table.is_empty() => Ok(table),
        _ => Err(WalkerError::missing("join table")),
    }
}

/// `"a, b"` or `["a", "b"]`.
fn using_columns(json: &JsonValue) -> WalkerResult<Vec<String>> {
    match json {
        JsonValue::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    WalkerError::UnsupportedJoinShape("`using` columns must be strings".to_string())
                })
            })
            .collect(),
        other => Err(WalkerError::UnsupportedJoinShape(format!(
            "`using` must be a string or array, got {}",
            kind_of(other)
        ))),
    }
}

// ==================== Projection ====================

/// Parse a `columns` / `fields` parameter.
///
/// - `"a, b"` → one raw entry
/// - `["a", {"field": "b", "alias": "x"}]`
/// - `{"alias": "source", "alias2": {"count_distinct": "o.id"}}`
pub fn columns_from_json(json: &JsonValue) -> WalkerResult<Vec<Column>> {
    match json {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::String(s) => Ok(vec![Column::raw(s.clone())]),
        JsonValue::Array(items) => items.iter().map(column_entry).collect(),
        JsonValue::Object(map) => map
            .iter()
            .map(|(alias, source)| aliased_column(alias, source))
            .collect(),
        other => Err(WalkerError::UnsupportedColumnShape(format!(
            "columns must be a string, array or object, got {}",
            kind_of(other)
        ))),
    }
}

fn column_entry(json: &JsonValue) -> WalkerResult<Column> {
    match json {
        JsonValue::String(s) => Ok(Column::raw(s.clone())),
        JsonValue::Object(map) => {
            if let Some(key) = map.keys().find(|k| *k != "field" && *k != "alias") {
                return Err(WalkerError::UnsupportedColumnShape(format!(
                    "unknown column key `{key}`"
                )));
            }
            match (
                map.get("field").and_then(JsonValue::as_str),
                map.get("alias").and_then(JsonValue::as_str),
            ) {
                (Some(field), Some(alias)) => Ok(Column::aliased(field, alias)),
                _ => Err(WalkerError::UnsupportedColumnShape(
                    "a column object needs string `field` and `alias`".to_string(),
                )),
            }
        }
        other => Err(WalkerError::UnsupportedColumnShape(format!(
            "a column entry must be a string or object, got {}",
            kind_of(other)
        ))),
    }
}

fn aliased_column(alias: &str, source: &JsonValue) -> WalkerResult<Column> {
    match source {
        JsonValue::String(expr) => Ok(Column::aliased(expr.as_str(), alias)),
        JsonValue::Object(map) if map.len() == 1 => {
            let (function, args) = map.iter().next().ok_or_else(|| {
                WalkerError::UnsupportedColumnShape(format!("empty function for `{alias}`"))
            })?;
            let args = column_args(args)?;
            Ok(Column::function(ProjectionFn::from_key(function, args)?, alias))
        }
        _ => Err(WalkerError::UnsupportedColumnShape(format!(
            "`{alias}` must map to an expression or a single-key function object"
        ))),
    }
}

fn column_args(json: &JsonValue) -> WalkerResult<Vec<String>> {
    match json {
        JsonValue::String(s) => Ok(vec![s.clone()]),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    WalkerError::UnsupportedColumnShape(
                        "function arguments must be strings".to_string(),
                    )
                })
            })
            .collect(),
        other => Err(WalkerError::UnsupportedColumnShape(format!(
            "function arguments must be a string or array, got {}",
            kind_of(other)
        ))),
    }
}

// ==================== Statements ====================

/// SELECT parameters → builder.
pub fn select_from_json(params: &JsonValue) -> WalkerResult<SelectQb> {
    let map = params_object(params, "select", SELECT_KEYS)?;
    let table = table_of(map)?;

    let columns = match (present(map, "columns"), present(map, "fields")) {
        (Some(_), Some(_)) => {
            return Err(WalkerError::ambiguous("both `columns` and `fields` given"));
        }
        (Some(c), None) | (None, Some(c)) => columns_from_json(c)?,
        (None, None) => Vec::new(),
    };

    let mut qb = SelectQb::new(table)
        .columns(columns)
        .joins(joins_from_json(param(map, "joins"))?)
        .filters(conditions_from_json(param(map, "where"))?)
        .havings(conditions_from_json(param(map, "having"))?);

    for column in strings_from_json("group_by", param(map, "group_by"))? {
        qb = qb.group_by(&column);
    }
    for clause in strings_from_json("order_by", param(map, "order_by"))? {
        qb = qb.order_by(&clause);
    }
    if let Some(limit) = count_from_json("limit", param(map, "limit"))? {
        qb = qb.limit(limit);
    }
    if let Some(offset) = count_from_json("offset", param(map, "offset"))? {
        qb = qb.offset(offset);
    }
    Ok(qb)
}

/// INSERT parameters → builder. `data` is one row object or an array of them.
pub fn insert_from_json(params: &JsonValue) -> WalkerResult<InsertQb> {
    let map = params_object(params, "insert", INSERT_KEYS)?;
    let table = table_of(map)?;

    let rows = match param(map, "data") {
        JsonValue::Null => return Err(WalkerError::missing("data")),
        JsonValue::Object(row) => vec![row_from_map(row)?],
        JsonValue::Array(items) if items.is_empty() => return Err(WalkerError::missing("data")),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::Object(row) => row_from_map(row),
                other => Err(WalkerError::invalid_value(format!(
                    "insert rows must be objects, got {}",
                    kind_of(other)
                ))),
            })
            .collect::<WalkerResult<Vec<_>>>()?,
        other => {
            return Err(WalkerError::invalid_value(format!(
                "`data` must be an object or array, got {}",
                kind_of(other)
            )));
        }
    };

    Ok(InsertQb::new(table).rows(rows))
}

/// UPDATE parameters → builder.
pub fn update_from_json(params: &JsonValue) -> WalkerResult<UpdateQb> {
    let map = params_object(params, "update", UPDATE_KEYS)?;
    let table = table_of(map)?;

    let data = match param(map, "data") {
        JsonValue::Null => return Err(WalkerError::missing("data")),
        JsonValue::Object(row) => row_from_map(row)?,
        other => {
            return Err(WalkerError::invalid_value(format!(
                "`data` must be an object, got {}",
                kind_of(other)
            )));
        }
    };

    let mut qb = UpdateQb::new(table)
        .data(data)
        .joins(joins_from_json(param(map, "joins"))?)
        .filters(conditions_from_json(param(map, "where"))?);
    for condition in conditions_from_json(param(map, "having"))? {
        qb = qb.having(condition);
    }
    Ok(qb)
}

/// DELETE parameters → builder.
///
/// A where-less delete needs `"allow_delete_all": true` (or `"secure": false`).
pub fn delete_from_json(params: &JsonValue) -> WalkerResult<DeleteQb> {
    let map = params_object(params, "delete", DELETE_KEYS)?;
    let table = table_of(map)?;

    let allow_all = bool_param(map, "allow_delete_all")?.unwrap_or(false)
        || bool_param(map, "secure")? == Some(false);

    Ok(DeleteQb::new(table)
        .filters(conditions_from_json(param(map, "where"))?)
        .allow_delete_all(allow_all))
}

/// Build a SELECT from JSON parameters with the shared configuration.
pub fn build_select(params: &JsonValue) -> WalkerResult<Statement> {
    select_from_json(params)?.build()
}

pub fn build_select_with(params: &JsonValue, config: &BuilderConfig) -> WalkerResult<Statement> {
    select_from_json(params)?.build_with(config)
}

/// Build an INSERT from JSON parameters with the shared configuration.
pub fn build_insert(params: &JsonValue) -> WalkerResult<Statement> {
    insert_from_json(params)?.build()
}

pub fn build_insert_with(params: &JsonValue, config: &BuilderConfig) -> WalkerResult<Statement> {
    insert_from_json(params)?.build_with(config)
}

/// Build an UPDATE from JSON parameters with the shared configuration.
pub fn build_update(params: &JsonValue) -> WalkerResult<Statement> {
    update_from_json(params)?.build()
}

pub fn build_update_with(params: &JsonValue, config: &BuilderConfig) -> WalkerResult<Statement> {
    update_from_json(params)?.build_with(config)
}

/// Build a DELETE from JSON parameters with the shared configuration.
pub fn build_delete(params: &JsonValue) -> WalkerResult<Statement> {
    delete_from_json(params)?.build()
}

pub fn build_delete_with(params: &JsonValue, config: &BuilderConfig) -> WalkerResult<Statement> {
    delete_from_json(params)?.build_with(config)
}

// ==================== Helpers ====================

fn params_object<'a>(
    params: &'a JsonValue,
    statement: &str,
    allowed: &[&str],
) -> WalkerResult<&'a JsonMap> {
    let map = params.as_object().ok_or_else(|| {
        WalkerError::invalid_value(format!(
            "{statement} parameters must be an object, got {}",
            kind_of(params)
        ))
    })?;
    if let Some(key) = map.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(WalkerError::invalid_value(format!(
            "unknown {statement} parameter `{key}`"
        )));
    }
    Ok(map)
}

fn table_of(map: &JsonMap) -> WalkerResult<&str> {
    match param(map, "table") {
        JsonValue::String(s) if !s.trim().is_empty() => Ok(s),
        JsonValue::Null | JsonValue::String(_) => Err(WalkerError::missing("table")),
        other => Err(WalkerError::invalid_value(format!(
            "`table` must be a string, got {}",
            kind_of(other)
        ))),
    }
}

static NULL: JsonValue = JsonValue::Null;

/// The parameter value, with an absent key read as `null`.
fn param<'a>(map: &'a JsonMap, key: &str) -> &'a JsonValue {
    map.get(key).unwrap_or(&NULL)
}

fn present<'a>(map: &'a JsonMap, key: &str) -> Option<&'a JsonValue> {
    map.get(key).filter(|v| !v.is_null())
}

fn bool_param(map: &JsonMap, key: &str) -> WalkerResult<Option<bool>> {
    match param(map, key) {
        JsonValue::Null => Ok(None),
        JsonValue::Bool(b) => Ok(Some(*b)),
        other => Err(WalkerError::invalid_value(format!(
            "`{key}` must be a boolean, got {}",
            kind_of(other)
        ))),
    }
}

fn row_from_map(map: &JsonMap) -> WalkerResult<Row> {
    let mut row = Row::new();
    for (column, value) in map {
        row.insert(column.as_str(), value_from_json(value)?);
    }
    Ok(row)
}

/// `"a"` or `["a", "b"]`; used for GROUP BY and ORDER BY.
fn strings_from_json(key: &str, json: &JsonValue) -> WalkerResult<Vec<String>> {
    match json {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        JsonValue::String(s) => Ok(vec![s.clone()]),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    WalkerError::invalid_value(format!("`{key}` entries must be strings"))
                })
            })
            .collect(),
        other => Err(WalkerError::invalid_value(format!(
            "`{key}` must be a string or array, got {}",
            kind_of(other)
        ))),
    }
}

/// Coerce a LIMIT / OFFSET to a non-negative integer. Fractions are truncated and
/// numeric strings are parsed.
fn count_from_json(key: &str, json: &JsonValue) -> WalkerResult<Option<u64>> {
    let number = match json {
        JsonValue::Null => return Ok(None),
        JsonValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(Some(u));
            }
            n.as_f64()
        }
        JsonValue::String(s) if s.trim().is_empty() => return Ok(None),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(f) if f.is_finite() && f >= 0.0 => Ok(Some(f.trunc() as u64)),
        _ => Err(WalkerError::invalid_value(format!(
            "`{key}` must be a non-negative integer, got {json}"
        ))),
    }
}

fn kind_of(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
