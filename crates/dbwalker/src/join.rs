//! JOIN clause assembly.

use crate::condition::{Condition, build_where};
use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::ident::{Identifier, quote_column};

/// Join direction. Defaults to `LEFT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    Inner,
    #[default]
    Left,
    Right,
    Cross,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Cross => "CROSS",
            JoinKind::LeftOuter => "LEFT OUTER",
            JoinKind::RightOuter => "RIGHT OUTER",
            JoinKind::FullOuter => "FULL OUTER",
        }
    }

    /// Parse a direction keyword, case-insensitively (`"inner"`, `"LEFT OUTER"`, ...).
    pub fn parse(s: &str) -> WalkerResult<Self> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        let kind = match normalized.trim_end_matches(" JOIN") {
            "INNER" => JoinKind::Inner,
            "LEFT" => JoinKind::Left,
            "RIGHT" => JoinKind::Right,
            "CROSS" => JoinKind::Cross,
            "LEFT OUTER" => JoinKind::LeftOuter,
            "RIGHT OUTER" => JoinKind::RightOuter,
            "FULL OUTER" | "FULL" => JoinKind::FullOuter,
            _ => {
                return Err(WalkerError::UnsupportedJoinShape(format!(
                    "unknown join type '{s}'"
                )));
            }
        };
        Ok(kind)
    }
}

/// How the joined table is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    /// `ON (<conditions>)`
    On(Vec<Condition>),
    /// `USING (<columns>)`
    Using(Vec<String>),
    /// Only valid for `CROSS JOIN`.
    None,
}

/// One JOIN clause.
///
/// The target table is kept as written and resolved when the join is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub constraint: JoinConstraint,
}

impl Join {
    /// Create a join with no constraint yet.
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            constraint: JoinConstraint::None,
        }
    }

    pub fn inner(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Inner, table)
    }

    pub fn left(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Left, table)
    }

    pub fn right(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Right, table)
    }

    pub fn cross(table: impl Into<String>) -> Self {
        Self::new(JoinKind::Cross, table)
    }

    /// Set the ON conditions (AND-joined).
    pub fn on<C: Into<Condition>>(mut self, conditions: impl IntoIterator<Item = C>) -> Self {
        self.constraint = JoinConstraint::On(conditions.into_iter().map(Into::into).collect());
        self
    }

    /// Set the USING columns.
    pub fn using<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.constraint = JoinConstraint::Using(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Render `<KIND> JOIN <table> ON (...)` / `USING (...)`.
    pub fn to_sql(&self, config: &BuilderConfig) -> WalkerResult<String> {
        let table = Identifier::resolve(&self.table)?;
        let mut sql = format!("{} JOIN {}", self.kind.as_sql(), table.fullname());
        match &self.constraint {
            JoinConstraint::On(conditions) => {
                let on = build_where(conditions, config)?.ok_or_else(|| {
                    WalkerError::missing(format!("ON conditions for join {table}"))
                })?;
                sql.push_str(" ON (");
                sql.push_str(&on);
                sql.push(')');
            }
            JoinConstraint::Using(columns) => {
                if columns.is_empty() {
                    return Err(WalkerError::missing(format!(
                        "USING columns for join {table}"
                    )));
                }
                let cols = columns
                    .iter()
                    .map(|c| quote_column(c))
                    .collect::<WalkerResult<Vec<_>>>()?;
                sql.push_str(" USING (");
                sql.push_str(&cols.join(", "));
                sql.push(')');
            }
            JoinConstraint::None if self.kind == JoinKind::Cross => {}
            JoinConstraint::None => {
                return Err(WalkerError::missing(format!("ON or USING for join {table}")));
            }
        }
        Ok(sql)
    }
}

/// Space-join the rendered joins in caller order. `None` when there are no joins.
pub fn build_joins(joins: &[Join], config: &BuilderConfig) -> WalkerResult<Option<String>> {
    if joins.is_empty() {
        return Ok(None);
    }
    let parts = joins
        .iter()
        .map(|j| j.to_sql(config))
        .collect::<WalkerResult<Vec<_>>>()?;
    Ok(Some(parts.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Predicate;
    use crate::value::Value;

    fn render(join: Join) -> WalkerResult<String> {
        join.to_sql(BuilderConfig::shared())
    }

    #[test]
    fn left_join_on() {
        let join = Join::left("orders AS o").on([Predicate::is("o.user_id", Value::column("u.id").unwrap())]);
        assert_eq!(
            render(join).unwrap(),
            "LEFT JOIN `orders` AS `o` ON (`o`.`user_id` = `u`.`id`)"
        );
    }

    #[test]
    fn inner_join_using() {
        let join = Join::inner("shop.profiles").using(["user_id"]);
        assert_eq!(
            render(join).unwrap(),
            "INNER JOIN `shop`.`profiles` USING (`user_id`)"
        );
    }

    #[test]
    fn join_without_constraint_is_rejected() {
        let err = render(Join::left("orders")).unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn cross_join_needs_no_constraint() {
        assert_eq!(render(Join::cross("sizes")).unwrap(), "CROSS JOIN `sizes`");
    }

    #[test]
    fn empty_on_is_rejected() {
        let join = Join::left("orders").on(Vec::<Condition>::new());
        assert!(render(join).unwrap_err().is_missing_field());
    }

    #[test]
    fn invalid_table_fails_at_render() {
        let err = render(Join::left("").on([Predicate::raw("1=1")])).unwrap_err();
        assert!(matches!(err, WalkerError::InvalidIdentifier { .. }));
    }

    #[test]
    fn parse_kinds() {
        assert_eq!(JoinKind::parse("inner").unwrap(), JoinKind::Inner);
        assert_eq!(JoinKind::parse("left  outer").unwrap(), JoinKind::LeftOuter);
        assert_eq!(JoinKind::parse("RIGHT JOIN").unwrap(), JoinKind::Right);
        assert!(JoinKind::parse("sideways").is_err());
    }

    #[test]
    fn joins_keep_caller_order() {
        let joins = vec![
            Join::inner("b").on([Predicate::raw("b.a_id = a.id")]),
            Join::left("c").on([Predicate::raw("c.b_id = b.id")]),
        ];
        let out = build_joins(&joins, BuilderConfig::shared()).unwrap();
        assert_eq!(
            out.as_deref(),
            Some("INNER JOIN `b` ON (b.a_id = a.id) LEFT JOIN `c` ON (c.b_id = b.id)")
        );
        assert_eq!(build_joins(&[], BuilderConfig::shared()).unwrap(), None);
    }
}
