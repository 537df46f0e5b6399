//! Statement builders for dbwalker.
//!
//! Each builder is a consuming value: chain methods, then call
//! [`SqlQb::build`] (or [`SqlQb::build_with`] for a custom
//! [`BuilderConfig`](crate::BuilderConfig)) to get an immutable
//! [`Statement`](crate::Statement). Every literal is inlined through the value
//! encoder; nothing is bound at execution time.
//!
//! # Usage
//!
//! ```ignore
//! use dbwalker::{Join, Predicate, Row, qb, qb::SqlQb};
//!
//! // SELECT
//! let stmt = qb::select("shop.users AS u")
//!     .columns(["u.id", "u.name"])
//!     .join(Join::left("orders AS o").on([Predicate::raw("o.user_id = u.id")]))
//!     .is("u.status", "active")
//!     .order_by("u.created_at DESC")
//!     .limit(20)
//!     .build()?;
//!
//! // INSERT, several rows
//! let stmt = qb::insert("users")
//!     .row(Row::new().set("name", "a").set("email", ""))
//!     .row(Row::new().set("name", "b").set("email", "x"))
//!     .build()?;
//!
//! // UPDATE
//! let stmt = qb::update("users").set("status", "inactive").is("id", 7).build()?;
//!
//! // DELETE
//! let stmt = qb::delete("users").is("id", 7).build()?;
//! ```

use crate::error::{WalkerError, WalkerResult};
use crate::ident::Identifier;

mod delete;
mod filter;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use select::SelectQb;
pub use traits::SqlQb;
pub use update::UpdateQb;

/// Create a SELECT builder for the given table (`db.table AS alias` accepted).
///
/// # Example
/// ```ignore
/// let qb = dbwalker::qb::select("users").is("id", 1);
/// ```
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create an INSERT builder for the given table.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Alias for `insert`.
pub fn insert_into(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for the given table.
///
/// # Safety
/// Building a DELETE without WHERE conditions fails with
/// [`WalkerError::MissingRequiredField`](crate::WalkerError::MissingRequiredField).
/// Use `allow_delete_all(true)` to delete every row.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// Alias for `delete`.
pub fn delete_from(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// Resolve the target table of a statement. A blank table is a missing field,
/// not a malformed identifier.
pub(crate) fn resolve_table(raw: &str) -> WalkerResult<Identifier> {
    if raw.trim().is_empty() {
        return Err(WalkerError::missing("table"));
    }
    Identifier::resolve(raw)
}

#[cfg(test)]
mod tests;
