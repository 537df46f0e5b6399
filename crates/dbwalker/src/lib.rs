//! # dbwalker
//!
//! A declarative SQL statement builder for MySQL.
//!
//! ## Features
//!
//! - **Plain text out**: every build returns an immutable [`Statement`] whose SQL
//!   has all literals inlined and escaped
//! - **Quoted identifiers**: `db.table AS alias` resolved and backtick-quoted segment by segment
//! - **Closed function set**: only whitelisted functions pass through unquoted ([`BuilderConfig`])
//! - **Typed conditions**: one operator per comparison, OR-groups one level deep
//! - **Safe defaults**: DELETE requires WHERE, INSERT/UPDATE require data
//! - **Declarative front end**: build from `serde_json::Value` parameter objects
//! - **Client seam**: hand statements to any [`DbClient`] through [`Walker`]
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use dbwalker::{qb, SqlQb};
//!
//! // SELECT
//! let stmt = qb::select("users")
//!     .is("status", "active")
//!     .order_by("created_at DESC")
//!     .limit(10)
//!     .build()?;
//!
//! // INSERT
//! let stmt = qb::insert("users")
//!     .set("username", "alice")
//!     .set("created_at", "NOW()")
//!     .build()?;
//!
//! // DELETE
//! let stmt = qb::delete("users").is("id", 7).build()?;
//! ```
//!
//! ## Declarative
//!
//! ```ignore
//! use serde_json::json;
//!
//! let stmt = dbwalker::declarative::build_delete(&json!({
//!     "table": "users",
//!     "where": [{"field": "id", "is": 1}]
//! }))?;
//! assert_eq!(stmt.as_str(), "DELETE FROM `users` WHERE `id` = 1;");
//! ```

pub mod client;
pub mod columns;
pub mod condition;
pub mod config;
pub mod declarative;
pub mod error;
pub mod ident;
pub mod join;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod schema;
pub mod statement;
pub mod template;
pub mod value;

pub use client::{DbClient, DbError, MutationSummary, QueryOutput, RowMap, Walker};
pub use columns::{Column, ProjectionFn, build_columns};
pub use condition::{Comparison, Condition, Op, Predicate, build_where};
pub use config::{BuilderConfig, DEFAULT_FUNCTIONS};
pub use error::{WalkerError, WalkerResult};
pub use ident::{Identifier, column_sql, quote, quote_column};
pub use join::{Join, JoinConstraint, JoinKind, build_joins};
pub use row::Row;
pub use schema::{ColumnDescription, ColumnKey};
pub use statement::{Statement, StatementKind};
pub use value::{Value, encode, escape_string};

// Re-export qb module for easy access
pub use qb::{
    DeleteQb, InsertQb, SelectQb, SqlQb, UpdateQb, delete, delete_from, insert, insert_into,
    select, update,
};
