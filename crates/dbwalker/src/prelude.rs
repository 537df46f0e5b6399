//! Convenient imports for typical `dbwalker` usage.
//!
//! ```ignore
//! use dbwalker::prelude::*;
//! ```

pub use crate::qb::{self, SqlQb};
pub use crate::{
    BuilderConfig, Column, Condition, DbClient, Join, Predicate, Row, Statement, Value, Walker,
    WalkerError, WalkerResult,
};
