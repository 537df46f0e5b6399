//! Trait definitions for query builders.

use crate::client::{DbClient, MutationSummary, RowMap};
use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::statement::Statement;
use std::future::Future;

/// Base trait for all statement builders.
///
/// Builders are plain values: building never mutates them, and every call
/// returns a fresh [`Statement`].
pub trait SqlQb: Sync {
    /// Assemble the statement with an explicit configuration.
    fn build_with(&self, config: &BuilderConfig) -> WalkerResult<Statement>;

    /// Assemble the statement with the shared default configuration.
    fn build(&self) -> WalkerResult<Statement> {
        self.build_with(BuilderConfig::shared())
    }

    /// Debug helper returning only the SQL text.
    fn to_sql(&self) -> WalkerResult<String> {
        self.build().map(Statement::into_string)
    }

    /// Build and run on `client`, returning every row.
    fn fetch_all(
        &self,
        client: &impl DbClient,
    ) -> impl Future<Output = WalkerResult<Vec<RowMap>>> + Send {
        async move {
            let statement = self.build()?;
            let output = client
                .query(statement.as_str())
                .await
                .map_err(WalkerError::Database)?;
            Ok(output.into_rows())
        }
    }

    /// Build and run on `client`, returning the mutation summary.
    fn execute(
        &self,
        client: &impl DbClient,
    ) -> impl Future<Output = WalkerResult<MutationSummary>> + Send {
        async move {
            let statement = self.build()?;
            let output = client
                .query(statement.as_str())
                .await
                .map_err(WalkerError::Database)?;
            Ok(output.summary())
        }
    }
}
