//! Database client seam and the [`Walker`] facade.
//!
//! dbwalker never opens connections itself. A [`DbClient`] receives finished SQL
//! text and reports back either rows or a mutation summary; [`Walker`] ties a
//! client to a [`BuilderConfig`] and runs builders through it.
//!
//! ```ignore
//! use dbwalker::{Walker, qb};
//!
//! let walker = Walker::new(my_client);
//! let rows = walker.fetch_all(&qb::select("users").is("status", "active")).await?;
//! let summary = walker.execute(&qb::delete("sessions").is("user_id", 7)).await?;
//! ```

use crate::config::BuilderConfig;
use crate::error::{WalkerError, WalkerResult};
use crate::ident::Identifier;
use crate::qb::SqlQb;
use crate::schema::ColumnDescription;
use crate::statement::Statement;
use crate::value::{escape_string, quote_text};
use serde::Serialize;
use std::future::Future;
use uuid::Uuid;

/// One result row, keyed by column name in result order.
pub type RowMap = serde_json::Map<String, serde_json::Value>;

/// Insert id / affected row count reported for a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MutationSummary {
    pub insert_id: Option<u64>,
    pub affected_rows: u64,
}

/// What the client returned for one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutput {
    Rows(Vec<RowMap>),
    Mutation {
        insert_id: Option<u64>,
        affected_rows: u64,
    },
}

impl QueryOutput {
    /// Rows of a read; empty for a mutation.
    pub fn into_rows(self) -> Vec<RowMap> {
        match self {
            QueryOutput::Rows(rows) => rows,
            QueryOutput::Mutation { .. } => Vec::new(),
        }
    }

    /// Mutation summary; a row result reports nothing inserted or affected.
    pub fn summary(&self) -> MutationSummary {
        match self {
            QueryOutput::Rows(_) => MutationSummary::default(),
            QueryOutput::Mutation {
                insert_id,
                affected_rows,
            } => MutationSummary {
                insert_id: *insert_id,
                affected_rows: *affected_rows,
            },
        }
    }
}

/// Failure reported by the database client, carrying the SQL that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}{message}", code_prefix(.code))]
pub struct DbError {
    pub code: Option<String>,
    pub message: String,
    pub sql: String,
}

impl DbError {
    pub fn new(message: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            sql: sql.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

fn code_prefix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!("[{code}] "),
        None => String::new(),
    }
}

/// The external database client.
///
/// Implemented for whatever driver or pool the application uses. The text passed
/// in is complete: every literal is already inlined and escaped.
pub trait DbClient: Send + Sync {
    /// Execute one statement.
    fn query(&self, sql: &str) -> impl Future<Output = Result<QueryOutput, DbError>> + Send;
}

impl<C: DbClient> DbClient for &C {
    fn query(&self, sql: &str) -> impl Future<Output = Result<QueryOutput, DbError>> + Send {
        (**self).query(sql)
    }
}

/// Builds statements with one [`BuilderConfig`] and runs them on one client.
#[derive(Debug, Clone)]
pub struct Walker<C> {
    client: C,
    config: BuilderConfig,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    max_sql_length: Option<usize>,
}

impl<C: DbClient> Walker<C> {
    /// Wrap a client with the default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, BuilderConfig::shared().clone())
    }

    pub fn with_config(client: C, config: BuilderConfig) -> Self {
        Self {
            client,
            config,
            max_sql_length: Some(200),
        }
    }

    /// Truncate SQL in log events to `len` bytes.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log full SQL text.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    /// Build with this walker's configuration.
    pub fn build(&self, qb: &impl SqlQb) -> WalkerResult<Statement> {
        qb.build_with(&self.config)
    }

    /// Send a finished statement to the client.
    pub async fn run(&self, statement: &Statement) -> WalkerResult<QueryOutput> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "dbwalker.sql",
            kind = ?statement.kind(),
            sql = %self.truncate_sql(statement.as_str()),
            "executing"
        );

        match self.client.query(statement.as_str()).await {
            Ok(output) => Ok(output),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "dbwalker.sql",
                    code = err.code.as_deref().unwrap_or(""),
                    message = %err.message,
                    sql = %self.truncate_sql(&err.sql),
                    "statement failed"
                );
                Err(WalkerError::Database(err))
            }
        }
    }

    /// Build and run a read, returning every row.
    pub async fn fetch_all(&self, qb: &impl SqlQb) -> WalkerResult<Vec<RowMap>> {
        let statement = self.build(qb)?;
        Ok(self.run(&statement).await?.into_rows())
    }

    /// Build and run a read, returning the first row if any.
    pub async fn fetch_opt(&self, qb: &impl SqlQb) -> WalkerResult<Option<RowMap>> {
        Ok(self.fetch_all(qb).await?.into_iter().next())
    }

    /// Build and run a mutation.
    pub async fn execute(&self, qb: &impl SqlQb) -> WalkerResult<MutationSummary> {
        let statement = self.build(qb)?;
        Ok(self.run(&statement).await?.summary())
    }

    /// `DESCRIBE <table>` mapped into column descriptions.
    pub async fn describe(&self, table: &str) -> WalkerResult<Vec<ColumnDescription>> {
        let table = Identifier::resolve(table)?;
        let statement = Statement::raw(format!("DESCRIBE {};", table.name()));
        self.run(&statement)
            .await?
            .into_rows()
            .iter()
            .map(ColumnDescription::from_row)
            .collect()
    }

    /// Table names in the current database, optionally filtered by a substring.
    ///
    /// `SHOW TABLES` or `SHOW TABLES LIKE '%<like>%'`; caller `%` at either end is trimmed.
    pub async fn tables(&self, like: Option<&str>) -> WalkerResult<Vec<String>> {
        let sql = match like.map(|p| p.trim_matches('%')).filter(|p| !p.is_empty()) {
            Some(pattern) => format!("SHOW TABLES LIKE '%{}%';", escape_string(pattern)),
            None => "SHOW TABLES;".to_string(),
        };
        self.run(&Statement::raw(sql))
            .await?
            .into_rows()
            .iter()
            .map(|row| {
                row.values()
                    .next()
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| WalkerError::missing("table name in SHOW TABLES row"))
            })
            .collect()
    }

    /// Current server time as text, converted to `timezone` when given.
    ///
    /// The conversion happens inside the query; the session time zone is left alone.
    pub async fn now(&self, timezone: Option<&str>) -> WalkerResult<String> {
        let expr = match timezone.map(str::trim).filter(|tz| !tz.is_empty()) {
            Some(tz) => format!("CONVERT_TZ(NOW(), @@session.time_zone, {})", quote_text(tz)),
            None => "NOW()".to_string(),
        };
        self.fetch_text(format!("SELECT CAST({expr} AS CHAR) AS `now`;"), "now")
            .await
    }

    /// Hex MD5 digest computed by the server.
    pub async fn md5(&self, text: &str) -> WalkerResult<String> {
        self.fetch_text(format!("SELECT MD5({}) AS `md5`;", quote_text(text)), "md5")
            .await
    }

    /// Hex SHA1 digest computed by the server.
    pub async fn sha1(&self, text: &str) -> WalkerResult<String> {
        self.fetch_text(format!("SELECT SHA1({}) AS `sha1`;", quote_text(text)), "sha1")
            .await
    }

    /// Ask the server for a fresh UUID (`SELECT UUID()`).
    pub async fn uuid(&self) -> WalkerResult<Uuid> {
        let text = self
            .fetch_text("SELECT UUID() AS `uuid`;".to_string(), "uuid")
            .await?;
        Uuid::parse_str(&text)
            .map_err(|e| WalkerError::invalid_value(format!("server returned bad uuid '{text}': {e}")))
    }

    /// Run a single-value query and read `column` of the first row as text.
    async fn fetch_text(&self, sql: String, column: &str) -> WalkerResult<String> {
        let rows = self.run(&Statement::raw(sql)).await?.into_rows();
        rows.first()
            .and_then(|row| row.get(column))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| WalkerError::missing(format!("{column} column in result")))
    }

    #[cfg(feature = "tracing")]
    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end])
            }
            _ => sql.to_string(),
        }
    }
}
