//! `DESCRIBE` result mapping.

use crate::client::RowMap;
use crate::error::{WalkerError, WalkerResult};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Index membership reported in the `Key` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKey {
    /// `PRI`
    Primary,
    /// `UNI`
    Unique,
    /// Anything else (`MUL`, ...), kept as reported.
    Other(String),
}

impl ColumnKey {
    fn from_describe(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            "PRI" => Some(ColumnKey::Primary),
            "UNI" => Some(ColumnKey::Unique),
            other => Some(ColumnKey::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKey::Primary => "PRIMARY",
            ColumnKey::Unique => "UNIQUE",
            ColumnKey::Other(s) => s,
        }
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One column of a described table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub name: String,
    /// Upper-cased SQL type, e.g. `VARCHAR(255)`.
    #[serde(rename = "type")]
    pub sql_type: String,
    pub nullable: bool,
    pub key: Option<ColumnKey>,
    pub default: Option<String>,
    pub extra: String,
    pub auto_increment: bool,
}

impl ColumnDescription {
    /// Map one `DESCRIBE` row (`Field`, `Type`, `Null`, `Key`, `Default`, `Extra`).
    pub fn from_row(row: &RowMap) -> WalkerResult<Self> {
        let name = text(row, "Field")
            .ok_or_else(|| WalkerError::missing("Field column in DESCRIBE row"))?;
        let sql_type = text(row, "Type")
            .ok_or_else(|| WalkerError::missing(format!("Type column for `{name}`")))?
            .to_ascii_uppercase();
        let extra = text(row, "Extra").unwrap_or_default();

        Ok(Self {
            nullable: text(row, "Null").is_some_and(|n| n.eq_ignore_ascii_case("YES")),
            key: text(row, "Key").and_then(|k| ColumnKey::from_describe(&k)),
            default: text(row, "Default"),
            auto_increment: extra.to_ascii_lowercase().contains("auto_increment"),
            name,
            sql_type,
            extra,
        })
    }

    pub fn is_primary_key(&self) -> bool {
        self.key == Some(ColumnKey::Primary)
    }
}

fn text(row: &RowMap, key: &str) -> Option<String> {
    match row.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
