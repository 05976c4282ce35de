use crate::utils::error::ConvertError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A single database value, tagged with its semantic type.
///
/// A column keeps the same tag across every row of one result set; a
/// converter may rely on that but degrades to the text representation
/// instead of failing when the source breaks the rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text fallback used wherever a target format has no dedicated mapping.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(ts) => iso8601(ts),
            Value::Json(v) => v.to_string(),
        }
    }
}

/// RFC 3339 rendering shared by every converter, `+00:00` offset form.
pub fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

/// Ordered rows sharing one column schema. The column list is authoritative
/// even when no rows follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rebuild with renamed columns, keeping rows untouched.
    pub fn with_columns(self, columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: self.rows,
        }
    }

    /// Rebuild every value through `f`, preserving row and column order.
    pub fn map_values<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str, Value) -> Value,
    {
        let columns = self.columns;
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                Row::new(
                    row.values
                        .into_iter()
                        .enumerate()
                        .map(|(i, value)| {
                            let name = columns.get(i).map(String::as_str).unwrap_or("");
                            f(name, value)
                        })
                        .collect(),
                )
            })
            .collect();
        Self { columns, rows }
    }
}

/// Target representation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
    Sql,
    Mongodb,
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            "sql" => Ok(Format::Sql),
            "mongodb" => Ok(Format::Mongodb),
            _ => Err(ConvertError::UnknownFormatError {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Sql => "sql",
            Format::Mongodb => "mongodb",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Table(String),
    Query(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    File(PathBuf),
    /// Direct import into a MongoDB deployment instead of a file on disk.
    MongoUri(String),
}

#[derive(Debug, Clone)]
pub struct JsonOptions {
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Mysql,
    Postgresql,
    Generic,
}

impl SqlDialect {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => SqlDialect::Mysql,
            "postgresql" | "postgres" => SqlDialect::Postgresql,
            _ => SqlDialect::Generic,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlOptions {
    pub dialect: SqlDialect,
    /// Target table name; derived from the source table or the output file
    /// stem when unset.
    pub table_name: Option<String>,
    pub batch_size: usize,
    pub use_batch_insert: bool,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::Mysql,
            table_name: None,
            batch_size: 100,
            use_batch_insert: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoOptions {
    pub database: String,
    pub collection: String,
    /// Tag timestamps with the `$date` marker instead of plain text.
    pub extended_json: bool,
}

impl Default for MongoOptions {
    fn default() -> Self {
        Self {
            database: "postgres_export".to_string(),
            collection: "postgresql_data".to_string(),
            extended_json: true,
        }
    }
}

/// Resolved configuration for one conversion run. Built once from CLI flags
/// plus the configuration file, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub format: Format,
    pub source: DataSource,
    pub destination: Destination,
    pub json: JsonOptions,
    pub csv: CsvOptions,
    pub sql: SqlOptions,
    pub mongo: MongoOptions,
}

/// Serialized converter output, before it reaches its destination.
#[derive(Debug, Clone)]
pub enum Artifact {
    Bytes(Vec<u8>),
    /// Documents kept in memory for a direct MongoDB bulk insert.
    Documents(Vec<serde_json::Value>),
}

impl Artifact {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Artifact::Bytes(b) => Some(b),
            Artifact::Documents(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso8601_uses_offset_form() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(iso8601(&ts), "2023-01-15T10:30:00+00:00");
    }

    #[test]
    fn value_text_fallback_covers_every_tag() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Integer(42).to_text(), "42");
        assert_eq!(Value::Float(2.5).to_text(), "2.5");
        assert_eq!(Value::Boolean(true).to_text(), "true");
        assert_eq!(Value::Text("a".into()).to_text(), "a");
        assert_eq!(Value::Timestamp(ts).to_text(), "2023-01-15T10:30:00+00:00");
        assert_eq!(
            Value::Json(serde_json::json!({"k": 1})).to_text(),
            r#"{"k":1}"#
        );
    }

    #[test]
    fn map_values_preserves_order() {
        let rs = ResultSet::new(
            vec!["a".into(), "b".into()],
            vec![Row::new(vec![Value::Integer(1), Value::Integer(2)])],
        );
        let mapped = rs.map_values(|name, v| {
            if name == "b" {
                Value::Text("x".into())
            } else {
                v
            }
        });
        assert_eq!(
            mapped.rows()[0].values,
            vec![Value::Integer(1), Value::Text("x".into())]
        );
    }
}
