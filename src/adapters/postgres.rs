use crate::config::PostgresConfig;
use crate::domain::model::{ResultSet, Row, Value};
use crate::domain::ports::Source;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::validate_identifier;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::{PgColumn, PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row as _, TypeInfo};

/// Row source backed by a PostgreSQL connection pool.
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::debug!(
            "Connected to postgresql://{}@{}:{}/{}",
            config.user,
            config.host,
            config.port,
            config.database
        );
        Ok(Self { pool })
    }

    /// Authoritative column list from information_schema, in ordinal order.
    /// This is what keeps an empty table's header intact.
    async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let (schema, name) = match table.split_once('.') {
            Some((schema, name)) => (schema, name),
            None => ("public", table),
        };

        let rows = sqlx::query(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2 \
             ORDER BY ordinal_position",
        )
        .bind(schema)
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get::<String, _>(0)).collect())
    }
}

#[async_trait]
impl Source for PgSource {
    async fn fetch_table(&self, table: &str) -> Result<ResultSet> {
        validate_identifier("table", table)?;

        let columns = self.table_columns(table).await?;
        if columns.is_empty() {
            return Err(ConvertError::InvalidConfigValueError {
                field: "table".to_string(),
                value: table.to_string(),
                reason: "Table not found".to_string(),
            });
        }

        let rows = sqlx::query(&format!("SELECT * FROM {}", table))
            .fetch_all(&self.pool)
            .await?;
        Ok(build_result_set(rows, Some(columns)))
    }

    async fn fetch_query(&self, query: &str) -> Result<ResultSet> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(build_result_set(rows, None))
    }
}

fn build_result_set(pg_rows: Vec<PgRow>, known_columns: Option<Vec<String>>) -> ResultSet {
    let columns = match (known_columns, pg_rows.first()) {
        (Some(columns), _) => columns,
        (None, Some(row)) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        // A rowless ad-hoc query carries no descriptors worth trusting.
        (None, None) => Vec::new(),
    };

    let rows = pg_rows
        .iter()
        .map(|row| {
            Row::new(
                row.columns()
                    .iter()
                    .map(|column| decode_value(row, column))
                    .collect(),
            )
        })
        .collect();

    ResultSet::new(columns, rows)
}

/// One value off the wire. Decode problems never abort the fetch; the value
/// degrades to text (or null) with a logged warning.
fn decode_value(row: &PgRow, column: &PgColumn) -> Value {
    let idx = column.ordinal();
    let type_name = column.type_info().name();

    let decoded: std::result::Result<Option<Value>, sqlx::Error> = match type_name {
        "INT2" => row
            .try_get::<Option<i16>, _>(idx)
            .map(|v| v.map(|n| Value::Integer(n as i64))),
        "INT4" => row
            .try_get::<Option<i32>, _>(idx)
            .map(|v| v.map(|n| Value::Integer(n as i64))),
        "INT8" => row
            .try_get::<Option<i64>, _>(idx)
            .map(|v| v.map(Value::Integer)),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(idx)
            .map(|v| v.map(|n| Value::Float(n as f64))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(idx)
            .map(|v| v.map(Value::Float)),
        "NUMERIC" => row.try_get::<Option<Decimal>, _>(idx).map(|v| {
            v.map(|d| {
                d.to_f64()
                    .map(Value::Float)
                    .unwrap_or_else(|| Value::Text(d.to_string()))
            })
        }),
        "BOOL" => row
            .try_get::<Option<bool>, _>(idx)
            .map(|v| v.map(Value::Boolean)),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)
            .map(|v| v.map(Value::Timestamp)),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)
            .map(|v| v.map(|n| Value::Timestamp(n.and_utc()))),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(idx)
            .map(|v| v.map(|d| Value::Text(d.to_string()))),
        "JSON" | "JSONB" => row
            .try_get::<Option<serde_json::Value>, _>(idx)
            .map(|v| v.map(Value::Json)),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(idx)
            .map(|v| v.map(Value::Text)),
        _ => return fallback_text(row, column),
    };

    match decoded {
        Ok(Some(value)) => value,
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::warn!(
                "Failed to decode column '{}' as {}: {}; falling back to text",
                column.name(),
                type_name,
                e
            );
            fallback_text(row, column)
        }
    }
}

fn fallback_text(row: &PgRow, column: &PgColumn) -> Value {
    match row.try_get::<Option<String>, _>(column.ordinal()) {
        Ok(Some(s)) => Value::Text(s),
        Ok(None) => Value::Null,
        Err(e) => {
            let err = ConvertError::UnsupportedTypeError {
                column: column.name().to_string(),
                type_name: column.type_info().name().to_string(),
            };
            tracing::warn!("{} ({}); substituting NULL", err, e);
            Value::Null
        }
    }
}
