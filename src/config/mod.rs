#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::{CsvOptions, JsonOptions, MongoOptions, SqlDialect, SqlOptions};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{
    validate_mongodb_uri, validate_non_empty_string, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration, loaded from a YAML file. The `postgresql`
/// section is required; everything else falls back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub postgresql: PostgresConfig,
    #[serde(default)]
    pub mongodb: MongoConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub json: JsonConfig,
    #[serde(default)]
    pub csv: CsvConfig,
    #[serde(default)]
    pub sql: SqlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    #[serde(default = "PostgresConfig::default_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl PostgresConfig {
    fn default_port() -> u16 {
        5432
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub extended_json: Option<bool>,
}

impl MongoConfig {
    pub fn to_options(&self) -> MongoOptions {
        let defaults = MongoOptions::default();
        MongoOptions {
            database: self.database.clone().unwrap_or(defaults.database),
            collection: self.collection.clone().unwrap_or(defaults.collection),
            extended_json: self.extended_json.unwrap_or(defaults.extended_json),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub default_format: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl OutputConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./output"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonConfig {
    pub pretty: Option<bool>,
}

impl JsonConfig {
    pub fn to_options(&self) -> JsonOptions {
        JsonOptions {
            pretty: self.pretty.unwrap_or(JsonOptions::default().pretty),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsvConfig {
    pub delimiter: Option<String>,
    pub quote: Option<String>,
}

impl CsvConfig {
    pub fn to_options(&self) -> Result<CsvOptions> {
        let defaults = CsvOptions::default();
        Ok(CsvOptions {
            delimiter: single_byte("csv.delimiter", self.delimiter.as_deref(), defaults.delimiter)?,
            quote: single_byte("csv.quote", self.quote.as_deref(), defaults.quote)?,
        })
    }
}

fn single_byte(field: &str, value: Option<&str>, default: u8) -> Result<u8> {
    match value {
        None => Ok(default),
        Some(s) if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        Some(s) => Err(ConvertError::InvalidConfigValueError {
            field: field.to_string(),
            value: s.to_string(),
            reason: "Must be a single ASCII character".to_string(),
        }),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqlConfig {
    pub dialect: Option<String>,
    pub table_name: Option<String>,
    pub batch_size: Option<usize>,
    pub use_batch_insert: Option<bool>,
}

impl SqlConfig {
    pub fn to_options(&self) -> SqlOptions {
        let defaults = SqlOptions::default();
        SqlOptions {
            dialect: self
                .dialect
                .as_deref()
                .map(SqlDialect::parse)
                .unwrap_or(defaults.dialect),
            table_name: self.table_name.clone(),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            use_batch_insert: self.use_batch_insert.unwrap_or(defaults.use_batch_insert),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConvertError::ConfigError {
            message: format!("Failed to read configuration {}: {}", path.display(), e),
        })?;
        let config: AppConfig = serde_yaml::from_str(&text)?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("postgresql.host", &self.postgresql.host)?;
        validate_non_empty_string("postgresql.database", &self.postgresql.database)?;
        validate_non_empty_string("postgresql.user", &self.postgresql.user)?;
        validate_range("postgresql.port", self.postgresql.port, 1, 65535)?;

        if let Some(uri) = &self.mongodb.uri {
            validate_mongodb_uri("mongodb.uri", uri)?;
        }
        if let Some(batch_size) = self.sql.batch_size {
            validate_range("sql.batch_size", batch_size, 1, 10_000)?;
        }
        self.csv.to_options()?;
        Ok(())
    }
}
