use crate::config::AppConfig;
use crate::domain::model::{ConversionRequest, DataSource, Destination, Format};
use crate::utils::error::{ConvertError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Parser)]
#[command(name = "pgconv")]
#[command(about = "Convert PostgreSQL data to JSON, CSV, MongoDB documents or SQL statements")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config/default_config.yaml")]
    pub config: PathBuf,

    /// Output format: json, csv, mongodb or sql (falls back to output.default_format)
    #[arg(long)]
    pub format: Option<String>,

    /// PostgreSQL table to extract data from
    #[arg(long, conflicts_with = "query")]
    pub table: Option<String>,

    /// SQL query to extract data
    #[arg(long)]
    pub query: Option<String>,

    /// Output file, or a mongodb:// URI for direct import
    #[arg(long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge the flags over the file configuration into one resolved request.
    pub fn to_request(&self, config: &AppConfig) -> Result<ConversionRequest> {
        let format_name = self
            .format
            .as_deref()
            .or(config.output.default_format.as_deref())
            .ok_or_else(|| ConvertError::MissingConfigError {
                field: "output.default_format".to_string(),
            })?;
        let format = Format::from_str(format_name)?;

        let source = match (&self.table, &self.query) {
            (Some(table), None) => DataSource::Table(table.clone()),
            (None, Some(query)) => DataSource::Query(query.clone()),
            // clap rejects the both-given case before we get here.
            _ => {
                return Err(ConvertError::ConfigError {
                    message: "No query or table specified".to_string(),
                })
            }
        };

        let destination = match &self.output {
            Some(output)
                if output.starts_with("mongodb://") || output.starts_with("mongodb+srv://") =>
            {
                if format != Format::Mongodb {
                    return Err(ConvertError::ConfigError {
                        message: format!(
                            "A MongoDB URI destination requires --format mongodb (got {})",
                            format
                        ),
                    });
                }
                Destination::MongoUri(output.clone())
            }
            Some(output) => Destination::File(PathBuf::from(output)),
            None => Destination::File(
                config
                    .output
                    .output_dir()
                    .join(format!("output.{}", format)),
            ),
        };

        Ok(ConversionRequest {
            format,
            source,
            destination,
            json: config.json.to_options(),
            csv: config.csv.to_options()?,
            sql: config.sql.to_options(),
            mongo: config.mongodb.to_options(),
        })
    }
}
