use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Unknown output format: {format} (expected json, csv, sql or mongodb)")]
    UnknownFormatError { format: String },

    #[error("Unsupported type {type_name} in column '{column}'")]
    UnsupportedTypeError { column: String, type_name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[cfg(feature = "mongodb-load")]
    #[error("MongoDB error: {0}")]
    MongoError(#[from] mongodb::error::Error),
}

impl ConvertError {
    /// Exit code reported to the shell: 2 for user/configuration mistakes,
    /// 1 for runtime failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::UnknownFormatError { .. }
            | ConvertError::ConfigParseError(_)
            | ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValueError { .. }
            | ConvertError::MissingConfigError { .. } => 2,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConvertError::DatabaseError(e) => {
                format!("Could not talk to PostgreSQL: {}", e)
            }
            ConvertError::UnknownFormatError { format } => {
                format!(
                    "'{}' is not a supported format. Use one of: json, csv, sql, mongodb",
                    format
                )
            }
            ConvertError::IoError(e) => format!("Could not write the output: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
