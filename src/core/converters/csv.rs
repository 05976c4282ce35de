use crate::domain::model::{iso8601, Artifact, ConversionRequest, ResultSet, Value};
use crate::domain::ports::Converter;
use crate::utils::error::{ConvertError, Result};

/// Serializes a result set as delimited text. The header line always carries
/// the authoritative column list, even when no rows follow.
pub struct CsvConverter;

impl Converter for CsvConverter {
    /// Flattens the tags the csv writer has no native form for: timestamps
    /// to ISO-8601 text, JSON documents to their compact text form.
    fn preprocess(&self, rows: ResultSet, _request: &ConversionRequest) -> ResultSet {
        rows.map_values(|_, value| match value {
            Value::Timestamp(ts) => Value::Text(iso8601(&ts)),
            Value::Json(doc) => Value::Text(doc.to_string()),
            other => other,
        })
    }

    fn convert(&self, rows: &ResultSet, request: &ConversionRequest) -> Result<Artifact> {
        if rows.columns().is_empty() {
            return Ok(Artifact::Bytes(Vec::new()));
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(request.csv.delimiter)
            .quote(request.csv.quote)
            .from_writer(Vec::new());

        writer.write_record(rows.columns())?;
        for row in rows.rows() {
            writer.write_record(row.values.iter().map(field))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ConvertError::IoError(e.into_error()))?;
        Ok(Artifact::Bytes(bytes))
    }
}

fn field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Boolean(true) => "True".to_string(),
        Value::Boolean(false) => "False".to_string(),
        other => other.to_text(),
    }
}
