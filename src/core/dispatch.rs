use crate::core::converters::{CsvConverter, JsonConverter, MongodbConverter, SqlConverter};
use crate::domain::model::Format;
use crate::domain::ports::Converter;

/// Maps the requested format onto its converter. `Format` itself rejects
/// anything outside {json, csv, sql, mongodb} at parse time.
pub fn select_converter(format: Format) -> Box<dyn Converter> {
    match format {
        Format::Json => Box::new(JsonConverter),
        Format::Csv => Box::new(CsvConverter),
        Format::Sql => Box::new(SqlConverter),
        Format::Mongodb => Box::new(MongodbConverter),
    }
}
