use crate::core::converters::json::value_to_json;
use crate::domain::model::{
    iso8601, Artifact, ConversionRequest, Destination, ResultSet, Row, Value,
};
use crate::domain::ports::Converter;
use crate::utils::error::Result;

/// Maps rows to MongoDB-style documents. File destinations get an
/// import-ready JSON array; a `mongodb://` destination gets the documents
/// themselves for a bulk insert.
pub struct MongodbConverter;

impl Converter for MongodbConverter {
    /// MongoDB field names cannot start with a digit or contain dots.
    fn preprocess(&self, rows: ResultSet, _request: &ConversionRequest) -> ResultSet {
        let columns = rows
            .columns()
            .iter()
            .map(|name| sanitize_field_name(name))
            .collect();
        rows.with_columns(columns)
    }

    fn convert(&self, rows: &ResultSet, request: &ConversionRequest) -> Result<Artifact> {
        let documents: Vec<serde_json::Value> = rows
            .rows()
            .iter()
            .map(|row| document(rows.columns(), row, request.mongo.extended_json))
            .collect();

        match &request.destination {
            Destination::MongoUri(_) => Ok(Artifact::Documents(documents)),
            Destination::File(_) => Ok(Artifact::Bytes(serde_json::to_vec_pretty(&documents)?)),
        }
    }
}

fn document(columns: &[String], row: &Row, extended_json: bool) -> serde_json::Value {
    let mut doc = serde_json::Map::new();
    for (name, value) in columns.iter().zip(&row.values) {
        let field = match value {
            Value::Timestamp(ts) if extended_json => {
                serde_json::json!({ "$date": iso8601(ts) })
            }
            other => value_to_json(other),
        };
        doc.insert(name.clone(), field);
    }
    serde_json::Value::Object(doc)
}

fn sanitize_field_name(name: &str) -> String {
    let cleaned = name.replace('.', "_");
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DataSource, Format, MongoOptions};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn request(destination: Destination, extended_json: bool) -> ConversionRequest {
        ConversionRequest {
            format: Format::Mongodb,
            source: DataSource::Table("users".into()),
            destination,
            json: Default::default(),
            csv: Default::default(),
            sql: Default::default(),
            mongo: MongoOptions {
                extended_json,
                ..MongoOptions::default()
            },
        }
    }

    #[test]
    fn timestamps_carry_the_date_marker() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap();
        let rows = ResultSet::new(
            vec!["created_at".into()],
            vec![Row::new(vec![Value::Timestamp(ts)])],
        );
        let req = request(Destination::File(PathBuf::from("out.mongodb")), true);
        let artifact = MongodbConverter.convert(&rows, &req).unwrap();
        let text = String::from_utf8(artifact.as_bytes().unwrap().to_vec()).unwrap();
        assert!(text.contains(r#""$date": "2023-01-15T10:30:00+00:00""#));
    }

    #[test]
    fn date_marker_can_be_disabled() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap();
        let rows = ResultSet::new(
            vec!["created_at".into()],
            vec![Row::new(vec![Value::Timestamp(ts)])],
        );
        let req = request(Destination::File(PathBuf::from("out.mongodb")), false);
        let artifact = MongodbConverter.convert(&rows, &req).unwrap();
        let text = String::from_utf8(artifact.as_bytes().unwrap().to_vec()).unwrap();
        assert!(!text.contains("$date"));
        assert!(text.contains("2023-01-15T10:30:00+00:00"));
    }

    #[test]
    fn json_columns_embed_as_nested_documents() {
        let rows = ResultSet::new(
            vec!["address".into()],
            vec![Row::new(vec![Value::Json(serde_json::json!({
                "city": "Oslo"
            }))])],
        );
        let req = request(Destination::MongoUri("mongodb://localhost".into()), true);
        match MongodbConverter.convert(&rows, &req).unwrap() {
            Artifact::Documents(docs) => {
                assert_eq!(docs[0]["address"]["city"], "Oslo");
            }
            Artifact::Bytes(_) => panic!("expected documents for a mongodb destination"),
        }
    }

    #[test]
    fn field_names_are_sanitized() {
        let req = request(Destination::File(PathBuf::from("out.mongodb")), true);
        let rows = MongodbConverter.preprocess(
            ResultSet::empty(vec!["2fa".into(), "meta.tags".into()]),
            &req,
        );
        assert_eq!(rows.columns().to_vec(), vec!["_2fa", "meta_tags"]);
    }
}
