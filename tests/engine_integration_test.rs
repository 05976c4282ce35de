use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pgconv::core::{DocumentSink, Source};
use pgconv::domain::model::{
    ConversionRequest, DataSource, Destination, Format, ResultSet, Row, Value,
};
use pgconv::utils::error::{ConvertError, Result};
use pgconv::{ConvertEngine, LocalStorage};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct FakeSource {
    rows: ResultSet,
}

#[async_trait]
impl Source for FakeSource {
    async fn fetch_table(&self, _table: &str) -> Result<ResultSet> {
        Ok(self.rows.clone())
    }

    async fn fetch_query(&self, _query: &str) -> Result<ResultSet> {
        Ok(self.rows.clone())
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    inserted: Arc<Mutex<Vec<serde_json::Value>>>,
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn insert_documents(
        &self,
        _database: &str,
        _collection: &str,
        documents: Vec<serde_json::Value>,
    ) -> Result<u64> {
        let count = documents.len() as u64;
        self.inserted.lock().unwrap().extend(documents);
        Ok(count)
    }
}

fn sample_rows() -> ResultSet {
    ResultSet::new(
        vec![
            "id".to_string(),
            "name".to_string(),
            "created_at".to_string(),
            "is_active".to_string(),
        ],
        vec![
            Row::new(vec![
                Value::Integer(1),
                Value::Text("John Doe".into()),
                Value::Timestamp(Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap()),
                Value::Boolean(true),
            ]),
            Row::new(vec![
                Value::Integer(2),
                Value::Null,
                Value::Timestamp(Utc.with_ymd_and_hms(2023, 1, 16, 14, 45, 30).unwrap()),
                Value::Boolean(false),
            ]),
        ],
    )
}

fn request(format: Format, destination: Destination) -> ConversionRequest {
    ConversionRequest {
        format,
        source: DataSource::Table("users".into()),
        destination,
        json: Default::default(),
        csv: Default::default(),
        sql: Default::default(),
        mongo: Default::default(),
    }
}

#[tokio::test]
async fn end_to_end_json_conversion_writes_the_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("exports/output.json");

    let engine = ConvertEngine::new(FakeSource { rows: sample_rows() }, LocalStorage::new());
    let written = engine
        .run(&request(Format::Json, Destination::File(output.clone())))
        .await
        .unwrap();

    assert_eq!(written, output.display().to_string());

    let parsed: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "John Doe");
    assert_eq!(rows[1]["name"], serde_json::Value::Null);
}

#[tokio::test]
async fn end_to_end_sql_conversion_writes_statements() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output.sql");

    let engine = ConvertEngine::new(FakeSource { rows: sample_rows() }, LocalStorage::new());
    engine
        .run(&request(Format::Sql, Destination::File(output.clone())))
        .await
        .unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("CREATE TABLE `users`"));
    assert!(text.contains("(2, NULL, '2023-01-16T14:45:30+00:00', 0)"));
}

#[tokio::test]
async fn empty_result_set_still_writes_a_header_only_csv() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output.csv");

    let engine = ConvertEngine::new(
        FakeSource {
            rows: ResultSet::empty(vec!["id".to_string(), "name".to_string()]),
        },
        LocalStorage::new(),
    );
    engine
        .run(&request(Format::Csv, Destination::File(output.clone())))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "id,name\n");
}

#[tokio::test]
async fn mongodb_destination_goes_through_the_sink() {
    let sink = RecordingSink::default();
    let engine = ConvertEngine::new(FakeSource { rows: sample_rows() }, LocalStorage::new())
        .with_sink(Box::new(sink.clone()));

    let destination = engine
        .run(&request(
            Format::Mongodb,
            Destination::MongoUri("mongodb://localhost:27017".into()),
        ))
        .await
        .unwrap();

    assert_eq!(destination, "mongodb://localhost:27017");

    let inserted = sink.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0]["created_at"]["$date"], "2023-01-15T10:30:00+00:00");
}

#[tokio::test]
async fn mongodb_destination_without_a_sink_is_a_config_error() {
    let engine = ConvertEngine::new(FakeSource { rows: sample_rows() }, LocalStorage::new());

    let err = engine
        .run(&request(
            Format::Mongodb,
            Destination::MongoUri("mongodb://localhost:27017".into()),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::ConfigError { .. }));
}

#[tokio::test]
async fn non_mongodb_formats_reject_a_mongodb_destination() {
    let engine = ConvertEngine::new(FakeSource { rows: sample_rows() }, LocalStorage::new());

    let err = engine
        .run(&request(
            Format::Json,
            Destination::MongoUri("mongodb://localhost:27017".into()),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::ConfigError { .. }));
}
