use crate::domain::model::{Artifact, ConversionRequest, ResultSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Row producer. Implemented by the PostgreSQL adapter; tests provide an
/// in-memory fake.
#[async_trait]
pub trait Source: Send + Sync {
    async fn fetch_table(&self, table: &str) -> Result<ResultSet>;
    async fn fetch_query(&self, query: &str) -> Result<ResultSet>;
}

/// Artifact destination on some filesystem-like backend.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Shared lifecycle of every format converter.
///
/// `preprocess` must stay pure and keep row order; the default is identity.
pub trait Converter: Send + Sync {
    fn preprocess(&self, rows: ResultSet, _request: &ConversionRequest) -> ResultSet {
        rows
    }

    fn convert(&self, rows: &ResultSet, request: &ConversionRequest) -> Result<Artifact>;
}

/// Bulk insert endpoint for the MongoDB direct-import path.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn insert_documents(
        &self,
        database: &str,
        collection: &str,
        documents: Vec<serde_json::Value>,
    ) -> Result<u64>;
}
