use crate::core::dispatch::select_converter;
use crate::domain::model::{Artifact, ConversionRequest, DataSource, Destination};
use crate::domain::ports::{DocumentSink, Source, Storage};
use crate::utils::error::{ConvertError, Result};

/// Drives one conversion run: fetch, preprocess, convert, write.
pub struct ConvertEngine<D: Source, S: Storage> {
    source: D,
    storage: S,
    sink: Option<Box<dyn DocumentSink>>,
}

impl<D: Source, S: Storage> ConvertEngine<D, S> {
    pub fn new(source: D, storage: S) -> Self {
        Self {
            source,
            storage,
            sink: None,
        }
    }

    /// Attach the bulk-insert endpoint used for `mongodb://` destinations.
    pub fn with_sink(mut self, sink: Box<dyn DocumentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub async fn run(&self, request: &ConversionRequest) -> Result<String> {
        let rows = match &request.source {
            DataSource::Table(table) => {
                tracing::info!("Extracting data from table: {}", table);
                self.source.fetch_table(table).await?
            }
            DataSource::Query(query) => {
                tracing::info!("Executing custom query: {}", query);
                self.source.fetch_query(query).await?
            }
        };
        tracing::info!(
            "Extracted {} rows across {} columns",
            rows.len(),
            rows.columns().len()
        );
        if rows.is_empty() {
            tracing::warn!("Result set is empty; the output will be an empty artifact");
        }

        tracing::info!("Converting data to {} format", request.format);
        let converter = select_converter(request.format);
        let rows = converter.preprocess(rows, request);
        let artifact = converter.convert(&rows, request)?;

        match (&request.destination, artifact) {
            (Destination::File(path), Artifact::Bytes(bytes)) => {
                tracing::debug!("Writing {} bytes to {}", bytes.len(), path.display());
                self.storage.write_file(path, &bytes).await?;
                Ok(path.display().to_string())
            }
            (Destination::MongoUri(uri), Artifact::Documents(documents)) => {
                let sink = self.sink.as_ref().ok_or_else(|| ConvertError::ConfigError {
                    message: "MongoDB destination requires the mongodb-load feature".to_string(),
                })?;
                let count = sink
                    .insert_documents(
                        &request.mongo.database,
                        &request.mongo.collection,
                        documents,
                    )
                    .await?;
                tracing::info!(
                    "Inserted {} documents into collection '{}'",
                    count,
                    request.mongo.collection
                );
                Ok(uri.clone())
            }
            (Destination::MongoUri(_), Artifact::Bytes(_)) => Err(ConvertError::ConfigError {
                message: format!(
                    "Only the mongodb format can write to a MongoDB URI (got {})",
                    request.format
                ),
            }),
            (Destination::File(path), Artifact::Documents(documents)) => {
                // Converters only hand back raw documents for URI
                // destinations; serialize them if that assumption breaks.
                let bytes = serde_json::to_vec_pretty(&documents)?;
                self.storage.write_file(path, &bytes).await?;
                Ok(path.display().to_string())
            }
        }
    }
}
