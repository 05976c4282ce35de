use crate::domain::ports::DocumentSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Client;

/// Bulk-insert endpoint over the official MongoDB driver.
pub struct MongoSink {
    client: Client,
}

impl MongoSink {
    pub async fn connect(uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSink for MongoSink {
    async fn insert_documents(
        &self,
        database: &str,
        collection: &str,
        documents: Vec<serde_json::Value>,
    ) -> Result<u64> {
        if documents.is_empty() {
            tracing::warn!("No documents to insert into '{}'", collection);
            return Ok(0);
        }

        let collection = self
            .client
            .database(database)
            .collection::<Document>(collection);

        // TryFrom understands extended JSON, so $date markers become real
        // BSON datetimes on the way in.
        let mut batch = Vec::with_capacity(documents.len());
        for value in documents {
            match Bson::try_from(value) {
                Ok(Bson::Document(document)) => batch.push(document),
                Ok(other) => batch.push(doc! { "value": other }),
                Err(e) => {
                    tracing::warn!("Skipping document that has no BSON form: {}", e);
                }
            }
        }

        let result = collection.insert_many(batch).await?;
        Ok(result.inserted_ids.len() as u64)
    }
}
