use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client, Database, IndexModel,
};

use super::store::{id_to_string, stamp_timestamps, stringify_id, DocumentStore};
use crate::{config::DatabaseConfig, error::Result};

/// MongoDB-backed store. The driver connects on first use and pools
/// connections for the life of the client.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.url).await?;
        let db = client.database(&config.name);

        tracing::info!("MongoDB client created for database {}", config.name);

        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    fn database_name(&self) -> &str {
        self.db.name()
    }

    async fn create_document(&self, collection: &str, data: Document) -> Result<String> {
        let result = self
            .collection(collection)
            .insert_one(stamp_timestamps(data))
            .await?;

        Ok(id_to_string(&result.inserted_id))
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let collection = self.collection(collection);
        let mut find = collection.find(filter);
        if limit > 0 {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let documents: Vec<Document> = find.await?.try_collect().await?;

        Ok(documents.into_iter().map(stringify_id).collect())
    }

    async fn get_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        let document = self.collection(collection).find_one(filter).await?;

        Ok(document.map(stringify_id))
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64> {
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        Ok(self.db.list_collection_names().await?)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<()> {
        let mut keys = Document::new();
        keys.insert(field, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection(collection).create_index(index).await?;

        tracing::info!("Unique index on {}.{} ensured", collection, field);

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
