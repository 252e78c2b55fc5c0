use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use mongodb::bson::{Bson, Document};

use crate::error::Result;

/// Generic access to named collections of a document store.
///
/// Every record handed back by a read has its `_id` coerced to a string,
/// whatever the store's native identifier type is.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short label of the backing engine, e.g. `"mongodb"`.
    fn backend_name(&self) -> &'static str;

    fn database_name(&self) -> &str;

    /// Stamps `created_at`/`updated_at`, inserts the record and returns the
    /// store-generated id as a string.
    async fn create_document(&self, collection: &str, data: Document) -> Result<String>;

    /// All records matching `filter` in natural store order, or only the first
    /// `limit` of them when `limit > 0`.
    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: usize,
    ) -> Result<Vec<Document>>;

    async fn get_one(&self, collection: &str, filter: Document) -> Result<Option<Document>>;

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64>;

    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Rejects later inserts that repeat an existing value of `field`.
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn stamp_timestamps(mut data: Document) -> Document {
    let now = timestamp_now();
    data.insert("created_at", now.clone());
    data.insert("updated_at", now);
    data
}

pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn stringify_id(mut doc: Document) -> Document {
    if let Some(id) = doc.get("_id") {
        let id = id_to_string(id);
        doc.insert("_id", id);
    }
    doc
}
