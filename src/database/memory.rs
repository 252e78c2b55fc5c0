use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::sync::Arc;

use super::store::{id_to_string, stamp_timestamps, stringify_id, DocumentStore};
use crate::error::{AppError, Result};

/// Process-local document store. Collections are insertion-ordered vectors;
/// filters match on top-level field equality only.
#[derive(Clone)]
pub struct InMemoryStore {
    name: String,
    collections: Arc<DashMap<String, Vec<Document>>>,
    unique_fields: Arc<DashMap<String, Vec<String>>>,
}

impl InMemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Arc::new(DashMap::new()),
            unique_fields: Arc::new(DashMap::new()),
        }
    }

    /// Total number of records across all collections.
    pub fn len(&self) -> usize {
        self.collections.iter().map(|entry| entry.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("appdb")
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn duplicate_of<'f>(
    existing: &[Document],
    record: &Document,
    fields: &'f [String],
) -> Option<&'f str> {
    fields
        .iter()
        .find(|field| match record.get(field.as_str()) {
            Some(value) => existing.iter().any(|d| d.get(field.as_str()) == Some(value)),
            None => false,
        })
        .map(String::as_str)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn database_name(&self) -> &str {
        &self.name
    }

    async fn create_document(&self, collection: &str, data: Document) -> Result<String> {
        let mut record = stamp_timestamps(data);
        if !record.contains_key("_id") {
            let mut with_id = Document::new();
            with_id.insert("_id", ObjectId::new());
            for (key, value) in record {
                with_id.insert(key, value);
            }
            record = with_id;
        }
        let id = record.get("_id").cloned().unwrap_or(Bson::Null);

        // The collection entry is taken first and held while the unique fields
        // are read, the same order ensure_unique_index uses.
        let mut documents = self.collections.entry(collection.to_string()).or_default();

        let mut fields = vec!["_id".to_string()];
        if let Some(unique) = self.unique_fields.get(collection) {
            fields.extend(unique.iter().cloned());
        }
        if let Some(field) = duplicate_of(&documents, &record, &fields) {
            return Err(AppError::DuplicateKey(format!(
                "{}.{} already holds {}",
                collection,
                field,
                record.get(field).map(|v| v.to_string()).unwrap_or_default()
            )));
        }
        documents.push(record);

        Ok(id_to_string(&id))
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let Some(documents) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let take = if limit > 0 { limit } else { usize::MAX };

        Ok(documents
            .iter()
            .filter(|d| matches(d, &filter))
            .take(take)
            .cloned()
            .map(stringify_id)
            .collect())
    }

    async fn get_one(&self, collection: &str, filter: Document) -> Result<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| matches(d, &filter)).cloned())
            .map(stringify_id))
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64> {
        Ok(self
            .collections
            .get(collection)
            .map(|documents| documents.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<()> {
        let documents = self.collections.entry(collection.to_string()).or_default();
        for (i, document) in documents.iter().enumerate() {
            if let Some(value) = document.get(field) {
                if documents[..i].iter().any(|d| d.get(field) == Some(value)) {
                    return Err(AppError::DuplicateKey(format!(
                        "{}.{} already holds duplicates of {}",
                        collection, field, value
                    )));
                }
            }
        }

        let mut fields = self.unique_fields.entry(collection.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn create_then_get_one_round_trips() {
        let store = InMemoryStore::default();
        let input = doc! { "slug": "desk-lamp", "name": "Desk Lamp", "price": 19.5 };

        let id = store.create_document("item", input.clone()).await.unwrap();
        let found = store
            .get_one("item", doc! { "slug": "desk-lamp" })
            .await
            .unwrap()
            .expect("record should exist");

        assert_eq!(found.get_str("_id").unwrap(), id);
        assert_eq!(
            found.get_str("created_at").unwrap(),
            found.get_str("updated_at").unwrap()
        );

        let mut rest = found.clone();
        rest.remove("_id");
        rest.remove("created_at");
        rest.remove("updated_at");
        assert_eq!(rest, input);
    }

    #[tokio::test]
    async fn ids_are_object_id_hex() {
        let store = InMemoryStore::default();
        let id = store.create_document("item", doc! { "n": 1 }).await.unwrap();

        assert!(ObjectId::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn get_documents_filters_and_limits_in_insertion_order() {
        let store = InMemoryStore::default();
        for n in 0..5 {
            let kind = if n % 2 == 0 { "even" } else { "odd" };
            store
                .create_document("item", doc! { "n": n, "kind": kind })
                .await
                .unwrap();
        }

        let all = store.get_documents("item", doc! {}, 0).await.unwrap();
        let ns: Vec<i32> = all.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
        assert!(all.iter().all(|d| d.get_str("_id").is_ok()));

        let evens = store
            .get_documents("item", doc! { "kind": "even" }, 2)
            .await
            .unwrap();
        let ns: Vec<i32> = evens.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![0, 2]);
    }

    #[tokio::test]
    async fn missing_collection_reads_empty() {
        let store = InMemoryStore::default();
        assert!(store.is_empty());

        assert!(store.get_documents("nope", doc! {}, 0).await.unwrap().is_empty());
        assert!(store.get_one("nope", doc! {}).await.unwrap().is_none());
        assert_eq!(store.count_documents("nope", doc! {}).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unique_index_rejects_repeats() {
        let store = InMemoryStore::default();
        store.ensure_unique_index("item", "slug").await.unwrap();
        store.create_document("item", doc! { "slug": "a" }).await.unwrap();

        let err = store
            .create_document("item", doc! { "slug": "a" })
            .await
            .unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(store.count_documents("item", doc! {}).await.unwrap(), 1);

        store.create_document("item", doc! { "slug": "b" }).await.unwrap();
        assert_eq!(store.count_documents("item", doc! {}).await.unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn unique_index_over_existing_duplicates_fails() {
        let store = InMemoryStore::default();
        store.create_document("item", doc! { "slug": "a" }).await.unwrap();
        store.create_document("item", doc! { "slug": "a" }).await.unwrap();

        let err = store.ensure_unique_index("item", "slug").await.unwrap_err();
        assert!(err.is_duplicate_key());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn inserts_racing_an_index_build_never_leave_duplicates_behind_it() {
        for _ in 0..20 {
            let store = InMemoryStore::default();

            let inserts: Vec<_> = (0..16)
                .map(|_| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        store.create_document("item", doc! { "slug": "a" }).await
                    })
                })
                .collect();
            let index = {
                let store = store.clone();
                tokio::spawn(async move { store.ensure_unique_index("item", "slug").await })
            };

            for insert in inserts {
                let _ = insert.await.unwrap();
            }
            let indexed = index.await.unwrap();

            let count = store
                .count_documents("item", doc! { "slug": "a" })
                .await
                .unwrap();
            match indexed {
                Ok(()) => assert_eq!(count, 1),
                Err(e) => {
                    assert!(e.is_duplicate_key());
                    assert!(count > 1);
                }
            }
        }
    }

    #[tokio::test]
    async fn collection_names_are_listed() {
        let store = InMemoryStore::new("catalog");
        store.create_document("product", doc! { "n": 1 }).await.unwrap();
        store.ensure_unique_index("audit", "n").await.unwrap();

        assert_eq!(store.database_name(), "catalog");
        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["audit".to_string(), "product".to_string()]
        );
    }
}
