use mongodb::bson::doc;

use crate::{
    database::{id_to_string, DocumentStore},
    error::Result,
    models::{Product, StoredProduct},
};

pub const PRODUCT_COLLECTION: &str = "product";

pub async fn count(store: &dyn DocumentStore) -> Result<u64> {
    store.count_documents(PRODUCT_COLLECTION, doc! {}).await
}

pub async fn insert(store: &dyn DocumentStore, product: &Product) -> Result<String> {
    store
        .create_document(PRODUCT_COLLECTION, product.to_document()?)
        .await
}

/// Documents that do not decode into a product are logged and left out, so
/// one foreign record cannot take the whole listing down.
pub async fn find_all(store: &dyn DocumentStore) -> Result<Vec<StoredProduct>> {
    let documents = store.get_documents(PRODUCT_COLLECTION, doc! {}, 0).await?;

    let products = documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("_id").map(id_to_string).unwrap_or_default();
            match StoredProduct::from_document(document) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!("Skipping product document {}: {}", id, e);
                    None
                }
            }
        })
        .collect();

    Ok(products)
}

pub async fn find_by_slug(store: &dyn DocumentStore, slug: &str) -> Result<Option<StoredProduct>> {
    store
        .get_one(PRODUCT_COLLECTION, doc! { "slug": slug })
        .await?
        .map(StoredProduct::from_document)
        .transpose()
}

pub async fn ensure_slug_index(store: &dyn DocumentStore) -> Result<()> {
    store.ensure_unique_index(PRODUCT_COLLECTION, "slug").await
}
