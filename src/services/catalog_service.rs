use crate::{
    database::DocumentStore,
    error::{AppError, Result},
    models::{Product, StoredProduct},
    queries::product_queries,
    services::seed_data,
};

/// Startup hook: install the slug guard, then seed.
pub async fn init(store: &dyn DocumentStore) -> Result<()> {
    match product_queries::ensure_slug_index(store).await {
        Ok(()) => {}
        Err(e) if e.is_duplicate_key() => {
            tracing::warn!("Product slugs are already duplicated, continuing without the unique index: {}", e);
        }
        Err(e) => return Err(e),
    }

    seed_if_empty(store).await?;

    Ok(())
}

/// Inserts the demo catalog when the product collection is empty and returns
/// how many products were written.
///
/// The count and the inserts are separate round-trips. Two callers racing on
/// an empty collection can both insert unless the slug index is in place, in
/// which case the loser's inserts are rejected and skipped here.
pub async fn seed_if_empty(store: &dyn DocumentStore) -> Result<usize> {
    if product_queries::count(store).await? > 0 {
        return Ok(0);
    }

    insert_seed_products(store, seed_data::demo_products()).await
}

async fn insert_seed_products(store: &dyn DocumentStore, products: Vec<Product>) -> Result<usize> {
    let mut inserted = 0;
    for product in products {
        product.validate().map_err(|e| {
            AppError::InternalError(format!("Seed product {} is invalid: {}", product.slug, e))
        })?;

        match product_queries::insert(store, &product).await {
            Ok(id) => {
                tracing::debug!("Seeded product {} as {}", product.slug, id);
                inserted += 1;
            }
            Err(e) if e.is_duplicate_key() => {
                tracing::debug!("Seed product {} already present, skipping", product.slug);
            }
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        tracing::info!("Seeded {} demo products", inserted);
    }

    Ok(inserted)
}

pub async fn list_products(store: &dyn DocumentStore) -> Result<Vec<StoredProduct>> {
    seed_if_empty(store).await?;

    product_queries::find_all(store).await
}

pub async fn get_product(store: &dyn DocumentStore, slug: &str) -> Result<StoredProduct> {
    seed_if_empty(store).await?;

    product_queries::find_by_slug(store, slug)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use mongodb::bson::doc;

    const SEEDED_SLUGS: [&str; 3] = ["iphone-17-pro", "samsung-s24-ultra", "oneplus-12"];

    #[tokio::test]
    async fn fresh_store_lists_the_seeded_catalog() {
        let store = InMemoryStore::default();

        let products = list_products(&store).await.unwrap();
        let slugs: Vec<&str> = products.iter().map(|p| p.product.slug.as_str()).collect();

        assert_eq!(slugs, SEEDED_SLUGS);
    }

    #[tokio::test]
    async fn iphone_detail() {
        let store = InMemoryStore::default();

        let iphone = get_product(&store, "iphone-17-pro").await.unwrap();

        assert_eq!(iphone.product.name, "iPhone 17 Pro");
        assert_eq!(iphone.product.variants.len(), 2);
        assert_eq!(iphone.product.emi_plans.len(), 3);
        assert_eq!(iphone.created_at, iphone.updated_at);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let store = InMemoryStore::default();

        let err = get_product(&store, "nonexistent-slug").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Product not found"));
    }

    #[tokio::test]
    async fn seeding_is_a_no_op_on_a_populated_collection() {
        let store = InMemoryStore::default();
        store
            .create_document(product_queries::PRODUCT_COLLECTION, doc! { "slug": "anything" })
            .await
            .unwrap();

        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(product_queries::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listing_skips_documents_that_are_not_products() {
        let store = InMemoryStore::default();
        seed_if_empty(&store).await.unwrap();
        store
            .create_document(product_queries::PRODUCT_COLLECTION, doc! { "slug": "anything" })
            .await
            .unwrap();

        let products = list_products(&store).await.unwrap();
        let slugs: Vec<&str> = products.iter().map(|p| p.product.slug.as_str()).collect();

        assert_eq!(slugs, SEEDED_SLUGS);
        assert_eq!(product_queries::count(&store).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn listing_a_collection_of_only_foreign_documents_is_empty() {
        let store = InMemoryStore::default();
        store
            .create_document(product_queries::PRODUCT_COLLECTION, doc! { "slug": "anything" })
            .await
            .unwrap();

        assert!(list_products(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_seed_data_is_an_internal_error() {
        let store = InMemoryStore::default();
        let mut products = seed_data::demo_products();
        products[1].slug = "Not A Slug".to_string();

        let err = insert_seed_products(&store, products).await.unwrap_err();

        assert!(matches!(err, AppError::InternalError(_)));
        assert_eq!(product_queries::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let store = InMemoryStore::default();

        assert_eq!(seed_if_empty(&store).await.unwrap(), 3);
        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(product_queries::count(&store).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn ids_are_strings() {
        let store = InMemoryStore::default();
        seed_if_empty(&store).await.unwrap();

        let raw = store
            .get_documents(product_queries::PRODUCT_COLLECTION, doc! {}, 0)
            .await
            .unwrap();

        assert_eq!(raw.len(), 3);
        assert!(raw.iter().all(|d| d.get_str("_id").is_ok()));
    }

    #[tokio::test]
    async fn init_seeds_and_installs_the_slug_guard() {
        let store = InMemoryStore::default();
        init(&store).await.unwrap();

        assert_eq!(product_queries::count(&store).await.unwrap(), 3);

        let seeded = &seed_data::demo_products()[0];
        let err = product_queries::insert(&store, seeded).await.unwrap_err();
        assert!(err.is_duplicate_key());
    }

    #[tokio::test]
    async fn init_tolerates_existing_duplicates() {
        let store = InMemoryStore::default();
        for _ in 0..2 {
            store
                .create_document(product_queries::PRODUCT_COLLECTION, doc! { "slug": "dup" })
                .await
                .unwrap();
        }

        init(&store).await.unwrap();
        assert_eq!(product_queries::count(&store).await.unwrap(), 2);
    }

    async fn race_cold_start(store: InMemoryStore, racers: usize) -> u64 {
        let handles: Vec<_> = (0..racers)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { list_products(&store).await.map(|p| p.len()) })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        product_queries::count(&store).await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unguarded_cold_start_duplicates_are_bounded() {
        let racers = 8;
        let total = race_cold_start(InMemoryStore::default(), racers).await;

        assert!(total >= 3);
        assert!(total <= 3 * racers as u64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn guarded_cold_start_seeds_exactly_once() {
        let store = InMemoryStore::default();
        product_queries::ensure_slug_index(&store).await.unwrap();

        let total = race_cold_start(store.clone(), 8).await;
        assert_eq!(total, 3);

        let slugs: Vec<String> = list_products(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product.slug)
            .collect();
        assert_eq!(slugs, SEEDED_SLUGS);
    }
}
