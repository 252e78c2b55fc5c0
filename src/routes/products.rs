use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::Result, models::StoredProduct, services::catalog_service, AppState};

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<StoredProduct>>> {
    let products = catalog_service::list_products(state.db.as_ref()).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StoredProduct>> {
    let product = catalog_service::get_product(state.db.as_ref(), &slug).await?;

    Ok(Json(product))
}
