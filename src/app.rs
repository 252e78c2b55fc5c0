use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::{AppConfig, CorsConfig},
    database::{self, DocumentStore},
    error::{AppError, Result},
    routes,
    services::catalog_service,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DocumentStore>,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let store = database::create_store(&config.database).await?;

    build_with_store(config, store).await
}

/// Builds the router over an already constructed store, seeding it first.
pub async fn build_with_store(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Result<Router> {
    catalog_service::init(store.as_ref()).await?;

    let state = AppState { db: store };
    let cors = cors_layer(&config.cors)?;

    let app = routes::create_router().layer(cors).with_state(state);

    Ok(app)
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let Some(origins) = &config.allowed_origins else {
        // Mirrors the request origin, so credentials keep working.
        return Ok(CorsLayer::very_permissive());
    };

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(allowed_origins))
}
