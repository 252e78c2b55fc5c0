use axum::{extract::State, Json};

use crate::{
    error::Result,
    models::{DiagnosticsResponse, Message},
    AppState,
};

pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Backend is running".to_string(),
    })
}

/// Reports which store the service talks to. The connection string is never
/// echoed back; `database_url` only says where it came from.
pub async fn diagnostics(State(state): State<AppState>) -> Result<Json<DiagnosticsResponse>> {
    let collections = state.db.list_collection_names().await?;

    Ok(Json(DiagnosticsResponse {
        backend: "ok".to_string(),
        database: state.db.backend_name().to_string(),
        database_url: "env".to_string(),
        database_name: state.db.database_name().to_string(),
        connection_status: "connected".to_string(),
        collections,
    }))
}
