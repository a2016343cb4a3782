// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::database::DatabaseConfig;
use crate::web::types::TextResponse;

pub async fn health_handler(db_config: &State<DatabaseConfig>) -> Json<TextResponse> {
    let database = if db_config.ping().await.is_ok() {
        "connected"
    } else {
        "unavailable"
    };
    info!("Health check (database {})", database);
    Json(TextResponse::success(format!("OK (database {})", database)))
}
