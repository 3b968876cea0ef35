use std::sync::Arc;

use axum::{routing::get, Router};

use crate::main_lib::AppState;

pub const LIVENESS_MESSAGE: &str = "Saweria Middleware is Running!";

#[utoipa::path(get, path = "/", responses((status = 200, description = "Liveness message", body = String, content_type = "text/plain")))]
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
}
