use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::DonationFeed,
};

/// Polls must always hit the relay; no client or proxy may answer from cache.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

#[derive(Debug, Default, Deserialize)]
pub struct PollQuery {
    after_id: Option<String>,
}

/// Receive a donation notification from the payment provider.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body = crate::models::WebhookNotification,
    responses(
        (status = 200, description = "Donation buffered", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid payload", body = crate::models::ErrorResponse),
    )
)]
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<&'static str> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    tracing::info!(%payload, "Received webhook");

    let record = state.donation_service.ingest(&payload)?;
    tracing::debug!(id = %record.id, "Donation buffered");
    Ok("OK")
}

/// Return the donations the client has not seen yet.
///
/// Without a cursor, or with a cursor that is no longer buffered, the whole
/// buffer is returned and the client is expected to drop duplicates.
#[utoipa::path(
    get,
    path = "/get-donation/atasatap",
    params(("after_id" = Option<String>, Query, description = "Id of the last donation the client processed")),
    responses((status = 200, description = "Donations after the cursor", body = DonationFeed))
)]
pub async fn get_donations(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PollQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    // An unreadable query is treated like a missing cursor.
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let feed = state
        .donation_service
        .get_donations_after(query.after_id.as_deref())?;

    Ok((
        [(header::CACHE_CONTROL, NO_STORE)],
        Json(DonationFeed::from(feed)),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/get-donation/atasatap", get(get_donations))
}
