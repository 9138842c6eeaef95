use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::RelayError;
use crate::logic::RelayService;
use crate::model::{ActivityIndex, DocumentPayload};
use crate::upstream::UpstreamFetcher;

pub type AppState<F> = Arc<RelayService<F>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct FetchDocumentRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityIndexRequest {
    pub unit_name: String,
}

/// Unreadable bodies are a 400 like any other invalid input; the rejection
/// detail only goes to the log.
fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RelayError> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        log::debug!("rejected request body: {}", rejection.body_text());
        RelayError::Validation("Invalid request body".to_string())
    })
}

/// POST /fetch-azure-file
/// Document text plus base64 payloads of the images and gifts it links to
pub async fn fetch_document<F: UpstreamFetcher>(
    State(relay): State<AppState<F>>,
    payload: Result<Json<FetchDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentPayload>, RelayError> {
    let req = request_body(payload)?;
    relay.fetch_document(&req.url).await.map(Json)
}

/// POST /fetch-activity-ids
/// Flat activityName+format → activityId map for a unit
pub async fn fetch_activity_ids<F: UpstreamFetcher>(
    State(relay): State<AppState<F>>,
    payload: Result<Json<ActivityIndexRequest>, JsonRejection>,
) -> Result<Json<ActivityIndex>, RelayError> {
    let req = request_body(payload)?;
    relay.fetch_activity_index(&req.unit_name).await.map(Json)
}
