use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use handoff_core::{SignoffEntry, SignoffSubmission, Timestamp, TimestampFormat};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    map_gateway_error, map_signoff_error, parse_record_id, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct SignoffItem {
    pub id: Uuid,
    pub record_id: Uuid,
    pub signer_name: String,
    pub signer_role: String,
    pub phase: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub created_display: String,
}

fn to_items(entries: Vec<SignoffEntry>, format: &TimestampFormat) -> Vec<SignoffItem> {
    entries
        .into_iter()
        .map(|entry| SignoffItem {
            created_display: format.format(&entry.created_at),
            id: entry.id,
            record_id: entry.record_id,
            signer_name: entry.signer_name,
            signer_role: entry.signer_role,
            phase: entry.phase,
            notes: entry.notes,
            created_at: entry.created_at,
        })
        .collect()
}

pub(super) async fn list_signoffs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<SignoffItem>>>, ApiError> {
    let record_id = parse_record_id(&req_id.0, &raw_id)?;

    let entries = state
        .reconciler()
        .list_signoffs(record_id)
        .await
        .map_err(|e| map_gateway_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: to_items(entries, &state.timestamp_format),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Validate and store one sign-off, then answer with the re-queried list.
pub(super) async fn submit_signoff(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    body: Result<Json<SignoffSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SignoffItem>>>), ApiError> {
    let record_id = parse_record_id(&req_id.0, &raw_id)?;
    let Json(submission) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let entries = state
        .reconciler()
        .submit_and_refresh(record_id, &submission)
        .await
        .map_err(|e| map_signoff_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: to_items(entries, &state.timestamp_format),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
