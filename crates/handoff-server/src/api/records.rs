use axum::{
    extract::{Path, State},
    Extension, Json,
};
use handoff_core::{
    build_sections, meaningful_text, summarize, IntakeGateway, IntakeRecord, Section, Summary,
    Timestamp,
};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_gateway_error, parse_record_id, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RecordListItem {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub created_display: String,
    pub phase: Option<String>,
    pub client_name: Option<String>,
    pub priority_badge: Option<String>,
    pub signed_off: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct RecordDetail {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub priority_badge: Option<String>,
    pub signed_off: bool,
    pub sections: Vec<Section>,
}

fn owned_meaningful(value: Option<&String>) -> Option<String> {
    meaningful_text(value.map(String::as_str)).map(ToString::to_string)
}

fn list_item(record: &IntakeRecord, state: &AppState) -> RecordListItem {
    RecordListItem {
        id: record.id,
        created_at: record.created_at.clone(),
        created_display: state.timestamp_format.format(&record.created_at),
        phase: owned_meaningful(record.phase.as_ref()),
        client_name: owned_meaningful(record.client_name.as_ref()),
        priority_badge: owned_meaningful(record.priority.as_ref()),
        signed_off: record.is_signed_off(),
    }
}

pub(super) async fn list_records(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<RecordListItem>>>, ApiError> {
    let records = state
        .gateway()
        .list_records()
        .await
        .map_err(|e| map_gateway_error(req_id.0.clone(), &e))?;

    let data = records.iter().map(|r| list_item(r, &state)).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn records_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Summary>>, ApiError> {
    let records = state
        .gateway()
        .list_records()
        .await
        .map_err(|e| map_gateway_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summarize(&records),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_record(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<RecordDetail>>, ApiError> {
    let record_id = parse_record_id(&req_id.0, &raw_id)?;

    let record = state
        .gateway()
        .get_record(record_id)
        .await
        .map_err(|e| map_gateway_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("intake record {record_id} not found"),
            )
        })?;

    let data = RecordDetail {
        id: record.id,
        created_at: record.created_at.clone(),
        priority_badge: owned_meaningful(record.priority.as_ref()),
        signed_off: record.is_signed_off(),
        sections: build_sections(&record, &state.timestamp_format),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
