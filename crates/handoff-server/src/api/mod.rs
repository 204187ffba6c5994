mod records;
mod signoffs;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use handoff_core::{
    AppConfig, GatewayError, SignoffError, SignoffReconciler, SignoffStrategy, TimestampFormat,
};
use handoff_db::PgGateway;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub signoff_strategy: SignoffStrategy,
    pub timestamp_format: TimestampFormat,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        Self {
            pool,
            signoff_strategy: config.signoff_strategy,
            timestamp_format: config.timestamp_format.clone(),
        }
    }

    pub(super) fn gateway(&self) -> PgGateway {
        PgGateway::new(self.pool.clone())
    }

    pub(super) fn reconciler(&self) -> SignoffReconciler<PgGateway> {
        SignoffReconciler::new(self.gateway(), self.signoff_strategy)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_gateway_error(request_id: String, error: &GatewayError) -> ApiError {
    match error {
        GatewayError::RecordNotFound(id) => {
            ApiError::new(request_id, "not_found", format!("intake record {id} not found"))
        }
        GatewayError::AlreadySignedOff(id) => ApiError::new(
            request_id,
            "conflict",
            format!("intake record {id} is already signed off"),
        ),
        GatewayError::Backend(_) => {
            tracing::error!(error = %error, "backing store call failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

pub(super) fn map_signoff_error(request_id: String, error: &SignoffError) -> ApiError {
    match error {
        SignoffError::Validation(validation) => {
            ApiError::new(request_id, "validation_error", validation.to_string())
        }
        SignoffError::Persistence(gateway) => map_gateway_error(request_id, gateway),
    }
}

pub(super) fn parse_record_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("'{raw}' is not a valid record id"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/records", get(records::list_records))
        .route("/api/v1/records/summary", get(records::records_summary))
        .route("/api/v1/records/{record_id}", get(records::get_record))
        .route(
            "/api/v1/records/{record_id}/signoffs",
            get(signoffs::list_signoffs).post(signoffs::submit_signoff),
        )
}

pub fn build_app(state: AppState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(dashboard_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match handoff_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
