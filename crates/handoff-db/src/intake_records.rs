//! Database operations for the `intake_records` table.

use chrono::{DateTime, Utc};
use handoff_core::{IntakeRecord, RecordSignoffUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `intake_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IntakeRecordRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Option<String>,
    pub priority: Option<String>,
    pub client_name: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_role: Option<String>,
    pub pain_points: Option<String>,
    pub ai_models_discussed: Option<String>,
    pub technical_constraints: Option<String>,
    pub api_information: Option<String>,
    pub edge_cases: Option<String>,
    pub latency_requirements: Option<String>,
    pub gpu_cost_notes: Option<String>,
    pub deployment_tag: Option<String>,
    pub performance_metrics: Option<String>,
    pub pilot_results: Option<String>,
    pub proprietary_notes: Option<String>,
    pub summary: Option<String>,
    pub signed_off_by: Option<String>,
    pub signed_off_role: Option<String>,
    pub signed_off_at: Option<DateTime<Utc>>,
}

impl From<IntakeRecordRow> for IntakeRecord {
    fn from(row: IntakeRecordRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at.into(),
            phase: row.phase,
            priority: row.priority,
            client_name: row.client_name,
            reporter_name: row.reporter_name,
            reporter_role: row.reporter_role,
            pain_points: row.pain_points,
            ai_models_discussed: row.ai_models_discussed,
            technical_constraints: row.technical_constraints,
            api_information: row.api_information,
            edge_cases: row.edge_cases,
            latency_requirements: row.latency_requirements,
            gpu_cost_notes: row.gpu_cost_notes,
            deployment_tag: row.deployment_tag,
            performance_metrics: row.performance_metrics,
            pilot_results: row.pilot_results,
            proprietary_notes: row.proprietary_notes,
            summary: row.summary,
            signed_off_by: row.signed_off_by,
            signed_off_role: row.signed_off_role,
            signed_off_at: row.signed_off_at.map(Into::into),
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, created_at, phase, priority, client_name, \
            reporter_name, reporter_role, pain_points, ai_models_discussed, \
            technical_constraints, api_information, edge_cases, latency_requirements, \
            gpu_cost_notes, deployment_tag, performance_metrics, pilot_results, \
            proprietary_notes, summary, signed_off_by, signed_off_role, signed_off_at \
     FROM intake_records";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every intake record, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_intake_records(pool: &PgPool) -> Result<Vec<IntakeRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, IntakeRecordRow>(&format!(
        "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single intake record by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_intake_record(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<IntakeRecordRow>, DbError> {
    let row = sqlx::query_as::<_, IntakeRecordRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Writes the denormalized sign-off columns of one record.
///
/// The update only applies while `signed_off_at IS NULL`, so concurrent
/// submissions cannot overwrite each other.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no record has the given `id`,
/// [`DbError::AlreadySignedOff`] if it was signed off earlier, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn record_denormalized_signoff(
    pool: &PgPool,
    id: Uuid,
    update: &RecordSignoffUpdate,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE intake_records \
         SET signed_off_by = $1, signed_off_role = $2, signed_off_at = $3 \
         WHERE id = $4 AND signed_off_at IS NULL",
    )
    .bind(&update.signed_off_by)
    .bind(&update.signed_off_role)
    .bind(update.signed_off_at)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM intake_records WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        return Err(if exists {
            DbError::AlreadySignedOff
        } else {
            DbError::NotFound
        });
    }

    Ok(())
}
