//! Database operations for the append-only `signoff_entries` table.

use chrono::{DateTime, Utc};
use handoff_core::{NewSignoff, SignoffEntry};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Postgres `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A row from the `signoff_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SignoffEntryRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub record_id: Uuid,
    pub signer_name: String,
    pub signer_role: String,
    pub phase: String,
    pub notes: Option<String>,
}

impl From<SignoffEntryRow> for SignoffEntry {
    fn from(row: SignoffEntryRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at.into(),
            record_id: row.record_id,
            signer_name: row.signer_name,
            signer_role: row.signer_role,
            phase: row.phase,
            notes: row.notes,
        }
    }
}

/// Returns all sign-offs for one record, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_signoff_entries(
    pool: &PgPool,
    record_id: Uuid,
) -> Result<Vec<SignoffEntryRow>, DbError> {
    let rows = sqlx::query_as::<_, SignoffEntryRow>(
        "SELECT id, created_at, record_id, signer_name, signer_role, phase, notes \
         FROM signoff_entries \
         WHERE record_id = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(record_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Appends one sign-off. The id is generated here; `created_at` is assigned
/// by the database.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the owning record does not exist, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_signoff_entry(
    pool: &PgPool,
    signoff: &NewSignoff,
) -> Result<SignoffEntryRow, DbError> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, SignoffEntryRow>(
        "INSERT INTO signoff_entries (id, record_id, signer_name, signer_role, phase, notes) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, created_at, record_id, signer_name, signer_role, phase, notes",
    )
    .bind(id)
    .bind(signoff.record_id)
    .bind(&signoff.signer_name)
    .bind(&signoff.signer_role)
    .bind(&signoff.phase)
    .bind(signoff.notes.as_deref())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        let fk_violation = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);
        if fk_violation {
            DbError::NotFound
        } else {
            DbError::Sqlx(e)
        }
    })?;

    Ok(row)
}
