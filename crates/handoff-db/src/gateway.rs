//! Postgres implementation of [`IntakeGateway`].

use async_trait::async_trait;
use handoff_core::{
    GatewayError, IntakeGateway, IntakeRecord, NewSignoff, RecordSignoffUpdate, SignoffEntry,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    get_intake_record, insert_signoff_entry, list_intake_records, list_signoff_entries,
    record_denormalized_signoff, DbError,
};

#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_db_error(record_id: Option<Uuid>, error: DbError) -> GatewayError {
    match (error, record_id) {
        (DbError::NotFound, Some(id)) => GatewayError::RecordNotFound(id),
        (DbError::AlreadySignedOff, Some(id)) => GatewayError::AlreadySignedOff(id),
        (other, _) => {
            tracing::error!(error = %other, "intake store query failed");
            GatewayError::backend(other)
        }
    }
}

#[async_trait]
impl IntakeGateway for PgGateway {
    async fn list_records(&self) -> Result<Vec<IntakeRecord>, GatewayError> {
        let rows = list_intake_records(&self.pool)
            .await
            .map_err(|e| map_db_error(None, e))?;
        Ok(rows.into_iter().map(IntakeRecord::from).collect())
    }

    async fn get_record(&self, id: Uuid) -> Result<Option<IntakeRecord>, GatewayError> {
        let row = get_intake_record(&self.pool, id)
            .await
            .map_err(|e| map_db_error(Some(id), e))?;
        Ok(row.map(IntakeRecord::from))
    }

    async fn list_signoffs(&self, record_id: Uuid) -> Result<Vec<SignoffEntry>, GatewayError> {
        let rows = list_signoff_entries(&self.pool, record_id)
            .await
            .map_err(|e| map_db_error(Some(record_id), e))?;
        Ok(rows.into_iter().map(SignoffEntry::from).collect())
    }

    async fn insert_signoff(&self, signoff: &NewSignoff) -> Result<(), GatewayError> {
        insert_signoff_entry(&self.pool, signoff)
            .await
            .map_err(|e| map_db_error(Some(signoff.record_id), e))?;
        Ok(())
    }

    async fn update_record_signoff(
        &self,
        record_id: Uuid,
        update: &RecordSignoffUpdate,
    ) -> Result<(), GatewayError> {
        record_denormalized_signoff(&self.pool, record_id, update)
            .await
            .map_err(|e| map_db_error(Some(record_id), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_record_not_found() {
        let id = Uuid::new_v4();
        let mapped = map_db_error(Some(id), DbError::NotFound);
        assert!(matches!(mapped, GatewayError::RecordNotFound(got) if got == id));
    }

    #[test]
    fn already_signed_maps_through() {
        let id = Uuid::new_v4();
        let mapped = map_db_error(Some(id), DbError::AlreadySignedOff);
        assert!(matches!(mapped, GatewayError::AlreadySignedOff(got) if got == id));
    }

    #[test]
    fn driver_errors_become_backend_errors() {
        let mapped = map_db_error(None, DbError::Sqlx(sqlx::Error::PoolTimedOut));
        assert!(matches!(mapped, GatewayError::Backend(_)));
    }
}
