//! The narrow data-access contract between the dashboard core and the
//! backing store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::record::{IntakeRecord, SignoffEntry};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("intake record {0} not found")]
    RecordNotFound(Uuid),
    #[error("intake record {0} is already signed off")]
    AlreadySignedOff(Uuid),
    #[error("backing store error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(error.into())
    }
}

/// A validated sign-off ready to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSignoff {
    pub record_id: Uuid,
    pub signer_name: String,
    pub signer_role: String,
    pub phase: String,
    pub notes: Option<String>,
}

/// The partial row written to a record's denormalized sign-off columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSignoffUpdate {
    pub signed_off_by: String,
    pub signed_off_role: String,
    pub signed_off_at: DateTime<Utc>,
}

/// Row access for intake records and their sign-offs.
///
/// Every list is ordered newest first.
#[async_trait]
pub trait IntakeGateway: Send + Sync {
    async fn list_records(&self) -> Result<Vec<IntakeRecord>, GatewayError>;

    async fn get_record(&self, id: Uuid) -> Result<Option<IntakeRecord>, GatewayError>;

    async fn list_signoffs(&self, record_id: Uuid) -> Result<Vec<SignoffEntry>, GatewayError>;

    /// Append a sign-off. Fails with [`GatewayError::RecordNotFound`] when
    /// the owning record does not exist.
    async fn insert_signoff(&self, signoff: &NewSignoff) -> Result<(), GatewayError>;

    /// Write the denormalized sign-off columns of one record.
    ///
    /// Whether a second write is rejected with
    /// [`GatewayError::AlreadySignedOff`] is up to the store; the Postgres
    /// gateway guards on `signed_off_at IS NULL`.
    async fn update_record_signoff(
        &self,
        record_id: Uuid,
        update: &RecordSignoffUpdate,
    ) -> Result<(), GatewayError>;
}
