//! Sign-off reconciliation.
//!
//! Deployments store sign-offs one of two ways: an append-only
//! `signoff_entries` log, or three denormalized columns on the intake record
//! itself. [`SignoffReconciler`] hides the difference behind one read/write
//! contract. A deployment uses exactly one strategy.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::gateway::{GatewayError, IntakeGateway, NewSignoff, RecordSignoffUpdate};
use crate::record::{IntakeRecord, SignoffEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignoffStrategy {
    /// One `signoff_entries` row per sign-off; many per record.
    #[default]
    Log,
    /// `signed_off_by`/`signed_off_role`/`signed_off_at` on the record, set once.
    Denormalized,
}

impl SignoffStrategy {
    /// Case-insensitive parse of `log` or `denormalized`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "log" => Some(Self::Log),
            "denormalized" => Some(Self::Denormalized),
            _ => None,
        }
    }
}

impl fmt::Display for SignoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignoffStrategy::Log => write!(f, "log"),
            SignoffStrategy::Denormalized => write!(f, "denormalized"),
        }
    }
}

/// Raw sign-off form input, before trimming and validation.
///
/// Missing fields deserialize as empty so they surface as
/// [`ValidationError`]s rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignoffSubmission {
    pub name: String,
    pub role: String,
    pub phase: String,
    pub notes: Option<String>,
}

impl SignoffSubmission {
    /// Trim every field and check the required ones.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] naming every required field
    /// that is blank after trimming.
    pub fn validate(&self, record_id: Uuid) -> Result<NewSignoff, ValidationError> {
        let name = self.name.trim();
        let role = self.role.trim();
        let phase = self.phase.trim();

        let missing: Vec<&'static str> = [("name", name), ("role", role), ("phase", phase)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(NewSignoff {
            record_id,
            signer_name: name.to_string(),
            signer_role: role.to_string(),
            phase: phase.to_string(),
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(ToString::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required sign-off fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

#[derive(Debug, Error)]
pub enum SignoffError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to persist sign-off: {0}")]
    Persistence(#[from] GatewayError),
}

/// Build the single log-shaped entry implied by a record's denormalized
/// columns, or `None` if the record has not been signed off.
///
/// The synthesized entry reuses the record's id and phase and has no notes.
#[must_use]
pub fn synthesize_signoff(record: &IntakeRecord) -> Option<SignoffEntry> {
    let signed_at = record.signed_off_at.clone()?;
    Some(SignoffEntry {
        id: record.id,
        created_at: signed_at,
        record_id: record.id,
        signer_name: record.signed_off_by.clone().unwrap_or_default(),
        signer_role: record.signed_off_role.clone().unwrap_or_default(),
        phase: record.phase.clone().unwrap_or_default(),
        notes: None,
    })
}

/// One read/write contract for sign-offs over either storage strategy.
#[derive(Debug, Clone)]
pub struct SignoffReconciler<G> {
    gateway: G,
    strategy: SignoffStrategy,
}

impl<G: IntakeGateway> SignoffReconciler<G> {
    pub fn new(gateway: G, strategy: SignoffStrategy) -> Self {
        Self { gateway, strategy }
    }

    pub fn strategy(&self) -> SignoffStrategy {
        self.strategy
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Sign-offs for `record_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the store call fails, or
    /// [`GatewayError::RecordNotFound`] under the denormalized strategy when
    /// the record does not exist.
    pub async fn list_signoffs(&self, record_id: Uuid) -> Result<Vec<SignoffEntry>, GatewayError> {
        match self.strategy {
            SignoffStrategy::Log => self.gateway.list_signoffs(record_id).await,
            SignoffStrategy::Denormalized => {
                let record = self
                    .gateway
                    .get_record(record_id)
                    .await?
                    .ok_or(GatewayError::RecordNotFound(record_id))?;
                Ok(synthesize_signoff(&record).into_iter().collect())
            }
        }
    }

    /// Validate and persist one sign-off.
    ///
    /// Validation runs before any store call. Nothing is cached locally, so a
    /// failed submission can be retried with the same input; callers re-query
    /// with [`Self::list_signoffs`] to see the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`SignoffError::Validation`] for blank required fields and
    /// [`SignoffError::Persistence`] if the store rejects the write.
    pub async fn submit_signoff(
        &self,
        record_id: Uuid,
        submission: &SignoffSubmission,
    ) -> Result<(), SignoffError> {
        let signoff = submission.validate(record_id)?;

        match self.strategy {
            SignoffStrategy::Log => self.gateway.insert_signoff(&signoff).await?,
            SignoffStrategy::Denormalized => {
                // The legacy columns have nowhere to keep phase or notes.
                let update = RecordSignoffUpdate {
                    signed_off_by: signoff.signer_name,
                    signed_off_role: signoff.signer_role,
                    signed_off_at: Utc::now(),
                };
                self.gateway
                    .update_record_signoff(record_id, &update)
                    .await?;
            }
        }

        tracing::info!(
            record_id = %record_id,
            strategy = %self.strategy,
            "sign-off recorded"
        );
        Ok(())
    }

    /// Submit, then re-query the record's sign-offs.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_signoff`]; a failed re-query is reported as
    /// [`SignoffError::Persistence`] even though the write itself succeeded.
    pub async fn submit_and_refresh(
        &self,
        record_id: Uuid,
        submission: &SignoffSubmission,
    ) -> Result<Vec<SignoffEntry>, SignoffError> {
        self.submit_signoff(record_id, submission).await?;
        Ok(self.list_signoffs(record_id).await?)
    }
}
