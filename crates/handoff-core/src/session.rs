//! Per-user dashboard session state.
//!
//! Holds the last-fetched snapshots, the current selection and the sign-off
//! form. Snapshots are always replaced whole, never patched. Every selection
//! change bumps a generation counter; fetch results tagged with an older
//! [`SelectionTicket`] are dropped instead of being shown against the wrong
//! record.

use thiserror::Error;
use uuid::Uuid;

use crate::display::TimestampFormat;
use crate::gateway::{GatewayError, IntakeGateway};
use crate::meaningful::meaningful_text;
use crate::record::{IntakeRecord, SignoffEntry};
use crate::sections::{build_sections, Section};
use crate::signoff::{SignoffError, SignoffReconciler, SignoffStrategy, SignoffSubmission};
use crate::summary::{summarize, Summary};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignoffForm {
    pub name: String,
    pub role: String,
    pub phase: String,
    pub notes: String,
}

impl SignoffForm {
    #[must_use]
    pub fn to_submission(&self) -> SignoffSubmission {
        SignoffSubmission {
            name: self.name.clone(),
            role: self.role.clone(),
            phase: self.phase.clone(),
            notes: Some(self.notes.clone()),
        }
    }
}

/// Identifies which selection a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    record_id: Uuid,
    generation: u64,
}

impl SelectionTicket {
    #[must_use]
    pub fn record_id(&self) -> Uuid {
        self.record_id
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no intake record is selected")]
    NoSelection,
    #[error("intake record {0} is already signed off")]
    AlreadySignedOff(Uuid),
    #[error(transparent)]
    Signoff(#[from] SignoffError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone)]
pub struct DashboardSession {
    strategy: SignoffStrategy,
    records: Vec<IntakeRecord>,
    selected: Option<Uuid>,
    generation: u64,
    signoffs: Option<Vec<SignoffEntry>>,
    form: SignoffForm,
    phase_prefilled: bool,
}

impl DashboardSession {
    #[must_use]
    pub fn new(strategy: SignoffStrategy) -> Self {
        Self {
            strategy,
            records: Vec::new(),
            selected: None,
            generation: 0,
            signoffs: None,
            form: SignoffForm::default(),
            phase_prefilled: false,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> SignoffStrategy {
        self.strategy
    }

    #[must_use]
    pub fn records(&self) -> &[IntakeRecord] {
        &self.records
    }

    /// Swap in a freshly fetched record list.
    ///
    /// The selection survives only if the selected record is still present.
    pub fn replace_records(&mut self, records: Vec<IntakeRecord>) {
        self.records = records;
        if let Some(id) = self.selected {
            if !self.records.iter().any(|r| r.id == id) {
                tracing::debug!(record_id = %id, "selected record vanished on refresh");
                self.selected = None;
                self.signoffs = None;
                self.generation += 1;
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        summarize(&self.records)
    }

    /// Select a record from the current snapshot.
    ///
    /// Returns `None` when the id is not in the snapshot. Under the log
    /// strategy the very first selection seeds the form's phase from the
    /// record; later selections never touch it.
    pub fn select(&mut self, record_id: Uuid) -> Option<SelectionTicket> {
        let record = self.records.iter().find(|r| r.id == record_id)?;
        let phase = meaningful_text(record.phase.as_deref()).map(ToString::to_string);

        self.generation += 1;
        self.selected = Some(record_id);
        self.signoffs = None;

        if self.strategy == SignoffStrategy::Log && !self.phase_prefilled {
            if let Some(phase) = phase {
                self.form.phase = phase;
            }
            self.phase_prefilled = true;
        }

        self.current_ticket()
    }

    #[must_use]
    pub fn current_ticket(&self) -> Option<SelectionTicket> {
        self.selected.map(|record_id| SelectionTicket {
            record_id,
            generation: self.generation,
        })
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&IntakeRecord> {
        let id = self.selected?;
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn sections(&self, format: &TimestampFormat) -> Option<Vec<Section>> {
        self.selected_record()
            .map(|record| build_sections(record, format))
    }

    #[must_use]
    pub fn signoffs(&self) -> Option<&[SignoffEntry]> {
        self.signoffs.as_deref()
    }

    /// Install a sign-off list fetched for `ticket`.
    ///
    /// Returns `false` and drops `entries` if the selection has moved on.
    pub fn apply_signoffs(&mut self, ticket: SelectionTicket, entries: Vec<SignoffEntry>) -> bool {
        if self.current_ticket() != Some(ticket) {
            tracing::debug!(
                record_id = %ticket.record_id,
                "discarding sign-offs fetched for a stale selection"
            );
            return false;
        }
        self.signoffs = Some(entries);
        true
    }

    #[must_use]
    pub fn form(&self) -> &SignoffForm {
        &self.form
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.form.role = role.into();
    }

    /// A user-entered phase is never replaced by the selection default.
    pub fn set_phase(&mut self, phase: impl Into<String>) {
        self.form.phase = phase.into();
        self.phase_prefilled = true;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.form.notes = notes.into();
    }

    /// Under the denormalized strategy a signed record takes no further
    /// sign-offs.
    #[must_use]
    pub fn is_terminally_signed(&self) -> bool {
        self.strategy == SignoffStrategy::Denormalized
            && self
                .selected_record()
                .is_some_and(IntakeRecord::is_signed_off)
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the store call fails; the previous
    /// snapshot is kept.
    pub async fn refresh_records<G: IntakeGateway>(
        &mut self,
        gateway: &G,
    ) -> Result<(), GatewayError> {
        let records = gateway.list_records().await?;
        self.replace_records(records);
        Ok(())
    }

    /// Re-query the selected record's sign-offs.
    ///
    /// Returns whether the result was applied.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSelection`] with nothing selected, or the
    /// gateway failure.
    pub async fn refresh_signoffs<G: IntakeGateway>(
        &mut self,
        reconciler: &SignoffReconciler<G>,
    ) -> Result<bool, SessionError> {
        let ticket = self.current_ticket().ok_or(SessionError::NoSelection)?;
        let entries = reconciler.list_signoffs(ticket.record_id).await?;
        Ok(self.apply_signoffs(ticket, entries))
    }

    /// Submit the form for the selected record, then re-query.
    ///
    /// Under the denormalized strategy the record list is reloaded too, since
    /// the write landed on the record row.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSelection`], [`SessionError::AlreadySignedOff`]
    /// for a terminally signed record, or the reconciler/gateway failure.
    /// A failed submission leaves the session untouched.
    pub async fn submit<G: IntakeGateway>(
        &mut self,
        reconciler: &SignoffReconciler<G>,
    ) -> Result<(), SessionError> {
        let ticket = self.current_ticket().ok_or(SessionError::NoSelection)?;
        if self.is_terminally_signed() {
            return Err(SessionError::AlreadySignedOff(ticket.record_id));
        }

        reconciler
            .submit_signoff(ticket.record_id, &self.form.to_submission())
            .await?;

        if reconciler.strategy() == SignoffStrategy::Denormalized {
            self.refresh_records(reconciler.gateway()).await?;
        }
        self.refresh_signoffs(reconciler).await?;
        Ok(())
    }
}
