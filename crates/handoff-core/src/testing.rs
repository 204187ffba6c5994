//! In-memory [`IntakeGateway`] for unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::gateway::{GatewayError, IntakeGateway, NewSignoff, RecordSignoffUpdate};
use crate::record::{IntakeRecord, SignoffEntry};

#[derive(Debug)]
struct State {
    records: Vec<IntakeRecord>,
    signoffs: Vec<SignoffEntry>,
    now: DateTime<Utc>,
    read_calls: usize,
    write_calls: usize,
    fail_next_write: bool,
    fail_next_read: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            signoffs: Vec::new(),
            now: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            read_calls: 0,
            write_calls: 0,
            fail_next_write: false,
            fail_next_read: false,
        }
    }
}

/// Clones share state, so a test can keep a handle after moving one into a
/// reconciler.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryGateway {
    state: Arc<Mutex<State>>,
}

impl MemoryGateway {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn push_record(&self, record: IntakeRecord) -> Uuid {
        let id = record.id;
        self.lock().records.push(record);
        id
    }

    pub(crate) fn record(&self, id: Uuid) -> Option<IntakeRecord> {
        self.lock().records.iter().find(|r| r.id == id).cloned()
    }

    pub(crate) fn read_calls(&self) -> usize {
        self.lock().read_calls
    }

    pub(crate) fn write_calls(&self) -> usize {
        self.lock().write_calls
    }

    pub(crate) fn signoff_log_len(&self) -> usize {
        self.lock().signoffs.len()
    }

    pub(crate) fn fail_next_write(&self) {
        self.lock().fail_next_write = true;
    }

    pub(crate) fn fail_next_read(&self) {
        self.lock().fail_next_read = true;
    }

    pub(crate) fn advance_clock(&self, by: Duration) {
        let mut state = self.lock();
        state.now += by;
    }

    fn begin_read(&self) -> Result<MutexGuard<'_, State>, GatewayError> {
        let mut state = self.lock();
        state.read_calls += 1;
        if std::mem::take(&mut state.fail_next_read) {
            return Err(GatewayError::backend("injected read failure"));
        }
        Ok(state)
    }

    fn begin_write(&self) -> Result<MutexGuard<'_, State>, GatewayError> {
        let mut state = self.lock();
        state.write_calls += 1;
        if std::mem::take(&mut state.fail_next_write) {
            return Err(GatewayError::backend("injected write failure"));
        }
        Ok(state)
    }
}

#[async_trait]
impl IntakeGateway for MemoryGateway {
    async fn list_records(&self) -> Result<Vec<IntakeRecord>, GatewayError> {
        let state = self.begin_read()?;
        let mut records = state.records.clone();
        records.sort_by(|a, b| b.created_at.as_datetime().cmp(&a.created_at.as_datetime()));
        Ok(records)
    }

    async fn get_record(&self, id: Uuid) -> Result<Option<IntakeRecord>, GatewayError> {
        let state = self.begin_read()?;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_signoffs(&self, record_id: Uuid) -> Result<Vec<SignoffEntry>, GatewayError> {
        let state = self.begin_read()?;
        let mut entries: Vec<SignoffEntry> = state
            .signoffs
            .iter()
            .filter(|e| e.record_id == record_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.as_datetime().cmp(&a.created_at.as_datetime()));
        Ok(entries)
    }

    async fn insert_signoff(&self, signoff: &NewSignoff) -> Result<(), GatewayError> {
        let mut state = self.begin_write()?;
        if !state.records.iter().any(|r| r.id == signoff.record_id) {
            return Err(GatewayError::RecordNotFound(signoff.record_id));
        }
        let entry = SignoffEntry {
            id: Uuid::new_v4(),
            created_at: state.now.into(),
            record_id: signoff.record_id,
            signer_name: signoff.signer_name.clone(),
            signer_role: signoff.signer_role.clone(),
            phase: signoff.phase.clone(),
            notes: signoff.notes.clone(),
        };
        state.signoffs.push(entry);
        Ok(())
    }

    async fn update_record_signoff(
        &self,
        record_id: Uuid,
        update: &RecordSignoffUpdate,
    ) -> Result<(), GatewayError> {
        let mut state = self.begin_write()?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(GatewayError::RecordNotFound(record_id))?;
        if record.is_signed_off() {
            return Err(GatewayError::AlreadySignedOff(record_id));
        }
        record.signed_off_by = Some(update.signed_off_by.clone());
        record.signed_off_role = Some(update.signed_off_role.clone());
        record.signed_off_at = Some(update.signed_off_at.into());
        Ok(())
    }
}
