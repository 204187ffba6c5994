use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::meaningful::FieldValue;

/// A timestamp as the backing store delivered it.
///
/// Postgres rows always decode to [`Timestamp::Parsed`]. [`Timestamp::Raw`]
/// only arises at the serde boundary, where a string that is not RFC 3339 is
/// kept verbatim so one bad column never hides the rest of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl Timestamp {
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Parsed(at) => Some(*at),
            Self::Raw(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Parsed(at)
    }
}

/// One hand-off event written by the voice-intake pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub phase: Option<String>,
    pub priority: Option<String>,
    pub client_name: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_role: Option<String>,
    // sales
    pub pain_points: Option<String>,
    pub ai_models_discussed: Option<String>,
    // solutions
    pub technical_constraints: Option<String>,
    pub api_information: Option<String>,
    pub edge_cases: Option<String>,
    // engineering
    pub latency_requirements: Option<String>,
    pub gpu_cost_notes: Option<String>,
    pub deployment_tag: Option<String>,
    // product
    pub performance_metrics: Option<String>,
    pub pilot_results: Option<String>,
    pub proprietary_notes: Option<String>,
    pub summary: Option<String>,
    /// Denormalized sign-off columns; only written under
    /// [`SignoffStrategy::Denormalized`](crate::SignoffStrategy::Denormalized).
    pub signed_off_by: Option<String>,
    pub signed_off_role: Option<String>,
    pub signed_off_at: Option<Timestamp>,
}

impl IntakeRecord {
    /// An otherwise-empty record, as the pipeline writes it before any
    /// extraction fields are filled in.
    #[must_use]
    pub fn new(id: Uuid, created_at: impl Into<Timestamp>) -> Self {
        Self {
            id,
            created_at: created_at.into(),
            phase: None,
            priority: None,
            client_name: None,
            reporter_name: None,
            reporter_role: None,
            pain_points: None,
            ai_models_discussed: None,
            technical_constraints: None,
            api_information: None,
            edge_cases: None,
            latency_requirements: None,
            gpu_cost_notes: None,
            deployment_tag: None,
            performance_metrics: None,
            pilot_results: None,
            proprietary_notes: None,
            summary: None,
            signed_off_by: None,
            signed_off_role: None,
            signed_off_at: None,
        }
    }

    #[must_use]
    pub fn field(&self, field: RecordField) -> FieldValue<'_> {
        let text = match field {
            RecordField::CreatedAt => return FieldValue::Timestamp(&self.created_at),
            RecordField::Phase => &self.phase,
            RecordField::Priority => &self.priority,
            RecordField::ClientName => &self.client_name,
            RecordField::ReporterName => &self.reporter_name,
            RecordField::ReporterRole => &self.reporter_role,
            RecordField::PainPoints => &self.pain_points,
            RecordField::AiModelsDiscussed => &self.ai_models_discussed,
            RecordField::TechnicalConstraints => &self.technical_constraints,
            RecordField::ApiInformation => &self.api_information,
            RecordField::EdgeCases => &self.edge_cases,
            RecordField::LatencyRequirements => &self.latency_requirements,
            RecordField::GpuCostNotes => &self.gpu_cost_notes,
            RecordField::DeploymentTag => &self.deployment_tag,
            RecordField::PerformanceMetrics => &self.performance_metrics,
            RecordField::PilotResults => &self.pilot_results,
            RecordField::ProprietaryNotes => &self.proprietary_notes,
            RecordField::Summary => &self.summary,
        };
        FieldValue::from(text.as_deref())
    }

    /// True once the denormalized sign-off columns have been written.
    #[must_use]
    pub fn is_signed_off(&self) -> bool {
        self.signed_off_at.is_some()
    }
}

/// Every displayable column of an [`IntakeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Phase,
    Priority,
    ClientName,
    ReporterName,
    ReporterRole,
    CreatedAt,
    PainPoints,
    AiModelsDiscussed,
    TechnicalConstraints,
    ApiInformation,
    EdgeCases,
    LatencyRequirements,
    GpuCostNotes,
    DeploymentTag,
    PerformanceMetrics,
    PilotResults,
    ProprietaryNotes,
    Summary,
}

/// One human verification of an intake record. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignoffEntry {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub record_id: Uuid,
    pub signer_name: String,
    pub signer_role: String,
    pub phase: String,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_deserializes_leniently() {
        let parsed: Timestamp = serde_json::from_str("\"2025-06-01T08:00:00Z\"").unwrap();
        assert!(matches!(parsed, Timestamp::Parsed(_)));

        let raw: Timestamp = serde_json::from_str("\"not a date\"").unwrap();
        assert_eq!(raw, Timestamp::Raw("not a date".to_string()));
    }

    #[test]
    fn record_deserializes_pipeline_payload_with_missing_fields() {
        let payload = serde_json::json!({
            "id": "7d6f0c1e-4a57-4d8b-9a4e-2f1f3b2a1c00",
            "created_at": "2025-06-01T08:00:00Z",
            "phase": "Sales",
            "priority": null,
            "client_name": "Acme",
            "reporter_name": null,
            "reporter_role": null,
            "pain_points": "n/a",
            "ai_models_discussed": null,
            "technical_constraints": null,
            "api_information": null,
            "edge_cases": null,
            "latency_requirements": null,
            "gpu_cost_notes": null,
            "deployment_tag": null,
            "performance_metrics": null,
            "pilot_results": null,
            "proprietary_notes": null,
            "summary": "Wants a pilot",
            "signed_off_by": null,
            "signed_off_role": null,
            "signed_off_at": null
        });
        let record: IntakeRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.phase.as_deref(), Some("Sales"));
        assert!(!record.is_signed_off());
        assert!(matches!(
            record.field(RecordField::PainPoints),
            FieldValue::Text("n/a")
        ));
    }
}
