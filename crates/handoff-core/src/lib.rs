mod app_config;
mod config;
pub mod display;
pub mod gateway;
pub mod meaningful;
pub mod record;
pub mod sections;
pub mod session;
pub mod signoff;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use display::{parse_utc_offset, TimestampFormat, DEFAULT_TIMESTAMP_PATTERN};
pub use gateway::{GatewayError, IntakeGateway, NewSignoff, RecordSignoffUpdate};
pub use meaningful::{is_meaningful, meaningful_text, FieldValue, PLACEHOLDER_TOKENS};
pub use record::{IntakeRecord, RecordField, SignoffEntry, Timestamp};
pub use sections::{build_sections, CatalogSection, Section, SectionItem, SECTION_CATALOG};
pub use session::{DashboardSession, SelectionTicket, SessionError, SignoffForm};
pub use signoff::{
    synthesize_signoff, SignoffError, SignoffReconciler, SignoffStrategy, SignoffSubmission,
    ValidationError,
};
pub use summary::{summarize, PhaseCount, Summary, NO_CATEGORY, UNKNOWN_PHASE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
