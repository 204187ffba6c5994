//! Offline unit tests for handoff-db pool configuration and row conversion.
//! These tests do not require a live database connection.

use chrono::Utc;
use handoff_core::{
    AppConfig, Environment, IntakeRecord, SignoffEntry, SignoffStrategy, Timestamp,
    TimestampFormat,
};
use handoff_db::{IntakeRecordRow, PoolConfig, SignoffEntryRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        signoff_strategy: SignoffStrategy::Log,
        timestamp_format: TimestampFormat::default(),
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

fn empty_row() -> IntakeRecordRow {
    IntakeRecordRow {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
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

#[test]
fn intake_row_converts_to_core_record() {
    let mut row = empty_row();
    row.phase = Some("Sales".to_string());
    row.gpu_cost_notes = Some("low".to_string());
    let signed_at = Utc::now();
    row.signed_off_at = Some(signed_at);
    let id = row.id;
    let created_at = row.created_at;

    let record = IntakeRecord::from(row);

    assert_eq!(record.id, id);
    assert_eq!(record.created_at, Timestamp::Parsed(created_at));
    assert_eq!(record.phase.as_deref(), Some("Sales"));
    assert_eq!(record.gpu_cost_notes.as_deref(), Some("low"));
    assert_eq!(record.signed_off_at, Some(Timestamp::Parsed(signed_at)));
    assert!(record.is_signed_off());
}

#[test]
fn signoff_row_converts_to_core_entry() {
    let row = SignoffEntryRow {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        record_id: Uuid::new_v4(),
        signer_name: "A".to_string(),
        signer_role: "B".to_string(),
        phase: "C".to_string(),
        notes: None,
    };
    let record_id = row.record_id;

    let entry = SignoffEntry::from(row);

    assert_eq!(entry.record_id, record_id);
    assert_eq!(entry.signer_name, "A");
    assert!(entry.notes.is_none());
}
