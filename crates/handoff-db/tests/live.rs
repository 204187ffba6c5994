//! Live integration tests for handoff-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/handoff-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::Utc;
use handoff_core::{
    GatewayError, IntakeGateway, NewSignoff, RecordSignoffUpdate, SignoffReconciler,
    SignoffStrategy, SignoffSubmission,
};
use handoff_db::{
    get_intake_record, insert_signoff_entry, list_intake_records, list_signoff_entries,
    record_denormalized_signoff, DbError, PgGateway,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert an intake record the way the pipeline does and return its id.
async fn insert_test_record(
    pool: &sqlx::PgPool,
    phase: Option<&str>,
    created_offset_minutes: i32,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO intake_records (phase, client_name, created_at) \
         VALUES ($1, 'Acme', NOW() - make_interval(mins => $2)) RETURNING id",
    )
    .bind(phase)
    .bind(created_offset_minutes)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_record failed: {e}"))
}

fn new_signoff(record_id: Uuid, name: &str) -> NewSignoff {
    NewSignoff {
        record_id,
        signer_name: name.to_string(),
        signer_role: "Reviewer".to_string(),
        phase: "Sales".to_string(),
        notes: None,
    }
}

fn submission(name: &str, role: &str, phase: &str) -> SignoffSubmission {
    SignoffSubmission {
        name: name.to_string(),
        role: role.to_string(),
        phase: phase.to_string(),
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// intake_records
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_intake_records_is_newest_first(pool: sqlx::PgPool) {
    let oldest = insert_test_record(&pool, Some("Sales"), 30).await;
    let newest = insert_test_record(&pool, Some("Engineering"), 1).await;
    let middle = insert_test_record(&pool, None, 10).await;

    let rows = list_intake_records(&pool).await.expect("list");
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newest, middle, oldest]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_intake_record_returns_none_for_unknown_id(pool: sqlx::PgPool) {
    let row = get_intake_record(&pool, Uuid::new_v4()).await.expect("query");
    assert!(row.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn denormalized_signoff_is_written_once(pool: sqlx::PgPool) {
    let id = insert_test_record(&pool, Some("Sales"), 0).await;
    let update = RecordSignoffUpdate {
        signed_off_by: "Dana".to_string(),
        signed_off_role: "AE".to_string(),
        signed_off_at: Utc::now(),
    };

    record_denormalized_signoff(&pool, id, &update)
        .await
        .expect("first sign-off");

    let second = record_denormalized_signoff(&pool, id, &update).await;
    assert!(matches!(second, Err(DbError::AlreadySignedOff)));

    let row = get_intake_record(&pool, id)
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(row.signed_off_by.as_deref(), Some("Dana"));
    assert!(row.signed_off_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn denormalized_signoff_for_unknown_record_is_not_found(pool: sqlx::PgPool) {
    let update = RecordSignoffUpdate {
        signed_off_by: "Dana".to_string(),
        signed_off_role: "AE".to_string(),
        signed_off_at: Utc::now(),
    };
    let result = record_denormalized_signoff(&pool, Uuid::new_v4(), &update).await;
    assert!(matches!(result, Err(DbError::NotFound)));
}

// ---------------------------------------------------------------------------
// signoff_entries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_signoff_entry_round_trips(pool: sqlx::PgPool) {
    let record_id = insert_test_record(&pool, Some("Sales"), 0).await;

    let inserted = insert_signoff_entry(&pool, &new_signoff(record_id, "A"))
        .await
        .expect("insert");
    assert_eq!(inserted.record_id, record_id);
    assert!(inserted.notes.is_none());

    let rows = list_signoff_entries(&pool, record_id).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, inserted.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_signoff_entry_requires_existing_record(pool: sqlx::PgPool) {
    let result = insert_signoff_entry(&pool, &new_signoff(Uuid::new_v4(), "A")).await;
    assert!(matches!(result, Err(DbError::NotFound)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn blank_signer_is_rejected_by_schema(pool: sqlx::PgPool) {
    let record_id = insert_test_record(&pool, Some("Sales"), 0).await;
    let result = insert_signoff_entry(&pool, &new_signoff(record_id, "   ")).await;
    assert!(matches!(result, Err(DbError::Sqlx(_))));
}

// ---------------------------------------------------------------------------
// PgGateway through the reconciler
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn log_reconciler_lists_newest_first(pool: sqlx::PgPool) {
    let record_id = insert_test_record(&pool, Some("Sales"), 0).await;
    let reconciler = SignoffReconciler::new(PgGateway::new(pool.clone()), SignoffStrategy::Log);

    reconciler
        .submit_signoff(record_id, &submission("First", "PM", "Product"))
        .await
        .expect("first");
    // Separate transactions so NOW() differs between the two rows.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let listed = reconciler
        .submit_and_refresh(record_id, &submission("A", "B", "C"))
        .await
        .expect("second");

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].signer_name, "A");
    assert_eq!(listed[0].notes, None);
    assert_eq!(listed[1].signer_name, "First");
}

#[sqlx::test(migrations = "../../migrations")]
async fn denormalized_reconciler_synthesizes_single_entry(pool: sqlx::PgPool) {
    let record_id = insert_test_record(&pool, Some("Engineering"), 0).await;
    let reconciler =
        SignoffReconciler::new(PgGateway::new(pool.clone()), SignoffStrategy::Denormalized);

    assert!(reconciler
        .list_signoffs(record_id)
        .await
        .expect("list")
        .is_empty());

    let listed = reconciler
        .submit_and_refresh(record_id, &submission("Jo", "SE", "Engineering"))
        .await
        .expect("submit");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].signer_name, "Jo");
    assert_eq!(listed[0].phase, "Engineering");

    let again = reconciler
        .submit_signoff(record_id, &submission("Kim", "SE", "Engineering"))
        .await;
    assert!(again.is_err());
}

#[sqlx::test(migrations = "../../migrations")]
async fn gateway_reports_missing_record_on_insert(pool: sqlx::PgPool) {
    let gateway = PgGateway::new(pool);
    let missing = Uuid::new_v4();
    let result = gateway.insert_signoff(&new_signoff(missing, "A")).await;
    assert!(matches!(result, Err(GatewayError::RecordNotFound(id)) if id == missing));
}
