//! Read-only record views: the list, one record's detail, and the rollup.

use handoff_core::{
    meaningful_text, summarize, AppConfig, DashboardSession, IntakeGateway, IntakeRecord, Section,
    SignoffEntry, SignoffReconciler, Summary, TimestampFormat,
};
use uuid::Uuid;

const EMPTY_CELL: &str = "\u{2014}";

fn cell(value: Option<&String>) -> &str {
    meaningful_text(value.map(String::as_str)).unwrap_or(EMPTY_CELL)
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars).collect::<String>())
    } else {
        value.to_string()
    }
}

fn lines(rows: impl IntoIterator<Item = String>) -> String {
    rows.into_iter().map(|row| row + "\n").collect()
}

pub(crate) fn render_record_table(records: &[IntakeRecord], format: &TimestampFormat) -> String {
    if records.is_empty() {
        return "no intake records found\n".to_string();
    }

    let header = format!(
        "{:<38}{:<24}{:<14}{:<10}{:<8}CLIENT",
        "ID", "CREATED", "PHASE", "PRIORITY", "SIGNED"
    );
    let rows = records.iter().map(|record| {
        format!(
            "{:<38}{:<24}{:<14}{:<10}{:<8}{}",
            record.id,
            format.format(&record.created_at),
            truncate(cell(record.phase.as_ref()), 12),
            truncate(cell(record.priority.as_ref()), 8),
            if record.is_signed_off() { "yes" } else { "no" },
            truncate(cell(record.client_name.as_ref()), 40),
        )
    });
    lines(std::iter::once(header).chain(rows))
}

pub(crate) fn render_sections(sections: &[Section]) -> String {
    lines(sections.iter().flat_map(|section| {
        std::iter::once(format!("## {}", section.title)).chain(
            section
                .items
                .iter()
                .map(|item| format!("  {}: {}", item.label, item.value)),
        )
    }))
}

pub(crate) fn render_signoffs(entries: &[SignoffEntry], format: &TimestampFormat) -> String {
    if entries.is_empty() {
        return "no sign-offs yet\n".to_string();
    }

    lines(entries.iter().flat_map(|entry| {
        let heading = format!(
            "{}  {} ({}) signed off {}",
            format.format(&entry.created_at),
            entry.signer_name,
            entry.signer_role,
            entry.phase,
        );
        std::iter::once(heading).chain(entry.notes.iter().map(|notes| format!("    {notes}")))
    }))
}

pub(crate) fn render_summary(summary: &Summary) -> String {
    let totals = [
        format!("total: {}", summary.total),
        format!("top category: {}", summary.top_category),
        format!("signed off: {}", summary.signed_off),
    ];
    let phases = summary
        .phase_counts
        .iter()
        .map(|phase| format!("  {:<20}{}", phase.phase, phase.count));
    lines(totals.into_iter().chain(phases))
}

/// # Errors
///
/// Returns an error if the record query fails.
pub(crate) async fn run_records_list<G: IntakeGateway>(
    gateway: &G,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let records = gateway.list_records().await?;
    print!("{}", render_record_table(&records, &config.timestamp_format));
    Ok(())
}

/// # Errors
///
/// Returns an error if the record query fails.
pub(crate) async fn run_summary<G: IntakeGateway>(gateway: &G) -> anyhow::Result<()> {
    let records = gateway.list_records().await?;
    print!("{}", render_summary(&summarize(&records)));
    Ok(())
}

/// Print the detail sections for `id` followed by its sign-offs.
///
/// # Errors
///
/// Returns an error if the record does not exist or a query fails.
pub(crate) async fn run_show<G: IntakeGateway>(
    reconciler: &SignoffReconciler<G>,
    config: &AppConfig,
    id: Uuid,
) -> anyhow::Result<()> {
    let mut session = DashboardSession::new(reconciler.strategy());
    session.refresh_records(reconciler.gateway()).await?;
    if session.select(id).is_none() {
        anyhow::bail!("intake record {id} not found");
    }
    session.refresh_signoffs(reconciler).await?;

    let format = &config.timestamp_format;
    print!(
        "{}",
        render_sections(&session.sections(format).unwrap_or_default())
    );
    println!("## Sign-offs");
    print!(
        "{}",
        render_signoffs(session.signoffs().unwrap_or_default(), format)
    );
    Ok(())
}
