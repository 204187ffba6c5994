use handoff_core::{AppConfig, DashboardSession, IntakeGateway, SignoffReconciler};
use uuid::Uuid;

use crate::records::render_signoffs;

/// Sign-off fields as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignoffArgs {
    pub name: String,
    pub role: String,
    pub phase: Option<String>,
    pub notes: Option<String>,
}

/// Fill the session's form from `args`.
///
/// An absent `--phase` keeps whatever the session prefilled on selection.
pub(crate) fn apply_args(session: &mut DashboardSession, args: SignoffArgs) {
    session.set_name(args.name);
    session.set_role(args.role);
    if let Some(phase) = args.phase {
        session.set_phase(phase);
    }
    if let Some(notes) = args.notes {
        session.set_notes(notes);
    }
}

/// Submit one sign-off for `id` and print the re-queried list.
///
/// # Errors
///
/// Returns an error if the record does not exist, is already signed off under
/// the denormalized strategy, a required field is blank, or a query fails.
pub(crate) async fn run_signoff<G: IntakeGateway>(
    reconciler: &SignoffReconciler<G>,
    config: &AppConfig,
    id: Uuid,
    args: SignoffArgs,
) -> anyhow::Result<()> {
    let mut session = DashboardSession::new(reconciler.strategy());
    session.refresh_records(reconciler.gateway()).await?;
    if session.select(id).is_none() {
        anyhow::bail!("intake record {id} not found");
    }

    apply_args(&mut session, args);
    session.submit(reconciler).await?;

    tracing::debug!(record_id = %id, "sign-off list refreshed");
    print!(
        "{}",
        render_signoffs(
            session.signoffs().unwrap_or_default(),
            &config.timestamp_format
        )
    );
    Ok(())
}
