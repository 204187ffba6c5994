use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["handoff-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["handoff-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["handoff-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_records_and_summary() {
    let cli = Cli::try_parse_from(["handoff-cli", "records"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Records)));

    let cli = Cli::try_parse_from(["handoff-cli", "summary"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Summary)));
}

#[test]
fn show_requires_a_uuid() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from(["handoff-cli", "show", &id.to_string()]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Show { id: parsed }) if parsed == id));

    assert!(Cli::try_parse_from(["handoff-cli", "show", "record-7"]).is_err());
}

#[test]
fn signoff_phase_and_notes_are_optional() {
    let id = Uuid::new_v4().to_string();
    let cli = Cli::try_parse_from([
        "handoff-cli",
        "signoff",
        &id,
        "--name",
        "Dana",
        "--role",
        "AE",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Signoff {
            phase: None,
            notes: None,
            ref name,
            ..
        }) if name == "Dana"
    ));
}

#[test]
fn signoff_accepts_every_field() {
    let id = Uuid::new_v4().to_string();
    let cli = Cli::try_parse_from([
        "handoff-cli",
        "signoff",
        &id,
        "--name",
        "Dana",
        "--role",
        "AE",
        "--phase",
        "Sales",
        "--notes",
        "ready for SE",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Signoff {
            phase: Some(ref p),
            notes: Some(ref n),
            ..
        }) if p == "Sales" && n == "ready for SE"
    ));
}

#[test]
fn signoff_requires_name_and_role() {
    let id = Uuid::new_v4().to_string();
    assert!(Cli::try_parse_from(["handoff-cli", "signoff", &id, "--name", "Dana"]).is_err());
}
