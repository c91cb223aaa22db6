use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["barkive-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_fetch_predictions_command() {
    let cli = Cli::try_parse_from(["barkive-cli", "fetch", "predictions"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Fetch {
            command: FetchCommands::Predictions {
                url: None,
                out: None
            }
        })
    ));
}

#[test]
fn parses_fetch_predictions_with_overrides() {
    let cli = Cli::try_parse_from([
        "barkive-cli",
        "fetch",
        "predictions",
        "--url",
        "https://cdn.example.com/p.tsv",
        "--out",
        "data/p.tsv",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Fetch {
            command: FetchCommands::Predictions { url, out },
        }) => {
            assert_eq!(url.as_deref(), Some("https://cdn.example.com/p.tsv"));
            assert_eq!(out, Some(PathBuf::from("data/p.tsv")));
        }
        other => panic!("expected fetch predictions, got: {other:?}"),
    }
}

#[test]
fn parses_fetch_metadata_command() {
    let cli = Cli::try_parse_from(["barkive-cli", "fetch", "metadata"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Fetch {
            command: FetchCommands::Metadata {
                archive: None,
                out: None
            }
        })
    ));
}

#[test]
fn parses_wrangle_defaults() {
    let cli = Cli::try_parse_from(["barkive-cli", "wrangle"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Wrangle {
            archive: None,
            predictions: None,
            metadata: None,
            out: None
        })
    ));
}

#[test]
fn parses_wrangle_with_path_overrides() {
    let cli = Cli::try_parse_from([
        "barkive-cli",
        "wrangle",
        "--archive",
        "a.csv",
        "--out",
        "master.csv",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Wrangle {
            archive,
            predictions,
            metadata,
            out,
        }) => {
            assert_eq!(archive, Some(PathBuf::from("a.csv")));
            assert_eq!(predictions, None);
            assert_eq!(metadata, None);
            assert_eq!(out, Some(PathBuf::from("master.csv")));
        }
        other => panic!("expected wrangle, got: {other:?}"),
    }
}

#[test]
fn report_defaults_to_top_ten_without_csv() {
    let cli = Cli::try_parse_from(["barkive-cli", "report"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            top: 10,
            write_csv: false
        })
    ));
}

#[test]
fn parses_report_with_top_and_write_csv() {
    let cli = Cli::try_parse_from(["barkive-cli", "report", "--top", "3", "--write-csv"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            top: 3,
            write_csv: true
        })
    ));
}
