use std::path::PathBuf;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["pulse"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_run_with_overrides() {
    let cli = Cli::try_parse_from([
        "pulse",
        "run",
        "--input",
        "exports/posts.csv",
        "--baseline-er",
        "1.5",
        "--baseline-ivr",
        "4",
        "--followers",
        "25000",
        "--no-publish",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Run(args)) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.input, Some(PathBuf::from("exports/posts.csv")));
    assert_eq!(args.baseline_er, Some(1.5));
    assert_eq!(args.baseline_ivr, Some(4.0));
    assert_eq!(args.followers, Some(25_000.0));
    assert!(args.no_publish);
    assert!(args.client.is_none());
}

#[test]
fn run_rejects_non_numeric_baseline() {
    let result = Cli::try_parse_from(["pulse", "run", "--baseline-er", "high"]);
    assert!(result.is_err());
}

#[test]
fn parses_insights_with_client() {
    let cli = Cli::try_parse_from(["pulse", "insights", "--client", "acme"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Insights { client: Some(ref c) }) if c == "acme"
    ));
}

#[test]
fn run_args_override_config() {
    let mut config = pulse_core::AppConfig {
        input_path: PathBuf::from("latest_posts.csv"),
        baseline_er: 0.0,
        baseline_ivr: 3.0,
        fallback_followers: 0.0,
        window_days: 30,
        client_slug: "masplus".into(),
        notion_token: None,
        notion_database_id: None,
        notion_base_url: pulse_core::DEFAULT_NOTION_BASE_URL.into(),
        request_timeout_secs: 30,
        log_level: "info".into(),
    };
    let args = RunArgs {
        input: Some(PathBuf::from("other.csv")),
        baseline_er: Some(2.0),
        baseline_ivr: None,
        followers: Some(10.0),
        client: None,
        no_publish: false,
    };
    args.apply(&mut config);
    assert_eq!(config.input_path, PathBuf::from("other.csv"));
    assert!((config.baseline_er - 2.0).abs() < f64::EPSILON);
    assert!((config.baseline_ivr - 3.0).abs() < f64::EPSILON);
    assert!((config.fallback_followers - 10.0).abs() < f64::EPSILON);
}

#[test]
fn help_is_answered_by_the_parser() {
    let err = Cli::try_parse_from(["pulse", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
