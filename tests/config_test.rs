use cellforge::config::CellConfig;
use cellforge::error::CellForgeError;
use cellforge::optimizer::overlap::OverlapMetric;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::fs::File;
use std::io::Write;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: CellConfig,
}

fn parse_cli(args: &[&str]) -> (CellConfig, clap::ArgMatches) {
    let matches = TestCli::command().get_matches_from(args);
    let cli = TestCli::from_arg_matches(&matches).expect("Failed to build CLI struct");
    (cli.config, matches)
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cells.json");
    let mut file = File::create(&path).unwrap();
    writeln!(
        file,
        r#"{{ "search": {{ "trials": 250, "threads": 2, "metric": "members" }}, "roster": {{ "extra_prefix": "Guest" }} }}"#
    )
    .unwrap();

    let cfg = CellConfig::load_from_file(&path).unwrap();
    assert_eq!(cfg.search.trials, 250);
    assert_eq!(cfg.search.threads, 2);
    assert_eq!(cfg.search.metric, OverlapMetric::Members);
    assert_eq!(cfg.search.yield_every, 50);
    assert_eq!(cfg.roster.extra_prefix, "Guest");
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CellConfig::load_from_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, CellForgeError::Config(_)));
}

#[test]
fn test_bad_json_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = CellConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, CellForgeError::Json(_)));
}

#[test]
fn test_cli_defaults_match_default_impl() {
    let (cfg, _) = parse_cli(&["test"]);
    let def = CellConfig::default();
    assert_eq!(cfg.search.trials, def.search.trials);
    assert_eq!(cfg.search.yield_every, def.search.yield_every);
    assert_eq!(cfg.search.threads, def.search.threads);
    assert_eq!(cfg.search.metric, def.search.metric);
    assert_eq!(cfg.roster.extra_prefix, def.roster.extra_prefix);
}

#[test]
fn test_explicit_flags_override_file_values() {
    let mut file_cfg = CellConfig::default();
    file_cfg.search.trials = 10;
    file_cfg.search.threads = 3;
    file_cfg.roster.extra_prefix = "Guest".to_string();

    let (cli_cfg, matches) = parse_cli(&["test", "--trials", "7", "--metric", "members"]);
    file_cfg.merge_from_cli(&cli_cfg, &matches);

    assert_eq!(file_cfg.search.trials, 7);
    assert_eq!(file_cfg.search.metric, OverlapMetric::Members);
    // Defaults on the command line do not clobber the file.
    assert_eq!(file_cfg.search.threads, 3);
    assert_eq!(file_cfg.roster.extra_prefix, "Guest");
}
