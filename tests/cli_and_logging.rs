use clap::Parser;

use syncgraph::cli::{CliArgs, LogLevel};
use syncgraph::logging::parse_level_str;
use syncgraph::types::WaveScan;

#[test]
fn cli_defaults() {
    let args = CliArgs::try_parse_from(["syncgraph"]).unwrap();
    assert_eq!(args.manifest, "Resources.toml");
    assert!(!args.delete);
    assert!(!args.dry_run);
    assert!(args.log_level.is_none());
}

#[test]
fn cli_flags() {
    let args = CliArgs::try_parse_from([
        "syncgraph",
        "--manifest",
        "infra/stack.toml",
        "--delete",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(args.manifest, "infra/stack.toml");
    assert!(args.delete);
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
}

#[test]
fn cli_rejects_unknown_level() {
    assert!(CliArgs::try_parse_from(["syncgraph", "--log-level", "loud"]).is_err());
}

#[test]
fn level_strings() {
    assert_eq!(parse_level_str(" WARNING "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("trace"), Some(tracing::Level::TRACE));
    assert_eq!(parse_level_str("verbose"), None);
}

#[test]
fn wave_scan_from_str() {
    assert_eq!("Full".parse::<WaveScan>(), Ok(WaveScan::Full));
    assert_eq!("conservative".parse::<WaveScan>(), Ok(WaveScan::Conservative));
    assert!("greedy".parse::<WaveScan>().is_err());
    assert_eq!(WaveScan::default(), WaveScan::Conservative);
}
