use super::{Cli, Commands, OutputFormat};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[test]
fn cli_help_includes_required_top_level_commands() {
    let mut command = Cli::command();
    let help = command.render_long_help().to_string();
    assert!(help.contains("synth"));
    assert!(help.contains("discover"));
    assert!(help.contains("validate"));
}

#[test]
fn cli_parses_synth_with_output_and_format() {
    let cli = Cli::try_parse_from([
        "jobgraph",
        "synth",
        "--config",
        "jobgraph.yaml",
        "--out",
        "manifest.json",
        "--format",
        "json",
    ])
    .expect("synth must parse");
    match cli.command {
        Commands::Synth(command) => {
            assert_eq!(command.source.config, Some(PathBuf::from("jobgraph.yaml")));
            assert_eq!(command.out, Some(PathBuf::from("manifest.json")));
            assert_eq!(command.format, OutputFormat::Json);
        }
        _ => panic!("expected synth"),
    }
}

#[test]
fn verbose_flag_is_accepted_after_the_subcommand() {
    let cli = Cli::try_parse_from(["jobgraph", "discover", "--root", "repo", "--verbose"])
        .expect("discover must parse");
    assert!(cli.verbose);
    match cli.command {
        Commands::Discover(command) => {
            assert_eq!(command.source.root, Some(PathBuf::from("repo")));
            assert_eq!(command.format, OutputFormat::Text);
        }
        _ => panic!("expected discover"),
    }
}

#[test]
fn validate_rejects_out_flag() {
    let result = Cli::try_parse_from(["jobgraph", "validate", "--out", "manifest.json"]);
    assert!(result.is_err());
}
