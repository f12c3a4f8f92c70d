//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use crate::config::Overrides;
use crate::generator::{EmitStrategy, WriteMode};
use clap::Parser;
use std::path::Path;

#[test]
fn test_generate_command_minimal() {
    let cli = Cli::try_parse_from(["kubegen", "generate", "--spec", "resources.yaml"]).unwrap();

    match &cli.command {
        Commands::Generate {
            spec,
            output,
            dry_run,
            atomic,
            staged,
            strict_references,
            ..
        } => {
            assert_eq!(spec, Path::new("resources.yaml"));
            assert!(output.is_none());
            assert!(!dry_run && !atomic && !staged && !strict_references);
        }
        _ => panic!("Expected Generate command"),
    }
    assert_eq!(cli.command.overrides(), Overrides::default());
}

#[test]
fn test_generate_flags_become_overrides() {
    let cli = Cli::try_parse_from([
        "kubegen",
        "generate",
        "-s",
        "resources.yaml",
        "-o",
        "src/generated",
        "-p",
        "crate::kube",
        "--templates",
        "tpl",
        "--formatter",
        "cat",
        "--atomic",
        "--staged",
        "--strict-references",
    ])
    .unwrap();

    let overrides = cli.command.overrides();
    assert_eq!(overrides.root_path.as_deref(), Some(Path::new("src/generated")));
    assert_eq!(overrides.root_package.as_deref(), Some("crate::kube"));
    assert_eq!(overrides.templates.as_deref(), Some(Path::new("tpl")));
    assert_eq!(overrides.formatter.as_deref(), Some("cat"));
    assert_eq!(overrides.write_mode, Some(WriteMode::Atomic));
    assert_eq!(overrides.strategy, Some(EmitStrategy::Staged));
    assert!(overrides.strict_references);
}

#[test]
fn test_plan_command() {
    let cli = Cli::try_parse_from(["kubegen", "plan", "--spec", "r.json", "--output", "out"])
        .unwrap();
    assert_eq!(cli.command.spec(), Path::new("r.json"));
    let overrides = cli.command.overrides();
    assert_eq!(overrides.root_path.as_deref(), Some(Path::new("out")));
    assert!(overrides.formatter.is_none());
}

#[test]
fn test_validate_command_with_strict() {
    let cli = Cli::try_parse_from(["kubegen", "validate", "--spec", "r.toml", "--strict"]).unwrap();
    match cli.command {
        Commands::Validate { spec, strict } => {
            assert_eq!(spec, Path::new("r.toml"));
            assert!(strict);
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_spec_is_required() {
    assert!(Cli::try_parse_from(["kubegen", "generate"]).is_err());
    assert!(Cli::try_parse_from(["kubegen", "validate"]).is_err());
}

#[test]
fn test_unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["kubegen", "serve", "--spec", "x.yaml"]).is_err());
}
