//! CLI surface tests: argument parsing for every subcommand, plus
//! help/version smoke tests against the built binary.

use std::process::Command;

use clap::{CommandFactory, Parser};
use papi::cli::output::Output;
use papi::cli::{CaseCommands, Cli, Commands};

/// Runs the papi binary through cargo with the given arguments.
fn run_papi(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .arg("run")
        .arg("--quiet")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

// =============================================================================
// Parser Sanity
// =============================================================================

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["papi"]).is_err());
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_register() {
    let cli = Cli::try_parse_from(["papi", "register"]).unwrap();
    assert!(matches!(cli.command, Commands::Register));
    assert!(!cli.verbose);
    assert!(!cli.no_color);
    assert_eq!(cli.config.to_str().unwrap(), "papi.toml");
}

#[test]
fn test_parse_login_with_and_without_email() {
    let cli = Cli::try_parse_from(["papi", "login", "ada@example.com"]).unwrap();
    match cli.command {
        Commands::Login { email } => assert_eq!(email.as_deref(), Some("ada@example.com")),
        other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::try_parse_from(["papi", "login"]).unwrap();
    match cli.command {
        Commands::Login { email } => assert!(email.is_none()),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_cases_subcommands() {
    let cli = Cli::try_parse_from(["papi", "cases", "list"]).unwrap();
    assert!(matches!(cli.command, Commands::Cases(CaseCommands::List)));

    let cli = Cli::try_parse_from(["papi", "cases", "upload", "case1.pdf"]).unwrap();
    match cli.command {
        Commands::Cases(CaseCommands::Upload { file }) => {
            assert_eq!(file.to_str().unwrap(), "case1.pdf");
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::try_parse_from(["papi", "cases", "delete", "c1", "--yes"]).unwrap();
    match cli.command {
        Commands::Cases(CaseCommands::Delete { id, yes }) => {
            assert_eq!(id, "c1");
            assert!(yes);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_chat_with_single_message() {
    let cli = Cli::try_parse_from(["papi", "chat", "c1", "-m", "What is this about?"]).unwrap();
    match cli.command {
        Commands::Chat { case_id, message } => {
            assert_eq!(case_id, "c1");
            assert_eq!(message.as_deref(), Some("What is this about?"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_chat_requires_a_case_id() {
    assert!(Cli::try_parse_from(["papi", "chat"]).is_err());
}

#[test]
fn test_global_flags_apply_after_subcommand() {
    let cli =
        Cli::try_parse_from(["papi", "cases", "list", "--no-color", "--config", "alt.toml"])
            .unwrap();
    assert!(cli.no_color);
    assert_eq!(cli.config.to_str().unwrap(), "alt.toml");
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_all_screens() {
    let output = run_papi(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("register"));
    assert!(stdout.contains("login"));
    assert!(stdout.contains("logout"));
    assert!(stdout.contains("whoami"));
    assert!(stdout.contains("cases"));
    assert!(stdout.contains("chat"));
}

#[test]
fn test_version_command() {
    let output = run_papi(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("papi"));
}

// =============================================================================
// Output Module Tests
// =============================================================================

#[test]
fn test_output_color_modes() {
    assert!(Output::new().colored);
    assert!(!Output::no_color().colored);
}
