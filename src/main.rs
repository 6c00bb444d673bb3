use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use papi::api::PapiClient;
use papi::cli::commands;
use papi::cli::output::Output;
use papi::cli::{CaseCommands, Cli, Commands};
use papi::session::Session;
use papi::utils::PapiConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = match PapiConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            out.error(&e.to_string());
            std::process::exit(1);
        }
    };

    init_tracing(&config, cli.verbose);

    let session = Arc::new(Session::restore(config.token_file_path()));
    let client = PapiClient::new(config.api.base_url.clone(), session);

    let ok = dispatch(&cli.command, &client, &out).await;
    if !ok {
        std::process::exit(1);
    }
}

/// RUST_LOG wins, then --verbose, then the configured level.
fn init_tracing(config: &PapiConfig, verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("papi=debug")
    } else {
        EnvFilter::new(format!("papi={}", config.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(command: &Commands, client: &PapiClient, out: &Output) -> bool {
    match command {
        Commands::Register => commands::register(client, out).await,
        Commands::Login { email } => commands::login(client, out, email.clone()).await,
        Commands::Logout => commands::logout(client, out),
        Commands::Whoami => {
            commands::ensure_authenticated(client, out) && commands::whoami(client, out).await
        }
        Commands::Cases(case_command) => {
            if !commands::ensure_authenticated(client, out) {
                return false;
            }
            match case_command {
                CaseCommands::List => commands::cases_list(client, out).await,
                CaseCommands::Upload { file } => commands::cases_upload(client, out, file).await,
                CaseCommands::Delete { id, yes } => {
                    commands::cases_delete(client, out, id, *yes).await
                }
            }
        }
        Commands::Chat { case_id, message } => {
            commands::ensure_authenticated(client, out)
                && commands::chat(client, out, case_id, message.clone()).await
        }
    }
}
