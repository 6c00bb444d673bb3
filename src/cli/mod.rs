//! Command-line interface for the PAPI client.
//!
//! The subcommand surface is the navigation shell: each subcommand is one
//! screen of the service's client workflow. Commands that need an
//! account check the session first and bail with a login hint instead of
//! issuing doomed requests (the route guard).

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Client for the PAPI document-upload-and-Q&A service.
#[derive(Parser, Debug)]
#[command(
    name = "papi",
    version,
    about = "Upload case documents and discuss them with the PAPI assistant",
    after_help = "EXAMPLES:\n    \
                  papi register                 # Create an account\n    \
                  papi login                    # Log in and store the token\n    \
                  papi cases upload case1.pdf   # Upload a document\n    \
                  papi cases list               # Show your cases\n    \
                  papi chat <case-id>           # Open a discussion for a case"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "papi.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account (interactive)
    Register,

    /// Log in and persist the access token
    Login {
        /// Email to log in with (prompted when omitted)
        email: Option<String>,
    },

    /// Clear the stored session (local only)
    Logout,

    /// Show the currently logged-in user
    Whoami,

    /// Manage uploaded cases
    #[command(subcommand)]
    Cases(CaseCommands),

    /// Open a chat session for a case
    Chat {
        /// Id of the case to discuss
        case_id: String,

        /// Send a single message and print the reply instead of opening
        /// the interactive session
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Case management subcommands.
#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// List all cases, in server order
    List,

    /// Upload a document as a new case
    Upload {
        /// Path of the file to upload
        file: PathBuf,
    },

    /// Delete a case by id
    Delete {
        /// Id of the case to delete
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
