//! # PAPI client
//!
//! Typed client and CLI for the PAPI document-upload-and-Q&A service:
//! register and log in, upload case documents, and discuss a case with
//! the chat assistant.
//!
//! The crate can be used in two ways:
//!
//! 1. **As a CLI** - the `papi` binary, one subcommand per screen
//! 2. **As a library** - import the client and flow types directly
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use papi::{ChatFlow, PapiClient, Session};
//! use std::sync::Arc;
//!
//! let session = Arc::new(Session::restore(token_file));
//! let client = PapiClient::new("http://localhost:8000", session);
//!
//! let user = client.login("ada@example.com", "secret-pw1").await?;
//!
//! let mut flow = ChatFlow::new(Some(case_id));
//! flow.initialize(&client).await;
//! flow.send(&client, "What is the diagnosis?").await;
//! ```
//!
//! ## Modules
//!
//! - [`api`] - typed HTTP client for the PAPI endpoints
//! - [`session`] - session store with a persisted token
//! - [`validate`] - client-side form validation
//! - [`dashboard`] - case-collection state and operations
//! - [`chat`] - the case-discussion session state machine
//! - [`cli`] - the command-line shell
//! - [`types`] - data model and error handling
//!
//! ## Design constraints
//!
//! The client trusts the server: list order, case statuses, and message
//! ordering are displayed as returned. No call retries, none sets a
//! timeout, and a 401 is surfaced as text without touching the stored
//! token.

#![warn(missing_docs)]

/// Typed HTTP client for the PAPI endpoints.
pub mod api;
/// Case-discussion session state machine.
pub mod chat;
/// Command-line shell.
pub mod cli;
/// Case-collection state and operations.
pub mod dashboard;
/// Session store with a persisted token.
pub mod session;
/// Core types (entities, wire formats, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;
/// Client-side form validation.
pub mod validate;

// Re-export commonly used types
pub use api::{CaseChatApi, PapiClient};
pub use chat::{ChatFlow, ChatState, SendOutcome};
pub use dashboard::{Dashboard, DeleteOutcome};
pub use session::Session;
pub use types::{AppError, Result};
pub use utils::PapiConfig;
