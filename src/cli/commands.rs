//! Command handlers: one function per screen.
//!
//! Every handler catches its own failures and turns them into display
//! text through [`Output`]; nothing propagates past the command that
//! triggered it. Handlers return whether the command succeeded so `main`
//! can pick the exit code.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::api::PapiClient;
use crate::chat::{ChatFlow, ChatState};
use crate::cli::output::Output;
use crate::dashboard::{Dashboard, DeleteOutcome};
use crate::types::GENERAL_TOPIC;
use crate::validate::{LoginForm, RegisterForm};

/// Route guard: protected commands run only with a stored token. Instead
/// of issuing a request that can only 401, print the login hint and bail.
pub fn ensure_authenticated(client: &PapiClient, out: &Output) -> bool {
    if client.session().is_authenticated() {
        return true;
    }
    out.error("You are not logged in. Run `papi login` first.");
    false
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

// ============= Auth Screens =============

/// Interactive registration. Validation failures are printed per field
/// and block submission; no request is made until the form is clean.
pub async fn register(client: &PapiClient, out: &Output) -> bool {
    let form = match read_register_form() {
        Ok(form) => form,
        Err(e) => {
            out.error(&format!("could not read input: {}", e));
            return false;
        }
    };

    let errors = form.validate();
    if !errors.is_empty() {
        for error in &errors {
            out.field_error(error.field, &error.message);
        }
        return false;
    }

    match client.register(&form.into_request()).await {
        Ok(()) => {
            out.success("Registration successful! You can now log in.");
            true
        }
        Err(e) => {
            out.error(&e.display_message());
            false
        }
    }
}

fn read_register_form() -> io::Result<RegisterForm> {
    Ok(RegisterForm {
        first_name: prompt("First name")?,
        last_name: prompt("Last name")?,
        email: prompt("Email")?,
        password: prompt("Password")?,
        confirm_password: prompt("Confirm password")?,
    })
}

/// Login: validate, exchange credentials for a token, fetch the profile,
/// establish the session.
pub async fn login(client: &PapiClient, out: &Output, email: Option<String>) -> bool {
    let form = {
        let email = match email {
            Some(email) => email,
            None => match prompt("Email") {
                Ok(email) => email,
                Err(e) => {
                    out.error(&format!("could not read input: {}", e));
                    return false;
                }
            },
        };
        let password = match prompt("Password") {
            Ok(password) => password,
            Err(e) => {
                out.error(&format!("could not read input: {}", e));
                return false;
            }
        };
        LoginForm { email, password }
    };

    let errors = form.validate();
    if !errors.is_empty() {
        for error in &errors {
            out.field_error(error.field, &error.message);
        }
        return false;
    }

    match client.login(form.email.trim(), &form.password).await {
        Ok(user) => {
            out.success(&format!("Logged in as {}", user.full_name()));
            true
        }
        Err(e) => {
            out.error(&e.display_message());
            false
        }
    }
}

/// Clears the stored session. Local only; the token is not invalidated
/// server-side.
pub fn logout(client: &PapiClient, out: &Output) -> bool {
    match client.session().logout() {
        Ok(()) => {
            out.success("Logged out.");
            true
        }
        Err(e) => {
            out.error(&e.display_message());
            false
        }
    }
}

/// Prints the current user's profile.
pub async fn whoami(client: &PapiClient, out: &Output) -> bool {
    match client.me().await {
        Ok(user) => {
            out.info(&format!("{} <{}>", user.full_name(), user.email));
            true
        }
        Err(e) => {
            out.error(&e.display_message());
            false
        }
    }
}

// ============= Dashboard Screens =============

/// Lists all cases in server order.
pub async fn cases_list(client: &PapiClient, out: &Output) -> bool {
    let mut dashboard = Dashboard::new();
    if dashboard.refresh(client).await.is_err() {
        out.error(dashboard.error().unwrap_or("Failed to load cases."));
        return false;
    }
    if dashboard.cases().is_empty() {
        out.info("No cases uploaded yet.");
        return true;
    }
    for case in dashboard.cases() {
        out.case_row(case);
    }
    true
}

/// Uploads a document and shows the refreshed list.
pub async fn cases_upload(client: &PapiClient, out: &Output, file: &Path) -> bool {
    let mut dashboard = Dashboard::new();
    if dashboard.upload(client, file).await.is_err() {
        out.error(dashboard.error().unwrap_or("Upload failed."));
        return false;
    }
    out.success("Case uploaded.");
    for case in dashboard.cases() {
        out.case_row(case);
    }
    true
}

/// Deletes a case, prompting for confirmation unless `--yes` was passed.
pub async fn cases_delete(client: &PapiClient, out: &Output, id: &str, yes: bool) -> bool {
    let mut dashboard = Dashboard::new();
    if dashboard.refresh(client).await.is_err() {
        out.error(dashboard.error().unwrap_or("Failed to load cases."));
        return false;
    }

    let result = dashboard
        .delete(client, id, |case| {
            if yes {
                return true;
            }
            matches!(
                prompt(&format!("Delete {}? [y/N]", case.filename)).as_deref(),
                Ok("y") | Ok("Y") | Ok("yes")
            )
        })
        .await;

    match result {
        Ok(DeleteOutcome::Deleted) => {
            out.success("Case deleted.");
            true
        }
        Ok(DeleteOutcome::Cancelled) => {
            match dashboard.error() {
                Some(error) => out.error(error),
                None => out.info("Delete cancelled."),
            }
            false
        }
        Err(_) => {
            out.error(dashboard.error().unwrap_or("Delete failed."));
            false
        }
    }
}

// ============= Chat Screen =============

/// Opens a chat session for a case: resume, topic selection when offered,
/// then either a single `--message` exchange or an interactive loop.
pub async fn chat(client: &PapiClient, out: &Output, case_id: &str, message: Option<String>) -> bool {
    let mut flow = ChatFlow::new(Some(case_id.to_string()));
    flow.initialize(client).await;

    if let ChatState::TopicSelect(topics) = flow.state().clone() {
        out.info("Choose a topic for the discussion:");
        for (i, topic) in topics.iter().enumerate() {
            out.topic_option(i + 1, topic);
        }
        let choice = match prompt("Topic") {
            Ok(choice) => choice,
            Err(e) => {
                out.error(&format!("could not read input: {}", e));
                return false;
            }
        };
        // Accept either the number or the topic name; anything else
        // falls back to General
        let selected = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| topics.get(n.saturating_sub(1)).cloned())
            .or_else(|| topics.iter().find(|t| **t == choice).cloned())
            .unwrap_or_else(|| GENERAL_TOPIC.to_string());
        flow.select_topic(client, &selected).await;
    }

    if let ChatState::Failed(message) = flow.state() {
        out.error(message);
        return false;
    }

    for entry in flow.messages() {
        out.chat_message(entry);
    }

    if let Some(text) = message {
        return send_and_print(&mut flow, client, out, &text).await;
    }

    out.info("Type a message, or /quit to leave.");
    loop {
        let line = match prompt(">") {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim() == "/quit" {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        send_and_print(&mut flow, client, out, &line).await;
    }
    true
}

async fn send_and_print(
    flow: &mut ChatFlow,
    client: &PapiClient,
    out: &Output,
    text: &str,
) -> bool {
    let before = flow.messages().len();
    flow.send(client, text).await;
    for entry in &flow.messages()[before..] {
        out.chat_message(entry);
    }
    if let Some(error) = flow.last_error() {
        out.error(error);
        return false;
    }
    true
}
