//! Core types and error handling for the PAPI client.
//!
//! Every entity here is externally defined by the PAPI backend; this client
//! only consumes and produces them. Field names follow the wire format
//! (snake_case JSON) exactly, and server-reported values such as a case's
//! `status` are carried through untransformed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Users and Authentication =============

/// The authenticated account, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// Display name for greetings and the `whoami` command.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration payload for `POST /users/`.
///
/// `confirm_password` is re-sent to the server even though the client
/// compares the two fields itself; the server is the authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Token payload returned by `POST /auth/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// ============= Cases =============

/// An uploaded document plus its server-side processing status.
///
/// `status` is a free-form server string (e.g. "processing", "completed");
/// the client never interprets or rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub status: String,
}

// ============= Question Sets =============

/// A generated question with its grading hints, part of a question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A topic-scoped set of generated questions for a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub topic: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Response of `GET /cases/get_case_questions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseQuestionsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub question_sets: Vec<QuestionSet>,
}

impl CaseQuestionsResponse {
    /// Whether generation finished and produced at least one set.
    ///
    /// Anything else (pending, failed, empty) means topic selection is
    /// skipped and a default discussion is started instead.
    pub fn is_ready(&self) -> bool {
        self.status == "completed" && !self.question_sets.is_empty()
    }

    /// Topic options in presentation order: "General" first, then each
    /// set's topic in the order the server returned them.
    pub fn topic_options(&self) -> Vec<String> {
        let mut topics = Vec::with_capacity(self.question_sets.len() + 1);
        topics.push(GENERAL_TOPIC.to_string());
        topics.extend(self.question_sets.iter().map(|s| s.topic.clone()));
        topics
    }
}

/// The implicit default topic. Selecting it starts a discussion with no
/// topic parameter at all, deferring to the server's default semantics.
pub const GENERAL_TOPIC: &str = "General";

// ============= Discussions and Messages =============

/// A conversation thread tied to a case. A case may have zero or many;
/// the client always resumes the most-recently-updated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: String,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answer_discussions: Vec<AnswerDiscussion>,
}

/// The concrete chat session messages are sent against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDiscussion {
    pub id: String,
}

/// Picks the discussion to resume: most recent `last_message_at` wins,
/// discussions without a timestamp sort oldest. Returns `None` for an
/// empty slice.
pub fn most_recent_discussion(discussions: &[Discussion]) -> Option<&Discussion> {
    discussions.iter().max_by_key(|d| d.last_message_at)
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry in a chat transcript, ordered oldest-first by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// A locally-created user message (optimistic append, no server id yet).
    pub fn local_user(content: impl Into<String>) -> Self {
        Self {
            id: None,
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// A client-generated assistant message, used for the send-failure
    /// apology so the transcript stays readable.
    pub fn local_assistant(content: impl Into<String>) -> Self {
        Self {
            id: None,
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub answer_discussion_id: String,
    pub message_data: String,
}

// ============= Error Bodies =============

/// FastAPI-style error body. `detail` is either a plain string or an array
/// of field validation errors; [`ApiDetail::message`] flattens both.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDetail {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiDetail {
    /// Extracts a displayable message, preferring the server's wording.
    ///
    /// Validation arrays are rendered one `field: msg` per line.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(errors) => {
                let lines: Vec<String> = errors
                    .iter()
                    .filter_map(|err| {
                        let msg = err.get("msg")?.as_str()?;
                        let field = err
                            .get("loc")
                            .and_then(|loc| loc.as_array())
                            .and_then(|loc| loc.last())
                            .and_then(|f| f.as_str());
                        Some(match field {
                            Some(field) => format!("{}: {}", field, msg),
                            None => msg.to_string(),
                        })
                    })
                    .collect();
                if lines.is_empty() {
                    None
                } else {
                    Some(lines.join("\n"))
                }
            }
            _ => None,
        }
    }
}

// ============= Error Types =============

/// Message shown whenever any endpoint answers 401.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please log in again.";

/// Client error taxonomy.
///
/// Every handler catches at its own boundary and turns one of these into
/// display text; no retries are attempted anywhere.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Thrown locally before any network call when no token is stored.
    #[error("not logged in: no access token is stored")]
    MissingToken,

    /// HTTP 401 from any endpoint.
    #[error("{0}")]
    Auth(String),

    /// Any other non-2xx, with the server's detail message when present.
    #[error("request failed ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Transport or response-parse failure.
    #[error("network error: {0}")]
    Network(String),

    /// Client-side form validation rejected the input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Configuration file or environment problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token store read/write failure.
    #[error("token store error: {0}")]
    Store(String),
}

impl AppError {
    /// Whether this error is the 401 authentication-failure case.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Auth(_) | AppError::MissingToken)
    }

    /// The text a screen displays for this error, preferring server detail
    /// over the generic fallback.
    pub fn display_message(&self) -> String {
        match self {
            AppError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;
