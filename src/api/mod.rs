//! Typed HTTP client for the PAPI backend.
//!
//! Endpoint groups mirror the backend's routers:
//!
//! ## Users and authentication
//! - `POST /users/` - register a new account
//! - `POST /auth/token` - login (form-encoded, OAuth2 style)
//! - `GET /auth/me` - fetch the current user's profile
//!
//! ## Cases
//! - `GET /cases/get_all_cases` - list the user's cases
//! - `POST /cases/upload_case` - multipart document upload
//! - `DELETE /cases/delete_case/{id}` - delete a case
//! - `GET /cases/get_case/{id}` - case metadata
//! - `GET /cases/get_case_questions/{id}` - question-set status/results
//!
//! ## Chat
//! - `GET /chat/case_discussions?case_id=` - discussions for a case
//! - `POST /chat/start_case_discussion?case_id=&topic=` - open a discussion
//! - `GET /chat/chat_history?answer_discussion_id=` - full transcript
//! - `POST /chat/message` - send a message
//!
//! All authenticated calls send `Authorization: Bearer <token>`, resolved
//! from the injected [`Session`](crate::session::Session) at call time. No
//! call sets a timeout and nothing retries; a failure is mapped once into
//! [`AppError`](crate::types::AppError) and handed back to the screen that
//! triggered it.

mod auth;
mod cases;
mod chat;
mod client;

pub use chat::CaseChatApi;
pub use client::PapiClient;
