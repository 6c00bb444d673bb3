//! Discussion and message calls, plus the trait seam the chat flow
//! consumes.

use async_trait::async_trait;

use crate::api::client::PapiClient;
use crate::types::{
    Case, CaseQuestionsResponse, ChatMessage, Discussion, Result, SendMessageRequest,
};

/// The subset of the API the chat session flow depends on.
///
/// [`PapiClient`] implements it for real traffic; tests drive the state
/// machine with a scripted fake instead of a live server.
#[async_trait]
pub trait CaseChatApi: Send + Sync {
    /// Case metadata by id.
    async fn get_case(&self, case_id: &str) -> Result<Case>;

    /// Existing discussions for a case.
    async fn case_discussions(&self, case_id: &str) -> Result<Vec<Discussion>>;

    /// Question-set generation status/results for a case.
    async fn case_questions(&self, case_id: &str) -> Result<CaseQuestionsResponse>;

    /// Opens a discussion. `topic` is omitted entirely for the server's
    /// default ("General") semantics.
    async fn start_discussion(&self, case_id: &str, topic: Option<&str>) -> Result<Discussion>;

    /// Full transcript for an answer-discussion, oldest-first.
    async fn chat_history(&self, answer_discussion_id: &str) -> Result<Vec<ChatMessage>>;

    /// Sends a message and returns the assistant's reply.
    async fn send_message(&self, answer_discussion_id: &str, text: &str) -> Result<ChatMessage>;
}

#[async_trait]
impl CaseChatApi for PapiClient {
    async fn get_case(&self, case_id: &str) -> Result<Case> {
        PapiClient::get_case(self, case_id).await
    }

    async fn case_discussions(&self, case_id: &str) -> Result<Vec<Discussion>> {
        let builder = self.authed(
            self.http
                .get(self.url("/chat/case_discussions"))
                .query(&[("case_id", case_id)]),
        )?;
        self.send_json(builder).await
    }

    async fn case_questions(&self, case_id: &str) -> Result<CaseQuestionsResponse> {
        PapiClient::case_questions(self, case_id).await
    }

    async fn start_discussion(&self, case_id: &str, topic: Option<&str>) -> Result<Discussion> {
        let mut params = vec![("case_id", case_id)];
        if let Some(topic) = topic {
            params.push(("topic", topic));
        }
        let builder = self.authed(
            self.http
                .post(self.url("/chat/start_case_discussion"))
                .query(&params),
        )?;
        self.send_json(builder).await
    }

    async fn chat_history(&self, answer_discussion_id: &str) -> Result<Vec<ChatMessage>> {
        let builder = self.authed(
            self.http
                .get(self.url("/chat/chat_history"))
                .query(&[("answer_discussion_id", answer_discussion_id)]),
        )?;
        self.send_json(builder).await
    }

    async fn send_message(&self, answer_discussion_id: &str, text: &str) -> Result<ChatMessage> {
        let body = SendMessageRequest {
            answer_discussion_id: answer_discussion_id.to_string(),
            message_data: text.to_string(),
        };
        let builder = self.authed(self.http.post(self.url("/chat/message")).json(&body))?;
        self.send_json(builder).await
    }
}
