//! The case-discussion session flow, modeled as an explicit state machine.
//!
//! A session moves through named states instead of nested branches, so the
//! fallback rules are auditable transitions:
//!
//! ```text
//! Uninitialized
//!   -> LoadingCase            fetch case metadata
//!   -> CheckingDiscussions    resume most-recent discussion if it has an
//!                             answer-discussion: bind + load history -> Active
//!   -> FetchingTopics         question sets completed and non-empty
//!                             -> TopicSelect, otherwise start a default
//!                             discussion -> Active
//!   -> TopicSelect            user picks a topic -> start discussion -> Active
//!   -> Active                 message exchange
//!   -> Failed                 terminal; any error along the chain lands here
//! ```
//!
//! A missing case id is terminal before anything runs. Any 401 along the
//! chain surfaces as an authentication-failure message and leaves the
//! session store untouched.
//!
//! The flow is driven by its caller as a plain future; dropping it
//! abandons the in-flight request, after which no state mutation can
//! occur.

use tracing::{debug, info};

use crate::api::CaseChatApi;
use crate::types::{Case, ChatMessage, Discussion, Result, GENERAL_TOPIC};
use crate::types::{most_recent_discussion, AppError};

/// Fixed client-generated assistant message appended when a send fails,
/// keeping the transcript readable.
pub const SEND_FAILURE_APOLOGY: &str = "Sorry, there was an error processing your request.";

/// Terminal message when the flow is constructed without a case id.
pub const NO_CASE_MESSAGE: &str = "No case selected.";

/// Named states of a chat session.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatState {
    /// Constructed but not yet driven.
    Uninitialized,
    /// Fetching case metadata.
    LoadingCase,
    /// Querying existing discussions for the case.
    CheckingDiscussions,
    /// Querying generated question sets for topic candidates.
    FetchingTopics,
    /// Waiting for the user to pick a topic from the listed options.
    TopicSelect(Vec<String>),
    /// Bound to an answer-discussion; messages can be exchanged.
    Active,
    /// Terminal error state with display text.
    Failed(String),
}

/// Outcome of [`ChatFlow::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or no bound answer-discussion: no request, no change.
    Ignored,
    /// The assistant's reply was appended.
    Delivered,
    /// The send failed; the apology message was appended instead.
    Failed,
}

/// One chat session against a single case.
pub struct ChatFlow {
    case_id: Option<String>,
    state: ChatState,
    case: Option<Case>,
    answer_discussion_id: Option<String>,
    messages: Vec<ChatMessage>,
    last_error: Option<String>,
}

impl ChatFlow {
    /// Creates a session. `None` is the no-case-in-navigation-context
    /// path: the flow is terminally failed and nothing else will run.
    pub fn new(case_id: Option<String>) -> Self {
        let state = match case_id {
            Some(_) => ChatState::Uninitialized,
            None => ChatState::Failed(NO_CASE_MESSAGE.to_string()),
        };
        Self {
            case_id,
            state,
            case: None,
            answer_discussion_id: None,
            messages: Vec::new(),
            last_error: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Case metadata, available once `LoadingCase` has completed.
    pub fn case(&self) -> Option<&Case> {
        self.case.as_ref()
    }

    /// The bound answer-discussion id. At most one is bound at a time.
    pub fn answer_discussion_id(&self) -> Option<&str> {
        self.answer_discussion_id.as_deref()
    }

    /// The transcript, oldest-first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The last recorded error, surviving a send failure that kept the
    /// session `Active`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drives the sequential chain from `Uninitialized` until the session
    /// is `Active`, waiting in `TopicSelect`, or `Failed`. Calling it in
    /// any other state is a no-op.
    pub async fn initialize(&mut self, api: &dyn CaseChatApi) -> &ChatState {
        if self.state != ChatState::Uninitialized {
            return &self.state;
        }
        let case_id = self
            .case_id
            .clone()
            .expect("Uninitialized implies a case id");

        // 1. Load case metadata
        self.state = ChatState::LoadingCase;
        match api.get_case(&case_id).await {
            Ok(case) => self.case = Some(case),
            Err(e) => return self.fail(e),
        }

        // 2. Resume the most recent discussion when one is answerable
        self.state = ChatState::CheckingDiscussions;
        let discussions = match api.case_discussions(&case_id).await {
            Ok(discussions) => discussions,
            Err(e) => return self.fail(e),
        };
        if let Some(id) = resumable_answer_discussion(&discussions) {
            debug!(answer_discussion_id = %id, "resuming existing discussion");
            match api.chat_history(&id).await {
                Ok(history) => {
                    self.answer_discussion_id = Some(id);
                    self.messages = history;
                    self.state = ChatState::Active;
                }
                Err(e) => return self.fail(e),
            }
            return &self.state;
        }

        // 3. Offer topic candidates when generation has finished; any
        //    failure or not-ready status skips selection entirely
        self.state = ChatState::FetchingTopics;
        match api.case_questions(&case_id).await {
            Ok(questions) if questions.is_ready() => {
                self.state = ChatState::TopicSelect(questions.topic_options());
            }
            Ok(_) | Err(_) => {
                debug!("question sets unavailable, starting default discussion");
                return self.start_with_topic(api, None).await;
            }
        }
        &self.state
    }

    /// Resolves a `TopicSelect` state. "General" starts the discussion
    /// with no topic parameter; anything else passes the topic through.
    /// A no-op in any other state.
    pub async fn select_topic(&mut self, api: &dyn CaseChatApi, choice: &str) -> &ChatState {
        if !matches!(self.state, ChatState::TopicSelect(_)) {
            return &self.state;
        }
        let topic = if choice == GENERAL_TOPIC {
            None
        } else {
            Some(choice.to_string())
        };
        self.start_with_topic(api, topic.as_deref()).await
    }

    async fn start_with_topic(
        &mut self,
        api: &dyn CaseChatApi,
        topic: Option<&str>,
    ) -> &ChatState {
        let case_id = self
            .case_id
            .clone()
            .expect("a started flow always has a case id");

        let discussion = match api.start_discussion(&case_id, topic).await {
            Ok(discussion) => discussion,
            Err(e) => return self.fail(e),
        };
        match discussion.answer_discussions.first() {
            Some(answer) => {
                info!(discussion_id = %discussion.id, topic = topic.unwrap_or(GENERAL_TOPIC), "discussion started");
                self.answer_discussion_id = Some(answer.id.clone());
                self.messages.clear();
                self.state = ChatState::Active;
            }
            None => {
                return self.fail(AppError::Api {
                    status: 200,
                    detail: "The discussion could not be started.".to_string(),
                })
            }
        }
        &self.state
    }

    /// Sends a message in an `Active` session.
    ///
    /// Blank/whitespace-only input, or a session without a bound
    /// answer-discussion id, is a no-op: no request goes out and nothing
    /// changes. Otherwise the user's text is appended immediately, then
    /// the call is made; a failure appends the fixed apology instead of
    /// the reply and records the error, leaving the session `Active`.
    pub async fn send(&mut self, api: &dyn CaseChatApi, text: &str) -> SendOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(answer_discussion_id) = self.answer_discussion_id.clone() else {
            return SendOutcome::Ignored;
        };

        self.messages.push(ChatMessage::local_user(trimmed));

        match api.send_message(&answer_discussion_id, trimmed).await {
            Ok(reply) => {
                self.messages.push(reply);
                self.last_error = None;
                SendOutcome::Delivered
            }
            Err(e) => {
                self.messages
                    .push(ChatMessage::local_assistant(SEND_FAILURE_APOLOGY));
                self.last_error = Some(e.display_message());
                SendOutcome::Failed
            }
        }
    }

    fn fail(&mut self, error: AppError) -> &ChatState {
        let message = error.display_message();
        self.last_error = Some(message.clone());
        self.state = ChatState::Failed(message);
        &self.state
    }
}

/// The answer-discussion to resume: the most-recently-updated discussion's
/// first answer-discussion, when it has one.
fn resumable_answer_discussion(discussions: &[Discussion]) -> Option<String> {
    most_recent_discussion(discussions)?
        .answer_discussions
        .first()
        .map(|a| a.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AnswerDiscussion, CaseQuestionsResponse, MessageRole, QuestionSet, AUTH_FAILED_MESSAGE,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    /// Scripted API double. `None` in a slot means that call fails.
    #[derive(Default)]
    struct FakeApi {
        case: Option<Case>,
        case_unauthorized: bool,
        discussions: Vec<Discussion>,
        questions: Option<CaseQuestionsResponse>,
        history: Vec<ChatMessage>,
        reply: Option<String>,
        started_topics: Mutex<Vec<Option<String>>>,
        sent: Mutex<Vec<String>>,
        start_without_answer: bool,
    }

    impl FakeApi {
        fn with_case() -> Self {
            Self {
                case: Some(Case {
                    id: "c1".to_string(),
                    filename: "case1.pdf".to_string(),
                    status: "completed".to_string(),
                }),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CaseChatApi for FakeApi {
        async fn get_case(&self, _case_id: &str) -> Result<Case> {
            if self.case_unauthorized {
                return Err(AppError::Auth(AUTH_FAILED_MESSAGE.to_string()));
            }
            self.case.clone().ok_or(AppError::Api {
                status: 404,
                detail: "Case not found".to_string(),
            })
        }

        async fn case_discussions(&self, _case_id: &str) -> Result<Vec<Discussion>> {
            Ok(self.discussions.clone())
        }

        async fn case_questions(&self, _case_id: &str) -> Result<CaseQuestionsResponse> {
            self.questions.clone().ok_or(AppError::Api {
                status: 500,
                detail: "question generation failed".to_string(),
            })
        }

        async fn start_discussion(
            &self,
            _case_id: &str,
            topic: Option<&str>,
        ) -> Result<Discussion> {
            self.started_topics
                .lock()
                .push(topic.map(|t| t.to_string()));
            Ok(Discussion {
                id: "d-new".to_string(),
                last_message_at: None,
                answer_discussions: if self.start_without_answer {
                    vec![]
                } else {
                    vec![AnswerDiscussion {
                        id: "ad-new".to_string(),
                    }]
                },
            })
        }

        async fn chat_history(&self, _answer_discussion_id: &str) -> Result<Vec<ChatMessage>> {
            Ok(self.history.clone())
        }

        async fn send_message(&self, _answer_discussion_id: &str, text: &str) -> Result<ChatMessage> {
            self.sent.lock().push(text.to_string());
            match &self.reply {
                Some(reply) => Ok(ChatMessage {
                    id: Some("m1".to_string()),
                    role: MessageRole::Assistant,
                    content: reply.clone(),
                }),
                None => Err(AppError::Network("connection reset".to_string())),
            }
        }
    }

    fn ready_questions(topics: &[&str]) -> CaseQuestionsResponse {
        CaseQuestionsResponse {
            status: "completed".to_string(),
            question_sets: topics
                .iter()
                .map(|t| QuestionSet {
                    topic: t.to_string(),
                    questions: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_missing_case_id_is_terminal() {
        let flow = ChatFlow::new(None);
        assert_eq!(flow.state(), &ChatState::Failed(NO_CASE_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_initialize_on_failed_flow_is_noop() {
        let api = FakeApi::with_case();
        let mut flow = ChatFlow::new(None);
        flow.initialize(&api).await;
        assert_eq!(flow.state(), &ChatState::Failed(NO_CASE_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_resumes_most_recent_answerable_discussion() {
        let mut api = FakeApi::with_case();
        api.discussions = vec![
            Discussion {
                id: "d-old".to_string(),
                last_message_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                answer_discussions: vec![AnswerDiscussion {
                    id: "ad-old".to_string(),
                }],
            },
            Discussion {
                id: "d-new".to_string(),
                last_message_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
                answer_discussions: vec![AnswerDiscussion {
                    id: "ad-recent".to_string(),
                }],
            },
        ];
        api.history = vec![ChatMessage {
            id: Some("m0".to_string()),
            role: MessageRole::Assistant,
            content: "Welcome back".to_string(),
        }];

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        // TopicSelect was skipped entirely
        assert_eq!(flow.state(), &ChatState::Active);
        assert_eq!(flow.answer_discussion_id(), Some("ad-recent"));
        assert_eq!(flow.messages().len(), 1);
        assert!(api.started_topics.lock().is_empty());
    }

    #[tokio::test]
    async fn test_no_discussions_and_ready_questions_reach_topic_select() {
        let mut api = FakeApi::with_case();
        api.questions = Some(ready_questions(&["Anatomy", "Pharmacology"]));

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        assert_eq!(
            flow.state(),
            &ChatState::TopicSelect(vec![
                "General".to_string(),
                "Anatomy".to_string(),
                "Pharmacology".to_string()
            ])
        );
        assert!(flow.answer_discussion_id().is_none());
    }

    #[tokio::test]
    async fn test_question_fetch_failure_starts_default_discussion() {
        let api = FakeApi::with_case(); // questions: None => the call fails

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        assert_eq!(flow.state(), &ChatState::Active);
        assert_eq!(flow.answer_discussion_id(), Some("ad-new"));
        // Started with no topic parameter
        assert_eq!(api.started_topics.lock().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn test_incomplete_questions_start_default_discussion() {
        let mut api = FakeApi::with_case();
        api.questions = Some(CaseQuestionsResponse {
            status: "processing".to_string(),
            question_sets: vec![],
        });

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        assert_eq!(flow.state(), &ChatState::Active);
        assert_eq!(api.started_topics.lock().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn test_select_general_omits_topic_parameter() {
        let mut api = FakeApi::with_case();
        api.questions = Some(ready_questions(&["Anatomy"]));

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;
        flow.select_topic(&api, "General").await;

        assert_eq!(flow.state(), &ChatState::Active);
        assert_eq!(api.started_topics.lock().as_slice(), &[None]);
    }

    #[tokio::test]
    async fn test_select_named_topic_passes_it_through() {
        let mut api = FakeApi::with_case();
        api.questions = Some(ready_questions(&["Anatomy"]));

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;
        flow.select_topic(&api, "Anatomy").await;

        assert_eq!(flow.state(), &ChatState::Active);
        assert_eq!(
            api.started_topics.lock().as_slice(),
            &[Some("Anatomy".to_string())]
        );
    }

    #[tokio::test]
    async fn test_select_topic_outside_topic_select_is_noop() {
        let api = FakeApi::with_case();
        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await; // lands Active via default start

        let before = flow.state().clone();
        flow.select_topic(&api, "Anatomy").await;
        assert_eq!(flow.state(), &before);
        assert_eq!(api.started_topics.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_started_discussion_without_answer_fails() {
        let mut api = FakeApi::with_case();
        api.start_without_answer = true;

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        assert!(matches!(flow.state(), ChatState::Failed(_)));
        assert!(flow.answer_discussion_id().is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces_auth_failure() {
        let mut api = FakeApi::with_case();
        api.case_unauthorized = true;

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        assert_eq!(
            flow.state(),
            &ChatState::Failed(AUTH_FAILED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_send_is_noop() {
        let api = FakeApi::with_case();
        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        assert_eq!(flow.send(&api, "   ").await, SendOutcome::Ignored);
        assert!(flow.messages().is_empty());
        assert!(api.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_send_without_bound_discussion_is_noop() {
        let api = FakeApi::with_case();
        let mut flow = ChatFlow::new(Some("c1".to_string()));
        // Never initialized: nothing bound

        assert_eq!(flow.send(&api, "hello").await, SendOutcome::Ignored);
        assert!(flow.messages().is_empty());
        assert!(api.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let mut api = FakeApi::with_case();
        api.reply = Some("The diagnosis is discussed in section 2.".to_string());

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        let outcome = flow.send(&api, "  What is the diagnosis?  ").await;
        assert_eq!(outcome, SendOutcome::Delivered);

        let messages = flow.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "What is the diagnosis?");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(api.sent.lock().as_slice(), &["What is the diagnosis?"]);
    }

    #[tokio::test]
    async fn test_send_failure_appends_apology_and_stays_active() {
        let api = FakeApi::with_case(); // reply: None => send fails

        let mut flow = ChatFlow::new(Some("c1".to_string()));
        flow.initialize(&api).await;

        let outcome = flow.send(&api, "hello").await;
        assert_eq!(outcome, SendOutcome::Failed);

        let messages = flow.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, SEND_FAILURE_APOLOGY);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(flow.state(), &ChatState::Active);
        assert!(flow.last_error().unwrap().contains("connection reset"));
    }
}
