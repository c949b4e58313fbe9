//! Conversation session controller.
//!
//! Owns the single conversation of a run: its id, the transcript, the
//! suggestion chips, the gift panel and the input buffer. Every user send
//! goes `Idle -> AwaitingReply -> Idle`; the reply or failure is reconciled
//! here and every visible change is published on the message bus.
//!
//! Overlapping sends are allowed. Each one gets a fresh [`RequestId`] and the
//! typing indicator always belongs to the most recent one. Starting a new
//! request stops the previous indicator; a result that arrives for a
//! superseded request is dropped without touching the transcript.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::defaults::SessionDefaults;
use super::events::{ClickTarget, UiEvent};
use super::message::{ChatMessage, GiftPanel, SuggestionSet};
use crate::client::{AssistantClient, ChatRequest, ChatResponse, ClientError};
use crate::messaging::{Message, MessageSender};

/// Identifies one outbound request. Later requests have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request that has been started but not yet reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub request: ChatRequest,
}

/// Which path a send took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty after trimming; nothing happened.
    Ignored,
    Replied,
    /// The fallback error message was shown.
    Failed,
    /// A newer request started first; this result was discarded.
    Superseded,
}

/// Generate a new conversation id.
pub fn new_conversation_id() -> String {
    format!("gift_chat_{}", uuid::Uuid::new_v4().simple())
}

pub struct SessionController<C> {
    conversation_id: String,
    transcript: Vec<ChatMessage>,
    suggestions: SuggestionSet,
    gift_panel: GiftPanel,
    input: String,
    typing: Option<RequestId>,
    last_request: u64,
    defaults: SessionDefaults,
    client: C,
    bus: MessageSender,
}

impl<C: AssistantClient> SessionController<C> {
    /// Start a session: new conversation id, starter suggestions, hidden panel.
    pub fn new(client: C, defaults: SessionDefaults, bus: MessageSender) -> Self {
        let conversation_id = new_conversation_id();
        info!(%conversation_id, "Session started");

        let controller = Self {
            conversation_id,
            transcript: Vec::new(),
            suggestions: SuggestionSet::new(defaults.starter_suggestions.clone()),
            gift_panel: GiftPanel::default(),
            input: String::new(),
            typing: None,
            last_request: 0,
            defaults,
            client,
            bus,
        };
        controller
            .bus
            .publish(Message::suggestions(controller.suggestions.items()));
        controller
    }

    /// Use a fixed conversation id instead of a generated one.
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = id.into();
        self
    }

    /// Append the welcome message after the configured delay.
    pub async fn welcome(&mut self) {
        if !self.defaults.welcome_delay.is_zero() {
            tokio::time::sleep(self.defaults.welcome_delay).await;
        }
        let text = self.defaults.welcome_message.clone();
        self.append(ChatMessage::assistant(text));
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn suggestions(&self) -> &SuggestionSet {
        &self.suggestions
    }

    pub fn gift_panel(&self) -> &GiftPanel {
        &self.gift_panel
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The request the typing indicator currently belongs to.
    pub fn typing_indicator(&self) -> Option<RequestId> {
        self.typing
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.typing.is_some()
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.bus.publish(Message::input(self.input.clone()));
    }

    /// Send `raw` and reconcile the result.
    pub async fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let Some(pending) = self.begin_submit(raw) else {
            return SubmitOutcome::Ignored;
        };
        let result = self.client.send(&pending.request).await;
        self.complete(pending, result)
    }

    /// Synchronous half of a send: append the user message, clear the input
    /// and show the typing indicator. `None` for blank input.
    pub fn begin_submit(&mut self, raw: &str) -> Option<PendingRequest> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.append(ChatMessage::user(text));
        self.set_input(String::new());

        self.last_request += 1;
        let id = RequestId(self.last_request);
        if let Some(previous) = self.typing.replace(id) {
            debug!(%previous, current = %id, "Request superseded while awaiting reply");
            self.bus.publish(Message::typing_stopped(previous));
        }
        self.bus.publish(Message::typing_started(id));

        debug!(request = %id, len = text.len(), "Sending message");
        Some(PendingRequest {
            id,
            request: ChatRequest {
                message: text.to_string(),
                conversation_id: self.conversation_id.clone(),
            },
        })
    }

    /// Asynchronous half of a send.
    pub fn complete(
        &mut self,
        pending: PendingRequest,
        result: Result<ChatResponse, ClientError>,
    ) -> SubmitOutcome {
        match result {
            Ok(response) => self.receive_reply(pending.id, response),
            Err(cause) => self.receive_failure(pending.id, &cause),
        }
    }

    /// Apply a well-formed reply for request `id`.
    pub fn receive_reply(&mut self, id: RequestId, response: ChatResponse) -> SubmitOutcome {
        if !self.settle(id) {
            return SubmitOutcome::Superseded;
        }

        self.append(ChatMessage::assistant(response.reply));

        let suggestions = if response.suggestions.is_empty() {
            self.defaults.fallback_suggestions.clone()
        } else {
            response.suggestions
        };
        self.suggestions.replace(suggestions);
        self.bus
            .publish(Message::suggestions(self.suggestions.items()));

        if !response.gifts.is_empty() {
            self.gift_panel.populate(response.gifts);
            self.publish_panel();
        }

        SubmitOutcome::Replied
    }

    /// Show the generic error for request `id`. The cause is only logged.
    pub fn receive_failure(&mut self, id: RequestId, cause: &ClientError) -> SubmitOutcome {
        if !self.settle(id) {
            debug!(request = %id, error = %cause, "Dropping failure of superseded request");
            return SubmitOutcome::Superseded;
        }

        warn!(request = %id, error = %cause, "Assistant request failed");
        let text = self.defaults.error_message.clone();
        self.append(ChatMessage::assistant(text));
        SubmitOutcome::Failed
    }

    /// Copy a chip into the input buffer. Does not send it.
    pub fn select_suggestion(&mut self, text: &str) {
        if !self.suggestions.contains(text) {
            debug!(text, "Ignoring selection of unknown suggestion");
            return;
        }
        self.set_input(text);
    }

    pub fn reveal_gift_panel(&mut self) {
        if self.gift_panel.reveal() {
            self.publish_panel();
        }
    }

    pub fn dismiss_gift_panel(&mut self) {
        if self.gift_panel.dismiss() {
            self.publish_panel();
        }
    }

    /// Clicks on gift-related assistant messages reopen the panel; clicks
    /// outside both the panel and the transcript close it.
    pub fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Panel => {}
            ClickTarget::Message(index) => {
                let reveals = self
                    .transcript
                    .get(index)
                    .is_some_and(ChatMessage::reveals_gift_panel);
                if reveals {
                    self.reveal_gift_panel();
                }
            }
            ClickTarget::Elsewhere => self.dismiss_gift_panel(),
        }
    }

    /// Route one UI event, then publish [`Message::Settled`].
    pub async fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Edit(text) => self.set_input(text),
            UiEvent::Submit => {
                let text = self.input.clone();
                self.submit(&text).await;
            }
            UiEvent::SelectSuggestion(text) => self.select_suggestion(&text),
            UiEvent::DismissPanel => self.dismiss_gift_panel(),
            UiEvent::RevealPanel => self.reveal_gift_panel(),
            UiEvent::Click(target) => self.click(target),
        }
        self.bus.publish(Message::Settled);
    }

    /// Clear the typing indicator if it still belongs to `id`.
    fn settle(&mut self, id: RequestId) -> bool {
        if self.typing != Some(id) {
            debug!(request = %id, current = ?self.typing, "Result for stale request");
            return false;
        }
        self.typing = None;
        self.bus.publish(Message::typing_stopped(id));
        true
    }

    fn append(&mut self, message: ChatMessage) {
        let index = self.transcript.len();
        self.transcript.push(message.clone());
        self.bus.publish(Message::transcript(index, message));
    }

    fn publish_panel(&self) {
        self.bus.publish(Message::gift_panel(
            self.gift_panel.gifts(),
            self.gift_panel.is_visible(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HealthStatus;
    use crate::messaging::{MessageBus, MessageReceiver, TypingMessage};
    use crate::session::{GiftSuggestion, MessageRole};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // =========================================================================
    // Test Helpers
    // =========================================================================

    /// Replays queued results and records every request it sees.
    #[derive(Default)]
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<ChatResponse, ClientError>>>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedClient {
        fn with(results: Vec<Result<ChatResponse, ClientError>>) -> Self {
            Self {
                replies: Mutex::new(results.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssistantClient for ScriptedClient {
        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ClientError::Status(503)))
        }

        async fn health(&self) -> Result<HealthStatus, ClientError> {
            Ok(HealthStatus {
                status: "healthy".into(),
            })
        }
    }

    fn controller(
        results: Vec<Result<ChatResponse, ClientError>>,
    ) -> (SessionController<ScriptedClient>, MessageReceiver, MessageBus) {
        let bus = MessageBus::new();
        let rx = bus.subscribe();
        let controller = SessionController::new(
            ScriptedClient::with(results),
            SessionDefaults::immediate(),
            bus.sender(),
        );
        (controller, rx, bus)
    }

    fn reply(text: &str, suggestions: &[&str], gifts: Vec<GiftSuggestion>) -> ChatResponse {
        ChatResponse {
            reply: text.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            gifts,
        }
    }

    fn telescope() -> GiftSuggestion {
        GiftSuggestion::new("Telescope", "matches astronomy interest", "$50-$100")
    }

    fn malformed() -> ClientError {
        ClientError::Malformed(
            serde_json::from_str::<ChatResponse>(r#"{"suggestions":[]}"#).unwrap_err(),
        )
    }

    fn typing_events(messages: &[Message]) -> Vec<TypingMessage> {
        messages
            .iter()
            .filter_map(|m| match m {
                Message::Typing(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Session Start
    // =========================================================================

    #[test]
    fn test_new_session_seeds_starter_suggestions() {
        let (ctrl, mut rx, _bus) = controller(vec![]);
        assert_eq!(ctrl.suggestions().len(), 8);
        assert_eq!(ctrl.suggestions().get(1), Some("For my mother's birthday"));
        assert!(ctrl.transcript().is_empty());
        assert!(!ctrl.gift_panel().is_visible());
        assert!(ctrl.conversation_id().starts_with("gift_chat_"));

        let published = rx.drain();
        assert!(matches!(&published[0], Message::Suggestions(s) if s.suggestions.len() == 8));
    }

    #[test]
    fn test_conversation_ids_are_unique() {
        assert_ne!(new_conversation_id(), new_conversation_id());
    }

    #[tokio::test]
    async fn test_welcome_appends_assistant_message() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.welcome().await;
        assert_eq!(ctrl.transcript().len(), 1);
        assert_eq!(ctrl.transcript()[0].role, MessageRole::Assistant);
        assert!(ctrl.transcript()[0].content.contains("Gift Finding Assistant"));
    }

    #[tokio::test]
    async fn test_conversation_id_is_stable_across_requests() {
        let (mut ctrl, _rx, _bus) = controller(vec![
            Ok(ChatResponse::text("one")),
            Ok(ChatResponse::text("two")),
        ]);
        let ctrl_id = ctrl.conversation_id().to_string();
        ctrl.submit("first").await;
        ctrl.submit("second").await;

        let requests = ctrl.client().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.conversation_id == ctrl_id));
    }

    // =========================================================================
    // Submit
    // =========================================================================

    #[test]
    fn test_begin_submit_appends_user_message_before_network() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.set_input("  A gift for dad  ");

        let pending = ctrl.begin_submit("  A gift for dad  ").unwrap();

        assert_eq!(ctrl.transcript().len(), 1);
        assert_eq!(ctrl.transcript()[0].role, MessageRole::User);
        assert_eq!(ctrl.transcript()[0].content, "A gift for dad");
        assert_eq!(ctrl.input(), "");
        assert_eq!(ctrl.typing_indicator(), Some(pending.id));
        assert_eq!(pending.request.message, "A gift for dad");
        assert!(ctrl.client().requests().is_empty());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let (mut ctrl, mut rx, _bus) = controller(vec![]);
        rx.drain();

        for input in ["", "   ", "\n\t "] {
            assert_eq!(ctrl.submit(input).await, SubmitOutcome::Ignored);
        }

        assert!(ctrl.transcript().is_empty());
        assert!(ctrl.client().requests().is_empty());
        assert!(!ctrl.is_awaiting_reply());
        assert!(rx.drain().is_empty());
    }

    #[tokio::test]
    async fn test_reply_with_suggestions_and_no_gifts() {
        let (mut ctrl, _rx, _bus) =
            controller(vec![Ok(reply("Try a scarf!", &["Wool", "Silk"], vec![]))]);

        let outcome = ctrl.submit("Something warm").await;

        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(ctrl.transcript().len(), 2);
        assert_eq!(ctrl.transcript()[1].role, MessageRole::Assistant);
        assert_eq!(ctrl.transcript()[1].content, "Try a scarf!");
        assert_eq!(ctrl.suggestions().items(), ["Wool", "Silk"]);
        assert!(!ctrl.gift_panel().is_visible());
        assert!(!ctrl.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_reply_with_gifts_shows_panel() {
        let (mut ctrl, mut rx, _bus) =
            controller(vec![Ok(reply("Look up!", &[], vec![telescope()]))]);

        ctrl.submit("My niece loves stars").await;

        assert!(ctrl.gift_panel().is_visible());
        assert_eq!(ctrl.gift_panel().gifts(), [telescope()]);
        let published = rx.drain();
        assert!(published.contains(&Message::gift_panel(&[telescope()], true)));
    }

    #[tokio::test]
    async fn test_reply_without_suggestions_uses_fallback() {
        let (mut ctrl, _rx, _bus) = controller(vec![Ok(ChatResponse::text("Hello"))]);
        ctrl.submit("hi").await;
        assert_eq!(
            ctrl.suggestions().items(),
            ctrl.defaults().fallback_suggestions.as_slice()
        );
        assert_eq!(ctrl.suggestions().len(), 5);
    }

    #[tokio::test]
    async fn test_new_gift_list_replaces_previous() {
        let mug = GiftSuggestion::new("Mug", "coffee fan", "$10-$20");
        let (mut ctrl, _rx, _bus) = controller(vec![
            Ok(reply("first", &[], vec![telescope()])),
            Ok(reply("second", &[], vec![mug.clone()])),
        ]);
        ctrl.submit("one").await;
        ctrl.submit("two").await;
        assert_eq!(ctrl.gift_panel().gifts(), [mug]);
    }

    #[tokio::test]
    async fn test_empty_gift_list_leaves_panel_untouched() {
        let (mut ctrl, _rx, _bus) = controller(vec![
            Ok(reply("first", &[], vec![telescope()])),
            Ok(reply("second", &[], vec![])),
        ]);
        ctrl.submit("one").await;
        ctrl.dismiss_gift_panel();
        ctrl.submit("two").await;
        assert!(!ctrl.gift_panel().is_visible());
        assert_eq!(ctrl.gift_panel().gifts(), [telescope()]);
    }

    // =========================================================================
    // Failures
    // =========================================================================

    async fn assert_failure_keeps_state(error: ClientError) {
        let (mut ctrl, _rx, _bus) = controller(vec![
            Ok(reply("Look up!", &["Stars", "Moon"], vec![telescope()])),
            Err(error),
        ]);
        ctrl.submit("first").await;
        let suggestions_before = ctrl.suggestions().clone();
        let panel_before = ctrl.gift_panel().clone();

        let outcome = ctrl.submit("second").await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(ctrl.transcript().len(), 4);
        let last = ctrl.transcript().last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, ctrl.defaults().error_message);
        assert_eq!(ctrl.suggestions(), &suggestions_before);
        assert_eq!(ctrl.gift_panel(), &panel_before);
        assert!(!ctrl.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_status_error_shows_fallback_message() {
        assert_failure_keeps_state(ClientError::Status(500)).await;
    }

    #[tokio::test]
    async fn test_malformed_response_shows_fallback_message() {
        assert_failure_keeps_state(malformed()).await;
    }

    #[tokio::test]
    async fn test_invalid_endpoint_shows_fallback_message() {
        assert_failure_keeps_state(ClientError::InvalidEndpoint("nope".into())).await;
    }

    #[tokio::test]
    async fn test_failure_cause_is_not_shown() {
        let (mut ctrl, _rx, _bus) = controller(vec![Err(ClientError::Status(418))]);
        ctrl.submit("hi").await;
        assert!(ctrl.transcript().iter().all(|m| !m.content.contains("418")));
    }

    #[tokio::test]
    async fn test_session_recovers_after_failure() {
        let (mut ctrl, _rx, _bus) = controller(vec![
            Err(ClientError::Status(502)),
            Ok(ChatResponse::text("Back online")),
        ]);
        assert_eq!(ctrl.submit("one").await, SubmitOutcome::Failed);
        assert_eq!(ctrl.submit("two").await, SubmitOutcome::Replied);
        assert_eq!(ctrl.transcript().last().unwrap().content, "Back online");
    }

    // =========================================================================
    // Typing Indicator
    // =========================================================================

    #[tokio::test]
    async fn test_typing_indicator_removed_once_on_success_and_failure() {
        let (mut ctrl, mut rx, _bus) = controller(vec![
            Ok(ChatResponse::text("ok")),
            Err(ClientError::Status(500)),
        ]);
        ctrl.submit("one").await;
        ctrl.submit("two").await;

        let typing = typing_events(&rx.drain());
        let first = RequestId::new(1);
        let second = RequestId::new(2);
        assert_eq!(
            typing,
            vec![
                TypingMessage { request_id: first, is_active: true },
                TypingMessage { request_id: first, is_active: false },
                TypingMessage { request_id: second, is_active: true },
                TypingMessage { request_id: second, is_active: false },
            ]
        );
    }

    #[test]
    fn test_duplicate_completion_is_ignored() {
        let (mut ctrl, mut rx, _bus) = controller(vec![]);
        let pending = ctrl.begin_submit("hi").unwrap();

        let first = ctrl.complete(pending.clone(), Ok(ChatResponse::text("one")));
        let second = ctrl.complete(pending, Ok(ChatResponse::text("two")));

        assert_eq!(first, SubmitOutcome::Replied);
        assert_eq!(second, SubmitOutcome::Superseded);
        assert_eq!(ctrl.transcript().len(), 2);
        let stops = typing_events(&rx.drain())
            .into_iter()
            .filter(|t| !t.is_active)
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_overlapping_requests_last_one_wins() {
        let (mut ctrl, mut rx, _bus) = controller(vec![]);
        rx.drain();

        let first = ctrl.begin_submit("first").unwrap();
        let second = ctrl.begin_submit("second").unwrap();
        assert_eq!(ctrl.typing_indicator(), Some(second.id));

        // Newest answers first, then the stale one arrives.
        let newest = ctrl.complete(second, Ok(reply("for second", &["A"], vec![])));
        let stale = ctrl.complete(first, Ok(reply("for first", &["B"], vec![telescope()])));

        assert_eq!(newest, SubmitOutcome::Replied);
        assert_eq!(stale, SubmitOutcome::Superseded);
        assert!(!ctrl.is_awaiting_reply());

        let contents: Vec<&str> = ctrl.transcript().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "for second"]);
        assert_eq!(ctrl.suggestions().items(), ["A"]);
        assert!(!ctrl.gift_panel().is_visible());

        let typing = typing_events(&rx.drain());
        assert_eq!(typing.iter().filter(|t| t.is_active).count(), 2);
        assert_eq!(typing.iter().filter(|t| !t.is_active).count(), 2);
        assert_eq!(
            typing.last(),
            Some(&TypingMessage { request_id: RequestId::new(2), is_active: false })
        );
    }

    #[test]
    fn test_stale_failure_does_not_clear_newer_indicator() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        let first = ctrl.begin_submit("first").unwrap();
        let second = ctrl.begin_submit("second").unwrap();

        let outcome = ctrl.complete(first, Err(ClientError::Status(500)));

        assert_eq!(outcome, SubmitOutcome::Superseded);
        assert_eq!(ctrl.typing_indicator(), Some(second.id));
        assert_eq!(ctrl.transcript().len(), 2);
    }

    // =========================================================================
    // Suggestions and Panel
    // =========================================================================

    #[test]
    fn test_select_suggestion_fills_input_without_sending() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.select_suggestion("Tech lover gifts");
        assert_eq!(ctrl.input(), "Tech lover gifts");
        assert!(ctrl.transcript().is_empty());
        assert!(ctrl.client().requests().is_empty());
    }

    #[test]
    fn test_select_unknown_suggestion_is_ignored() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.set_input("draft");
        ctrl.select_suggestion("not a chip");
        assert_eq!(ctrl.input(), "draft");
    }

    #[test]
    fn test_panel_toggles_are_idempotent() {
        let (mut ctrl, mut rx, _bus) = controller(vec![]);
        rx.drain();

        ctrl.dismiss_gift_panel();
        ctrl.dismiss_gift_panel();
        assert!(!ctrl.gift_panel().is_visible());

        ctrl.reveal_gift_panel();
        assert!(ctrl.gift_panel().is_visible());
        ctrl.reveal_gift_panel();
        assert!(ctrl.gift_panel().is_visible());

        ctrl.dismiss_gift_panel();
        assert!(!ctrl.gift_panel().is_visible());
        ctrl.dismiss_gift_panel();
        assert!(!ctrl.gift_panel().is_visible());

        let panel_updates = rx
            .drain()
            .into_iter()
            .filter(|m| matches!(m, Message::GiftPanel(_)))
            .count();
        assert_eq!(panel_updates, 2);
    }

    #[tokio::test]
    async fn test_click_on_gift_message_reveals_panel() {
        let (mut ctrl, _rx, _bus) = controller(vec![Ok(reply(
            "Here is a gift idea",
            &[],
            vec![telescope()],
        ))]);
        ctrl.submit("stars").await;
        ctrl.dismiss_gift_panel();

        ctrl.click(ClickTarget::Message(0));
        assert!(!ctrl.gift_panel().is_visible(), "user messages never reveal");

        ctrl.click(ClickTarget::Message(1));
        assert!(ctrl.gift_panel().is_visible());

        ctrl.click(ClickTarget::Message(99));
        assert!(ctrl.gift_panel().is_visible());
    }

    #[test]
    fn test_click_away_dismisses_but_panel_click_does_not() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.reveal_gift_panel();

        ctrl.click(ClickTarget::Panel);
        assert!(ctrl.gift_panel().is_visible());

        ctrl.click(ClickTarget::Elsewhere);
        assert!(!ctrl.gift_panel().is_visible());
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[tokio::test]
    async fn test_dispatch_edit_then_submit() {
        let (mut ctrl, mut rx, _bus) =
            controller(vec![Ok(reply("Try a scarf!", &["Wool", "Silk"], vec![]))]);
        rx.drain();

        ctrl.dispatch(UiEvent::Edit("  warm things ".into())).await;
        ctrl.dispatch(UiEvent::Submit).await;

        assert_eq!(ctrl.client().requests()[0].message, "warm things");
        assert_eq!(ctrl.input(), "");
        assert_eq!(ctrl.transcript().len(), 2);

        let published = rx.drain();
        assert_eq!(published.last(), Some(&Message::Settled));
        assert_eq!(
            published.iter().filter(|m| **m == Message::Settled).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_dispatch_select_then_submit_sends_chip() {
        let (mut ctrl, _rx, _bus) = controller(vec![Ok(ChatResponse::text("ok"))]);
        ctrl.dispatch(UiEvent::SelectSuggestion("Budget under $50".into()))
            .await;
        assert!(ctrl.transcript().is_empty());

        ctrl.dispatch(UiEvent::Submit).await;
        assert_eq!(ctrl.client().requests()[0].message, "Budget under $50");
    }

    #[tokio::test]
    async fn test_dispatch_panel_events() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.dispatch(UiEvent::RevealPanel).await;
        assert!(ctrl.gift_panel().is_visible());
        ctrl.dispatch(UiEvent::Click(ClickTarget::Panel)).await;
        assert!(ctrl.gift_panel().is_visible());
        ctrl.dispatch(UiEvent::DismissPanel).await;
        assert!(!ctrl.gift_panel().is_visible());
    }

    #[tokio::test]
    async fn test_dispatch_submit_with_blank_buffer_is_noop() {
        let (mut ctrl, _rx, _bus) = controller(vec![]);
        ctrl.dispatch(UiEvent::Edit("   ".into())).await;
        ctrl.dispatch(UiEvent::Submit).await;
        assert!(ctrl.transcript().is_empty());
        assert!(ctrl.client().requests().is_empty());
    }
}
