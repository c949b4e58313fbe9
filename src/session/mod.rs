//! Conversation session for Giftchat.
//!
//! One [`SessionController`] exists per run. It is built in the entry point
//! and handed to the front-end, which feeds it [`UiEvent`]s and mirrors the
//! updates it publishes on the message bus.
//!
//! ## Usage
//!
//! ```ignore
//! use giftchat::client::HttpAssistantClient;
//! use giftchat::messaging::MessageBus;
//! use giftchat::session::{SessionController, SessionDefaults, UiEvent};
//!
//! let bus = MessageBus::new();
//! let client = HttpAssistantClient::new("http://localhost:8000/api/chat")?;
//! let mut session = SessionController::new(client, SessionDefaults::default(), bus.sender());
//!
//! session.welcome().await;
//! session.dispatch(UiEvent::Edit("A gift for my sister".into())).await;
//! session.dispatch(UiEvent::Submit).await;
//! ```

mod controller;
mod defaults;
mod events;
mod message;

pub use controller::{
    new_conversation_id, PendingRequest, RequestId, SessionController, SubmitOutcome,
};
pub use defaults::{
    SessionDefaults, ERROR_MESSAGE, FALLBACK_SUGGESTIONS, STARTER_SUGGESTIONS, WELCOME_DELAY,
    WELCOME_MESSAGE,
};
pub use events::{ClickTarget, UiEvent};
pub use message::{ChatMessage, GiftPanel, GiftSuggestion, MessageRole, SuggestionSet};
