//! Giftchat Library
//!
//! A conversational gift-finding assistant: a session controller that talks
//! to a remote assistant service over HTTP, plus the terminal front-end the
//! `giftchat` binary runs.
//!
//! ## Main Components
//!
//! - [`session`] - Conversation session controller and its data model
//! - [`client`] - Assistant service client (trait + reqwest implementation)
//! - [`format`] - Lightweight markup for assistant replies
//! - [`messaging`] - Update bus between the controller and renderers
//! - [`cli`] - Command-line interface (REPL, commands, runner)
//! - [`config`] - Settings file and XDG paths
//!
//! ## Quick Start
//!
//! ```ignore
//! use giftchat::{HttpAssistantClient, MessageBus, SessionController, SessionDefaults};
//!
//! let bus = MessageBus::new();
//! let client = HttpAssistantClient::new("http://localhost:8000/api/chat")?;
//! let mut session = SessionController::new(client, SessionDefaults::default(), bus.sender());
//! session.submit("Ideas for my sister who loves hiking").await;
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod format;
pub mod messaging;
pub mod session;

// Re-export commonly used types
pub use client::{AssistantClient, ChatRequest, ChatResponse, ClientError, HttpAssistantClient};
pub use config::{Settings, SettingsError, XdgDirs};
pub use format::{format_message, to_html, Node};
pub use messaging::{Message, MessageBus, MessageSender, TerminalRenderer};
pub use session::{
    ChatMessage, ClickTarget, GiftPanel, GiftSuggestion, MessageRole, SessionController,
    SessionDefaults, SubmitOutcome, SuggestionSet, UiEvent,
};
