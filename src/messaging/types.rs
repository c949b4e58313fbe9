//! Message types for controller-to-UI updates.

use serde::{Deserialize, Serialize};

use crate::session::{ChatMessage, GiftSuggestion, RequestId};

/// Message levels for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A status line that is not part of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// A message appended to the transcript at `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub index: usize,
    pub message: ChatMessage,
}

/// Typing indicator for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingMessage {
    pub request_id: RequestId,
    pub is_active: bool,
}

/// The full, new set of suggestion chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionsMessage {
    pub suggestions: Vec<String>,
}

/// Gift panel contents and visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftPanelMessage {
    pub gifts: Vec<GiftSuggestion>,
    pub visible: bool,
}

/// New contents of the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub text: String,
}

/// Any update (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Text(TextMessage),
    Transcript(TranscriptMessage),
    Typing(TypingMessage),
    Suggestions(SuggestionsMessage),
    GiftPanel(GiftPanelMessage),
    Input(InputMessage),
    /// Everything caused by the last dispatched event has been published.
    Settled,
    Clear,
}

impl Message {
    /// Create an info message.
    pub fn info(text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            level: MessageLevel::Info,
            text: text.into(),
        })
    }

    /// Create a success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            level: MessageLevel::Success,
            text: text.into(),
        })
    }

    /// Create a warning message.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            level: MessageLevel::Warning,
            text: text.into(),
        })
    }

    /// Create an error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            level: MessageLevel::Error,
            text: text.into(),
        })
    }

    pub fn transcript(index: usize, message: ChatMessage) -> Self {
        Self::Transcript(TranscriptMessage { index, message })
    }

    pub fn typing_started(request_id: RequestId) -> Self {
        Self::Typing(TypingMessage {
            request_id,
            is_active: true,
        })
    }

    pub fn typing_stopped(request_id: RequestId) -> Self {
        Self::Typing(TypingMessage {
            request_id,
            is_active: false,
        })
    }

    pub fn suggestions(suggestions: &[String]) -> Self {
        Self::Suggestions(SuggestionsMessage {
            suggestions: suggestions.to_vec(),
        })
    }

    pub fn gift_panel(gifts: &[GiftSuggestion], visible: bool) -> Self {
        Self::GiftPanel(GiftPanelMessage {
            gifts: gifts.to_vec(),
            visible,
        })
    }

    pub fn input(text: impl Into<String>) -> Self {
        Self::Input(InputMessage { text: text.into() })
    }
}
