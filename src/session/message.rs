//! Transcript and panel data types.
//!
//! Defines the message structure shown in the transcript plus the
//! suggestion chips and gift cards that travel alongside it.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    /// Short local time label, e.g. `14:05`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    /// Assistant messages that talk about gifts can be clicked to bring the
    /// gift panel back.
    pub fn reveals_gift_panel(&self) -> bool {
        self.role == MessageRole::Assistant && self.content.to_lowercase().contains("gift")
    }
}

/// One recommendation card in the gift panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftSuggestion {
    #[serde(rename = "gift")]
    pub name: String,
    pub reason: String,
    pub price_range: String,
}

impl GiftSuggestion {
    pub fn new(
        name: impl Into<String>,
        reason: impl Into<String>,
        price_range: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            price_range: price_range.into(),
        }
    }
}

/// Quick-reply chips. Always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSet {
    items: Vec<String>,
}

impl SuggestionSet {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn replace(&mut self, items: Vec<String>) {
        self.items = items;
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Chip by 1-based position, as numbered on screen.
    pub fn get(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.items.get(idx))
            .map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.iter().any(|s| s == text)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The dismissible side panel of gift cards. Starts hidden and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftPanel {
    gifts: Vec<GiftSuggestion>,
    visible: bool,
}

impl GiftPanel {
    pub fn gifts(&self) -> &[GiftSuggestion] {
        &self.gifts
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Replace the card list and show the panel.
    pub fn populate(&mut self, gifts: Vec<GiftSuggestion>) {
        self.gifts = gifts;
        self.visible = true;
    }

    /// Returns true if the visibility actually changed.
    pub fn reveal(&mut self) -> bool {
        let changed = !self.visible;
        self.visible = true;
        changed
    }

    /// Returns true if the visibility actually changed.
    pub fn dismiss(&mut self) -> bool {
        let changed = self.visible;
        self.visible = false;
        changed
    }
}
