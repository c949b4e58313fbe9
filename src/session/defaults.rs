//! Built-in copy for a fresh session.
//!
//! Everything here can be replaced through [`Settings`](crate::config::Settings)
//! or directly by tests.

use std::time::Duration;

/// Shown as an Assistant message when a request fails for any reason.
pub const ERROR_MESSAGE: &str =
    "Sorry, I encountered an error. Please try again or check the backend connection.";

pub const WELCOME_MESSAGE: &str = "Hello! I'm your Gift Finding Assistant. 🎁\n\n\
I can help you find the perfect gift for any occasion. Tell me about the person you're shopping for!\n\n\
Please include:\n\
• Who the gift is for (relationship)\n\
• Their age and interests\n\
• The occasion (birthday, holiday, etc.)\n\
• Your budget if you have one";

/// Example prompts shown before the first exchange.
pub const STARTER_SUGGESTIONS: [&str; 8] = [
    "For my mother's birthday",
    "Christmas gift for boyfriend",
    "Anniversary gift for wife",
    "Graduation gift for sister",
    "Budget under $50",
    "Tech lover gifts",
    "Book lover presents",
    "Outdoor enthusiast",
];

/// Used when a reply carries no suggestions of its own.
pub const FALLBACK_SUGGESTIONS: [&str; 5] = [
    "Birthday gifts",
    "Christmas presents",
    "Anniversary ideas",
    "Under $50",
    "For teenagers",
];

pub const WELCOME_DELAY: Duration = Duration::from_millis(500);

/// Fixed strings and timings a session starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub welcome_message: String,
    pub error_message: String,
    pub starter_suggestions: Vec<String>,
    pub fallback_suggestions: Vec<String>,
    pub welcome_delay: Duration,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            welcome_message: WELCOME_MESSAGE.to_string(),
            error_message: ERROR_MESSAGE.to_string(),
            starter_suggestions: STARTER_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            fallback_suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            welcome_delay: WELCOME_DELAY,
        }
    }
}

impl SessionDefaults {
    /// Same copy, no welcome delay.
    pub fn immediate() -> Self {
        Self {
            welcome_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
