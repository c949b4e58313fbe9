//! UI events the controller understands.
//!
//! Front-ends translate their own input (key presses, clicks, slash
//! commands) into these and hand them to
//! [`SessionController::dispatch`](super::SessionController::dispatch).

/// Where a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the gift panel.
    Panel,
    /// On the transcript message at this index.
    Message(usize),
    /// Anywhere else.
    Elsewhere,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Replace the contents of the input buffer.
    Edit(String),
    /// Send whatever is in the input buffer.
    Submit,
    /// Copy a suggestion chip into the input buffer.
    SelectSuggestion(String),
    DismissPanel,
    RevealPanel,
    Click(ClickTarget),
}
