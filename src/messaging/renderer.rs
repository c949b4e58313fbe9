//! Terminal renderer for session updates.

use super::{
    BusError, GiftPanelMessage, Message, MessageLevel, MessageReceiver, Spinner, SpinnerConfig,
    SpinnerHandle, TranscriptMessage, TypingMessage,
};
use crate::format::{format_message, Node};
use crate::session::{GiftSuggestion, MessageRole, RequestId};
use crossterm::{
    cursor::MoveTo,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Write};
use tokio::sync::mpsc;

const TYPING_LABEL: &str = "Assistant is typing...";
const DEFAULT_WIDTH: usize = 80;

/// Render style configuration.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub info_color: Color,
    pub success_color: Color,
    pub warning_color: Color,
    pub error_color: Color,
    pub user_color: Color,
    pub assistant_color: Color,
    pub chip_color: Color,
    pub panel_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            info_color: Color::White,
            success_color: Color::Green,
            warning_color: Color::Yellow,
            error_color: Color::Red,
            user_color: Color::Cyan,
            assistant_color: Color::Magenta,
            chip_color: Color::Yellow,
            panel_color: Color::Green,
        }
    }
}

/// Terminal renderer for messages.
pub struct TerminalRenderer {
    style: RenderStyle,
    out: Box<dyn Write + Send>,
    /// `None` prints a static typing line instead of animating.
    spinner: Option<Spinner>,
    typing: Option<(RequestId, Option<SpinnerHandle>)>,
    width: usize,
}

impl TerminalRenderer {
    /// Create a new renderer writing to stdout.
    pub fn new() -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(DEFAULT_WIDTH);
        Self {
            style: RenderStyle::default(),
            out: Box::new(stdout()),
            spinner: Some(Spinner::with_config(SpinnerConfig::typing())),
            typing: None,
            width,
        }
    }

    /// Write somewhere other than stdout. Disables the animated spinner,
    /// which always draws on the terminal.
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self.spinner = None;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(20);
        self
    }

    /// Render a message.
    pub fn render(&mut self, message: &Message) -> std::io::Result<()> {
        match message {
            Message::Text(text) => self.render_text(text.level, &text.text),
            Message::Transcript(entry) => self.render_transcript(entry),
            Message::Typing(typing) => self.render_typing(typing),
            Message::Suggestions(s) => self.render_suggestions(&s.suggestions),
            Message::GiftPanel(panel) => self.render_gift_panel(panel),
            Message::Input(_) | Message::Settled => Ok(()),
            Message::Clear => self.clear_screen(),
        }
    }

    fn render_text(&mut self, level: MessageLevel, text: &str) -> std::io::Result<()> {
        let color = match level {
            MessageLevel::Info => self.style.info_color,
            MessageLevel::Success => self.style.success_color,
            MessageLevel::Warning => self.style.warning_color,
            MessageLevel::Error => self.style.error_color,
        };

        let prefix = match level {
            MessageLevel::Success => "✓ ",
            MessageLevel::Warning => "⚠ ",
            MessageLevel::Error => "✗ ",
            MessageLevel::Info => "",
        };

        self.out
            .execute(SetForegroundColor(color))?
            .execute(Print(prefix))?
            .execute(Print(text))?
            .execute(Print("\n"))?
            .execute(ResetColor)?;

        Ok(())
    }

    fn render_transcript(&mut self, entry: &TranscriptMessage) -> std::io::Result<()> {
        // A new transcript line always lands below the indicator.
        self.hide_typing();

        let message = &entry.message;
        let (name, color) = match message.role {
            MessageRole::User => ("You", self.style.user_color),
            MessageRole::Assistant => ("Assistant", self.style.assistant_color),
        };

        self.out
            .execute(Print("\n"))?
            .execute(SetForegroundColor(color))?
            .execute(SetAttribute(Attribute::Bold))?
            .execute(Print(name))?
            .execute(SetAttribute(Attribute::Reset))?
            .execute(SetForegroundColor(Color::DarkGrey))?
            .execute(Print(format!(" · {} · #{}\n", message.time_label(), entry.index)))?
            .execute(ResetColor)?;

        match message.role {
            MessageRole::User => {
                self.out.execute(Print(&message.content))?.execute(Print("\n"))?;
            }
            MessageRole::Assistant => {
                let nodes = format_message(&message.content);
                self.render_nodes(&nodes)?;
                if !matches!(nodes.last(), Some(Node::ListItem(_))) {
                    self.out.execute(Print("\n"))?;
                }
            }
        }
        self.out.flush()
    }

    /// Render formatted assistant text.
    pub fn render_nodes(&mut self, nodes: &[Node]) -> std::io::Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    self.out.execute(Print(text))?;
                }
                Node::Bold(children) => {
                    self.out.execute(SetAttribute(Attribute::Bold))?;
                    self.render_nodes(children)?;
                    self.out.execute(SetAttribute(Attribute::NormalIntensity))?;
                }
                Node::Italic(children) => {
                    self.out.execute(SetAttribute(Attribute::Italic))?;
                    self.render_nodes(children)?;
                    self.out.execute(SetAttribute(Attribute::NoItalic))?;
                }
                Node::ListItem(children) => {
                    self.out
                        .execute(SetForegroundColor(Color::Yellow))?
                        .execute(Print("  • "))?
                        .execute(ResetColor)?;
                    self.render_nodes(children)?;
                    self.out.execute(Print("\n"))?;
                }
                Node::LineBreak => {
                    self.out.execute(Print("\n"))?;
                }
            }
        }
        Ok(())
    }

    fn render_typing(&mut self, typing: &TypingMessage) -> std::io::Result<()> {
        if !typing.is_active {
            if self.typing.as_ref().map(|(id, _)| *id) == Some(typing.request_id) {
                self.hide_typing();
            }
            return Ok(());
        }

        self.hide_typing();
        let handle = match &self.spinner {
            Some(spinner) => Some(spinner.start(TYPING_LABEL)),
            None => {
                self.out
                    .execute(SetForegroundColor(Color::DarkGrey))?
                    .execute(Print(format!("{}\n", TYPING_LABEL)))?
                    .execute(ResetColor)?;
                None
            }
        };
        self.typing = Some((typing.request_id, handle));
        Ok(())
    }

    fn hide_typing(&mut self) {
        if let Some((_, Some(mut handle))) = self.typing.take() {
            handle.stop_sync();
        }
    }

    fn render_suggestions(&mut self, suggestions: &[String]) -> std::io::Result<()> {
        if suggestions.is_empty() {
            return Ok(());
        }

        self.out
            .execute(SetForegroundColor(Color::DarkGrey))?
            .execute(Print("\nTry (/pick N to use one):\n"))?
            .execute(ResetColor)?;
        for line in layout_chips(suggestions, self.width) {
            self.out
                .execute(SetForegroundColor(self.style.chip_color))?
                .execute(Print(line))?
                .execute(ResetColor)?
                .execute(Print("\n"))?;
        }
        self.out.flush()
    }

    fn render_gift_panel(&mut self, panel: &GiftPanelMessage) -> std::io::Result<()> {
        if !panel.visible {
            self.out
                .execute(SetForegroundColor(Color::DarkGrey))?
                .execute(Print("Gift panel closed (/gifts to reopen)\n"))?
                .execute(ResetColor)?;
            return Ok(());
        }

        let color = self.style.panel_color;
        self.out
            .execute(Print("\n"))?
            .execute(SetForegroundColor(color))?
            .execute(Print("╭─ 🎁 Gift ideas\n"))?
            .execute(ResetColor)?;

        for gift in &panel.gifts {
            self.render_gift_card(gift)?;
        }

        self.out
            .execute(SetForegroundColor(color))?
            .execute(Print("╰─ "))?
            .execute(SetForegroundColor(Color::DarkGrey))?
            .execute(Print("/close to dismiss\n"))?
            .execute(ResetColor)?;
        self.out.flush()
    }

    fn render_gift_card(&mut self, gift: &GiftSuggestion) -> std::io::Result<()> {
        let color = self.style.panel_color;
        self.out
            .execute(SetForegroundColor(color))?
            .execute(Print("│ "))?
            .execute(ResetColor)?
            .execute(SetAttribute(Attribute::Bold))?
            .execute(Print(&gift.name))?
            .execute(SetAttribute(Attribute::Reset))?
            .execute(Print("\n"))?
            .execute(SetForegroundColor(color))?
            .execute(Print("│   "))?
            .execute(ResetColor)?
            .execute(Print("Why it's perfect: "))?
            .execute(Print(&gift.reason))?
            .execute(Print("\n"))?
            .execute(SetForegroundColor(color))?
            .execute(Print("│   "))?
            .execute(SetForegroundColor(Color::Yellow))?
            .execute(Print(&gift.price_range))?
            .execute(ResetColor)?
            .execute(Print("\n"))?;
        Ok(())
    }

    fn clear_screen(&mut self) -> std::io::Result<()> {
        self.out
            .execute(Clear(ClearType::All))?
            .execute(MoveTo(0, 0))?;
        Ok(())
    }

    /// Render every message from the bus until it closes.
    ///
    /// Each [`Message::Settled`] is acknowledged on `settled` once everything
    /// published before it has been drawn. A lag is acknowledged too, since
    /// the skipped messages may include a `Settled` someone is waiting on.
    pub async fn run_loop(
        mut self,
        mut receiver: MessageReceiver,
        settled: Option<mpsc::UnboundedSender<()>>,
    ) {
        let acknowledge = || {
            if let Some(tx) = &settled {
                let _ = tx.send(());
            }
        };

        loop {
            match receiver.recv().await {
                Ok(message) => {
                    if let Err(e) = self.render(&message) {
                        tracing::debug!(error = %e, "Render failed");
                    }
                    if message == Message::Settled {
                        acknowledge();
                    }
                }
                Err(BusError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Renderer lagged behind the session");
                    acknowledge();
                }
                Err(BusError::Closed) => break,
            }
        }
        self.hide_typing();
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay chips out horizontally, wrapping at `width` columns.
pub fn layout_chips(suggestions: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for (idx, suggestion) in suggestions.iter().enumerate() {
        let chip = format!("[{}] {}", idx + 1, suggestion);
        let chip_len = chip.chars().count();

        if current_len > 0 && current_len + 2 + chip_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push_str("  ");
            current_len += 2;
        }
        current.push_str(&chip);
        current_len += chip_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
