//! Interactive REPL.
//!
//! Reads lines with reedline and turns them into [`UiEvent`]s for the
//! session. The renderer runs as its own task on the message bus; after each
//! event the REPL waits for it to acknowledge [`Message::Settled`] so the
//! next prompt is never drawn in the middle of the transcript.

use crate::cli::commands::{help_text, parse_command, Command, CommandResult};
use crate::cli::prompt::{create_reedline, pick_suggestion, GiftCompleter, GiftPrompt};
use crate::client::AssistantClient;
use crate::messaging::{Message, MessageBus, MessageSender, TerminalRenderer};
use crate::session::{ClickTarget, SessionController, SessionDefaults, UiEvent};
use reedline::{EditCommand, Signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// REPL state.
pub struct Repl<C> {
    session: SessionController<C>,
    sender: MessageSender,
    settled: mpsc::UnboundedReceiver<()>,
    renderer: JoinHandle<()>,
    completer: GiftCompleter,
    /// Text to place in the input line before the next read.
    prefill: Option<String>,
}

impl<C: AssistantClient + 'static> Repl<C> {
    /// Create a REPL rendering to the terminal. Must be called inside a Tokio runtime.
    pub fn new(client: C, defaults: SessionDefaults) -> Self {
        Self::with_renderer(client, defaults, TerminalRenderer::new())
    }

    pub fn with_renderer(client: C, defaults: SessionDefaults, renderer: TerminalRenderer) -> Self {
        let bus = MessageBus::new();
        let (settled_tx, settled) = mpsc::unbounded_channel();

        // Subscribe before the session exists so its starter chips are drawn.
        let renderer = tokio::spawn(renderer.run_loop(bus.subscribe(), Some(settled_tx)));
        let session = SessionController::new(client, defaults, bus.sender());

        let completer = GiftCompleter::new();
        completer.set_suggestions(session.suggestions().items());

        Self {
            session,
            sender: bus.sender(),
            settled,
            renderer,
            completer,
            prefill: None,
        }
    }

    pub fn session(&self) -> &SessionController<C> {
        &self.session
    }

    /// Text queued for the next input line, if any.
    pub fn prefill(&self) -> Option<&str> {
        self.prefill.as_deref()
    }

    /// Run the REPL loop until the user quits.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut line_editor = create_reedline(self.completer.clone());

        self.session.welcome().await;
        self.settle().await;

        loop {
            if let Some(text) = self.prefill.take() {
                line_editor.run_edit_commands(&[
                    EditCommand::Clear,
                    EditCommand::InsertString(text),
                ]);
            }

            let prompt = if self.session.gift_panel().is_visible() {
                GiftPrompt::with_hint("gift panel open")
            } else {
                GiftPrompt::new()
            };

            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    if self.handle_line(&line).await == CommandResult::Exit {
                        break;
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => break,
                Err(err) => {
                    self.notify(Message::error(format!("Readline error: {}", err)))
                        .await;
                    break;
                }
            }
        }

        println!("👋 Happy gifting!");
        self.shutdown().await;
        Ok(())
    }

    /// Handle one line of input: a slash command or a message to send.
    ///
    /// An empty line counts as a click outside the gift panel.
    pub async fn handle_line(&mut self, line: &str) -> CommandResult {
        let line = line.trim();
        if line.is_empty() {
            self.dispatch(UiEvent::Click(ClickTarget::Elsewhere)).await;
            return CommandResult::Continue;
        }

        if line.starts_with('/') {
            return self.handle_command(parse_command(line)).await;
        }

        self.dispatch(UiEvent::Edit(line.to_string())).await;
        self.dispatch(UiEvent::Submit).await;
        CommandResult::Continue
    }

    async fn handle_command(&mut self, command: Command) -> CommandResult {
        debug!(?command, "Handling command");

        match command {
            Command::Help => self.notify(Message::info(help_text())).await,
            Command::Quit => return CommandResult::Exit,
            Command::Clear => self.notify(Message::Clear).await,
            Command::Gifts => {
                let panel = self.session.gift_panel();
                if panel.gifts().is_empty() {
                    self.notify(Message::info(
                        "No gift ideas yet. Tell me who you're shopping for!",
                    ))
                    .await;
                } else if panel.is_visible() {
                    let message = Message::gift_panel(panel.gifts(), true);
                    self.notify(message).await;
                } else {
                    self.dispatch(UiEvent::RevealPanel).await;
                }
            }
            Command::Close => {
                if self.session.gift_panel().is_visible() {
                    self.dispatch(UiEvent::DismissPanel).await;
                } else {
                    self.notify(Message::info("The gift panel is not open.")).await;
                }
            }
            Command::Pick(number) => {
                let number = match number {
                    Some(n) => Some(n),
                    None => pick_suggestion(self.session.suggestions().items()),
                };
                let Some(number) = number else {
                    return CommandResult::Continue;
                };

                match self.session.suggestions().get(number).map(str::to_string) {
                    Some(text) => {
                        self.dispatch(UiEvent::SelectSuggestion(text)).await;
                        self.prefill = Some(self.session.input().to_string());
                    }
                    None => {
                        self.notify(Message::warning(format!("No suggestion #{}", number)))
                            .await
                    }
                }
            }
            Command::Suggestions => {
                let message = Message::suggestions(self.session.suggestions().items());
                self.notify(message).await;
            }
            Command::Open(index) => {
                let Some(message) = self.session.transcript().get(index) else {
                    self.notify(Message::warning(format!("No message #{}", index)))
                        .await;
                    return CommandResult::Continue;
                };
                let reveals = message.reveals_gift_panel();
                let was_visible = self.session.gift_panel().is_visible();

                self.dispatch(UiEvent::Click(ClickTarget::Message(index))).await;

                if !reveals {
                    self.notify(Message::info(format!(
                        "Message #{} has no gift ideas attached.",
                        index
                    )))
                    .await;
                } else if was_visible {
                    let panel = self.session.gift_panel();
                    let message = Message::gift_panel(panel.gifts(), true);
                    self.notify(message).await;
                }
            }
            Command::Health => {
                let message = match self.session.client().health().await {
                    Ok(status) if status.is_healthy() => {
                        Message::success("Assistant service is healthy")
                    }
                    Ok(status) => {
                        Message::warning(format!("Assistant service reports: {}", status.status))
                    }
                    Err(e) => Message::error(format!("Assistant service unreachable: {}", e)),
                };
                self.notify(message).await;
            }
            Command::Id => {
                let message = Message::info(format!(
                    "Conversation: {}",
                    self.session.conversation_id()
                ));
                self.notify(message).await;
            }
            Command::Usage(usage) => {
                self.notify(Message::warning(format!("Usage: {}", usage))).await
            }
            Command::Unknown(cmd) => {
                self.notify(Message::warning(format!(
                    "Unknown command: {} (try /help)",
                    cmd
                )))
                .await
            }
        }

        CommandResult::Continue
    }

    /// Hand an event to the session and wait until it has been drawn.
    async fn dispatch(&mut self, event: UiEvent) {
        self.discard_stale_acks();
        self.session.dispatch(event).await;
        self.wait_settled().await;
        self.completer
            .set_suggestions(self.session.suggestions().items());
    }

    /// Publish a REPL-originated message and wait until it has been drawn.
    async fn notify(&mut self, message: Message) {
        self.sender.publish(message);
        self.settle().await;
    }

    async fn settle(&mut self) {
        self.discard_stale_acks();
        self.sender.publish(Message::Settled);
        self.wait_settled().await;
    }

    /// Drop acknowledgements left over from a renderer lag.
    fn discard_stale_acks(&mut self) {
        while self.settled.try_recv().is_ok() {}
    }

    async fn wait_settled(&mut self) {
        if self.settled.recv().await.is_none() {
            debug!("Renderer stopped");
        }
    }

    /// Close the bus and wait for the renderer to finish.
    pub async fn shutdown(self) {
        let Self {
            session,
            sender,
            renderer,
            ..
        } = self;
        drop(session);
        drop(sender);
        let _ = renderer.await;
    }
}
