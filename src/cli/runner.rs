//! CLI runner for interactive and single-prompt modes.

use std::io::{stdout, Write};

use crate::cli::repl::Repl;
use crate::client::AssistantClient;
use crate::messaging::MessageBus;
use crate::session::{ChatMessage, GiftSuggestion, SessionController, SessionDefaults, SubmitOutcome};

/// Send one message, print the reply and exit.
///
/// A failed request prints the usual apology and returns an error so
/// scripts can tell it apart from a real reply.
pub async fn run_single_prompt<C: AssistantClient>(
    client: C,
    defaults: SessionDefaults,
    prompt: &str,
) -> anyhow::Result<()> {
    let bus = MessageBus::new();
    let mut session = SessionController::new(client, defaults, bus.sender());

    let outcome = session.submit(prompt).await;
    let mut out = stdout().lock();

    match outcome {
        SubmitOutcome::Ignored => anyhow::bail!("Nothing to send: the prompt is empty"),
        SubmitOutcome::Replied => {
            if let Some(reply) = session.transcript().last() {
                write_reply(
                    &mut out,
                    reply,
                    session.gift_panel().gifts(),
                    session.suggestions().items(),
                )?;
            }
            Ok(())
        }
        SubmitOutcome::Failed | SubmitOutcome::Superseded => {
            writeln!(out, "{}", session.defaults().error_message)?;
            anyhow::bail!("The assistant did not reply")
        }
    }
}

/// Run in interactive mode.
pub async fn run_interactive<C: AssistantClient + 'static>(
    client: C,
    defaults: SessionDefaults,
) -> anyhow::Result<()> {
    print_banner();
    Repl::new(client, defaults).run().await
}

/// Plain-text reply for non-interactive output.
pub fn write_reply(
    out: &mut impl Write,
    reply: &ChatMessage,
    gifts: &[GiftSuggestion],
    suggestions: &[String],
) -> std::io::Result<()> {
    writeln!(out, "{}", reply.content)?;

    if !gifts.is_empty() {
        writeln!(out)?;
        writeln!(out, "Gift ideas:")?;
        for gift in gifts {
            writeln!(out, "- {} ({}): {}", gift.name, gift.price_range, gift.reason)?;
        }
    }

    if !suggestions.is_empty() {
        writeln!(out)?;
        writeln!(out, "Try next:")?;
        for (idx, suggestion) in suggestions.iter().enumerate() {
            writeln!(out, "  [{}] {}", idx + 1, suggestion)?;
        }
    }

    Ok(())
}

/// Print the welcome banner.
pub fn print_banner() {
    println!();
    println!("  \x1b[1;35m🎁 Giftchat\x1b[0m  \x1b[2mv{}\x1b[0m", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  \x1b[2mYour personal gift-finding assistant\x1b[0m");
    println!("  \x1b[2mType \x1b[0m\x1b[1;36m/help\x1b[0m\x1b[2m for commands, or just start chatting!\x1b[0m");
    println!();
}
