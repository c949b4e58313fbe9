//! CLI components.

pub mod commands;
pub mod prompt;
pub mod repl;
pub mod runner;

pub use commands::{parse_command, Command, CommandResult};
pub use prompt::{create_reedline, GiftCompleter, GiftHighlighter, GiftPrompt, COMMANDS};
pub use repl::Repl;
pub use runner::{run_interactive, run_single_prompt};
