//! Slash commands for the REPL.
//!
//! Parsing is kept separate from execution so every command can be tested
//! without a terminal.

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Clear,
    /// Reveal the gift panel.
    Gifts,
    /// Dismiss the gift panel.
    Close,
    /// Copy suggestion N into the input; `None` opens a picker.
    Pick(Option<usize>),
    Suggestions,
    /// Click transcript message N.
    Open(usize),
    Health,
    Id,
    /// Known command, bad argument.
    Usage(&'static str),
    Unknown(String),
}

/// Result of handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue the REPL loop
    Continue,
    /// Exit the REPL
    Exit,
}

/// Parse a line starting with `/`.
pub fn parse_command(input: &str) -> Command {
    let body = input.strip_prefix('/').unwrap_or(input);
    let mut parts = body.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let args = parts.next().map(str::trim).unwrap_or("");

    // "/3" is shorthand for "/pick 3".
    if !cmd.is_empty() && cmd.chars().all(|c| c.is_ascii_digit()) {
        return match cmd.parse() {
            Ok(n) if n > 0 => Command::Pick(Some(n)),
            _ => Command::Usage("/pick <number>"),
        };
    }

    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "exit" | "quit" | "q" => Command::Quit,
        "clear" | "cls" => Command::Clear,
        "gifts" | "g" => Command::Gifts,
        "close" => Command::Close,
        "pick" | "p" => {
            if args.is_empty() {
                Command::Pick(None)
            } else {
                match args.parse() {
                    Ok(n) if n > 0 => Command::Pick(Some(n)),
                    _ => Command::Usage("/pick <number>"),
                }
            }
        }
        "suggestions" | "s" => Command::Suggestions,
        "open" | "o" => match args.parse() {
            Ok(n) => Command::Open(n),
            Err(_) => Command::Usage("/open <message #>"),
        },
        "health" => Command::Health,
        "id" => Command::Id,
        _ => Command::Unknown(format!("/{}", cmd)),
    }
}

/// Help text.
pub fn help_text() -> String {
    let mut text = String::from(
        "Type a message and press Enter to send it.\n\
         Suggestion chips are numbered; /N copies chip N into the input line.\n\n\
         Commands:\n",
    );
    for (cmd, desc) in super::prompt::COMMANDS {
        text.push_str(&format!("  {:<14} {}\n", cmd, desc));
    }
    text
}
