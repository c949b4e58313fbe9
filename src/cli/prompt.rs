//! Reedline prompt, highlighter and completer for the chat line.
//!
//! Type "/" then Tab to see commands. Menu filters as you type.

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, Emacs, Highlighter, KeyCode, KeyModifiers, MenuBuilder, Prompt,
    PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, ReedlineEvent,
    ReedlineMenu, Span, StyledText, Suggestion,
};
use std::borrow::Cow;
use std::sync::{Arc, RwLock};

/// All slash commands with descriptions.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/clear", "Clear screen"),
    ("/close", "Close the gift panel"),
    ("/exit", "Exit"),
    ("/gifts", "Show the gift panel"),
    ("/health", "Check the assistant service"),
    ("/help", "Show help"),
    ("/id", "Show the conversation id"),
    ("/open", "Open a message (reveals gifts it mentions)"),
    ("/pick", "Copy a suggestion into the input"),
    ("/quit", "Exit"),
    ("/suggestions", "List current suggestions"),
];

/// Giftchat prompt.
pub struct GiftPrompt {
    /// Shown dimmed before the indicator, e.g. the number of suggestions.
    pub hint: Option<String>,
}

impl GiftPrompt {
    pub fn new() -> Self {
        Self { hint: None }
    }

    pub fn with_hint(hint: impl Into<String>) -> Self {
        Self {
            hint: Some(hint.into()),
        }
    }
}

impl Default for GiftPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for GiftPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        match &self.hint {
            Some(hint) => Cow::Owned(format!(
                "\x1b[1;36mYou\x1b[0m \x1b[2m[{}]\x1b[0m",
                hint
            )),
            None => Cow::Borrowed("\x1b[1;36mYou\x1b[0m"),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" 🎁 ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(&self, hs: PromptHistorySearch) -> Cow<'_, str> {
        let prefix = match hs.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({}search: {}) ", prefix, hs.term))
    }
}

/// Highlights known slash commands.
#[derive(Clone)]
pub struct GiftHighlighter;

impl Highlighter for GiftHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.starts_with('/') {
            let cmd_end = line.find(' ').unwrap_or(line.len());
            let cmd = &line[..cmd_end];
            let is_pick_shortcut = cmd.len() > 1 && cmd[1..].chars().all(|c| c.is_ascii_digit());
            let is_valid = is_pick_shortcut || COMMANDS.iter().any(|(c, _)| *c == cmd);

            if is_valid {
                styled.push((Style::new().fg(Color::Cyan).bold(), cmd.to_string()));
            } else {
                styled.push((Style::new().fg(Color::Yellow), cmd.to_string()));
            }

            if cmd_end < line.len() {
                styled.push((Style::default(), line[cmd_end..].to_string()));
            }
        } else {
            styled.push((Style::default(), line.to_string()));
        }

        styled
    }
}

/// Completes slash commands, and chip numbers after `/pick`.
///
/// Clones share the chip list, so the REPL can keep one and update it after
/// the editor has taken ownership of the other.
#[derive(Clone, Default)]
pub struct GiftCompleter {
    suggestions: Arc<RwLock<Vec<String>>>,
}

impl GiftCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_suggestions(&self, suggestions: &[String]) {
        if let Ok(mut current) = self.suggestions.write() {
            *current = suggestions.to_vec();
        }
    }
}

impl Completer for GiftCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if pos > line.len() {
            return Vec::new();
        }

        let input = &line[..pos];
        if input.is_empty() || !input.starts_with('/') {
            return Vec::new();
        }

        if !input.contains(' ') {
            let prefix = input.to_lowercase();
            return COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(&prefix))
                .map(|(cmd, desc)| Suggestion {
                    value: cmd.to_string(),
                    description: Some(desc.to_string()),
                    extra: None,
                    span: Span::new(0, pos),
                    append_whitespace: true,
                    style: None,
                })
                .collect();
        }

        if let Some(arg) = input.strip_prefix("/pick ") {
            let start = input.len() - arg.len();
            let Ok(suggestions) = self.suggestions.read() else {
                return Vec::new();
            };
            return suggestions
                .iter()
                .enumerate()
                .map(|(idx, text)| ((idx + 1).to_string(), text))
                .filter(|(number, _)| number.starts_with(arg.trim()))
                .map(|(number, text)| Suggestion {
                    value: number,
                    description: Some(text.clone()),
                    extra: None,
                    span: Span::new(start, pos),
                    append_whitespace: false,
                    style: None,
                })
                .collect();
        }

        Vec::new()
    }
}

/// Create a line editor with the command menu wired to Tab.
///
/// History lives in memory only.
pub fn create_reedline(completer: GiftCompleter) -> Reedline {
    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("completion_menu")
            .with_columns(1)
            .with_column_padding(2)
            .with_text_style(Style::new().fg(Color::Default))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan))
            .with_description_text_style(Style::new().fg(Color::DarkGray)),
    );

    let mut keybindings = reedline::default_emacs_keybindings();

    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::SHIFT,
        KeyCode::BackTab,
        ReedlineEvent::MenuPrevious,
    );

    Reedline::create()
        .with_completer(Box::new(completer))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_quick_completions(true)
        .with_partial_completions(true)
        .with_highlighter(Box::new(GiftHighlighter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

/// Let the user choose a suggestion with a fuzzy picker. Returns its 1-based number.
pub fn pick_suggestion(suggestions: &[String]) -> Option<usize> {
    use dialoguer::{theme::ColorfulTheme, FuzzySelect};

    if suggestions.is_empty() {
        return None;
    }

    FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Pick a suggestion")
        .items(suggestions)
        .default(0)
        .interact_opt()
        .ok()
        .flatten()
        .map(|idx| idx + 1)
}
