/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Clear the chat.
    Clear,
    /// Quit the application.
    Quit,
    /// Show the current session settings.
    ShowSettings,
    /// Persist the current session settings to the config file.
    SaveSettings,
    /// List the available search services.
    ListServices,
    /// Reload search services from the warehouse.
    RefreshServices,
    /// Select the recipe database (search service).
    SelectService(String),
    /// Change the chef model.
    ModelChanged(String),
    /// Set the number of context chunks retrieved per turn.
    SetContextChunks(i64),
    /// Set how many prior messages feed the query rewrite.
    SetChatMemory(i64),
    /// Toggle use of chat history.
    SetUseHistory(bool),
    /// Toggle debug output.
    SetDebug(bool),
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/clear" => CommandResult::Clear,
        "/settings" | "/status" => CommandResult::ShowSettings,
        "/save" => CommandResult::SaveSettings,

        // Recipe database
        "/services" => CommandResult::ListServices,
        "/refresh" => CommandResult::RefreshServices,
        "/service" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /service <name>  (see /services)".into())
            } else {
                CommandResult::SelectService(arg.to_string())
            }
        }

        // Advanced settings
        "/model" => {
            if arg.is_empty() {
                let models = pantry_core::constants::models::SUPPORTED_MODELS.join(", ");
                CommandResult::Message(format!("Available models: {models}\nUsage: /model <model-name>"))
            } else {
                CommandResult::ModelChanged(arg.to_string())
            }
        }
        "/chunks" => match parse_count(arg) {
            Some(n) => CommandResult::SetContextChunks(n),
            None => CommandResult::Message("Usage: /chunks <1-10>".into()),
        },
        "/memory" => match parse_count(arg) {
            Some(n) => CommandResult::SetChatMemory(n),
            None => CommandResult::Message("Usage: /memory <1-10>".into()),
        },

        // Toggles
        "/history" => match parse_toggle(arg) {
            Some(on) => CommandResult::SetUseHistory(on),
            None => CommandResult::Message("Usage: /history on|off".into()),
        },
        "/debug" => match parse_toggle(arg) {
            Some(on) => CommandResult::SetDebug(on),
            None => CommandResult::Message("Usage: /debug on|off".into()),
        },

        _ => {
            if cmd.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

// Range checks happen in the session; only the number format is checked here.
fn parse_count(arg: &str) -> Option<i64> {
    arg.parse().ok()
}

fn parse_toggle(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Pantry Commands ──────────────────────────────────────────────╮

  CHAT
    /clear                    Clear chat history
    /history on|off           Use chat history to refine searches
    /debug on|off             Show search queries and discovered ingredients

  RECIPE DATABASE
    /services                 List available recipe databases
    /service <name>           Select recipe database
    /refresh                  Reload recipe databases

  ADVANCED
    /model <name>             Change AI chef model
    /chunks <1-10>            Ingredient context chunks per answer
    /memory <1-10>            Chat memory length
    /settings, /status        Show current settings
    /save                     Save current settings as defaults

  OTHER
    /help, /h                 Show this help message
    /exit, /quit, /q          Quit the application

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
