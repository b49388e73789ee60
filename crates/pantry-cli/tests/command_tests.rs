use pantry_cli::commands::{handle_command, CommandResult};

// ========================================================================
// Command Parsing Tests (commands.rs)
// ========================================================================

// --- BASIC SLASH COMMANDS ---

#[test]
fn test_help_command() {
    let result = handle_command("/help");

    if let CommandResult::Message(msg) = result {
        assert!(msg.contains("Pantry Commands"));
        assert!(msg.contains("/service <name>"));
        assert!(msg.contains("/memory <1-10>"));
    } else {
        panic!("expected help text");
    }
}

#[test]
fn test_help_command_short_alias() {
    assert!(matches!(handle_command("/h"), CommandResult::Message(_)));
}

#[test]
fn test_quit_aliases() {
    for cmd in ["/exit", "/quit", "/q"] {
        assert_eq!(handle_command(cmd), CommandResult::Quit);
    }
}

#[test]
fn test_clear_command() {
    assert_eq!(handle_command("/clear"), CommandResult::Clear);
}

#[test]
fn test_settings_aliases() {
    assert_eq!(handle_command("/settings"), CommandResult::ShowSettings);
    assert_eq!(handle_command("/status"), CommandResult::ShowSettings);
}

#[test]
fn test_save_command() {
    assert_eq!(handle_command("/save"), CommandResult::SaveSettings);

    if let CommandResult::Message(msg) = handle_command("/help") {
        assert!(msg.contains("/save"));
    } else {
        panic!("expected help text");
    }
}

// --- RECIPE DATABASE ---

#[test]
fn test_services_and_refresh() {
    assert_eq!(handle_command("/services"), CommandResult::ListServices);
    assert_eq!(handle_command("/refresh"), CommandResult::RefreshServices);
}

#[test]
fn test_service_with_name() {
    assert_eq!(
        handle_command("/service recipe"),
        CommandResult::SelectService("recipe".to_string())
    );
}

#[test]
fn test_service_without_name_shows_usage() {
    let result = handle_command("/service");
    assert!(matches!(result, CommandResult::Message(ref m) if m.contains("Usage")));
}

// --- ADVANCED SETTINGS ---

#[test]
fn test_model_without_arg_lists_supported_models() {
    if let CommandResult::Message(msg) = handle_command("/model") {
        assert!(msg.contains("mistral-large2"));
    } else {
        panic!("expected model list");
    }
}

#[test]
fn test_model_with_arg() {
    assert_eq!(
        handle_command("/model  llama3.1-70b "),
        CommandResult::ModelChanged("llama3.1-70b".to_string())
    );
}

#[test]
fn test_chunks_passes_number_through_unclamped() {
    assert_eq!(handle_command("/chunks 3"), CommandResult::SetContextChunks(3));
    // Range validation is the session's job.
    assert_eq!(handle_command("/chunks 42"), CommandResult::SetContextChunks(42));
}

#[test]
fn test_chunks_rejects_non_numbers() {
    assert!(matches!(handle_command("/chunks many"), CommandResult::Message(_)));
    assert!(matches!(handle_command("/chunks"), CommandResult::Message(_)));
}

#[test]
fn test_memory_command() {
    assert_eq!(handle_command("/memory 7"), CommandResult::SetChatMemory(7));
    assert!(matches!(handle_command("/memory -"), CommandResult::Message(_)));
}

// --- TOGGLES ---

#[test]
fn test_history_toggle() {
    assert_eq!(handle_command("/history on"), CommandResult::SetUseHistory(true));
    assert_eq!(handle_command("/history OFF"), CommandResult::SetUseHistory(false));
    assert!(matches!(handle_command("/history maybe"), CommandResult::Message(_)));
}

#[test]
fn test_debug_toggle() {
    assert_eq!(handle_command("/debug true"), CommandResult::SetDebug(true));
    assert_eq!(handle_command("/debug 0"), CommandResult::SetDebug(false));
}

// --- NON-COMMANDS ---

#[test]
fn test_plain_text_is_not_a_command() {
    assert_eq!(
        handle_command("I have eggs and spinach"),
        CommandResult::NotACommand
    );
}

#[test]
fn test_unknown_slash_command() {
    if let CommandResult::Message(msg) = handle_command("/bake") {
        assert!(msg.contains("Unknown command: /bake"));
    } else {
        panic!("expected unknown-command message");
    }
}
