use anyhow::Result;
use pantry_core::{ChefModel, ConversationOrchestrator, Session, Settings, TurnEvent};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::{handle_command, CommandResult};

const USER_AVATAR: &str = "🍴";
const ASSISTANT_AVATAR: &str = "❄️";

async fn start(settings: &Settings) -> Result<(Arc<ConversationOrchestrator>, Arc<Session>)> {
    let config = settings.session_config()?;
    let (search, completion) = settings.build_collaborators()?;

    let orchestrator = Arc::new(ConversationOrchestrator::new(search, completion));
    let session = Arc::new(Session::new(config));

    if let Err(e) = orchestrator.prepare_session(&session).await {
        eprintln!("Error: {e}");
    }
    for name in session.catalog().await.skipped() {
        eprintln!("No results found for search service: {name}");
    }

    Ok((orchestrator, session))
}

/// Run one turn in the background and render its events as they arrive.
async fn submit(
    orchestrator: &Arc<ConversationOrchestrator>,
    session: &Arc<Session>,
    input: &str,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TurnEvent>();

    let handle = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let session = session.clone();
        let input = input.to_string();
        async move {
            orchestrator
                .run_turn_with_events(&session, &input, event_tx)
                .await
        }
    });

    while let Some(event) = event_rx.recv().await {
        match event {
            TurnEvent::Working => eprintln!("Cooking up ideas..."),
            TurnEvent::Debug { label, text } => {
                eprintln!("── {label} ──\n{text}\n");
            }
            TurnEvent::Error(e) => tracing::error!("Turn failed: {e}"),
            TurnEvent::Stage(stage) => tracing::debug!("Stage: {:?}", stage),
            TurnEvent::Completed => {}
        }
    }

    match handle.await? {
        Ok(report) => println!("{ASSISTANT_AVATAR} {}\n", report.reply),
        Err(e) => eprintln!("Warning: {e}"),
    }
    Ok(())
}

pub async fn run_single_prompt(settings: &Settings, prompt: &str) -> Result<()> {
    let (orchestrator, session) = start(settings).await?;
    session.chat_availability().await?;
    submit(&orchestrator, &session, prompt).await
}

// ── Interactive chat ────────────────────────────────────────────────────

pub async fn run_chat(settings: &Settings) -> Result<()> {
    let (orchestrator, session) = start(settings).await?;

    println!("Let's cook something! (type /help for commands)\n");
    if let Err(e) = session.chat_availability().await {
        eprintln!("Warning: {e}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{USER_AVATAR} What ingredients do you have? ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match handle_command(input) {
            CommandResult::NotACommand => {
                if let Err(e) = session.chat_availability().await {
                    eprintln!("Warning: {e}");
                    continue;
                }
                submit(&orchestrator, &session, input).await?;
            }
            CommandResult::Quit => break,
            other => apply_command(settings, &orchestrator, &session, other).await,
        }
    }

    Ok(())
}

async fn apply_command(
    settings: &Settings,
    orchestrator: &ConversationOrchestrator,
    session: &Session,
    command: CommandResult,
) {
    let outcome: Result<String, pantry_core::PantryError> = match command {
        CommandResult::Message(msg) => Ok(msg),
        CommandResult::Clear => session.clear_history().map(|_| "Chat cleared.".to_string()),
        CommandResult::ShowSettings => Ok(describe_settings(session).await),
        CommandResult::SaveSettings => {
            let mut updated = settings.clone();
            updated.apply_session(&session.config().await);
            updated
                .save()
                .map(|_| format!("Settings saved to {}", Settings::config_path().display()))
        }
        CommandResult::ListServices => {
            let catalog = session.catalog().await;
            if catalog.is_empty() {
                Ok("No search services available.".to_string())
            } else {
                Ok(catalog
                    .services()
                    .iter()
                    .map(|s| format!("  {} (search column: {})", s.name, s.search_column))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
        CommandResult::RefreshServices => orchestrator
            .refresh_services(session)
            .await
            .map(|_| "Search services reloaded.".to_string()),
        CommandResult::SelectService(name) => session
            .select_service(&name)
            .await
            .map(|_| format!("Recipe database: {name}")),
        CommandResult::ModelChanged(name) => match name.parse::<ChefModel>() {
            Ok(model) => {
                session.set_model(model).await;
                Ok(format!("AI chef model: {model}"))
            }
            Err(e) => Err(e),
        },
        CommandResult::SetContextChunks(n) => session
            .set_context_chunk_count(n)
            .await
            .map(|_| format!("Ingredient context chunks: {n}")),
        CommandResult::SetChatMemory(n) => session
            .set_chat_memory_length(n)
            .await
            .map(|_| format!("Chat memory length: {n}")),
        CommandResult::SetUseHistory(on) => {
            session.set_use_history(on).await;
            Ok(format!("Use history: {}", on_off(on)))
        }
        CommandResult::SetDebug(on) => {
            session.set_debug_mode(on).await;
            Ok(format!("Debug mode: {}", on_off(on)))
        }
        CommandResult::NotACommand | CommandResult::Quit => return,
    };

    match outcome {
        Ok(msg) => println!("{msg}\n"),
        Err(e) => eprintln!("Warning: {e}\n"),
    }
}

async fn describe_settings(session: &Session) -> String {
    let config = session.config().await;
    let history_len = session.history().await.len();
    format!(
        "Session {}\n  Recipe database:  {}\n  AI chef model:    {}\n  Context chunks:   {}\n  Chat memory:      {}\n  Use history:      {}\n  Debug mode:       {}\n  Messages:         {}",
        session.id(),
        config.selected_search_service.as_deref().unwrap_or("(none)"),
        config.model,
        config.context_chunk_count,
        config.chat_memory_length,
        on_off(config.use_history),
        on_off(config.debug_mode),
        history_len,
    )
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
