use anyhow::Result;
use clap::Parser;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Pantry - tell the AI chef what ingredients you have")]
#[command(version)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// AI chef model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Recipe database (search service) to query
    #[arg(short, long)]
    service: Option<String>,

    /// Show search queries and discovered ingredients
    #[arg(long)]
    debug: bool,

    /// Don't use chat history to refine searches
    #[arg(long)]
    no_history: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = pantry_core::Settings::load();

    if let Some(ref model) = cli.model {
        settings.chat.model = model.clone();
    }
    if let Some(ref service) = cli.service {
        settings.chat.search_service = Some(service.clone());
    }
    if cli.debug {
        settings.chat.debug_mode = true;
    }
    if cli.no_history {
        settings.chat.use_history = false;
    }

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&settings, &prompt).await?;
    } else {
        app::run_chat(&settings).await?;
    }

    Ok(())
}
