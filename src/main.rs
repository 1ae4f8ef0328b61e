//! WinGo Color Prediction Bot
//!
//! Polls draw results and pushes color predictions to Telegram.

use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wingo_bot::{
    client::{ResultClient, ResultSource},
    config::Config,
    history::HistoryStore,
    notify::{MessageSink, Notifier},
    poller::Poller,
    predictor::predict,
    telegram::{CommandHandler, TelegramBot},
    types::Color,
};

#[derive(Parser)]
#[command(name = "wingo-bot")]
#[command(about = "Telegram bot that predicts the next WinGo color")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the poll loop and command listener
    Run,
    /// Fetch the latest rounds once and print them
    Fetch {
        /// Number of rounds to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Send a test message to the configured chat
    TestNotify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        // Missing secrets fail here, before anything starts
        Commands::Run => run_bot(Config::load(&cli.config)?).await,
        Commands::Fetch { limit } => show_rounds(Config::read(&cli.config)?, limit).await,
        Commands::TestNotify => test_notify(Config::load(&cli.config)?).await,
    }
}

async fn run_bot(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting WinGo prediction bot");

    let history = Arc::new(HistoryStore::new(config.poll.history_limit));
    let notifier: Arc<dyn MessageSink> = Arc::new(Notifier::new(
        config.telegram.bot_token.clone(),
        config.telegram.chat_id.clone(),
    ));
    let source: Arc<dyn ResultSource> = Arc::new(ResultClient::new(&config.source)?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Command listener
    let handler = CommandHandler::new(history.clone(), notifier.clone(), config.poll.recent_count);
    let bot = TelegramBot::new(config.telegram.bot_token.clone(), handler);
    let listener = tokio::spawn(bot.start_polling(shutdown_rx.clone()));
    tracing::info!("Telegram command listener started");

    // Poll loop
    let poller = Poller::new(
        source,
        notifier,
        history,
        Duration::from_secs(config.poll.interval_secs),
    )
    .with_recent_count(config.poll.recent_count);
    let poll_task = tokio::spawn(poller.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    let _ = shutdown_tx.send(true);

    if let Err(e) = poll_task.await {
        tracing::error!("Poll loop task failed: {}", e);
    }
    if let Err(e) = listener.await {
        tracing::error!("Command listener task failed: {}", e);
    }

    tracing::info!("Bot stopped");
    Ok(())
}

async fn show_rounds(config: Config, limit: usize) -> anyhow::Result<()> {
    let client = ResultClient::new(&config.source)?;
    let rounds = client.try_fetch().await?;

    println!("\n🎲 Latest {} rounds from {}\n", limit.min(rounds.len()), client.url());
    println!("{:<24} {:>8}", "Period", "Color");
    println!("{}", "-".repeat(33));

    for round in rounds.iter().take(limit) {
        println!("{:<24} {:>8}", round.period, round.color);
    }

    // Newest first, bounded the same way the bot bounds its history
    let colors: Vec<Color> = rounds
        .iter()
        .take(config.poll.history_limit)
        .map(|r| r.color)
        .collect();
    if let Some(latest) = rounds.first() {
        println!(
            "\nPrediction after period {}: {}",
            latest.period,
            predict(&colors).as_upper()
        );
    }

    Ok(())
}

async fn test_notify(config: Config) -> anyhow::Result<()> {
    let notifier = Notifier::new(config.telegram.bot_token, config.telegram.chat_id);

    notifier
        .notify("🧪 *Test Notification*\n\nIf you see this, Telegram integration is working!")
        .await?;

    println!("✅ Test notification sent!");
    Ok(())
}
