use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};
use tokio::time::sleep;

use quizdesk::cli::{Cli, Commands};
use quizdesk::core::{config, init_logger, log_store_configuration};
use quizdesk::store::{
    BlobStore, DocumentStore, FirebaseBlobGateway, FirestoreGateway, MemoryBlobStore, MemoryStore,
};
use quizdesk::telegram::state::State;
use quizdesk::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments, loads the environment and runs the bot.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, bot
/// creation) — that is the only condition under which the process exits
/// with a failure.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // Log panics from inside the dispatcher instead of dying silently
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot in normal mode (webhook: {})", webhook);
            run_bot(webhook).await
        }
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(false).await
        }
    }
}

/// Run the Telegram bot
async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");
    log_store_configuration();

    // Fatal configuration checks: missing credentials abort startup, there
    // is no partial service.
    if config::BOT_TOKEN.is_empty() {
        anyhow::bail!("BOT_TOKEN (or TELOXIDE_TOKEN) environment variable is not set");
    }
    if config::STORE_BACKEND.as_str() != "memory" && config::firebase::PROJECT_ID.is_empty() {
        anyhow::bail!("FIREBASE_PROJECT_ID must be set for the firestore backend");
    }

    let bot = create_bot()?;

    // Retry if the Bot API is still coming up behind us
    let bot_info = {
        let mut attempt = 0;
        loop {
            match bot.get_me().await {
                Ok(info) => break info,
                Err(e) => {
                    attempt += 1;
                    if attempt >= config::retry::MAX_STARTUP_RETRIES {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} attempts: {}",
                            attempt,
                            e
                        ));
                    }
                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying...",
                        attempt,
                        config::retry::MAX_STARTUP_RETRIES,
                        e
                    );
                    sleep(config::retry::startup_delay()).await;
                }
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username, bot_info.id);

    setup_bot_commands(&bot).await?;

    // Store gateways share one HTTP client
    let http = reqwest::Client::builder().timeout(config::network::timeout()).build()?;
    let (store, blobs): (Arc<dyn DocumentStore>, Arc<dyn BlobStore>) = match config::STORE_BACKEND.as_str() {
        "memory" => (Arc::new(MemoryStore::new()), Arc::new(MemoryBlobStore::new())),
        _ => (
            Arc::new(FirestoreGateway::from_config(http.clone())),
            Arc::new(FirebaseBlobGateway::from_config(http)),
        ),
    };
    let deps = HandlerDeps::new(store, blobs);

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![InMemStorage::<State>::new(), deps])
        .enable_ctrlc_handler()
        .build();

    if use_webhook {
        let url = config::WEBHOOK_URL
            .clone()
            .ok_or_else(|| anyhow::anyhow!("WEBHOOK_URL must be set for webhook mode"))?;
        let addr = ([0, 0, 0, 0], *config::PORT).into();
        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url.parse()?)).await?;
        log::info!("Starting bot in webhook mode on port {}", *config::PORT);
        log::info!("📡 Ready to receive updates!");
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        log::info!("Starting bot in long polling mode");
        log::info!("📡 Ready to receive updates!");
        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    Ok(())
}
