//! HappySmile Assistant Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Update};
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use HappySmile::{
    build_registry,
    config::Settings,
    services::{transport, ServiceFactory, TelegramTransport},
    state::{ConversationDispatcher, SessionReporter, SessionStore},
    utils::errors::{ErrorSeverity, HappySmileError},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", HappySmile::info());

    // Flow composition errors are fatal
    let registry = Arc::new(build_registry()?);

    let bot = Bot::new(&settings.bot.token);
    bot.set_my_commands(BotCommands::bot_commands()).await?;

    info!("Initializing services...");
    let store = SessionStore::new();
    let _reporter = SessionReporter::start(
        store.clone(),
        Duration::from_secs(settings.session.stats_interval_seconds),
    );
    let services = Arc::new(ServiceFactory::new(settings.clone())?);
    let conversations = Arc::new(ConversationDispatcher::new(
        registry,
        store,
        Arc::new(TelegramTransport::new(bot.clone())),
        services,
    ));

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![conversations])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("HappySmile bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_messages))
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "HappySmile Bot Commands")]
enum BotCommands {
    #[command(description = "Start talking to the bot.")]
    Start,
    #[command(description = "Terminates interactions with the bot.")]
    Stop,
}

/// Handle text messages, commands included
async fn handle_messages(msg: Message, conversations: Arc<ConversationDispatcher>) -> HandlerResult {
    let Some(event) = transport::event_from_message(&msg) else {
        return Ok(());
    };

    match conversations.dispatch(event).await {
        Ok(_) => Ok(()),
        Err(e) => report_dispatch_error(msg.chat.id.0, e),
    }
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: CallbackQuery,
    conversations: Arc<ConversationDispatcher>,
) -> HandlerResult {
    // Stop the client's loading indicator whether or not a flow accepts the tap
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let Some(event) = transport::event_from_callback(&query) else {
        return Ok(());
    };

    let chat_id = event.chat_id;
    match conversations.dispatch(event).await {
        Ok(_) => Ok(()),
        Err(e) => report_dispatch_error(chat_id, e),
    }
}

/// Log a failed turn; only unrecoverable errors reach the dispatcher's error handler
fn report_dispatch_error(chat_id: i64, e: HappySmileError) -> HandlerResult {
    match e.severity() {
        ErrorSeverity::Info => info!(chat_id, error = %e, "Turn rejected"),
        ErrorSeverity::Warning => warn!(chat_id, error = %e, "Turn failed"),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(chat_id, error = %e, "Turn failed"),
    }

    if e.is_recoverable() {
        Ok(())
    } else {
        Err(e.into())
    }
}
