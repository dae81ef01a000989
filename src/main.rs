use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dish_picker::bot::{schema, BotRouter, Command};
use dish_picker::catalog::Catalog;
use dish_picker::config::{BotConfig, LogFormat};
use dish_picker::localization::init_localization;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Dish Picker Telegram Bot");

    init_localization().context("Failed to load translations")?;

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;

    let bot = Bot::new(config.token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let router: Arc<BotRouter> = Arc::new(BotRouter::new(
        bot.clone(),
        Arc::new(catalog),
        config.lifecycle,
    ));

    info!(
        history_capacity = config.lifecycle.history_capacity,
        delete_chunk_size = config.lifecycle.delete_chunk_size,
        "Bot initialized, starting dispatcher"
    );

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
