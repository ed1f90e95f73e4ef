use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use spider_raid_bot::config::Config;
use spider_raid_bot::handler::Handler;
use spider_raid_bot::raid::SessionStore;
use spider_raid_bot::AppState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is fine; the variables may come from the real environment.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let store = SessionStore::load(&config.state_file);
    let guild_id = config.guild_id;
    let token = config.token.clone();
    let app_state = Arc::new(AppState::new(config, store));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = match Client::builder(&token, intents)
        .event_handler(Handler { guild_id })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = ?e, "error creating the Discord client");
            std::process::exit(1);
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<AppState>(app_state);
    }

    info!("bot started, ready for the raid");
    if let Err(why) = client.start().await {
        error!(error = ?why, "client error");
    }
}
