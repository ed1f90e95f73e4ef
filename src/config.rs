//! Runtime configuration, read from the environment (and an optional `.env` file).

use serenity::model::id::{ChannelId, GuildId, UserId};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_STATE_FILE: &str = "game_state.json";
pub const DEFAULT_INTRO_IMAGE: &str = "intro.jpg";
pub const DEFAULT_PREFIX: &str = "/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
    #[error("{var} must be a non-zero number, got `{value}`")]
    InvalidId { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// When set, battles can only be started in this channel.
    pub portal_channel: Option<ChannelId>,
    /// When set, slash commands are registered to this guild instead of globally.
    pub guild_id: Option<GuildId>,
    /// Users allowed to start battles. Empty means everyone.
    pub owner_ids: Vec<UserId>,
    pub state_file: PathBuf,
    pub intro_image: PathBuf,
    pub prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = var("DISCORD_TOKEN").ok_or(ConfigError::MissingToken)?;
        let portal_channel = var("PORTAL_CHANNEL_ID")
            .map(|v| parse_id("PORTAL_CHANNEL_ID", &v).map(ChannelId::new))
            .transpose()?;
        let guild_id = var("GUILD_ID")
            .map(|v| parse_id("GUILD_ID", &v).map(GuildId::new))
            .transpose()?;
        let owner_ids = var("OWNER_IDS")
            .map(|v| parse_owner_ids(&v))
            .unwrap_or_default();

        Ok(Self {
            token,
            portal_channel,
            guild_id,
            owner_ids,
            state_file: var("STATE_FILE")
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string())
                .into(),
            intro_image: var("INTRO_IMAGE_PATH")
                .unwrap_or_else(|| DEFAULT_INTRO_IMAGE.to_string())
                .into(),
            prefix: var("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        })
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.is_empty() || self.owner_ids.contains(&user_id)
    }

    pub fn in_portal(&self, channel_id: ChannelId) -> bool {
        self.portal_channel.is_none_or(|portal| portal == channel_id)
    }
}

fn parse_id(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ConfigError::InvalidId {
            var,
            value: value.to_string(),
        }),
    }
}

/// Parses a comma-separated id list, skipping blanks and anything non-numeric.
pub fn parse_owner_ids(raw: &str) -> Vec<UserId> {
    raw.split(',')
        .map(str::trim)
        .filter_map(|part| part.parse::<u64>().ok())
        .filter(|&id| id != 0)
        .map(UserId::new)
        .collect()
}
