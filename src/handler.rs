use crate::commands;
use crate::commands::raid::RaidCommand;
use crate::raid::ui;
use crate::AppState;
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::application::{Command as SlashCommand, Interaction};
use serenity::model::{channel::Message, gateway::Ready, id::GuildId};
use serenity::prelude::EventHandler;
use std::str::FromStr;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Raid(RaidCommand),
    Help,
    Unknown,
}

impl FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "help" | "h" => Ok(Command::Help),
            other => Ok(RaidCommand::from_name(other)
                .map(Command::Raid)
                .unwrap_or(Command::Unknown)),
        }
    }
}

/// Splits a text message into a command and its arguments.
/// A lone action emoji counts as that action, prefix or not.
pub fn parse_message<'a>(prefix: &str, content: &'a str) -> Option<(Command, Vec<&'a str>)> {
    let content = content.trim();
    if let Some(raid) = RaidCommand::from_emoji(content) {
        return Some((Command::Raid(raid), vec![]));
    }
    let body = content.strip_prefix(prefix)?;
    let mut args = body.split_whitespace();
    let command = Command::from_str(args.next()?).unwrap_or(Command::Unknown);
    Some((command, args.collect()))
}

pub struct Handler {
    /// Guild to register slash commands in; `None` registers them globally.
    pub guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match &interaction {
            Interaction::Command(command) => match command.data.name.as_str() {
                "help" => commands::help::run_slash(&ctx, command).await,
                name => {
                    if let Some(raid) = RaidCommand::from_name(name) {
                        commands::raid::run::run_slash(&ctx, command, raid).await;
                    }
                }
            },
            Interaction::Component(component) => {
                let cid = component.data.custom_id.as_str();
                if cid == commands::help::SELECT_ID {
                    commands::help::handle_interaction(&ctx, component).await;
                } else if let Some(action) = ui::parse_button_id(cid) {
                    commands::raid::run::run_component(&ctx, component, action).await;
                }
            }
            _ => {}
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(app_state) = AppState::from_ctx(&ctx).await else {
            return;
        };
        let Some((command, args)) = parse_message(&app_state.config.prefix, &msg.content) else {
            return;
        };
        match command {
            Command::Raid(raid) => commands::raid::run::run_prefix(&ctx, &msg, raid).await,
            Command::Help => commands::help::run_prefix(&ctx, &msg, args).await,
            Command::Unknown => {}
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(target: "handler", user = %ready.user.name, "connected and ready");
        let mut commands_to_register = commands::raid::run::register();
        commands_to_register.push(commands::help::register());
        let result = match self.guild_id {
            Some(guild_id) => guild_id.set_commands(&ctx.http, commands_to_register).await,
            None => SlashCommand::set_global_commands(&ctx.http, commands_to_register).await,
        };
        match result {
            Ok(registered) => {
                info!(target: "handler", count = registered.len(), "registered slash commands")
            }
            Err(e) => error!(target: "handler", error = ?e, "error registering slash commands"),
        }
    }
}
