//! Executes raid commands against the session store and builds the reply.
//! Nothing here talks to Discord, so the whole flow can be driven from tests.

use crate::AppState;
use crate::config::Config;
use crate::raid::logic::{self, Action, Actor, TurnError};
use crate::raid::{BattleSession, SessionStore, ui};
use serenity::builder::CreateActionRow;
use serenity::model::id::{ChannelId, UserId};
use serenity::model::user::User;
use thiserror::Error;
use tracing::{debug, error, info};

/// Rejections raised by the command layer before the engine is involved.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("This command is only available in the portal channel.")]
    NotPortalChannel,
    #[error("Only raid leaders can start a battle.")]
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidCommand {
    Start,
    Status,
    Act(Action),
}

impl RaidCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "status" => Some(Self::Status),
            other => Action::from_name(other).map(Self::Act),
        }
    }

    pub fn from_emoji(text: &str) -> Option<Self> {
        Action::from_emoji(text).map(Self::Act)
    }
}

/// Who sent a command, and where.
#[derive(Debug, Clone)]
pub struct Invoker {
    pub channel_id: ChannelId,
    pub user_id: UserId,
    pub display_name: String,
}

impl Invoker {
    pub fn new(channel_id: ChannelId, user: &User) -> Self {
        Self {
            channel_id,
            user_id: user.id,
            display_name: user.display_name().to_string(),
        }
    }

    fn actor(&self) -> Actor {
        Actor::new(self.user_id.get(), self.display_name.clone())
    }
}

/// A rendered response, independent of how it will be delivered.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub text: String,
    pub components: Vec<CreateActionRow>,
    /// Attach the intro image, if it can be read.
    pub attach_intro: bool,
    /// Only the invoker needs to see this (rejections).
    pub ephemeral: bool,
}

impl Reply {
    fn notice(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
            ..Default::default()
        }
    }

    fn public(text: String, components: Vec<CreateActionRow>) -> Self {
        Self {
            text,
            components,
            ..Default::default()
        }
    }
}

pub async fn execute(app_state: &AppState, invoker: &Invoker, command: RaidCommand) -> Reply {
    let chat_id = invoker.channel_id.get();
    match command {
        RaidCommand::Start => {
            if let Err(e) = check_can_start(&app_state.config, invoker) {
                return Reply::notice(e.to_string());
            }
            let session = BattleSession::new();
            let components = ui::action_buttons(&session);
            let mut store = app_state.sessions.write().await;
            store.put(chat_id, session);
            flush_logged(&store);
            info!(target: "raid.turn", chat_id, user_id = invoker.user_id.get(), "battle started");
            Reply {
                text: ui::intro_text(),
                components,
                attach_intro: true,
                ephemeral: false,
            }
        }
        RaidCommand::Status => {
            let store = app_state.sessions.read().await;
            match logic::status(store.get(chat_id)) {
                Ok(report) => {
                    let components = store
                        .get(chat_id)
                        .map(ui::action_buttons)
                        .unwrap_or_default();
                    Reply::public(ui::render_status(&report), components)
                }
                Err(e) => Reply::notice(ui::error_text(e)),
            }
        }
        RaidCommand::Act(action) => {
            let mut store = app_state.sessions.write().await;
            let Some(session) = store.get_mut(chat_id) else {
                return Reply::notice(ui::error_text(TurnError::NoActiveBattle));
            };
            match logic::apply_action(session, action, &invoker.actor()) {
                Ok(events) => {
                    debug!(
                        target: "raid.turn",
                        chat_id,
                        action = action.name(),
                        boss_hp = session.boss_hp,
                        players_hp = session.players_hp,
                        active = session.active,
                        "turn resolved"
                    );
                    let reply = Reply::public(ui::render_turn(&events), ui::action_buttons(session));
                    flush_logged(&store);
                    reply
                }
                Err(e) => Reply::notice(ui::error_text(e)),
            }
        }
    }
}

pub fn check_can_start(config: &Config, invoker: &Invoker) -> Result<(), CommandError> {
    if !config.in_portal(invoker.channel_id) {
        return Err(CommandError::NotPortalChannel);
    }
    if !config.is_owner(invoker.user_id) {
        return Err(CommandError::NotOwner);
    }
    Ok(())
}

fn flush_logged(store: &SessionStore) {
    if let Err(e) = store.flush() {
        error!(
            target: "raid.store",
            path = %store.path().display(),
            error = %e,
            "failed to save battle state"
        );
    }
}
