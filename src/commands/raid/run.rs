//! Implements the Discord side of the raid commands: registration and delivery.

use super::logic::{Invoker, RaidCommand, Reply, execute};
use crate::AppState;
use crate::raid::Action;
use serenity::builder::{
    CreateAttachment, CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage,
};
use serenity::model::application::{CommandInteraction, ComponentInteraction};
use serenity::model::channel::Message;
use serenity::prelude::*;
use std::path::Path;
use tracing::warn;

pub fn register() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("start").description("Summon the Spider and start a new raid."),
        CreateCommand::new("status").description("Show the current state of the raid."),
        CreateCommand::new("attack").description("Normal attack. Three of them charge a special."),
        CreateCommand::new("flame").description("Special: scorch the Spider for heavy damage."),
        CreateCommand::new("lightning").description("Special: damage and stun the Spider for a turn."),
        CreateCommand::new("shield").description("Special: raise two shields for the team."),
    ]
}

/// Loads the intro image. A missing or unreadable file degrades to a text-only reply.
async fn intro_attachment(path: &Path) -> Option<CreateAttachment> {
    match CreateAttachment::path(path).await {
        Ok(file) => Some(file),
        Err(e) => {
            warn!(target: "raid.reply", path = %path.display(), error = ?e, "intro image unavailable, sending text only");
            None
        }
    }
}

async fn interaction_message(app_state: &AppState, reply: Reply) -> CreateInteractionResponseMessage {
    let mut message = CreateInteractionResponseMessage::new()
        .content(reply.text)
        .components(reply.components)
        .ephemeral(reply.ephemeral);
    if reply.attach_intro
        && let Some(file) = intro_attachment(&app_state.config.intro_image).await
    {
        message = message.add_file(file);
    }
    message
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction, command: RaidCommand) {
    let Some(app_state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let invoker = Invoker::new(interaction.channel_id, &interaction.user);
    let reply = execute(&app_state, &invoker, command).await;
    let message = interaction_message(&app_state, reply).await;
    if let Err(e) = interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        warn!(target: "raid.reply", error = ?e, "failed to answer slash command");
    }
}

/// Handles a press on one of the action buttons under a battle message.
pub async fn run_component(ctx: &Context, component: &ComponentInteraction, action: Action) {
    let Some(app_state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let invoker = Invoker::new(component.channel_id, &component.user);
    let reply = execute(&app_state, &invoker, RaidCommand::Act(action)).await;
    let message = interaction_message(&app_state, reply).await;
    if let Err(e) = component
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        warn!(target: "raid.reply", cid = %component.data.custom_id, error = ?e, "failed to answer button press");
    }
}

pub async fn run_prefix(ctx: &Context, msg: &Message, command: RaidCommand) {
    let Some(app_state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let invoker = Invoker::new(msg.channel_id, &msg.author);
    let reply = execute(&app_state, &invoker, command).await;
    let mut builder = CreateMessage::new()
        .content(reply.text)
        .components(reply.components)
        .reference_message(msg);
    if reply.attach_intro
        && let Some(file) = intro_attachment(&app_state.config.intro_image).await
    {
        builder = builder.add_file(file);
    }
    if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
        warn!(target: "raid.reply", channel_id = msg.channel_id.get(), error = ?e, "failed to send raid message");
    }
}
