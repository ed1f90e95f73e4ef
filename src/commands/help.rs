//! The `help` command: a categorized list of raid commands with a detail view.

use crate::AppState;
use serenity::all::ComponentInteractionDataKind;
use serenity::builder::{
    CreateActionRow, CreateCommand, CreateCommandOption, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, EditInteractionResponse,
};
use serenity::model::application::{CommandInteraction, CommandOptionType, ComponentInteraction};
use serenity::model::channel::Message;
use serenity::prelude::*;

pub const SELECT_ID: &str = "help_select_command";

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommandCategory {
    Raid,
    Specials,
    General,
}

impl CommandCategory {
    fn name(&self) -> &'static str {
        match self {
            Self::Raid => "Raid",
            Self::Specials => "Specials",
            Self::General => "General",
        }
    }
    fn emoji(&self) -> &'static str {
        match self {
            Self::Raid => "🕷️",
            Self::Specials => "✨",
            Self::General => "🔧",
        }
    }
}

struct CommandInfo {
    name: &'static str,
    description: &'static str,
    usage: &'static [&'static str],
    details: &'static str,
    category: CommandCategory,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "start",
        description: "Summon the Spider and start a new raid.",
        usage: &["start"],
        details: "Starts a fresh battle in this channel, replacing any previous one. May be limited to the portal channel and to raid leaders.",
        category: CommandCategory::Raid,
    },
    CommandInfo {
        name: "status",
        description: "Show the current state of the raid.",
        usage: &["status"],
        details: "Shows the Spider's and the team's health, the shield count and how close the team is to its next special.",
        category: CommandCategory::Raid,
    },
    CommandInfo {
        name: "attack",
        description: "Normal attack (💥).",
        usage: &["attack", "💥"],
        details: "Deals 10 damage. Every third attack by the team charges one special.",
        category: CommandCategory::Raid,
    },
    CommandInfo {
        name: "flame",
        description: "Fire attack (🔥), costs a special.",
        usage: &["flame", "🔥"],
        details: "Deals 30 damage to the Spider.",
        category: CommandCategory::Specials,
    },
    CommandInfo {
        name: "lightning",
        description: "Lightning strike (⚡), costs a special.",
        usage: &["lightning", "⚡"],
        details: "Deals 15 damage and stuns the Spider, so it skips its next attack.",
        category: CommandCategory::Specials,
    },
    CommandInfo {
        name: "shield",
        description: "Protective shield (🛡), costs a special.",
        usage: &["shield", "🛡"],
        details: "Adds two shields. Each shield blocks one normal attack; the venomous bite every fourth turn is halved and shatters all shields.",
        category: CommandCategory::Specials,
    },
    CommandInfo {
        name: "help",
        description: "Shows this help menu.",
        usage: &["help", "help <command>"],
        details: "Displays all raid commands or detailed information about one of them.",
        category: CommandCategory::General,
    },
];

/// All documented command names; used by tests to keep help in sync with registration.
pub fn all_command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|c| c.name).collect()
}

pub fn register() -> CreateCommand {
    CreateCommand::new("help")
        .description("Shows information about the raid commands")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "command",
                "The specific command you want help with",
            )
            .required(false),
        )
}

fn create_command_select_menu() -> CreateActionRow {
    let options = COMMANDS
        .iter()
        .map(|cmd| CreateSelectMenuOption::new(cmd.name, cmd.name).description(cmd.description))
        .collect();
    let select_menu = CreateSelectMenu::new(SELECT_ID, CreateSelectMenuKind::String { options })
        .placeholder("Select a command for more details...");
    CreateActionRow::SelectMenu(select_menu)
}

/// Builds the help embed for the overview (`None`) or a single command.
pub fn create_help_embed(prefix: &str, command_name_opt: Option<&str>) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .footer(CreateEmbedFooter::new(format!("Current Prefix: {}", prefix)))
        .color(0x5865F2);

    match command_name_opt {
        Some(name) => {
            let name = name.trim_start_matches(prefix);
            if let Some(cmd) = COMMANDS.iter().find(|c| c.name == name) {
                let usage_string = cmd
                    .usage
                    .iter()
                    .map(|u| {
                        if u.is_ascii() {
                            format!("`{}{}`", prefix, u)
                        } else {
                            format!("`{}`", u)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                embed = embed
                    .title(format!("{} Command: {}", cmd.category.emoji(), cmd.name))
                    .field("Description", cmd.description, false)
                    .field("Usage", usage_string, false)
                    .field("Details", cmd.details, false);
            } else {
                embed = embed
                    .title("Command Not Found")
                    .description(format!("Sorry, I don't know a command called `{}`.", name))
                    .color(0xFF0000);
            }
        }
        None => {
            embed = embed.title("Help Menu").description(format!(
                "Fight the Spider together. For details use `{}help <command>` or pick one below.",
                prefix
            ));
            for category in [
                CommandCategory::Raid,
                CommandCategory::Specials,
                CommandCategory::General,
            ] {
                let command_list = get_commands_in_category(category);
                if !command_list.is_empty() {
                    embed = embed.field(
                        format!("{} {}", category.emoji(), category.name()),
                        command_list,
                        false,
                    );
                }
            }
            embed = embed.field(
                "Special energy",
                "Three team attacks charge one special. Specials are shared by the whole team.",
                false,
            );
        }
    }
    embed
}

fn get_commands_in_category(category: CommandCategory) -> String {
    COMMANDS
        .iter()
        .filter(|c| c.category == category)
        .map(|c| format!("`{}`", c.name))
        .collect::<Vec<_>>()
        .join(" ")
}

async fn current_prefix(ctx: &Context) -> String {
    AppState::from_ctx(ctx)
        .await
        .map(|s| s.config.prefix.clone())
        .unwrap_or_else(|| crate::config::DEFAULT_PREFIX.to_string())
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    let command_name = interaction
        .data
        .options
        .first()
        .and_then(|opt| opt.value.as_str());
    let embed = create_help_embed(&current_prefix(ctx).await, command_name);
    let mut builder = CreateInteractionResponseMessage::new().embed(embed);
    if command_name.is_none() {
        builder = builder.components(vec![create_command_select_menu()]);
    }
    let response = CreateInteractionResponse::Message(builder);
    interaction.create_response(&ctx.http, response).await.ok();
}

pub async fn handle_interaction(ctx: &Context, interaction: &ComponentInteraction) {
    let ComponentInteractionDataKind::StringSelect { values } = &interaction.data.kind else {
        return;
    };
    let Some(selected_command) = values.first() else {
        return;
    };
    let embed = create_help_embed(&current_prefix(ctx).await, Some(selected_command.as_str()));
    interaction.defer(&ctx.http).await.ok();
    let builder = EditInteractionResponse::new()
        .embed(embed)
        .components(vec![]);
    interaction.edit_response(&ctx.http, builder).await.ok();
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let command_name = args.first().copied();
    let embed = create_help_embed(&current_prefix(ctx).await, command_name);
    let mut builder = CreateMessage::new().embed(embed).reference_message(msg);
    if command_name.is_none() {
        builder = builder.components(vec![create_command_select_menu()]);
    }
    msg.channel_id.send_message(&ctx.http, builder).await.ok();
}
