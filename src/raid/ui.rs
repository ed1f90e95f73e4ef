//! Handles rendering raid events and status into chat text and buttons.

use super::logic::{Action, Meter, StatusReport, TurnError, TurnEvent, Vitals};
use super::state::{ATTACKS_PER_CHARGE, BOSS_NAME, BattleSession};
use serenity::builder::{CreateActionRow, CreateButton};
use serenity::model::application::ButtonStyle;

pub const BUTTON_PREFIX: &str = "raid_";

pub fn intro_text() -> String {
    format!(
        "🕷️ A giant Spider called *{BOSS_NAME}* crawls out of the cave!\n\
         It threatens to destroy everything around. Band together to bring it down!\n\n\
         ⚔️ Commands:\n\
         💥 /attack – normal attack\n\
         🔥 /flame – fire attack (special)\n\
         ⚡ /lightning – lightning strike (special)\n\
         🛡 /shield – protective shield (special)\n\n\
         ℹ️ Land {ATTACKS_PER_CHARGE} normal attacks as a team to unlock a special.\n\
         The team shares its health and shields. Good luck!"
    )
}

pub fn error_text(err: TurnError) -> &'static str {
    match err {
        TurnError::NoActiveBattle => {
            "There is no battle in progress. Use /start to summon the boss!"
        }
        TurnError::SpecialNotReady => "The special attack is not ready yet!",
    }
}

fn vitals_line(v: &Vitals) -> String {
    format!(
        "❤️ Spider: {}/{} | ❤️ Team: {}/{} | 🛡 Shields: {}",
        v.boss_hp, v.boss_max_hp, v.players_hp, v.players_max_hp, v.shields
    )
}

/// Renders a resolved turn as one message, one line per event.
pub fn render_turn(events: &[TurnEvent]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(events.len() + 2);
    for event in events {
        match event {
            TurnEvent::Strike {
                action,
                actor,
                damage,
            } => lines.push(match action {
                Action::Flame => {
                    format!("🔥 **{actor}** unleashes flame and deals {damage} damage to the Spider!")
                }
                Action::Lightning => {
                    format!("⚡ **{actor}** strikes with lightning: {damage} damage and a stun!")
                }
                _ => format!("💥 **{actor}** attacks the Spider, dealing {damage} damage."),
            }),
            TurnEvent::ShieldRaised {
                actor,
                gained,
                total,
            } => lines.push(format!(
                "🛡 **{actor}** summons a shield! Shields +{gained} (total: {total})."
            )),
            TurnEvent::SpecialUnlocked => lines.push(
                "✨ Special energy charged! /flame, /lightning or /shield are available.".into(),
            ),
            TurnEvent::BossStunned => {
                lines.push("😵 The Spider is stunned and skips its attack!".into())
            }
            TurnEvent::BossAttack {
                damage,
                blocked,
                shields_left,
            } => {
                let mut line = String::from("🕷️ The Spider attacks the team.");
                if *blocked {
                    line.push_str(" A shield blocks the blow!");
                    if *shields_left > 0 {
                        line.push_str(&format!(" (Shields left: {shields_left})"));
                    } else {
                        line.push_str(" (No shields left)");
                    }
                } else {
                    line.push_str(&format!(" The team takes {damage} damage."));
                }
                lines.push(line);
            }
            TurnEvent::BossSpecial {
                damage,
                shields_broken,
            } => {
                let mut line = String::from("🕷️ The Spider uses its **venomous bite**!");
                if *shields_broken {
                    line.push_str(&format!(
                        " The shields absorb part of it ({damage} damage) but shatter!"
                    ));
                } else {
                    line.push_str(&format!(" The team takes {damage} damage."));
                }
                lines.push(line);
            }
            TurnEvent::Victory { mvp, reward } => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(" The Spider is defeated!");
                }
                lines.push(format!("🏆 **Victory!** Reward: {reward}."));
                if let Some(mvp) = mvp {
                    lines.push(format!(
                        "⭐ Most damage dealt by **{}** with {}.",
                        mvp.name, mvp.damage
                    ));
                }
            }
            TurnEvent::Defeat => lines.push(
                "❌ The team has fallen... the Spider wins. Use /start for a rematch.".into(),
            ),
            TurnEvent::Status(v) => lines.push(vitals_line(v)),
        }
    }
    lines.join("\n")
}

pub fn render_status(report: &StatusReport) -> String {
    let v = &report.vitals;
    let meter = match report.meter {
        Meter::Ready(n) => format!("✨ Specials ready: {n}"),
        Meter::Charging { progress, needed } => {
            format!("⚔️ Special energy: {progress}/{needed}")
        }
    };
    [
        format!("❤️ Spider HP: {}/{}", v.boss_hp, v.boss_max_hp),
        format!("❤️ Team HP: {}/{}", v.players_hp, v.players_max_hp),
        format!("🛡 Shields: {}", v.shields),
        meter,
    ]
    .join("\n")
}

/// Action buttons for a running fight. Finished fights get none.
pub fn action_buttons(session: &BattleSession) -> Vec<CreateActionRow> {
    if !session.active {
        return vec![];
    }
    let no_charge = session.special_charges == 0;
    let buttons = Action::ALL
        .into_iter()
        .map(|action| {
            let style = if action.is_special() {
                ButtonStyle::Success
            } else {
                ButtonStyle::Danger
            };
            CreateButton::new(button_id(action))
                .label(capitalize(action.name()))
                .emoji(action.emoji())
                .style(style)
                .disabled(action.is_special() && no_charge)
        })
        .collect();
    vec![CreateActionRow::Buttons(buttons)]
}

pub fn button_id(action: Action) -> String {
    format!("{BUTTON_PREFIX}{}", action.name())
}

pub fn parse_button_id(custom_id: &str) -> Option<Action> {
    custom_id
        .strip_prefix(BUTTON_PREFIX)
        .and_then(Action::from_name)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
