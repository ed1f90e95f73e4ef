//! Drives the raid commands end to end, without Discord, against a temp snapshot.
use serenity::model::id::{ChannelId, UserId};
use spider_raid_bot::AppState;
use spider_raid_bot::commands::raid::{Invoker, RaidCommand, execute};
use spider_raid_bot::config::Config;
use spider_raid_bot::handler::{Command, parse_message};
use spider_raid_bot::raid::logic::{Action, TurnError};
use spider_raid_bot::raid::store::SessionStore;
use spider_raid_bot::raid::ui;
use std::path::Path;

const PORTAL: u64 = 500;

fn app(dir: &Path, extra: &[(&str, &str)]) -> AppState {
    let state_file = dir.join("state.json");
    let state_file = state_file.to_string_lossy().into_owned();
    let config = Config::from_lookup(|key| match key {
        "DISCORD_TOKEN" => Some("token".into()),
        "STATE_FILE" => Some(state_file.clone()),
        _ => extra
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string()),
    })
    .unwrap();
    let store = SessionStore::load(&config.state_file);
    AppState::new(config, store)
}

fn invoker(channel: u64, user: u64, name: &str) -> Invoker {
    Invoker {
        channel_id: ChannelId::new(channel),
        user_id: UserId::new(user),
        display_name: name.to_string(),
    }
}

#[tokio::test]
async fn start_then_attack_persists_each_turn() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), &[]);
    let ann = invoker(PORTAL, 1, "Ann");

    let reply = execute(&app, &ann, RaidCommand::Start).await;
    assert!(reply.attach_intro);
    assert!(!reply.ephemeral);
    assert!(reply.text.contains("Weaving End"));
    assert!(!reply.components.is_empty());

    let reply = execute(&app, &ann, RaidCommand::Act(Action::Attack)).await;
    assert!(reply.text.contains("**Ann** attacks the Spider"));
    assert!(reply.text.contains("❤️ Spider: 90/100"));

    let reloaded = SessionStore::load(dir.path().join("state.json"));
    let session = reloaded.get(PORTAL).unwrap();
    assert_eq!(session.boss_hp, 90);
    assert_eq!(session.players_hp, 90);
}

#[tokio::test]
async fn actions_without_a_battle_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), &[]);
    let bo = invoker(9, 2, "Bo");

    let reply = execute(&app, &bo, RaidCommand::Act(Action::Attack)).await;
    assert!(reply.ephemeral);
    assert_eq!(reply.text, ui::error_text(TurnError::NoActiveBattle));

    let reply = execute(&app, &bo, RaidCommand::Status).await;
    assert_eq!(reply.text, ui::error_text(TurnError::NoActiveBattle));
    assert!(!dir.path().join("state.json").exists());
}

#[tokio::test]
async fn special_needs_a_charge() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), &[]);
    let bo = invoker(9, 2, "Bo");
    execute(&app, &bo, RaidCommand::Start).await;

    let reply = execute(&app, &bo, RaidCommand::Act(Action::Flame)).await;
    assert!(reply.ephemeral);
    assert_eq!(reply.text, ui::error_text(TurnError::SpecialNotReady));
    assert_eq!(app.sessions.read().await.get(9).unwrap().boss_hp, 100);
}

#[tokio::test]
async fn status_shows_vitals_and_meter() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), &[]);
    let bo = invoker(9, 2, "Bo");
    execute(&app, &bo, RaidCommand::Start).await;
    execute(&app, &bo, RaidCommand::Act(Action::Attack)).await;

    let reply = execute(&app, &bo, RaidCommand::Status).await;
    assert!(!reply.ephemeral);
    assert!(reply.text.contains("Spider HP: 90/100"));
    assert!(reply.text.contains("Team HP: 90/100"));
    assert!(reply.text.contains("Special energy: 1/3"));
}

#[tokio::test]
async fn start_respects_portal_and_owner_list() {
    let dir = tempfile::tempdir().unwrap();
    let portal = PORTAL.to_string();
    let app = app(
        dir.path(),
        &[("PORTAL_CHANNEL_ID", portal.as_str()), ("OWNER_IDS", "1")],
    );

    let reply = execute(&app, &invoker(PORTAL + 1, 1, "Ann"), RaidCommand::Start).await;
    assert!(reply.ephemeral);
    assert!(reply.text.contains("portal"));

    let reply = execute(&app, &invoker(PORTAL, 2, "Bo"), RaidCommand::Start).await;
    assert!(reply.ephemeral);
    assert!(app.sessions.read().await.is_empty());

    let reply = execute(&app, &invoker(PORTAL, 1, "Ann"), RaidCommand::Start).await;
    assert!(!reply.ephemeral);
    // Anyone may fight once the leader has started the raid.
    let reply = execute(&app, &invoker(PORTAL, 2, "Bo"), RaidCommand::Act(Action::Attack)).await;
    assert!(!reply.ephemeral);
}

#[tokio::test]
async fn finished_fight_has_no_buttons_and_names_the_mvp() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), &[]);
    execute(&app, &invoker(3, 1, "Ann"), RaidCommand::Start).await;
    {
        let mut store = app.sessions.write().await;
        let session = store.get_mut(3).unwrap();
        session.boss_hp = 10;
        session.damage_by_user.insert(2, 60);
        session.user_names.insert(2, "Bo".into());
    }

    let reply = execute(&app, &invoker(3, 1, "Ann"), RaidCommand::Act(Action::Attack)).await;
    assert!(reply.components.is_empty());
    assert!(reply.text.contains("The Spider is defeated!"));
    assert!(reply.text.contains("**Bo** with 60"));

    let reply = execute(&app, &invoker(3, 1, "Ann"), RaidCommand::Act(Action::Attack)).await;
    assert_eq!(reply.text, ui::error_text(TurnError::NoActiveBattle));
}

#[test]
fn text_and_emoji_messages_map_to_commands() {
    assert_eq!(
        parse_message("/", "/attack"),
        Some((Command::Raid(RaidCommand::Act(Action::Attack)), vec![]))
    );
    assert_eq!(
        parse_message("/", "⚡"),
        Some((Command::Raid(RaidCommand::Act(Action::Lightning)), vec![]))
    );
    assert_eq!(
        parse_message("!", "!START"),
        Some((Command::Raid(RaidCommand::Start), vec![]))
    );
    assert_eq!(
        parse_message("/", "/help flame"),
        Some((Command::Help, vec!["flame"]))
    );
    assert_eq!(parse_message("/", "/dance"), Some((Command::Unknown, vec![])));
    assert_eq!(parse_message("/", "attack"), None);
    assert_eq!(parse_message("/", "🔥 now"), None);
}

#[test]
fn buttons_round_trip_through_custom_ids() {
    for action in Action::ALL {
        assert_eq!(ui::parse_button_id(&ui::button_id(action)), Some(action));
    }
    assert_eq!(ui::parse_button_id("help_select_command"), None);
}
