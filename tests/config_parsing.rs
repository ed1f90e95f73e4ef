use serenity::model::id::{ChannelId, UserId};
use spider_raid_bot::config::{Config, ConfigError, DEFAULT_PREFIX, parse_owner_ids};
use std::collections::HashMap;
use std::path::Path;

fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn token_is_required() {
    assert_eq!(config_from(&[]).unwrap_err(), ConfigError::MissingToken);
    assert_eq!(
        config_from(&[("DISCORD_TOKEN", "   ")]).unwrap_err(),
        ConfigError::MissingToken
    );
}

#[test]
fn defaults_apply_when_optional_values_are_absent() {
    let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
    assert_eq!(config.token, "abc");
    assert_eq!(config.portal_channel, None);
    assert_eq!(config.guild_id, None);
    assert!(config.owner_ids.is_empty());
    assert_eq!(config.state_file, Path::new("game_state.json"));
    assert_eq!(config.intro_image, Path::new("intro.jpg"));
    assert_eq!(config.prefix, DEFAULT_PREFIX);
    // Nobody is restricted without a portal or owner list.
    assert!(config.is_owner(UserId::new(5)));
    assert!(config.in_portal(ChannelId::new(77)));
}

#[test]
fn portal_and_owners_restrict_access() {
    let config = config_from(&[
        ("DISCORD_TOKEN", "abc"),
        ("PORTAL_CHANNEL_ID", "1001"),
        ("OWNER_IDS", "11, 22"),
        ("STATE_FILE", "/var/lib/raid/state.json"),
    ])
    .unwrap();
    assert!(config.in_portal(ChannelId::new(1001)));
    assert!(!config.in_portal(ChannelId::new(1002)));
    assert!(config.is_owner(UserId::new(22)));
    assert!(!config.is_owner(UserId::new(33)));
    assert_eq!(config.state_file, Path::new("/var/lib/raid/state.json"));
}

#[test]
fn malformed_ids_are_startup_errors() {
    let err = config_from(&[("DISCORD_TOKEN", "abc"), ("PORTAL_CHANNEL_ID", "lobby")]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidId {
            var: "PORTAL_CHANNEL_ID",
            value: "lobby".into()
        }
    );
    assert!(config_from(&[("DISCORD_TOKEN", "abc"), ("GUILD_ID", "0")]).is_err());
}

#[test]
fn owner_list_skips_junk_entries() {
    assert_eq!(
        parse_owner_ids(" 1, ,x, 2,0,"),
        vec![UserId::new(1), UserId::new(2)]
    );
    assert!(parse_owner_ids("").is_empty());
}
