//! Defines the per-channel battle session record and the balance constants.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BOSS_NAME: &str = "Weaving End";
pub const BOSS_MAX_HP: u32 = 100;
pub const PLAYERS_MAX_HP: u32 = 100;
pub const BOSS_NORMAL_DAMAGE: u32 = 10;
pub const BOSS_SPECIAL_DAMAGE: u32 = 20;
/// Every n-th boss action is a special attack.
pub const BOSS_SPECIAL_EVERY: u32 = 4;
pub const PLAYER_NORMAL_DAMAGE: u32 = 10;
pub const FLAME_DAMAGE: u32 = 30;
pub const LIGHTNING_DAMAGE: u32 = 15;
pub const SHIELD_GAIN: u32 = 2;
/// Normal attacks needed to earn one special charge.
pub const ATTACKS_PER_CHARGE: u32 = 3;
pub const VICTORY_REWARD: &str = "🎃 +50, 🍬 +25";
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A participant's id, as seen by the chat platform.
pub type ParticipantId = u64;

/// One fight in one channel. Field names double as the snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BattleSession {
    pub active: bool,
    pub boss_hp: u32,
    pub boss_max_hp: u32,
    pub players_hp: u32,
    pub players_max_hp: u32,
    pub shields: u32,
    pub players_attack_count: u32,
    pub special_charges: u32,
    pub boss_actions_count: u32,
    pub boss_skip: bool,
    /// Insertion-ordered so the MVP tie-break survives a reload.
    pub damage_by_user: IndexMap<ParticipantId, u32>,
    pub user_names: IndexMap<ParticipantId, String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("boss_hp {hp} exceeds boss_max_hp {max}")]
    BossHp { hp: u32, max: u32 },
    #[error("players_hp {hp} exceeds players_max_hp {max}")]
    PlayersHp { hp: u32, max: u32 },
    #[error("players_attack_count {0} is out of range")]
    AttackMeter(u32),
    #[error("session is active but one side is already at 0 HP")]
    ActiveAfterKnockout,
}

impl BattleSession {
    /// A fresh fight at full health on both sides.
    pub fn new() -> Self {
        Self {
            active: true,
            boss_hp: BOSS_MAX_HP,
            boss_max_hp: BOSS_MAX_HP,
            players_hp: PLAYERS_MAX_HP,
            players_max_hp: PLAYERS_MAX_HP,
            shields: 0,
            players_attack_count: 0,
            special_charges: 0,
            boss_actions_count: 0,
            boss_skip: false,
            damage_by_user: IndexMap::new(),
            user_names: IndexMap::new(),
        }
    }

    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.boss_hp > self.boss_max_hp {
            return Err(InvariantError::BossHp {
                hp: self.boss_hp,
                max: self.boss_max_hp,
            });
        }
        if self.players_hp > self.players_max_hp {
            return Err(InvariantError::PlayersHp {
                hp: self.players_hp,
                max: self.players_max_hp,
            });
        }
        if self.players_attack_count >= ATTACKS_PER_CHARGE {
            return Err(InvariantError::AttackMeter(self.players_attack_count));
        }
        if self.active && (self.boss_hp == 0 || self.players_hp == 0) {
            return Err(InvariantError::ActiveAfterKnockout);
        }
        Ok(())
    }

    /// Name last seen for a participant, falling back to the generic one.
    pub fn display_name(&self, id: ParticipantId) -> &str {
        self.user_names
            .get(&id)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PLAYER_NAME)
    }
}

impl Default for BattleSession {
    fn default() -> Self {
        Self::new()
    }
}
