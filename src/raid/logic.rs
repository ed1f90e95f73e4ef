//! Contains the core, stateful logic for resolving raid turns.
//!
//! Everything here is pure with respect to the outside world: a session goes in,
//! the same session comes out mutated, together with a list of `TurnEvent`s that
//! `ui` turns into chat text.

use super::state::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Attack,
    Flame,
    Lightning,
    Shield,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Attack,
        Action::Flame,
        Action::Lightning,
        Action::Shield,
    ];

    /// Flame, lightning and shield each spend one special charge.
    pub fn is_special(self) -> bool {
        !matches!(self, Action::Attack)
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Attack => "attack",
            Action::Flame => "flame",
            Action::Lightning => "lightning",
            Action::Shield => "shield",
        }
    }

    pub fn emoji(self) -> char {
        match self {
            Action::Attack => '💥',
            Action::Flame => '🔥',
            Action::Lightning => '⚡',
            Action::Shield => '🛡',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Matches a message consisting of exactly one action emoji.
    pub fn from_emoji(text: &str) -> Option<Self> {
        // 🛡 is commonly sent with the emoji presentation selector attached.
        let text = text.trim().trim_end_matches('\u{FE0F}');
        let mut chars = text.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Self::ALL.into_iter().find(|a| a.emoji() == c)
    }

    fn boss_damage(self) -> u32 {
        match self {
            Action::Attack => PLAYER_NORMAL_DAMAGE,
            Action::Flame => FLAME_DAMAGE,
            Action::Lightning => LIGHTNING_DAMAGE,
            Action::Shield => 0,
        }
    }
}

/// The participant performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ParticipantId,
    pub name: String,
}

impl Actor {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name
        };
        Self { id, name }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    #[error("there is no active battle in this channel")]
    NoActiveBattle,
    #[error("no special charge is ready")]
    SpecialNotReady,
}

/// What the boss does on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossTurn {
    Normal,
    Special,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub boss_hp: u32,
    pub boss_max_hp: u32,
    pub players_hp: u32,
    pub players_max_hp: u32,
    pub shields: u32,
}

impl From<&BattleSession> for Vitals {
    fn from(session: &BattleSession) -> Self {
        Self {
            boss_hp: session.boss_hp,
            boss_max_hp: session.boss_max_hp,
            players_hp: session.players_hp,
            players_max_hp: session.players_max_hp,
            shields: session.shields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mvp {
    pub id: ParticipantId,
    pub name: String,
    pub damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A damaging player action (attack, flame or lightning).
    Strike {
        action: Action,
        actor: String,
        damage: u32,
    },
    ShieldRaised {
        actor: String,
        gained: u32,
        total: u32,
    },
    SpecialUnlocked,
    BossStunned,
    BossAttack {
        damage: u32,
        blocked: bool,
        shields_left: u32,
    },
    BossSpecial {
        damage: u32,
        shields_broken: bool,
    },
    Victory {
        mvp: Option<Mvp>,
        reward: &'static str,
    },
    Defeat,
    Status(Vitals),
}

/// Progress toward the team's next special action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meter {
    Ready(u32),
    Charging { progress: u32, needed: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub vitals: Vitals,
    pub meter: Meter,
}

/// Applies one player action and, unless the boss dies, the boss's answer.
pub fn apply_action(
    session: &mut BattleSession,
    action: Action,
    actor: &Actor,
) -> Result<Vec<TurnEvent>, TurnError> {
    if !session.active {
        return Err(TurnError::NoActiveBattle);
    }
    if action.is_special() {
        if session.special_charges == 0 {
            return Err(TurnError::SpecialNotReady);
        }
        session.special_charges -= 1;
    }

    let mut events = Vec::new();
    session.user_names.insert(actor.id, actor.name.clone());

    let mut special_unlocked = false;
    match action {
        Action::Shield => {
            session.shields += SHIELD_GAIN;
            events.push(TurnEvent::ShieldRaised {
                actor: actor.name.clone(),
                gained: SHIELD_GAIN,
                total: session.shields,
            });
        }
        _ => {
            let damage = action.boss_damage();
            session.boss_hp = session.boss_hp.saturating_sub(damage);
            *session.damage_by_user.entry(actor.id).or_insert(0) += damage;
            events.push(TurnEvent::Strike {
                action,
                actor: actor.name.clone(),
                damage,
            });
            match action {
                Action::Attack => special_unlocked = charge_meter(session),
                Action::Lightning => session.boss_skip = true,
                _ => {}
            }
        }
    }

    if session.boss_hp == 0 {
        events.push(resolve_victory(session));
        return Ok(events);
    }
    if special_unlocked {
        events.push(TurnEvent::SpecialUnlocked);
    }

    events.push(boss_turn(session));

    if session.players_hp == 0 {
        session.active = false;
        events.push(TurnEvent::Defeat);
    } else {
        events.push(TurnEvent::Status(Vitals::from(&*session)));
    }
    Ok(events)
}

/// Adds one normal attack to the meter. Returns true when a charge was earned.
fn charge_meter(session: &mut BattleSession) -> bool {
    session.players_attack_count += 1;
    if session.players_attack_count >= ATTACKS_PER_CHARGE {
        session.players_attack_count -= ATTACKS_PER_CHARGE;
        session.special_charges += 1;
        true
    } else {
        false
    }
}

/// Which kind of turn the boss takes next, without taking it.
pub fn next_boss_turn(session: &BattleSession) -> BossTurn {
    if session.boss_skip {
        BossTurn::Skipped
    } else if (session.boss_actions_count + 1) % BOSS_SPECIAL_EVERY == 0 {
        BossTurn::Special
    } else {
        BossTurn::Normal
    }
}

/// Resolves the boss's retaliation against the team.
pub fn boss_turn(session: &mut BattleSession) -> TurnEvent {
    match next_boss_turn(session) {
        BossTurn::Skipped => {
            session.boss_skip = false;
            TurnEvent::BossStunned
        }
        BossTurn::Special => {
            session.boss_actions_count += 1;
            let shields_broken = session.shields > 0;
            let damage = if shields_broken {
                session.shields = 0;
                BOSS_SPECIAL_DAMAGE / 2
            } else {
                BOSS_SPECIAL_DAMAGE
            };
            session.players_hp = session.players_hp.saturating_sub(damage);
            TurnEvent::BossSpecial {
                damage,
                shields_broken,
            }
        }
        BossTurn::Normal => {
            session.boss_actions_count += 1;
            if session.shields > 0 {
                session.shields -= 1;
                TurnEvent::BossAttack {
                    damage: 0,
                    blocked: true,
                    shields_left: session.shields,
                }
            } else {
                session.players_hp = session.players_hp.saturating_sub(BOSS_NORMAL_DAMAGE);
                TurnEvent::BossAttack {
                    damage: BOSS_NORMAL_DAMAGE,
                    blocked: false,
                    shields_left: 0,
                }
            }
        }
    }
}

/// Ends the fight in the team's favour.
fn resolve_victory(session: &mut BattleSession) -> TurnEvent {
    session.active = false;
    TurnEvent::Victory {
        mvp: most_valuable(session),
        reward: VICTORY_REWARD,
    }
}

/// Highest cumulative damage; on a tie the participant who dealt damage first wins.
pub fn most_valuable(session: &BattleSession) -> Option<Mvp> {
    let mut best: Option<(ParticipantId, u32)> = None;
    for (&id, &damage) in &session.damage_by_user {
        if best.is_none_or(|(_, top)| damage > top) {
            best = Some((id, damage));
        }
    }
    best.map(|(id, damage)| Mvp {
        id,
        name: session.display_name(id).to_string(),
        damage,
    })
}

/// Read-only summary of a running fight.
pub fn status(session: Option<&BattleSession>) -> Result<StatusReport, TurnError> {
    let session = session
        .filter(|s| s.active)
        .ok_or(TurnError::NoActiveBattle)?;
    let meter = if session.special_charges > 0 {
        Meter::Ready(session.special_charges)
    } else {
        Meter::Charging {
            progress: session.players_attack_count,
            needed: ATTACKS_PER_CHARGE,
        }
    };
    Ok(StatusReport {
        vitals: Vitals::from(session),
        meter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new(7, "Ann")
    }

    #[test]
    fn boss_turn_kind_follows_counter_and_stun() {
        let mut s = BattleSession::new();
        assert_eq!(next_boss_turn(&s), BossTurn::Normal);
        s.boss_actions_count = 3;
        assert_eq!(next_boss_turn(&s), BossTurn::Special);
        s.boss_skip = true;
        assert_eq!(next_boss_turn(&s), BossTurn::Skipped);
    }

    #[test]
    fn meter_wraps_into_a_charge() {
        let mut s = BattleSession::new();
        assert!(!charge_meter(&mut s));
        assert!(!charge_meter(&mut s));
        assert!(charge_meter(&mut s));
        assert_eq!(s.players_attack_count, 0);
        assert_eq!(s.special_charges, 1);
    }

    #[test]
    fn rejected_actions_leave_session_untouched() {
        let mut s = BattleSession::new();
        let before = s.clone();
        assert_eq!(
            apply_action(&mut s, Action::Flame, &actor()),
            Err(TurnError::SpecialNotReady)
        );
        assert_eq!(s, before);

        s.active = false;
        let before = s.clone();
        assert_eq!(
            apply_action(&mut s, Action::Attack, &actor()),
            Err(TurnError::NoActiveBattle)
        );
        assert_eq!(s, before);
    }

    #[test]
    fn shield_records_name_but_no_damage() {
        let mut s = BattleSession::new();
        s.special_charges = 1;
        apply_action(&mut s, Action::Shield, &actor()).unwrap();
        assert_eq!(s.user_names.get(&7).map(String::as_str), Some("Ann"));
        assert!(s.damage_by_user.is_empty());
        // +2 then one absorbed by the boss's normal attack.
        assert_eq!(s.shields, 1);
        assert_eq!(s.players_hp, PLAYERS_MAX_HP);
    }

    #[test]
    fn emoji_triggers_accept_variation_selector() {
        assert_eq!(Action::from_emoji("🛡"), Some(Action::Shield));
        assert_eq!(Action::from_emoji("🛡\u{FE0F}"), Some(Action::Shield));
        assert_eq!(Action::from_emoji("💥"), Some(Action::Attack));
        assert_eq!(Action::from_emoji("💥💥"), None);
        assert_eq!(Action::from_emoji("attack"), None);
    }

    #[test]
    fn blank_display_name_falls_back() {
        assert_eq!(Actor::new(1, "  ").name, DEFAULT_PLAYER_NAME);
    }
}
