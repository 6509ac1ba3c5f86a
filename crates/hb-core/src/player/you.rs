//! The player-controlled actor

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{MAX_MIMIC, NORMAL_SPEED};
use crate::dungeon::Position;
use crate::monster::{MonsterId, MonsterSpell};
use crate::world::{GameContext, RedrawFlags, TimedCounters, TimedKind, Transition};

/// Character class
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PlayerClass {
    #[default]
    Warrior,
    Mage,
    Priest,
    Rogue,
    /// Spends psychic energy instead of mana
    Mindcrafter,
    /// Copies spells it watches monsters cast
    Imitator,
}

/// Player timed statuses
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PlayerStatus {
    Confused,
    Stun,
    Fear,
    Paralyzed,
    Blind,
    Hallucination,
    /// Shadow double that sometimes absorbs attacks
    MultiShadow,
}

impl TimedKind for PlayerStatus {
    fn index(self) -> usize {
        self as usize
    }
}

impl PlayerStatus {
    /// Narration when the status starts and when it ends
    pub const fn messages(self) -> (&'static str, &'static str) {
        match self {
            PlayerStatus::Confused => ("You are confused!", "You feel less confused now."),
            PlayerStatus::Stun => ("You have been stunned.", "You are no longer stunned."),
            PlayerStatus::Fear => ("You are terrified!", "You feel bolder now."),
            PlayerStatus::Paralyzed => ("You are paralysed!", "You can move again."),
            PlayerStatus::Blind => ("You are blind!", "You can see again."),
            PlayerStatus::Hallucination => (
                "Oh, wow! Everything looks so cosmic now!",
                "You can see clearly again.",
            ),
            PlayerStatus::MultiShadow => ("Your Shadow enveloped you.", "Your Shadow disappears."),
        }
    }
}

pub type PlayerTimed = TimedCounters<PlayerStatus>;

/// A spell copied by an imitator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimicEntry {
    pub spell: MonsterSpell,
    pub damage: i32,
}

/// The player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Position,
    pub level: i32,
    pub exp: i32,
    pub hp: i32,
    pub mhp: i32,
    /// Current spell points
    pub csp: i32,
    pub msp: i32,
    pub class: PlayerClass,
    /// Saving throw skill
    pub skill_sav: i32,
    /// Stealth skill
    pub skill_stl: i32,
    pub speed: i16,
    pub free_action: bool,
    /// Surrounded by an anti-magic field
    pub anti_magic: bool,
    pub timed: PlayerTimed,
    /// Recently watched spells, oldest first
    pub mimicry: VecDeque<MimicEntry>,
    pub riding: Option<MonsterId>,
    pub is_dead: bool,
    pub died_from: Option<String>,
    /// Something interrupted the current activity
    pub disturbed: bool,
}

impl Player {
    pub fn new(pos: Position, level: i32) -> Self {
        Self {
            pos,
            level: level.max(1),
            exp: 0,
            hp: 100,
            mhp: 100,
            csp: 0,
            msp: 0,
            class: PlayerClass::default(),
            skill_sav: 30,
            skill_stl: 3,
            speed: NORMAL_SPEED,
            free_action: false,
            anti_magic: false,
            timed: PlayerTimed::new(),
            mimicry: VecDeque::with_capacity(MAX_MIMIC),
            riding: None,
            is_dead: false,
            died_from: None,
            disturbed: false,
        }
    }

    pub fn is_blind(&self) -> bool {
        self.timed.is_active(PlayerStatus::Blind)
    }

    pub fn is_hallucinating(&self) -> bool {
        self.timed.is_active(PlayerStatus::Hallucination)
    }

    /// Remember a watched spell, dropping the oldest when full
    pub fn learn_mimic(&mut self, entry: MimicEntry) {
        if self.mimicry.len() >= MAX_MIMIC {
            self.mimicry.pop_front();
        }
        self.mimicry.push_back(entry);
    }
}

/// Set a player status counter, narrating a switch on or off.
///
/// Returns true when the status switched.
pub fn set_player_timed(ctx: &mut GameContext, status: PlayerStatus, value: i32) -> bool {
    if ctx.player.is_dead {
        return false;
    }
    let transition = ctx.player.timed.set(status, value);
    let (start, end) = status.messages();
    match transition {
        Transition::Started => ctx.message(start),
        Transition::Ended => ctx.message(end),
        Transition::Unchanged => return false,
    }
    tracing::debug!(?status, value, "player status switched");
    ctx.player.disturbed = true;
    ctx.redraw |= RedrawFlags::STATUS;
    true
}

/// One tick of a player status; every status wears off by one.
pub fn process_player_status(ctx: &mut GameContext, status: PlayerStatus) -> bool {
    let cur = i32::from(ctx.player.timed.get(status));
    if cur == 0 {
        return false;
    }
    set_player_timed(ctx, status, cur - 1)
}

/// Damage the player; returns true if the hit was fatal.
pub fn take_hit(ctx: &mut GameContext, damage: i32, killer: &str) -> bool {
    if ctx.player.is_dead || damage <= 0 {
        return false;
    }
    ctx.player.hp -= damage;
    ctx.player.disturbed = true;
    ctx.redraw |= RedrawFlags::HEALTH;
    tracing::debug!(damage, hp = ctx.player.hp, killer, "player takes a hit");
    if ctx.player.hp < ctx.options.death_floor {
        ctx.player.is_dead = true;
        ctx.player.died_from = Some(killer.to_string());
        ctx.message("You die.");
        tracing::debug!(killer, "player died");
        return true;
    }
    false
}
