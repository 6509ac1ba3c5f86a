//! Monster instances

use serde::{Deserialize, Serialize};

use super::species::{Species, SpeciesId, SubAlign};
use super::status::MonsterStatus;
use crate::dungeon::Position;
use crate::world::TimedCounters;

/// Stable handle into the monster arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-status timed counters of a monster
pub type MonsterTimed = TimedCounters<MonsterStatus>;

/// A live (or just killed) monster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub species: SpeciesId,
    /// What the player believes it is
    pub apparent_species: SpeciesId,
    pub pos: Position,

    pub hp: i32,
    pub maxhp: i32,
    /// Maximum hit points before draining
    pub max_maxhp: i32,
    pub speed: i16,
    /// Experience toward evolution
    pub exp: i32,
    pub timed: MonsterTimed,
    pub sub_align: SubAlign,

    /// Visible to the player
    pub visible: bool,
    pub pet: bool,
    /// False once killed; the slot stays until cleanup
    pub alive: bool,
    /// Summoner, if any
    pub parent: Option<MonsterId>,
    /// Damage dealt to it by the player
    pub dealt_damage: i32,
}

impl Monster {
    /// Fresh instance of `species` at `pos`
    pub fn new(id: MonsterId, species: &Species, pos: Position) -> Self {
        let hp = species.base_hp();
        Self {
            id,
            species: species.id,
            apparent_species: species.id,
            pos,
            hp,
            maxhp: hp,
            max_maxhp: hp,
            speed: species.speed,
            exp: 0,
            timed: MonsterTimed::new(),
            sub_align: species.alignment_tag(),
            visible: true,
            pet: false,
            alive: true,
            parent: None,
            dealt_damage: 0,
        }
    }

    pub fn is_asleep(&self) -> bool {
        self.timed.is_active(MonsterStatus::Sleep)
    }

    pub fn is_confused(&self) -> bool {
        self.timed.is_active(MonsterStatus::Confused)
    }

    pub fn is_stunned(&self) -> bool {
        self.timed.is_active(MonsterStatus::Stun)
    }

    pub fn is_afraid(&self) -> bool {
        self.timed.is_active(MonsterStatus::Fear)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.timed.is_active(MonsterStatus::Invulnerable)
    }

    /// Speed after haste and slowness
    pub fn effective_speed(&self) -> i16 {
        let mut speed = self.speed;
        if self.timed.is_active(MonsterStatus::Fast) {
            speed += 10;
        }
        if self.timed.is_active(MonsterStatus::Slow) {
            speed -= 10;
        }
        speed
    }

    /// Shown as something else than it really is
    pub fn is_disguised(&self) -> bool {
        self.apparent_species != self.species
    }
}
