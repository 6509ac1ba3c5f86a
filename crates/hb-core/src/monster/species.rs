//! Species templates
//!
//! A species is shared by every monster of its kind and is never mutated
//! during resolution. What the player has learned about a species lives in
//! the [`KnowledgeLedger`](super::KnowledgeLedger), not here.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::spells::SpellSet;
use crate::consts::NORMAL_SPEED;
use crate::rng::GameRng;
use crate::world::EngineError;

/// Index into the species table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

bitflags! {
    /// Race, mind and behaviour flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RaceFlags: u32 {
        const UNIQUE = 0x0000_0001;
        const MALE = 0x0000_0002;
        const FEMALE = 0x0000_0004;
        const FORCE_MAXHP = 0x0000_0008;
        const POWERFUL = 0x0000_0010;
        const REGENERATE = 0x0000_0020;

        // Mind
        /// No mind at all: psychic attacks cannot touch it
        const EMPTY_MIND = 0x0000_0100;
        const WEIRD_MIND = 0x0000_0200;
        const STUPID = 0x0000_0400;

        // Kind
        const ANIMAL = 0x0001_0000;
        const UNDEAD = 0x0002_0000;
        const DEMON = 0x0004_0000;
        const EVIL = 0x0008_0000;
        const GOOD = 0x0010_0000;
        const NONLIVING = 0x0020_0000;

        // Status immunities
        const NO_FEAR = 0x0100_0000;
        const NO_CONF = 0x0200_0000;
        const NO_SLEEP = 0x0400_0000;
        const NO_STUN = 0x0800_0000;
    }
}

bitflags! {
    /// Elemental immunities and weaknesses
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResistFlags: u16 {
        const IM_FIRE = 0x0001;
        const IM_COLD = 0x0002;
        const IM_ELEC = 0x0004;
        const IM_ACID = 0x0008;
        const IM_POIS = 0x0010;
        const HURT_FIRE = 0x0100;
        const HURT_COLD = 0x0200;
        const RES_TELE = 0x1000;
        /// Resists nearly everything
        const RES_ALL = 0x2000;
    }
}

bitflags! {
    /// Monster alignment (neutral is empty)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SubAlign: u8 {
        const EVIL = 0x01;
        const GOOD = 0x02;
    }
}

crate::impl_bits_serde!(RaceFlags, u32);
crate::impl_bits_serde!(ResistFlags, u16);
crate::impl_bits_serde!(SubAlign, u8);

/// Hit dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitDice {
    pub num: i32,
    pub sides: i32,
}

impl HitDice {
    pub const fn new(num: i32, sides: i32) -> Self {
        Self { num, sides }
    }

    pub const fn maxroll(&self) -> i32 {
        self.num * self.sides
    }

    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        rng.damroll(self.num, self.sides)
    }
}

/// A monster species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    /// Base level
    pub level: i32,
    pub speed: i16,
    pub hit_dice: HitDice,
    /// Radius within which it always senses the player
    pub aaf: i32,
    /// Experience value of a kill
    pub mexp: i32,
    /// Experience needed to evolve (0 = never evolves)
    pub next_exp: i32,
    pub next_species: Option<SpeciesId>,
    pub flags: RaceFlags,
    pub resist: ResistFlags,
    pub spells: SpellSet,
}

impl Species {
    pub fn new(id: SpeciesId, name: impl Into<String>, level: i32) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            speed: NORMAL_SPEED,
            hit_dice: HitDice::new(1, 8),
            aaf: 20,
            mexp: 1,
            next_exp: 0,
            next_species: None,
            flags: RaceFlags::empty(),
            resist: ResistFlags::empty(),
            spells: SpellSet::empty(),
        }
    }

    pub fn with_flags(mut self, flags: RaceFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_resist(mut self, resist: ResistFlags) -> Self {
        self.resist |= resist;
        self
    }

    pub fn with_spells(mut self, spells: SpellSet) -> Self {
        self.spells |= spells;
        self
    }

    pub fn with_hit_dice(mut self, num: i32, sides: i32) -> Self {
        self.hit_dice = HitDice::new(num, sides);
        self
    }

    pub fn with_speed(mut self, speed: i16) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_aaf(mut self, aaf: i32) -> Self {
        self.aaf = aaf;
        self
    }

    pub fn with_exp(mut self, mexp: i32) -> Self {
        self.mexp = mexp;
        self
    }

    /// Evolves into `next` after `next_exp` experience
    pub fn evolves_into(mut self, next: SpeciesId, next_exp: i32) -> Self {
        self.next_species = Some(next);
        self.next_exp = next_exp;
        self
    }

    pub const fn is_unique(&self) -> bool {
        self.flags.contains(RaceFlags::UNIQUE)
    }

    pub const fn is_undead(&self) -> bool {
        self.flags.contains(RaceFlags::UNDEAD)
    }

    pub const fn is_demon(&self) -> bool {
        self.flags.contains(RaceFlags::DEMON)
    }

    pub const fn is_evil(&self) -> bool {
        self.flags.contains(RaceFlags::EVIL)
    }

    pub const fn is_good(&self) -> bool {
        self.flags.contains(RaceFlags::GOOD)
    }

    /// No mind to attack
    pub const fn is_mindless(&self) -> bool {
        self.flags.contains(RaceFlags::EMPTY_MIND)
    }

    /// Stupid, alien or animal minds shrug off psychic attacks
    pub const fn has_dull_mind(&self) -> bool {
        self.flags
            .intersects(RaceFlags::STUPID.union(RaceFlags::WEIRD_MIND).union(RaceFlags::ANIMAL))
    }

    /// Undead or demonic
    pub const fn is_corrupted(&self) -> bool {
        self.flags.intersects(RaceFlags::UNDEAD.union(RaceFlags::DEMON))
    }

    /// Not undead, demonic or otherwise non-living
    pub const fn is_living(&self) -> bool {
        !self
            .flags
            .intersects(RaceFlags::UNDEAD.union(RaceFlags::DEMON).union(RaceFlags::NONLIVING))
    }

    /// Alignment implied by the EVIL / GOOD tags
    pub fn alignment_tag(&self) -> SubAlign {
        let mut align = SubAlign::empty();
        if self.is_evil() {
            align |= SubAlign::EVIL;
        }
        if self.is_good() {
            align |= SubAlign::GOOD;
        }
        align
    }

    /// Starting hit points for a fresh instance
    pub const fn base_hp(&self) -> i32 {
        if self.flags.contains(RaceFlags::FORCE_MAXHP) {
            self.hit_dice.maxroll()
        } else {
            (self.hit_dice.num * (self.hit_dice.sides + 1) + 1) / 2
        }
    }
}

/// All species of a game session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesTable {
    species: Vec<Species>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a species; its id must match its slot
    pub fn insert(&mut self, species: Species) -> Result<SpeciesId, EngineError> {
        let id = species.id;
        let slot = usize::from(id.0);
        if slot != self.species.len() {
            return Err(EngineError::Config(format!(
                "species '{}' has id {} but the next free slot is {}",
                species.name,
                id.0,
                self.species.len()
            )));
        }
        self.species.push(species);
        Ok(id)
    }

    pub fn get(&self, id: SpeciesId) -> Result<&Species, EngineError> {
        self.species
            .get(usize::from(id.0))
            .ok_or(EngineError::UnknownSpecies(id))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// A uniformly random non-unique species, as seen while hallucinating
    pub fn random_non_unique(&self, rng: &mut GameRng) -> Option<&Species> {
        if self.species.iter().all(Species::is_unique) {
            return None;
        }
        for _ in 0..100 {
            let idx = rng.randint0(self.species.len() as i32) as usize;
            let candidate = &self.species[idx];
            if !candidate.is_unique() {
                return Some(candidate);
            }
        }
        self.species.iter().find(|s| !s.is_unique())
    }
}

impl FromIterator<Species> for SpeciesTable {
    fn from_iter<I: IntoIterator<Item = Species>>(iter: I) -> Self {
        Self {
            species: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mind_classification() {
        let golem = Species::new(SpeciesId(0), "clay golem", 15).with_flags(RaceFlags::EMPTY_MIND);
        assert!(golem.is_mindless());
        assert!(!golem.has_dull_mind());

        let wolf = Species::new(SpeciesId(1), "wolf", 10).with_flags(RaceFlags::ANIMAL);
        assert!(wolf.has_dull_mind());
        assert!(wolf.is_living());

        let lich = Species::new(SpeciesId(2), "lich", 34).with_flags(RaceFlags::UNDEAD | RaceFlags::EVIL);
        assert!(lich.is_corrupted());
        assert!(!lich.is_living());
        assert_eq!(lich.alignment_tag(), SubAlign::EVIL);
    }

    #[test]
    fn test_base_hp() {
        let forced = Species::new(SpeciesId(0), "a", 1)
            .with_hit_dice(8, 10)
            .with_flags(RaceFlags::FORCE_MAXHP);
        assert_eq!(forced.base_hp(), 80);
        let rolled = Species::new(SpeciesId(1), "b", 1).with_hit_dice(2, 6);
        assert_eq!(rolled.base_hp(), 7);
    }

    #[test]
    fn test_table_insert_and_lookup() {
        let mut table = SpeciesTable::new();
        table.insert(Species::new(SpeciesId(0), "kobold", 2)).unwrap();
        assert!(table.insert(Species::new(SpeciesId(5), "orc", 3)).is_err());
        assert_eq!(table.get(SpeciesId(0)).unwrap().name, "kobold");
        assert_eq!(
            table.get(SpeciesId(9)).unwrap_err(),
            EngineError::UnknownSpecies(SpeciesId(9))
        );
    }

    #[test]
    fn test_random_non_unique() {
        let table: SpeciesTable = [
            Species::new(SpeciesId(0), "Grip", 1).with_flags(RaceFlags::UNIQUE),
            Species::new(SpeciesId(1), "jackal", 1),
        ]
        .into_iter()
        .collect();
        // First pick lands on the unique, second on the jackal
        let mut rng = GameRng::scripted([0, 1]);
        assert_eq!(table.random_non_unique(&mut rng).unwrap().name, "jackal");

        let only_uniques: SpeciesTable =
            [Species::new(SpeciesId(0), "Grip", 1).with_flags(RaceFlags::UNIQUE)].into_iter().collect();
        assert!(only_uniques.random_non_unique(&mut rng).is_none());
    }

    #[test]
    fn test_flags_serde() {
        let flags = RaceFlags::UNDEAD | RaceFlags::NO_FEAR;
        let json = serde_json::to_string(&flags).unwrap();
        let back: RaceFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }
}
