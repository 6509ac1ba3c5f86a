//! What the player has learned about each species
//!
//! Every bit and counter here only ever grows during a session. Recording
//! methods return `true` when they taught the player something new, and a
//! species' `discoveries` counts those moments.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::species::{RaceFlags, ResistFlags, SpeciesId};
use super::spells::SpellSet;
use crate::consts::MAX_UCHAR;

/// Observations about one species
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesLore {
    pub flags: RaceFlags,
    pub resist: ResistFlags,
    pub spells: SpellSet,
    /// Spells seen cast (saturating)
    pub cast_count: u8,
    /// Times seen ignoring the player (saturating)
    pub ignore: u8,
    /// Times seen waking up (saturating)
    pub wake: u8,
    /// Player deaths caused by this species
    pub deaths: u16,
    /// Members killed by the player
    pub kills: u16,
    /// Seen evolving
    pub can_evolve: bool,
    /// Number of new facts recorded
    pub discoveries: u32,
}

/// Monotonic per-species knowledge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeLedger {
    entries: HashMap<SpeciesId, SpeciesLore>,
}

impl KnowledgeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lore(&self, species: SpeciesId) -> Option<&SpeciesLore> {
        self.entries.get(&species)
    }

    fn entry(&mut self, species: SpeciesId) -> &mut SpeciesLore {
        self.entries.entry(species).or_default()
    }

    pub fn knows_flag(&self, species: SpeciesId, flag: RaceFlags) -> bool {
        self.lore(species).is_some_and(|l| l.flags.contains(flag))
    }

    pub fn knows_resist(&self, species: SpeciesId, resist: ResistFlags) -> bool {
        self.lore(species).is_some_and(|l| l.resist.contains(resist))
    }

    /// Record race flags; true if any bit was new
    pub fn record_flag(&mut self, species: SpeciesId, flag: RaceFlags) -> bool {
        let lore = self.entry(species);
        if flag.is_empty() || lore.flags.contains(flag) {
            return false;
        }
        lore.flags |= flag;
        lore.discoveries += 1;
        true
    }

    /// Record resistances; true if any bit was new
    pub fn record_resist(&mut self, species: SpeciesId, resist: ResistFlags) -> bool {
        let lore = self.entry(species);
        if resist.is_empty() || lore.resist.contains(resist) {
            return false;
        }
        lore.resist |= resist;
        lore.discoveries += 1;
        true
    }

    /// Record a spell seen cast and bump the cast counter
    pub fn record_spell(&mut self, species: SpeciesId, spell: SpellSet) -> bool {
        let lore = self.entry(species);
        if lore.cast_count < MAX_UCHAR {
            lore.cast_count += 1;
        }
        if lore.spells.contains(spell) {
            return false;
        }
        lore.spells |= spell;
        lore.discoveries += 1;
        true
    }

    pub fn note_ignore(&mut self, species: SpeciesId) {
        let lore = self.entry(species);
        lore.ignore = lore.ignore.saturating_add(1);
    }

    pub fn note_wake(&mut self, species: SpeciesId) {
        let lore = self.entry(species);
        lore.wake = lore.wake.saturating_add(1);
    }

    pub fn note_death(&mut self, species: SpeciesId) {
        let lore = self.entry(species);
        lore.deaths = lore.deaths.saturating_add(1);
    }

    pub fn note_kill(&mut self, species: SpeciesId) {
        let lore = self.entry(species);
        lore.kills = lore.kills.saturating_add(1);
    }

    pub fn mark_can_evolve(&mut self, species: SpeciesId) -> bool {
        let lore = self.entry(species);
        if lore.can_evolve {
            return false;
        }
        lore.can_evolve = true;
        lore.discoveries += 1;
        true
    }

    /// Union with another ledger (e.g. a restored session)
    pub fn merge(&mut self, other: &KnowledgeLedger) {
        for (species, theirs) in &other.entries {
            let ours = self.entry(*species);
            ours.flags |= theirs.flags;
            ours.resist |= theirs.resist;
            ours.spells |= theirs.spells;
            ours.cast_count = ours.cast_count.max(theirs.cast_count);
            ours.ignore = ours.ignore.max(theirs.ignore);
            ours.wake = ours.wake.max(theirs.wake);
            ours.deaths = ours.deaths.max(theirs.deaths);
            ours.kills = ours.kills.max(theirs.kills);
            ours.can_evolve |= theirs.can_evolve;
            ours.discoveries = ours.discoveries.max(theirs.discoveries);
        }
    }

    /// True if every fact in `earlier` is still known here
    pub fn extends(&self, earlier: &KnowledgeLedger) -> bool {
        earlier.entries.iter().all(|(species, old)| {
            self.lore(*species).is_some_and(|new| {
                new.flags.contains(old.flags)
                    && new.resist.contains(old.resist)
                    && new.spells.contains(old.spells)
                    && new.cast_count >= old.cast_count
                    && new.ignore >= old.ignore
                    && new.wake >= old.wake
                    && new.deaths >= old.deaths
                    && new.kills >= old.kills
                    && (new.can_evolve || !old.can_evolve)
            })
        })
    }
}
