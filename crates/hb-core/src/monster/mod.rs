//! Monster system
//!
//! Species templates, live instances, their timed statuses, what the player
//! knows about them, spell casting and evolution.

mod casting;
mod lifecycle;
mod lore;
mod monst;
mod species;
mod spells;
mod status;

pub use casting::cast_monster_spell;
pub use lifecycle::{individual_speed, monster_gain_exp};
pub use lore::{KnowledgeLedger, SpeciesLore};
pub use monst::{Monster, MonsterId, MonsterTimed};
pub use species::{HitDice, RaceFlags, ResistFlags, Species, SpeciesId, SpeciesTable, SubAlign};
pub use spells::{MonsterSpell, SpellSet};
pub use status::{
    csleep_noise, dispel_monster_status, mon_damage_mod, process_monster_status,
    set_monster_timed, MonsterStatus,
};
