//! Monster spell repertoire

use bitflags::bitflags;
use strum::{Display, EnumIter, IntoEnumIterator};

use super::species::{RaceFlags, Species};
use crate::effect::EffectKind;
use crate::rng::GameRng;

bitflags! {
    /// Spells and innate attacks a species can use
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpellSet: u32 {
        // Innate
        const SHOOT = 0x0000_0001;
        const BR_FIRE = 0x0000_0002;
        const BR_COLD = 0x0000_0004;
        const BR_POIS = 0x0000_0008;

        // Magic
        const BO_FIRE = 0x0000_0100;
        const BO_COLD = 0x0000_0200;
        const BA_ACID = 0x0000_0400;
        const MIND_BLAST = 0x0000_0800;
        const BRAIN_SMASH = 0x0000_1000;
        const SCARE = 0x0000_2000;
        const CONF = 0x0000_4000;
        const SLOW = 0x0000_8000;
        const HOLD = 0x0001_0000;
        const SPECIAL = 0x0002_0000;

        const INNATE = Self::SHOOT.bits() | Self::BR_FIRE.bits() | Self::BR_COLD.bits() | Self::BR_POIS.bits();
    }
}

crate::impl_bits_serde!(SpellSet, u32);

/// One castable spell
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    Display,
    EnumIter,
)]
pub enum MonsterSpell {
    Shoot,
    BreathFire,
    BreathCold,
    BreathPoison,
    BoltFire,
    BoltCold,
    BallAcid,
    MindBlast,
    BrainSmash,
    Scare,
    Confuse,
    Slow,
    Hold,
    /// Species-specific trick; never copied by imitators
    Special,
}

impl MonsterSpell {
    pub const fn flag(self) -> SpellSet {
        match self {
            MonsterSpell::Shoot => SpellSet::SHOOT,
            MonsterSpell::BreathFire => SpellSet::BR_FIRE,
            MonsterSpell::BreathCold => SpellSet::BR_COLD,
            MonsterSpell::BreathPoison => SpellSet::BR_POIS,
            MonsterSpell::BoltFire => SpellSet::BO_FIRE,
            MonsterSpell::BoltCold => SpellSet::BO_COLD,
            MonsterSpell::BallAcid => SpellSet::BA_ACID,
            MonsterSpell::MindBlast => SpellSet::MIND_BLAST,
            MonsterSpell::BrainSmash => SpellSet::BRAIN_SMASH,
            MonsterSpell::Scare => SpellSet::SCARE,
            MonsterSpell::Confuse => SpellSet::CONF,
            MonsterSpell::Slow => SpellSet::SLOW,
            MonsterSpell::Hold => SpellSet::HOLD,
            MonsterSpell::Special => SpellSet::SPECIAL,
        }
    }

    /// Breaths and missiles work without magic
    pub const fn is_innate(self) -> bool {
        SpellSet::INNATE.contains(self.flag())
    }

    /// Spells in a repertoire, in declaration order
    pub fn from_set(set: SpellSet) -> Vec<MonsterSpell> {
        MonsterSpell::iter().filter(|s| set.contains(s.flag())).collect()
    }

    pub const fn effect_kind(self) -> EffectKind {
        match self {
            MonsterSpell::Shoot => EffectKind::Missile,
            MonsterSpell::BreathFire | MonsterSpell::BoltFire => EffectKind::Fire,
            MonsterSpell::BreathCold | MonsterSpell::BoltCold => EffectKind::Cold,
            MonsterSpell::BreathPoison => EffectKind::Poison,
            MonsterSpell::BallAcid => EffectKind::Acid,
            MonsterSpell::MindBlast => EffectKind::Psi,
            MonsterSpell::BrainSmash => EffectKind::PsiDrain,
            MonsterSpell::Scare => EffectKind::TurnAll,
            MonsterSpell::Confuse => EffectKind::OldConfuse,
            MonsterSpell::Slow => EffectKind::OldSlow,
            MonsterSpell::Hold => EffectKind::OldSleep,
            MonsterSpell::Special => EffectKind::Telekinesis,
        }
    }

    /// Raw damage (or power) of a cast by a caster with `hp` hit points
    pub fn damage(self, caster: &Species, hp: i32, rng: &mut GameRng) -> i32 {
        let rlev = caster.level.max(1);
        let bonus = if caster.flags.contains(RaceFlags::POWERFUL) {
            rlev * 2 / 3
        } else {
            rlev / 3
        };
        match self {
            MonsterSpell::Shoot => rng.damroll(1 + rlev / 8, 6),
            MonsterSpell::BreathFire | MonsterSpell::BreathCold => (hp / 3).min(1600),
            MonsterSpell::BreathPoison => (hp / 3).min(800),
            MonsterSpell::BoltFire => rng.damroll(9, 8) + bonus,
            MonsterSpell::BoltCold => rng.damroll(6, 8) + bonus,
            MonsterSpell::BallAcid => rng.randint1(rlev * 3) + 15,
            MonsterSpell::MindBlast => rng.damroll(7, 8),
            MonsterSpell::BrainSmash => rng.damroll(12, 12),
            MonsterSpell::Scare
            | MonsterSpell::Confuse
            | MonsterSpell::Slow
            | MonsterSpell::Hold
            | MonsterSpell::Special => rlev,
        }
    }

    /// Narration verb phrase, "<caster> <verb> <target>."
    pub const fn verb(self) -> &'static str {
        match self {
            MonsterSpell::Shoot => "fires a missile at",
            MonsterSpell::BreathFire => "breathes fire at",
            MonsterSpell::BreathCold => "breathes frost at",
            MonsterSpell::BreathPoison => "breathes gas at",
            MonsterSpell::BoltFire => "casts a fire bolt at",
            MonsterSpell::BoltCold => "casts a frost bolt at",
            MonsterSpell::BallAcid => "casts an acid ball at",
            MonsterSpell::MindBlast => "gazes intently at",
            MonsterSpell::BrainSmash => "gazes intently at",
            MonsterSpell::Scare => "casts a fearful illusion in front of",
            MonsterSpell::Confuse => "creates a mesmerising illusion in front of",
            MonsterSpell::Slow => "drains power from the muscles of",
            MonsterSpell::Hold => "stares intently at",
            MonsterSpell::Special => "gestures at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::SpeciesId;

    #[test]
    fn test_innate_split() {
        assert!(MonsterSpell::BreathFire.is_innate());
        assert!(MonsterSpell::Shoot.is_innate());
        assert!(!MonsterSpell::BoltFire.is_innate());
        assert!(!MonsterSpell::Special.is_innate());
    }

    #[test]
    fn test_from_set_order() {
        let spells = MonsterSpell::from_set(SpellSet::CONF | SpellSet::BR_FIRE);
        assert_eq!(spells, vec![MonsterSpell::BreathFire, MonsterSpell::Confuse]);
    }

    #[test]
    fn test_breath_damage_capped() {
        let dragon = Species::new(SpeciesId(0), "dragon", 40);
        let mut rng = GameRng::new(1);
        assert_eq!(MonsterSpell::BreathFire.damage(&dragon, 300, &mut rng), 100);
        assert_eq!(MonsterSpell::BreathFire.damage(&dragon, 9000, &mut rng), 1600);
        assert_eq!(MonsterSpell::BreathPoison.damage(&dragon, 9000, &mut rng), 800);
    }

    #[test]
    fn test_power_spells_use_level() {
        let mage = Species::new(SpeciesId(0), "mage", 23);
        let mut rng = GameRng::new(1);
        assert_eq!(MonsterSpell::Confuse.damage(&mage, 10, &mut rng), 23);
        assert_eq!(rng.call_count(), 0);
    }
}
