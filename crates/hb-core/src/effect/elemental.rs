//! Elemental and plain damage

use super::kind::EffectKind;
use super::ladder::{Learn, Rung, RungInput, Scale, Verdict};
use super::pipeline::EffectRule;
use crate::monster::ResistFlags;

pub struct Elemental;

macro_rules! has_resist {
    ($name:ident, $flag:ident) => {
        fn $name(input: &mut RungInput<'_>) -> bool {
            input.species.resist.contains(ResistFlags::$flag)
        }
    };
}

has_resist!(im_fire, IM_FIRE);
has_resist!(im_cold, IM_COLD);
has_resist!(im_elec, IM_ELEC);
has_resist!(im_acid, IM_ACID);
has_resist!(im_pois, IM_POIS);
has_resist!(hurt_fire, HURT_FIRE);
has_resist!(hurt_cold, HURT_COLD);

const fn immune(test: fn(&mut RungInput<'_>) -> bool, flag: ResistFlags) -> Rung {
    Rung::new(Verdict::Resist, test)
        .scale(Scale::Div(9))
        .note(" resists a lot.")
        .learn(Learn::Resist(flag))
}

const fn hurt(test: fn(&mut RungInput<'_>) -> bool, flag: ResistFlags) -> Rung {
    Rung::new(Verdict::Susceptible, test)
        .scale(Scale::Mul(2))
        .note(" is hit hard.")
        .learn(Learn::Resist(flag))
}

const FIRE: &[Rung] = &[
    immune(im_fire, ResistFlags::IM_FIRE),
    hurt(hurt_fire, ResistFlags::HURT_FIRE),
];
const COLD: &[Rung] = &[
    immune(im_cold, ResistFlags::IM_COLD),
    hurt(hurt_cold, ResistFlags::HURT_COLD),
];
const ELEC: &[Rung] = &[immune(im_elec, ResistFlags::IM_ELEC)];
const ACID: &[Rung] = &[immune(im_acid, ResistFlags::IM_ACID)];
const POISON: &[Rung] = &[immune(im_pois, ResistFlags::IM_POIS)];

impl EffectRule for Elemental {
    fn ladder(&self, kind: EffectKind) -> &'static [Rung] {
        match kind {
            EffectKind::Fire => FIRE,
            EffectKind::Cold => COLD,
            EffectKind::Elec => ELEC,
            EffectKind::Acid => ACID,
            EffectKind::Poison => POISON,
            _ => &[],
        }
    }
}
