//! Holy effects: teleport away, turn and dispel
//!
//! Each kind only touches its own kind of monster (undead, evil, ...); any
//! other target is skipped untouched. Away and turn effects never deal
//! damage themselves.

use super::context::EffectContext;
use super::kind::EffectKind;
use super::ladder::{level_save, Learn, Rung, RungInput, Verdict};
use super::pipeline::{default_note_dies, EffectRule};
use crate::monster::{RaceFlags, ResistFlags, Species};
use crate::world::{EngineError, GameContext};

pub struct Holy;

fn anchored(input: &mut RungInput<'_>) -> bool {
    let species = input.species;
    species.resist.contains(ResistFlags::RES_TELE)
        && (species.is_unique() || species.resist.contains(ResistFlags::RES_ALL))
}

fn resists_teleport(input: &mut RungInput<'_>) -> bool {
    input.species.resist.contains(ResistFlags::RES_TELE)
        && input.species.level > input.rng.randint1(100)
}

fn fearless(input: &mut RungInput<'_>) -> bool {
    input.species.is_unique()
        || input.species.flags.contains(RaceFlags::NO_FEAR)
        || level_save(input)
}

const AWAY: &[Rung] = &[
    Rung::new(Verdict::Immune, anchored)
        .note(" is unaffected!")
        .learn(Learn::Resist(ResistFlags::RES_TELE)),
    Rung::new(Verdict::Resist, resists_teleport)
        .note(" resists!")
        .learn(Learn::Resist(ResistFlags::RES_TELE)),
];

const TURN: &[Rung] = &[Rung::new(Verdict::Immune, level_save).note(" is unaffected!")];

const TURN_ALL: &[Rung] = &[Rung::new(Verdict::Immune, fearless)
    .note(" is unaffected!")
    .learn(Learn::Flag(RaceFlags::NO_FEAR))];

impl EffectRule for Holy {
    fn gate(&self, kind: EffectKind, species: &Species) -> Option<RaceFlags> {
        let tag = match kind {
            EffectKind::AwayUndead | EffectKind::TurnUndead | EffectKind::DispUndead => {
                RaceFlags::UNDEAD
            }
            EffectKind::AwayEvil | EffectKind::TurnEvil | EffectKind::DispEvil => RaceFlags::EVIL,
            EffectKind::DispGood => RaceFlags::GOOD,
            EffectKind::DispDemon => RaceFlags::DEMON,
            EffectKind::DispLiving => {
                return species.is_living().then_some(RaceFlags::empty());
            }
            _ => return Some(RaceFlags::empty()),
        };
        species.flags.contains(tag).then_some(tag)
    }

    fn prelude(&self, ctx: &mut GameContext, ec: &mut EffectContext) {
        if ec.kind.is_turn() {
            ec.do_fear = ctx.rng.damroll(3, ec.dam / 2) + 1;
        }
    }

    fn ladder(&self, kind: EffectKind) -> &'static [Rung] {
        match kind {
            EffectKind::AwayUndead | EffectKind::AwayEvil | EffectKind::AwayAll => AWAY,
            EffectKind::TurnUndead | EffectKind::TurnEvil => TURN,
            EffectKind::TurnAll => TURN_ALL,
            _ => &[],
        }
    }

    fn on_verdict(&self, _ctx: &mut GameContext, ec: &mut EffectContext) -> Result<(), EngineError> {
        if ec.kind.is_away() {
            if ec.verdict == Verdict::Normal {
                ec.do_dist = ec.dam;
            }
            ec.dam = 0;
        } else if ec.kind.is_turn() {
            if ec.verdict == Verdict::Immune {
                ec.do_fear = 0;
                ec.obvious = false;
            }
            ec.dam = 0;
        } else {
            ec.note = Some(" shudders.");
        }
        Ok(())
    }

    fn note_dies(&self, kind: EffectKind, species: &Species) -> &'static str {
        if kind.is_away() || kind.is_turn() {
            default_note_dies(species)
        } else {
            " dissolves!"
        }
    }
}
