//! Resistance classifier ladders
//!
//! A ladder is an ordered, static list of rungs. The first rung whose test
//! passes decides the verdict, scales the damage and names the note. A rung
//! may carry a nested ladder that is only climbed once the rung has matched,
//! so every random draw a ladder makes happens at most once per call.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::kind::EffectKind;
use crate::monster::{RaceFlags, ResistFlags, Species};
use crate::rng::GameRng;

/// Outcome class of a classifier ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Verdict {
    #[default]
    Normal,
    Immune,
    Resist,
    /// The effect turns back on its source
    Reflect,
    Susceptible,
    /// The source pays for a resisted drain
    Backlash,
}

/// Damage transform of a rung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Keep,
    Zero,
    Div(i32),
    Mul(i32),
}

impl Scale {
    pub const fn apply(self, dam: i32) -> i32 {
        match self {
            Scale::Keep => dam,
            Scale::Zero => 0,
            Scale::Div(d) => dam / d,
            Scale::Mul(m) => dam * m,
        }
    }
}

/// What the player may learn when a rung matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Learn {
    #[default]
    Nothing,
    /// Whichever of these race flags the species really has
    Flag(RaceFlags),
    /// Whichever of these resistances the species really has
    Resist(ResistFlags),
}

impl Learn {
    /// Restrict to what the species actually carries
    pub fn masked(self, species: &Species) -> Learn {
        match self {
            Learn::Flag(mask) if species.flags.intersects(mask) => {
                Learn::Flag(species.flags & mask)
            }
            Learn::Resist(mask) if species.resist.intersects(mask) => {
                Learn::Resist(species.resist & mask)
            }
            _ => Learn::Nothing,
        }
    }
}

/// Everything a rung test may look at
pub struct RungInput<'a> {
    pub kind: EffectKind,
    pub species: &'a Species,
    pub dam: i32,
    pub caster_level: i32,
    pub rng: &'a mut GameRng,
}

/// Strong-willed monsters shrug off status effects: `level > 1d(dam-10) + 10`
pub fn level_save(input: &mut RungInput<'_>) -> bool {
    input.species.level > input.rng.randint1((input.dam - 10).max(1)) + 10
}

/// One step of a ladder
#[derive(Clone, Copy)]
pub struct Rung {
    pub verdict: Verdict,
    pub test: fn(&mut RungInput<'_>) -> bool,
    pub scale: Scale,
    pub note: Option<&'static str>,
    pub learn: Learn,
    pub nested: &'static [Rung],
}

impl Rung {
    pub const fn new(verdict: Verdict, test: fn(&mut RungInput<'_>) -> bool) -> Self {
        Self {
            verdict,
            test,
            scale: Scale::Keep,
            note: None,
            learn: Learn::Nothing,
            nested: &[],
        }
    }

    pub const fn scale(self, scale: Scale) -> Self {
        Self { scale, ..self }
    }

    pub const fn note(self, note: &'static str) -> Self {
        Self {
            note: Some(note),
            ..self
        }
    }

    pub const fn learn(self, learn: Learn) -> Self {
        Self { learn, ..self }
    }

    pub const fn nested(self, nested: &'static [Rung]) -> Self {
        Self { nested, ..self }
    }
}

impl std::fmt::Debug for Rung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rung")
            .field("verdict", &self.verdict)
            .field("scale", &self.scale)
            .field("note", &self.note)
            .field("nested", &self.nested.len())
            .finish()
    }
}

/// Result of climbing a ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderOutcome {
    pub verdict: Verdict,
    pub dam: i32,
    pub note: Option<&'static str>,
    pub learn: Learn,
}

/// Climb a ladder; no matching rung means a normal verdict at full damage.
pub fn climb(ladder: &[Rung], input: &mut RungInput<'_>) -> LadderOutcome {
    for rung in ladder {
        if !(rung.test)(input) {
            continue;
        }
        input.dam = rung.scale.apply(input.dam);
        let mut outcome = LadderOutcome {
            verdict: rung.verdict,
            dam: input.dam,
            note: rung.note,
            learn: rung.learn.masked(input.species),
        };
        if !rung.nested.is_empty() {
            let inner = climb(rung.nested, input);
            if inner.verdict != Verdict::Normal {
                outcome.verdict = inner.verdict;
                outcome.dam = inner.dam;
                outcome.note = inner.note;
                if inner.learn != Learn::Nothing {
                    outcome.learn = inner.learn;
                }
            }
        }
        tracing::trace!(verdict = %outcome.verdict, dam = outcome.dam, "ladder matched");
        return outcome;
    }
    LadderOutcome {
        verdict: Verdict::Normal,
        dam: input.dam,
        note: None,
        learn: Learn::Nothing,
    }
}
