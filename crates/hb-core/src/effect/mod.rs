//! Effect resolution
//!
//! [`resolve_effect`] is the single entry point. Each [`EffectKind`] belongs
//! to a family whose [`EffectRule`] supplies a gate, a classifier ladder and
//! the family's reactions; the pipeline runs them in a fixed order so the
//! random draws and the narration stay deterministic.

mod context;
mod elemental;
mod holy;
mod kind;
mod ladder;
mod mental;
mod pipeline;
mod psychic;

pub use context::{EffectContext, EffectOutcome};
pub use kind::{EffectFamily, EffectKind};
pub use ladder::{climb, level_save, LadderOutcome, Learn, Rung, RungInput, Scale, Verdict};
pub use pipeline::{default_note_dies, resolve_effect, rule_for, EffectRule};
