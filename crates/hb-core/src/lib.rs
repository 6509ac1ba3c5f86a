//! hb-core: effect resolution and perception engine
//!
//! Line of sight and bolt projection over a terrain grid, the resistance
//! classifier, the effect pipeline, monster timed statuses, monster spell
//! casting and evolution. Everything is driven through a [`world::GameContext`]
//! and a single deterministic [`GameRng`].

/// Serialize a bitflags type through its raw bits.
///
/// Unknown bits are dropped on load.
macro_rules! impl_bits_serde {
    ($name:ty, $repr:ty) => {
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.bits(), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let bits = <$repr as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_bits_truncate(bits))
            }
        }
    };
}

pub(crate) use impl_bits_serde;

pub mod dungeon;
pub mod effect;
pub mod monster;
pub mod player;
pub mod world;

mod consts;
mod rng;

pub use consts::*;
pub use effect::{resolve_effect, EffectKind, EffectOutcome};
pub use monster::cast_monster_spell;
pub use rng::GameRng;
pub use world::{process_timed_status, ActorRef, EngineError, EngineOptions, GameContext};
