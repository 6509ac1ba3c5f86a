//! Engine errors
//!
//! These never reach the public entry points: an invalid reference there is
//! logged and turned into a no-op result.

use thiserror::Error;

use crate::monster::SpeciesId;
use crate::world::ActorRef;

/// Errors raised by internal lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid actor reference {0:?}")]
    InvalidReference(ActorRef),

    #[error("actor {0:?} is already dead")]
    DeadActor(ActorRef),

    #[error("unknown species {0:?}")]
    UnknownSpecies(SpeciesId),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
