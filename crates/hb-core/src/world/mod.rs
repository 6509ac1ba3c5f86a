//! Session state, options and per-tick processing

mod context;
mod errors;
mod options;
mod redraw;
mod timed;
mod timeout;

pub use context::{capitalize, possessive, ActorRef, GameContext};
pub use errors::EngineError;
pub use options::EngineOptions;
pub use redraw::RedrawFlags;
pub use timed::{TimedCounters, TimedKind, Transition, MAX_TIMED_KINDS};
pub use timeout::{process_monsters_timed, process_timed_status, run_status_tick, TickKind};
