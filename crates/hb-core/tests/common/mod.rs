//! Shared fixtures for the integration tests
#![allow(dead_code)]

use hb_core::dungeon::{Floor, Position};
use hb_core::monster::{MonsterId, Species, SpeciesId, SpeciesTable};
use hb_core::player::Player;
use hb_core::{EngineOptions, GameContext, GameRng};

/// Route engine logs to the test harness; `RUST_LOG=hb_core=trace` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An open 20x12 floor with the player at (2, 2)
pub fn world(species: Vec<Species>, player_level: i32, rng: GameRng) -> GameContext {
    init_tracing();
    let table: SpeciesTable = species.into_iter().collect();
    GameContext::new(
        Floor::new(20, 12),
        table,
        Player::new(Position::new(2, 2), player_level),
        EngineOptions::default(),
        rng,
    )
}

pub fn spawn(ctx: &mut GameContext, species: SpeciesId, y: i32, x: i32) -> MonsterId {
    ctx.spawn_monster(species, Position::new(y, x))
        .expect("fixture placement is on open floor")
}
