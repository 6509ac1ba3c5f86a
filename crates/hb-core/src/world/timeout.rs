//! Per-tick processing of timed statuses

use strum::IntoEnumIterator;

use crate::monster::{process_monster_status, MonsterStatus};
use crate::player::{process_player_status, PlayerStatus};
use crate::world::{ActorRef, GameContext};

/// Which counter a tick processes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Monster(MonsterStatus),
    Player(PlayerStatus),
}

/// Process one status of one actor.
///
/// Returns true when the status wore off. Invalid or dead actors, and a
/// status kind that does not belong to the actor, are ignored.
pub fn process_timed_status(ctx: &mut GameContext, actor: ActorRef, tick: TickKind) -> bool {
    match (actor, tick) {
        (ActorRef::Monster(id), TickKind::Monster(status)) => {
            match process_monster_status(ctx, id, status) {
                Ok(ended) => ended,
                Err(err) => {
                    tracing::warn!(%err, ?status, "status tick ignored");
                    false
                }
            }
        }
        (ActorRef::Player, TickKind::Player(status)) => process_player_status(ctx, status),
        _ => {
            tracing::warn!(?actor, ?tick, "status kind does not match actor");
            false
        }
    }
}

/// Process one status for every live monster that has it, newest first.
///
/// Returns how many monsters lost the status.
pub fn process_monsters_timed(ctx: &mut GameContext, status: MonsterStatus) -> usize {
    let ids: Vec<_> = ctx
        .monsters
        .iter()
        .filter(|m| m.alive && m.timed.is_active(status))
        .map(|m| m.id)
        .collect();
    ids.into_iter()
        .rev()
        .filter(|&id| process_timed_status(ctx, ActorRef::Monster(id), TickKind::Monster(status)))
        .count()
}

/// One full status tick: every monster status, then every player status.
pub fn run_status_tick(ctx: &mut GameContext) {
    for status in MonsterStatus::iter() {
        process_monsters_timed(ctx, status);
    }
    for status in PlayerStatus::iter() {
        process_player_status(ctx, status);
    }
    ctx.game_turn += 1;
}
