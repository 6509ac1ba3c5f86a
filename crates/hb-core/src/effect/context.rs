//! Per-call effect state

use serde::{Deserialize, Serialize};

use super::kind::EffectKind;
use super::ladder::Verdict;
use crate::monster::{MonsterId, MonsterStatus, SpeciesId};
use crate::world::{capitalize, ActorRef, EngineError, GameContext};

/// Working state of one resolution call.
///
/// Built from a snapshot of the source and target, mutated by the family
/// rule and the pipeline, then dropped when the call returns.
#[derive(Debug, Clone)]
pub struct EffectContext {
    pub source: ActorRef,
    pub target: MonsterId,
    pub kind: EffectKind,
    /// Damage as rolled by the caller
    pub raw_dam: i32,
    /// Damage still to be dealt
    pub dam: i32,
    pub caster_level: i32,
    /// Real species of the target
    pub species: SpeciesId,
    /// How the player refers to the target, fixed before it moves
    pub name: String,

    /// Target is visible to the player
    pub seen: bool,
    /// Narration about the target reaches the player
    pub seen_msg: bool,
    /// The player can tell something happened
    pub obvious: bool,
    pub skipped: bool,
    /// Observations may enter the knowledge ledger
    pub can_record: bool,

    pub verdict: Verdict,
    pub note: Option<&'static str>,
    pub note_dies: &'static str,

    pub do_conf: i32,
    pub do_stun: i32,
    pub do_fear: i32,
    pub do_sleep: i32,
    pub do_slow: i32,
    /// Teleport distance, 0 for none
    pub do_dist: i32,
}

impl EffectContext {
    /// Snapshot a resolution call; fails on a stale or dead actor.
    pub fn new(
        ctx: &GameContext,
        source: ActorRef,
        target: MonsterId,
        kind: EffectKind,
        dam: i32,
    ) -> Result<Self, EngineError> {
        let monster = ctx.live_monster(target)?;
        let caster_level = match source {
            ActorRef::Player => ctx.player.level,
            ActorRef::Monster(id) => {
                ctx.live_monster(id)?;
                ctx.species_of(id)?.level.max(1)
            }
        };
        ctx.species(monster.species)?;

        let seen = monster.visible;
        let seen_msg = ctx.is_seen(target);
        Ok(Self {
            source,
            target,
            kind,
            raw_dam: dam,
            dam,
            caster_level,
            species: monster.species,
            name: ctx.monster_desc(target),
            seen,
            seen_msg,
            obvious: source == ActorRef::Player && seen,
            skipped: false,
            can_record: source == ActorRef::Player && ctx.is_original_ap_and_seen(target),
            verdict: Verdict::Normal,
            note: None,
            note_dies: " dies.",
            do_conf: 0,
            do_stun: 0,
            do_fear: 0,
            do_sleep: 0,
            do_slow: 0,
            do_dist: 0,
        })
    }

    /// Stop here: nothing reaches the target
    pub fn skip(&mut self) {
        self.skipped = true;
        self.dam = 0;
    }

    pub fn source_is_player(&self) -> bool {
        self.source == ActorRef::Player
    }

    /// "<Target><note>" if the player follows the target
    pub fn narrate(&self, ctx: &mut GameContext, note: &str) {
        if self.seen_msg {
            ctx.message(format!("{}{}", capitalize(&self.name), note));
        }
    }
}

/// What a resolution call did
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectOutcome {
    /// Hit points actually removed from the target
    pub final_damage: i32,
    /// Statuses applied to the target, in application order
    pub statuses: Vec<MonsterStatus>,
    pub fatal: bool,
    pub obvious: bool,
    pub skipped: bool,
    pub verdict: Verdict,
}

impl EffectOutcome {
    /// No-op result for an invalid call
    pub fn rejected() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Floor, Position};
    use crate::monster::{Species, SpeciesTable};
    use crate::player::{Player, PlayerStatus};
    use crate::rng::GameRng;
    use crate::world::EngineOptions;

    fn make_ctx() -> (GameContext, MonsterId) {
        let species: SpeciesTable = [Species::new(SpeciesId(0), "kobold", 3)].into_iter().collect();
        let mut ctx = GameContext::new(
            Floor::new(12, 8),
            species,
            Player::new(Position::new(2, 2), 7),
            EngineOptions::default(),
            GameRng::new(5),
        );
        let id = ctx.spawn_monster(SpeciesId(0), Position::new(2, 6)).unwrap();
        (ctx, id)
    }

    #[test]
    fn test_snapshot_from_player() {
        let (ctx, id) = make_ctx();
        let ec = EffectContext::new(&ctx, ActorRef::Player, id, EffectKind::Fire, 10).unwrap();
        assert_eq!(ec.caster_level, 7);
        assert!(ec.obvious);
        assert!(ec.can_record);
        assert_eq!(ec.note_dies, " dies.");
    }

    #[test]
    fn test_hallucination_blocks_recording() {
        let (mut ctx, id) = make_ctx();
        ctx.player.timed.set(PlayerStatus::Hallucination, 5);
        let ec = EffectContext::new(&ctx, ActorRef::Player, id, EffectKind::Fire, 10).unwrap();
        assert!(ec.obvious);
        assert!(!ec.can_record);
    }

    #[test]
    fn test_monster_source_never_records() {
        let (mut ctx, id) = make_ctx();
        let other = ctx.spawn_monster(SpeciesId(0), Position::new(4, 6)).unwrap();
        let ec = EffectContext::new(&ctx, ActorRef::Monster(other), id, EffectKind::Fire, 10).unwrap();
        assert_eq!(ec.caster_level, 3);
        assert!(!ec.obvious);
        assert!(!ec.can_record);
    }

    #[test]
    fn test_stale_target_rejected() {
        let (mut ctx, id) = make_ctx();
        ctx.monster_mut(id).unwrap().alive = false;
        assert!(EffectContext::new(&ctx, ActorRef::Player, id, EffectKind::Fire, 10).is_err());
        assert!(EffectContext::new(&ctx, ActorRef::Player, MonsterId(9), EffectKind::Fire, 10).is_err());
    }
}
