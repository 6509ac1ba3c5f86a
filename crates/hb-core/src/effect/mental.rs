//! Old-style mind spells: confusion, sleep and slowness
//!
//! These never deal damage. Uniques and strong-willed monsters ignore them.

use super::context::EffectContext;
use super::kind::EffectKind;
use super::ladder::{level_save, Learn, Rung, RungInput, Verdict};
use super::pipeline::EffectRule;
use crate::monster::RaceFlags;
use crate::world::{EngineError, GameContext};

pub struct Mental;

fn unconfusable(input: &mut RungInput<'_>) -> bool {
    input.species.is_unique()
        || input.species.flags.contains(RaceFlags::NO_CONF)
        || level_save(input)
}

fn sleepless(input: &mut RungInput<'_>) -> bool {
    input.species.is_unique()
        || input.species.flags.contains(RaceFlags::NO_SLEEP)
        || level_save(input)
}

fn unslowable(input: &mut RungInput<'_>) -> bool {
    input.species.is_unique() || level_save(input)
}

const CONFUSE: &[Rung] = &[Rung::new(Verdict::Immune, unconfusable)
    .note(" is unaffected.")
    .learn(Learn::Flag(RaceFlags::NO_CONF))];

const SLEEP: &[Rung] = &[Rung::new(Verdict::Immune, sleepless)
    .note(" is unaffected.")
    .learn(Learn::Flag(RaceFlags::NO_SLEEP))];

const SLOW: &[Rung] = &[Rung::new(Verdict::Immune, unslowable).note(" is unaffected.")];

impl EffectRule for Mental {
    fn prelude(&self, ctx: &mut GameContext, ec: &mut EffectContext) {
        if ec.kind == EffectKind::OldConfuse {
            ec.do_conf = ctx.rng.damroll(3, ec.dam / 2) + 1;
        }
    }

    fn ladder(&self, kind: EffectKind) -> &'static [Rung] {
        match kind {
            EffectKind::OldConfuse => CONFUSE,
            EffectKind::OldSleep => SLEEP,
            _ => SLOW,
        }
    }

    fn on_verdict(&self, _ctx: &mut GameContext, ec: &mut EffectContext) -> Result<(), EngineError> {
        if ec.verdict == Verdict::Immune {
            ec.do_conf = 0;
            ec.obvious = false;
        } else {
            match ec.kind {
                EffectKind::OldSleep => {
                    ec.note = Some(" falls asleep!");
                    ec.do_sleep = 500;
                }
                EffectKind::OldSlow => ec.do_slow = 50,
                _ => {}
            }
        }
        ec.dam = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::dungeon::{Floor, Position};
    use crate::effect::{resolve_effect, EffectKind, Verdict};
    use crate::monster::{MonsterId, MonsterStatus, RaceFlags, Species, SpeciesId, SpeciesTable};
    use crate::player::Player;
    use crate::rng::GameRng;
    use crate::world::{ActorRef, EngineOptions, GameContext};

    fn make_ctx(rng: GameRng, flags: RaceFlags) -> (GameContext, MonsterId) {
        let species: SpeciesTable = [Species::new(SpeciesId(0), "bandit", 10)
            .with_hit_dice(10, 10)
            .with_flags(flags)]
        .into_iter()
        .collect();
        let mut ctx = GameContext::new(
            Floor::new(12, 8),
            species,
            Player::new(Position::new(2, 2), 10),
            EngineOptions::default(),
            rng,
        );
        let id = ctx.spawn_monster(SpeciesId(0), Position::new(2, 6)).unwrap();
        (ctx, id)
    }

    #[test]
    fn test_confuse() {
        // damroll(3, 15) raws 4,4,4 -> 15 + 1; level save randint1(20) raw 5 -> 16 >= 10
        let (mut ctx, id) = make_ctx(GameRng::scripted([4, 4, 4, 5]), RaceFlags::empty());
        let outcome = resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldConfuse, 30);
        assert_eq!(outcome.final_damage, 0);
        assert_eq!(outcome.statuses, vec![MonsterStatus::Confused]);
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Confused), 16);
        assert_eq!(ctx.messages, vec!["The bandit looks confused."]);
    }

    #[test]
    fn test_no_conf_unaffected() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([0, 0, 0]), RaceFlags::NO_CONF);
        let outcome = resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldConfuse, 30);
        assert_eq!(outcome.verdict, Verdict::Immune);
        assert!(!outcome.obvious);
        assert!(!ctx.monster(id).unwrap().is_confused());
        assert_eq!(ctx.messages, vec!["The bandit is unaffected."]);
        assert!(ctx.ledger.knows_flag(SpeciesId(0), RaceFlags::NO_CONF));
    }

    #[test]
    fn test_sleep() {
        // level save randint1(10) raw 9 -> 20 > 10
        let (mut ctx, id) = make_ctx(GameRng::scripted([9]), RaceFlags::empty());
        let outcome = resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldSleep, 20);
        assert_eq!(outcome.statuses, vec![MonsterStatus::Sleep]);
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Sleep), 500);
        assert_eq!(ctx.messages, vec!["The bandit falls asleep!"]);
    }

    #[test]
    fn test_sleep_never_shortens_deeper_sleep() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([9]), RaceFlags::empty());
        ctx.monster_mut(id).unwrap().timed.set(MonsterStatus::Sleep, 2000);
        let outcome = resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldSleep, 20);
        assert_eq!(outcome.statuses, vec![MonsterStatus::Sleep]);
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Sleep), 2000);
    }

    #[test]
    fn test_slow_stacks() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([9, 9]), RaceFlags::empty());
        resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldSlow, 20);
        resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldSlow, 20);
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Slow), 100);
        // Only the first application switches the status on
        assert_eq!(ctx.messages, vec!["The bandit starts moving slower."]);
    }

    #[test]
    fn test_unique_unaffected_without_draws() {
        let (mut ctx, id) = make_ctx(GameRng::new(1), RaceFlags::UNIQUE);
        resolve_effect(&mut ctx, ActorRef::Player, ActorRef::Monster(id), EffectKind::OldSlow, 20);
        assert_eq!(ctx.rng.call_count(), 0);
        assert_eq!(ctx.messages, vec!["Bandit is unaffected."]);
    }
}
