//! Monster experience and evolution
//!
//! A monster that kills another gains experience; once it reaches its
//! species' threshold it turns, in place, into the next-tier species.

use super::monst::MonsterId;
use super::species::{RaceFlags, Species, SpeciesId};
use crate::consts::{speed_to_energy, MAX_SPEED, MONSTER_MAXHP};
use crate::rng::GameRng;
use crate::world::{capitalize, EngineError, GameContext, RedrawFlags};

// ============================================================================
// Speed
// ============================================================================

/// Speed of a freshly made (or evolved) individual of `species`.
///
/// Uniques and arena fighters move at exactly the species speed; everyone
/// else gets a small random spread around it.
pub fn individual_speed(species: &Species, arena: bool, rng: &mut GameRng) -> i16 {
    let mut speed = i32::from(species.speed);
    if !species.is_unique() && !arena {
        let spread = speed_to_energy(species.speed) / 10;
        if spread > 0 {
            speed += rng.rand_spread(0, spread);
        }
    }
    speed.min(i32::from(MAX_SPEED)) as i16
}

// ============================================================================
// Experience
// ============================================================================

/// Credit `killer` for the death of a `killed` monster, evolving it when the
/// threshold is reached.
pub fn monster_gain_exp(
    ctx: &mut GameContext,
    killer: MonsterId,
    killed: SpeciesId,
) -> Result<(), EngineError> {
    let monster = ctx.live_monster(killer)?;
    let species = ctx.species(monster.species)?;
    let Some(next) = species.next_species else {
        return Ok(());
    };
    if species.next_exp == 0 || ctx.options.arena {
        return Ok(());
    }
    let (killer_level, next_exp) = (species.level, species.next_exp);

    let victim = ctx.species(killed)?;
    let mut gain = victim.mexp * victim.level / (killer_level + 2);
    let riding = ctx.player.riding == Some(killer);
    if riding {
        gain = (gain + 1) / 2;
    }
    if ctx.floor.depth == 0 {
        gain /= 5;
    }

    let monster = ctx.monster_mut(killer)?;
    monster.exp += gain;
    let exp = monster.exp;
    tracing::trace!(?killer, gain, exp, "monster gained experience");

    if exp >= next_exp {
        evolve_monster(ctx, killer, next)?;
    }
    if riding {
        ctx.redraw |= RedrawFlags::BONUS;
    }
    Ok(())
}

fn evolve_monster(ctx: &mut GameContext, id: MonsterId, next: SpeciesId) -> Result<(), EngineError> {
    let old_name = ctx.monster_desc(id);
    let template = ctx.species(next)?.clone();
    let arena = ctx.options.arena;

    let mut max_maxhp = if template.flags.contains(RaceFlags::FORCE_MAXHP) {
        template.hit_dice.maxroll()
    } else {
        template.hit_dice.roll(&mut ctx.rng)
    };
    if ctx.options.nightmare {
        max_maxhp = (max_maxhp * 2).min(MONSTER_MAXHP);
    }
    let max_maxhp = max_maxhp.max(1);
    let speed = individual_speed(&template, arena, &mut ctx.rng);

    let monster = ctx.monster_mut(id)?;
    let old_species = monster.species;
    let old_hp = i64::from(monster.hp);
    let old_max = i64::from(monster.max_maxhp.max(1));

    monster.species = next;
    monster.apparent_species = next;
    monster.max_maxhp = max_maxhp;
    monster.maxhp = max_maxhp;
    monster.hp = (old_hp * i64::from(max_maxhp) / old_max) as i32;
    monster.speed = speed;
    monster.exp = 0;
    monster.dealt_damage = 0;
    // Tamed monsters keep their side unless the new form picks one
    let tag = template.alignment_tag();
    if !(monster.pet && tag.is_empty()) {
        monster.sub_align = tag;
    }
    let (pet, visible, pos, hp) = (monster.pet, monster.visible, monster.pos, monster.hp);
    tracing::debug!(?id, ?old_species, ?next, hp, max_maxhp, speed, "monster evolved");

    if !(pet || visible) {
        return Ok(());
    }
    ctx.monster_mut(id)?.parent = None;
    let hallucinating = ctx.player.is_hallucinating();
    if !ctx.options.ignore_unview || ctx.player_can_see(pos) {
        if hallucinating {
            let name = ctx
                .species
                .random_non_unique(&mut ctx.rng)
                .map_or_else(|| template.name.clone(), |s| s.name.clone());
            let verb = if ctx.rng.randint0(2) == 0 {
                "evolved into"
            } else {
                "degenerated into"
            };
            ctx.message(format!("{} {} {}.", capitalize(&old_name), verb, name));
        } else {
            ctx.message(format!("{} evolved into {}.", capitalize(&old_name), template.name));
        }
    }
    if !hallucinating {
        ctx.ledger.mark_can_evolve(old_species);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Floor, Position};
    use crate::monster::{SpeciesTable, SubAlign};
    use crate::player::{Player, PlayerStatus};
    use crate::world::EngineOptions;

    const WORM: SpeciesId = SpeciesId(0);
    const WORM_MASS: SpeciesId = SpeciesId(1);
    const RAT: SpeciesId = SpeciesId(2);
    const SNAGA: SpeciesId = SpeciesId(3);

    fn make_ctx(rng: GameRng) -> GameContext {
        let species: SpeciesTable = [
            Species::new(WORM, "worm", 5)
                .with_flags(RaceFlags::EVIL)
                .evolves_into(WORM_MASS, 10),
            Species::new(WORM_MASS, "worm mass", 12)
                .with_hit_dice(8, 10)
                .with_flags(RaceFlags::FORCE_MAXHP),
            Species::new(RAT, "giant rat", 7).with_exp(20),
            Species::new(SNAGA, "snaga", 3).with_exp(4),
        ]
        .into_iter()
        .collect();
        GameContext::new(
            Floor::new(20, 10),
            species,
            Player::new(Position::new(2, 2), 10),
            EngineOptions::default(),
            rng,
        )
    }

    fn spawn_worm(ctx: &mut GameContext) -> MonsterId {
        let id = ctx.spawn_monster(WORM, Position::new(2, 6)).unwrap();
        let worm = ctx.monster_mut(id).unwrap();
        worm.hp = 30;
        worm.maxhp = 40;
        worm.max_maxhp = 40;
        worm.sub_align = SubAlign::EVIL;
        id
    }

    #[test]
    fn test_evolution_rescales_hp() {
        // 20 * 7 / (5 + 2) = 20 >= 10
        let mut ctx = make_ctx(GameRng::new(5));
        let id = spawn_worm(&mut ctx);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();

        let worm = ctx.monster(id).unwrap();
        assert_eq!(worm.species, WORM_MASS);
        assert_eq!(worm.apparent_species, WORM_MASS);
        assert_eq!(worm.max_maxhp, 80);
        assert_eq!(worm.hp, 60);
        assert_eq!(worm.exp, 0);
        assert!((109..=111).contains(&worm.speed));
        assert_eq!(worm.sub_align, SubAlign::empty());
        assert_eq!(ctx.messages, vec!["The worm evolved into worm mass."]);
        assert!(ctx.ledger.lore(WORM).unwrap().can_evolve);
    }

    #[test]
    fn test_small_kill_only_accrues() {
        // 4 * 3 / 7 = 1
        let mut ctx = make_ctx(GameRng::new(5));
        let id = spawn_worm(&mut ctx);
        monster_gain_exp(&mut ctx, id, SNAGA).unwrap();
        let worm = ctx.monster(id).unwrap();
        assert_eq!(worm.species, WORM);
        assert_eq!(worm.exp, 1);
        assert!(ctx.messages.is_empty());
    }

    #[test]
    fn test_surface_divides_by_five() {
        let mut ctx = make_ctx(GameRng::new(5));
        ctx.floor.depth = 0;
        let id = spawn_worm(&mut ctx);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        assert_eq!(ctx.monster(id).unwrap().exp, 4);
    }

    #[test]
    fn test_arena_and_final_tier_gain_nothing() {
        let mut ctx = make_ctx(GameRng::new(5));
        ctx.options.arena = true;
        let id = spawn_worm(&mut ctx);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        assert_eq!(ctx.monster(id).unwrap().exp, 0);

        let mut ctx = make_ctx(GameRng::new(5));
        let rat = ctx.spawn_monster(RAT, Position::new(4, 4)).unwrap();
        monster_gain_exp(&mut ctx, rat, SNAGA).unwrap();
        assert_eq!(ctx.monster(rat).unwrap().exp, 0);
    }

    #[test]
    fn test_mount_gains_half_and_redraws() {
        // (20 + 1) / 2 = 10, just enough
        let mut ctx = make_ctx(GameRng::new(5));
        let id = spawn_worm(&mut ctx);
        ctx.player.riding = Some(id);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        assert_eq!(ctx.monster(id).unwrap().species, WORM_MASS);
        assert!(ctx.redraw.contains(RedrawFlags::BONUS));
    }

    #[test]
    fn test_pet_keeps_alignment() {
        let mut ctx = make_ctx(GameRng::new(5));
        let id = spawn_worm(&mut ctx);
        ctx.monster_mut(id).unwrap().pet = true;
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        assert_eq!(ctx.monster(id).unwrap().sub_align, SubAlign::EVIL);
    }

    #[test]
    fn test_hallucinated_evolution() {
        // speed spread raw 1 -> 0; species pick raw 2 -> giant rat; coin raw 1
        let mut ctx = make_ctx(GameRng::scripted([1, 2, 1]));
        let id = spawn_worm(&mut ctx);
        ctx.player.timed.set(PlayerStatus::Hallucination, 10);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        let worm = ctx.monster(id).unwrap();
        assert_eq!(worm.speed, 110);
        assert_eq!(ctx.messages, vec!["Something weird degenerated into giant rat."]);
        assert!(ctx.ledger.lore(WORM).is_none());
    }

    #[test]
    fn test_unseen_evolution_is_silent() {
        let mut ctx = make_ctx(GameRng::new(5));
        let id = spawn_worm(&mut ctx);
        let parent = ctx.spawn_monster(WORM, Position::new(6, 6)).unwrap();
        let worm = ctx.monster_mut(id).unwrap();
        worm.visible = false;
        worm.parent = Some(parent);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        let worm = ctx.monster(id).unwrap();
        assert_eq!(worm.species, WORM_MASS);
        assert_eq!(worm.parent, Some(parent));
        assert!(ctx.messages.is_empty());
        assert!(ctx.ledger.lore(WORM).is_none());
    }

    #[test]
    fn test_evolution_forgets_old_life() {
        let mut ctx = make_ctx(GameRng::new(5));
        let id = spawn_worm(&mut ctx);
        let parent = ctx.spawn_monster(WORM, Position::new(6, 6)).unwrap();
        let worm = ctx.monster_mut(id).unwrap();
        worm.dealt_damage = 25;
        worm.parent = Some(parent);
        monster_gain_exp(&mut ctx, id, RAT).unwrap();
        let worm = ctx.monster(id).unwrap();
        assert_eq!(worm.species, WORM_MASS);
        assert_eq!(worm.dealt_damage, 0);
        assert_eq!(worm.parent, None);
    }

    #[test]
    fn test_individual_speed() {
        let mut rng = GameRng::new(9);
        let unique = Species::new(SpeciesId(0), "Grip", 2)
            .with_speed(120)
            .with_flags(RaceFlags::UNIQUE);
        assert_eq!(individual_speed(&unique, false, &mut rng), 120);
        let common = Species::new(SpeciesId(1), "jackal", 1).with_speed(120);
        assert_eq!(individual_speed(&common, true, &mut rng), 120);
        assert_eq!(rng.call_count(), 0);
        for _ in 0..50 {
            let speed = individual_speed(&common, false, &mut rng);
            assert!((118..=122).contains(&speed));
        }
        let fastest = Species::new(SpeciesId(2), "blur", 1).with_speed(MAX_SPEED);
        assert!(individual_speed(&fastest, false, &mut rng) <= MAX_SPEED);
    }
}
