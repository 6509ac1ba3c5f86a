//! Monster spell casting against other monsters
//!
//! The caster picks a spell uniformly from what it may legally cast, then
//! two checks can stop it in this order: a stunned caster may fumble, and
//! the player's anti-magic barrier cancels anything that is not innate.

use super::monst::MonsterId;
use super::spells::MonsterSpell;
use crate::effect::resolve_effect;
use crate::player::{MimicEntry, PlayerClass};
use crate::world::{capitalize, ActorRef, EngineError, GameContext, RedrawFlags};

/// Let `caster` cast a spell at `target`.
///
/// Returns whether a cast was attempted; fumbled and cancelled casts count,
/// an empty repertoire or an illegal target does not.
pub fn cast_monster_spell(ctx: &mut GameContext, caster: MonsterId, target: ActorRef) -> bool {
    let ActorRef::Monster(target) = target else {
        tracing::debug!(?caster, "monster spells at the player are handled elsewhere");
        return false;
    };
    match try_cast(ctx, caster, target) {
        Ok(attempted) => attempted,
        Err(err) => {
            tracing::warn!(%err, ?caster, ?target, "cast rejected");
            false
        }
    }
}

/// Spells `caster` may throw at `target` right now
fn legal_spells(
    ctx: &GameContext,
    caster: MonsterId,
    target: MonsterId,
) -> Result<Vec<MonsterSpell>, EngineError> {
    let monster = ctx.live_monster(caster)?;
    if monster.is_confused() || caster == target {
        return Ok(Vec::new());
    }
    let victim = ctx.live_monster(target)?;
    if !ctx.projectable(monster.pos, victim.pos) {
        return Ok(Vec::new());
    }
    let mut spells = MonsterSpell::from_set(ctx.species(monster.species)?.spells);
    if ctx.floor.no_magic {
        spells.retain(|spell| spell.is_innate());
    }
    Ok(spells)
}

fn try_cast(ctx: &mut GameContext, caster: MonsterId, target: MonsterId) -> Result<bool, EngineError> {
    let spells = legal_spells(ctx, caster, target)?;
    if spells.is_empty() {
        tracing::trace!(?caster, ?target, "no legal spell");
        return Ok(false);
    }
    let spell = spells[ctx.rng.randint0(spells.len() as i32) as usize];

    let monster = ctx.live_monster(caster)?;
    let (species_id, hp, stunned) = (monster.species, monster.hp, monster.is_stunned());
    let seen = ctx.is_seen(caster);
    let can_remember = ctx.is_original_ap_and_seen(caster);
    let caster_name = ctx.monster_desc(caster);
    if ctx.player.riding == Some(caster) {
        ctx.player.disturbed = true;
    }

    if !spell.is_innate() && stunned && !ctx.rng.one_in(2) {
        ctx.player.disturbed = true;
        if seen {
            ctx.message(format!("{} tries to cast a spell, but fails.", capitalize(&caster_name)));
        }
        tracing::debug!(?caster, %spell, "stunned caster fumbled");
        return Ok(true);
    }

    if !spell.is_innate() && ctx.player.anti_magic {
        if seen {
            ctx.message(format!("Anti magic barrier cancels the spell which {caster_name} casts."));
        }
        tracing::debug!(?caster, %spell, "cast cancelled by anti-magic");
        return Ok(true);
    }

    if seen || ctx.is_seen(target) {
        let target_name = ctx.monster_desc(target);
        ctx.message(format!("{} {} {}.", capitalize(&caster_name), spell.verb(), target_name));
    }
    let dam = spell.damage(ctx.species.get(species_id)?, hp, &mut ctx.rng);
    tracing::debug!(?caster, ?target, %spell, dam, "monster casts");
    resolve_effect(
        ctx,
        ActorRef::Monster(caster),
        ActorRef::Monster(target),
        spell.effect_kind(),
        dam,
    );

    if seen
        && !ctx.player.is_blind()
        && ctx.player.class == PlayerClass::Imitator
        && spell != MonsterSpell::Special
    {
        ctx.player.learn_mimic(MimicEntry { spell, damage: dam });
        ctx.redraw |= RedrawFlags::IMITATION;
    }
    if can_remember {
        ctx.ledger.record_spell(species_id, spell.flag());
    }
    if ctx.player.is_dead && !ctx.options.arena {
        ctx.ledger.note_death(species_id);
    }
    Ok(true)
}
