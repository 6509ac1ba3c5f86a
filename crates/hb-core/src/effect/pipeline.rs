//! Effect resolution pipeline
//!
//! One call resolves one effect against one monster:
//!
//! 1. reject stale references before touching anything
//! 2. family gate (holy effects only touch undead, evil, ...)
//! 3. sight gate for gazes
//! 4. family prelude (rolls statuses the ladder may cancel)
//! 5. classifier ladder, then the family's verdict hook
//! 6. secondary status roll
//! 7. damage modifiers, confusion and stun, teleport
//! 8. hit points, then death or lingering statuses
//! 9. narration

use super::context::{EffectContext, EffectOutcome};
use super::elemental::Elemental;
use super::holy::Holy;
use super::kind::EffectKind;
use super::ladder::{climb, Learn, Rung, RungInput};
use super::mental::Mental;
use super::psychic::Psychic;
use crate::dungeon::los;
use crate::monster::{
    mon_damage_mod, monster_gain_exp, set_monster_timed, MonsterId, MonsterStatus, RaceFlags,
    ResistFlags, Species, SpeciesId,
};
use crate::world::{capitalize, ActorRef, EngineError, GameContext, RedrawFlags};

/// Resolution rules of one effect family
pub trait EffectRule: Sync {
    /// Whether the effect touches this species at all.
    ///
    /// `Some(flags)` lets it through and names the race flags the player
    /// learns from that; `None` leaves the target untouched.
    fn gate(&self, _kind: EffectKind, _species: &Species) -> Option<RaceFlags> {
        Some(RaceFlags::empty())
    }

    /// Rolls made before the ladder
    fn prelude(&self, _ctx: &mut GameContext, _ec: &mut EffectContext) {}

    fn ladder(&self, kind: EffectKind) -> &'static [Rung];

    /// React to the ladder's verdict
    fn on_verdict(&self, _ctx: &mut GameContext, _ec: &mut EffectContext) -> Result<(), EngineError> {
        Ok(())
    }

    /// Extra status roll on a hit
    fn secondary(&self, _ctx: &mut GameContext, _ec: &mut EffectContext) {}

    /// Narration if the effect kills
    fn note_dies(&self, _kind: EffectKind, species: &Species) -> &'static str {
        default_note_dies(species)
    }
}

static RULES: [&dyn EffectRule; 4] = [&Psychic, &Holy, &Elemental, &Mental];

/// The rule resolving an effect kind
pub fn rule_for(kind: EffectKind) -> &'static dyn EffectRule {
    RULES[kind.family() as usize]
}

pub fn default_note_dies(species: &Species) -> &'static str {
    if species.is_living() {
        " dies."
    } else {
        " is destroyed."
    }
}

/// Resolve an effect from `source` against `target`.
///
/// Stale references and targets the engine does not resolve here (the
/// player, or a monster aiming at itself) produce a rejected no-op outcome.
pub fn resolve_effect(
    ctx: &mut GameContext,
    source: ActorRef,
    target: ActorRef,
    kind: EffectKind,
    dam: i32,
) -> EffectOutcome {
    let ActorRef::Monster(target) = target else {
        tracing::warn!(err = %EngineError::InvalidReference(target), %kind, "effect rejected");
        return EffectOutcome::rejected();
    };
    if source == ActorRef::Monster(target) {
        tracing::debug!(?target, %kind, "monster cannot target itself");
        return EffectOutcome::rejected();
    }
    match resolve_on_monster(ctx, source, target, kind, dam) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(%err, %kind, "effect rejected");
            EffectOutcome::rejected()
        }
    }
}

fn resolve_on_monster(
    ctx: &mut GameContext,
    source: ActorRef,
    target: MonsterId,
    kind: EffectKind,
    dam: i32,
) -> Result<EffectOutcome, EngineError> {
    let mut ec = EffectContext::new(ctx, source, target, kind, dam)?;
    let source_pos = ctx.position_of(source)?;
    let target_pos = ctx.monster(target)?.pos;
    let rule = rule_for(kind);
    tracing::debug!(?source, ?target, %kind, dam, "resolving effect");

    let gate = {
        let species = ctx.species(ec.species)?;
        ec.note_dies = rule.note_dies(kind, species);
        rule.gate(kind, species).map(|learned| learned & species.flags)
    };
    let Some(learned) = gate else {
        tracing::trace!(%kind, "target outside the effect's family");
        ec.skip();
        return Ok(finish(&ec, 0, Vec::new(), false));
    };
    if ec.can_record && !learned.is_empty() {
        record_learned(ctx, ec.species, Learn::Flag(learned));
    }

    if kind.requires_sight() && !los(&ctx.floor, target_pos, source_pos) {
        let text = format!(
            "{} can't see {}, and isn't affected!",
            capitalize(&ec.name),
            ctx.actor_desc(source)
        );
        if ec.seen_msg {
            ctx.message(text);
        }
        tracing::debug!(?target, "gaze blocked by line of sight");
        ec.skip();
        return Ok(finish(&ec, 0, Vec::new(), false));
    }

    rule.prelude(ctx, &mut ec);

    let climbed = {
        let species = ctx.species.get(ec.species)?;
        let mut input = RungInput {
            kind,
            species,
            dam: ec.dam,
            caster_level: ec.caster_level,
            rng: &mut ctx.rng,
        };
        climb(rule.ladder(kind), &mut input)
    };
    ec.verdict = climbed.verdict;
    ec.dam = climbed.dam;
    if climbed.note.is_some() {
        ec.note = climbed.note;
    }
    if ec.can_record {
        record_learned(ctx, ec.species, climbed.learn);
    }
    tracing::debug!(verdict = %ec.verdict, dam = ec.dam, "classified");

    rule.on_verdict(ctx, &mut ec)?;
    if ec.skipped || !ctx.monster(target)?.alive {
        return Ok(finish(&ec, 0, Vec::new(), false));
    }
    rule.secondary(ctx, &mut ec);

    ec.dam = mon_damage_mod(ctx, target, ec.dam)?;

    let mut statuses = Vec::new();
    apply_stun_and_confusion(ctx, &mut ec, &mut statuses)?;

    if ec.do_dist > 0 {
        if ec.seen {
            ec.obvious = true;
        }
        ec.note = Some(" disappears!");
        ctx.teleport_monster(target, ec.do_dist);
    }

    let mut final_damage = 0;
    let mut fatal = false;
    if ec.dam > 0 {
        final_damage = ec.dam;
        fatal = hurt_monster(ctx, target, ec.dam, source)?;
    }

    if fatal {
        kill_monster(ctx, target, source, ec.note_dies)?;
    } else {
        apply_lingering(ctx, &mut ec, &mut statuses)?;
        if let Some(note) = ec.note {
            ec.narrate(ctx, note);
        }
    }

    Ok(finish(&ec, final_damage, statuses, fatal))
}

fn finish(ec: &EffectContext, final_damage: i32, statuses: Vec<MonsterStatus>, fatal: bool) -> EffectOutcome {
    EffectOutcome {
        final_damage,
        statuses,
        fatal,
        obvious: ec.obvious,
        skipped: ec.skipped,
        verdict: ec.verdict,
    }
}

/// Add what the player just learned to the ledger
pub(super) fn record_learned(ctx: &mut GameContext, species: SpeciesId, learn: Learn) {
    let new = match learn {
        Learn::Nothing => false,
        Learn::Flag(flags) => ctx.ledger.record_flag(species, flags),
        Learn::Resist(resist) => ctx.ledger.record_resist(species, resist),
    };
    if new {
        tracing::trace!(?species, ?learn, "knowledge recorded");
    }
}

fn apply_stun_and_confusion(
    ctx: &mut GameContext,
    ec: &mut EffectContext,
    statuses: &mut Vec<MonsterStatus>,
) -> Result<(), EngineError> {
    let (flags, resist) = {
        let species = ctx.species(ec.species)?;
        (species.flags, species.resist)
    };
    let resist_all = resist.contains(ResistFlags::RES_ALL);

    if ec.do_stun > 0 && !flags.contains(RaceFlags::NO_STUN) && !resist_all {
        if ec.seen {
            ec.obvious = true;
        }
        let cur = i32::from(ctx.monster(ec.target)?.timed.get(MonsterStatus::Stun));
        let value = if cur > 0 {
            ec.note = Some(" is more dazed.");
            cur + ec.do_stun / 2
        } else {
            ec.note = Some(" is dazed.");
            ec.do_stun
        };
        set_monster_timed(ctx, ec.target, MonsterStatus::Stun, value)?;
        statuses.push(MonsterStatus::Stun);
    }

    if ec.do_conf > 0 && !flags.contains(RaceFlags::NO_CONF) && !resist_all {
        if ec.seen {
            ec.obvious = true;
        }
        let cur = i32::from(ctx.monster(ec.target)?.timed.get(MonsterStatus::Confused));
        let value = if cur > 0 {
            ec.note = Some(" looks more confused.");
            cur + ec.do_conf / 2
        } else {
            ec.note = Some(" looks confused.");
            ec.do_conf
        };
        set_monster_timed(ctx, ec.target, MonsterStatus::Confused, value)?;
        statuses.push(MonsterStatus::Confused);
    }
    Ok(())
}

fn apply_lingering(
    ctx: &mut GameContext,
    ec: &mut EffectContext,
    statuses: &mut Vec<MonsterStatus>,
) -> Result<(), EngineError> {
    let flags = ctx.species(ec.species)?.flags;
    let target = ec.target;

    if ec.do_sleep > 0 && !flags.contains(RaceFlags::NO_SLEEP) {
        if ec.seen {
            ec.obvious = true;
        }
        let cur = i32::from(ctx.monster(target)?.timed.get(MonsterStatus::Sleep));
        set_monster_timed(ctx, target, MonsterStatus::Sleep, cur.max(ec.do_sleep))?;
        statuses.push(MonsterStatus::Sleep);
    }

    if ec.do_fear > 0 && !flags.contains(RaceFlags::NO_FEAR) {
        let cur = i32::from(ctx.monster(target)?.timed.get(MonsterStatus::Fear));
        set_monster_timed(ctx, target, MonsterStatus::Fear, cur + ec.do_fear)?;
        statuses.push(MonsterStatus::Fear);
    }

    if ec.do_slow > 0 {
        let cur = i32::from(ctx.monster(target)?.timed.get(MonsterStatus::Slow));
        if set_monster_timed(ctx, target, MonsterStatus::Slow, cur + ec.do_slow)? {
            ec.note = Some(" starts moving slower.");
        }
        statuses.push(MonsterStatus::Slow);
    }
    Ok(())
}

/// Take hit points from a monster, waking it.
///
/// Returns true when the monster dropped below the death floor; the caller
/// then runs [`kill_monster`].
pub(super) fn hurt_monster(
    ctx: &mut GameContext,
    id: MonsterId,
    dam: i32,
    attacker: ActorRef,
) -> Result<bool, EngineError> {
    let monster = ctx.monster_mut(id)?;
    monster.hp -= dam;
    if attacker == ActorRef::Player {
        monster.dealt_damage += dam;
    }
    let hp = monster.hp;
    set_monster_timed(ctx, id, MonsterStatus::Sleep, 0)?;
    if ctx.player.riding == Some(id) {
        ctx.redraw |= RedrawFlags::HEALTH;
    }
    tracing::trace!(?id, dam, hp, "monster hurt");
    Ok(hp < ctx.options.death_floor)
}

/// Run the death transition of a monster exactly once
pub(super) fn kill_monster(
    ctx: &mut GameContext,
    id: MonsterId,
    killer: ActorRef,
    note_dies: &str,
) -> Result<(), EngineError> {
    let seen = ctx.is_seen(id);
    let known = ctx.is_original_ap_and_seen(id);
    let name = ctx.monster_desc(id);

    let monster = ctx.live_monster(id)?;
    let (pos, species) = (monster.pos, monster.species);
    if let Some(monster) = ctx.monsters.get_mut(id.index()) {
        monster.alive = false;
    }
    ctx.floor.set_occupant(pos, None);
    if ctx.player.riding == Some(id) {
        ctx.player.riding = None;
        ctx.redraw |= RedrawFlags::BONUS;
    }
    tracing::debug!(?id, ?killer, "monster died");

    if seen {
        ctx.message(format!("{}{}", capitalize(&name), note_dies));
    }

    match killer {
        ActorRef::Player => {
            if known {
                ctx.ledger.note_kill(species);
            }
            let template = ctx.species(species)?;
            let gain = template.mexp * template.level / ctx.player.level.max(1);
            ctx.player.exp += gain;
            tracing::trace!(gain, "player gains experience");
        }
        ActorRef::Monster(killer) => {
            if ctx.live_monster(killer).is_ok() {
                monster_gain_exp(ctx, killer, species)?;
            }
        }
    }
    Ok(())
}
