//! Psychic effects: mind blasts, psychic drain and telekinesis
//!
//! Minds that are empty are immune, dull or strong minds resist, and a
//! corrupted mind (undead or demonic) may hurl the attack back at its source.

use super::context::EffectContext;
use super::kind::EffectKind;
use super::ladder::{Learn, Rung, RungInput, Scale, Verdict};
use super::pipeline::{default_note_dies, hurt_monster, kill_monster, EffectRule};
use crate::monster::{set_monster_timed, MonsterId, MonsterStatus, RaceFlags, Species};
use crate::player::{set_player_timed, take_hit, PlayerClass, PlayerStatus};
use crate::world::{capitalize, possessive, ActorRef, EngineError, GameContext, RedrawFlags};

pub struct Psychic;

fn mindless(input: &mut RungInput<'_>) -> bool {
    input.species.is_mindless()
}

fn dull_or_strong(input: &mut RungInput<'_>) -> bool {
    input.species.has_dull_mind() || input.species.level > input.rng.randint1(input.dam.saturating_mul(3))
}

fn corrupted_backlash(input: &mut RungInput<'_>) -> bool {
    input.species.is_corrupted()
        && input.species.level > input.caster_level / 2
        && input.rng.one_in(2)
}

fn steady(input: &mut RungInput<'_>) -> bool {
    input.species.is_unique() || input.species.level > 5 + input.rng.randint1(input.dam)
}

const DULL_MIND: RaceFlags = RaceFlags::STUPID
    .union(RaceFlags::WEIRD_MIND)
    .union(RaceFlags::ANIMAL);

const IMMUNE: Rung = Rung::new(Verdict::Immune, mindless)
    .scale(Scale::Zero)
    .note(" is immune.")
    .learn(Learn::Flag(RaceFlags::EMPTY_MIND));

const PSI: &[Rung] = &[
    IMMUNE,
    Rung::new(Verdict::Resist, dull_or_strong)
        .scale(Scale::Div(3))
        .note(" resists!")
        .learn(Learn::Flag(DULL_MIND)),
    Rung::new(Verdict::Reflect, corrupted_backlash),
];

const DRAIN_REFLECT: &[Rung] = &[Rung::new(Verdict::Reflect, corrupted_backlash)];

// A drain teaches nothing and keeps its full force when turned back
const PSI_DRAIN: &[Rung] = &[
    Rung::new(Verdict::Immune, mindless)
        .scale(Scale::Zero)
        .note(" is immune."),
    Rung::new(Verdict::Backlash, dull_or_strong).nested(DRAIN_REFLECT),
];

const TELEKINESIS: &[Rung] = &[Rung::new(Verdict::Resist, steady)];

impl EffectRule for Psychic {
    fn prelude(&self, ctx: &mut GameContext, ec: &mut EffectContext) {
        if ec.kind != EffectKind::Telekinesis {
            return;
        }
        if ctx.rng.one_in(4) {
            ec.do_dist = if ctx.player.riding == Some(ec.target) { 0 } else { 7 };
        }
        ec.do_stun = ctx.rng.damroll(ec.caster_level / 20 + 3, ec.dam) + 1;
    }

    fn ladder(&self, kind: EffectKind) -> &'static [Rung] {
        match kind {
            EffectKind::Psi => PSI,
            EffectKind::PsiDrain => PSI_DRAIN,
            _ => TELEKINESIS,
        }
    }

    fn on_verdict(&self, ctx: &mut GameContext, ec: &mut EffectContext) -> Result<(), EngineError> {
        match (ec.kind, ec.verdict) {
            (EffectKind::Psi, Verdict::Reflect) => {
                backlash_message(ctx, ec);
                reflect_onto_source(ctx, ec)?;
                ec.dam = 0;
            }
            (EffectKind::PsiDrain, Verdict::Reflect) => backlash_message(ctx, ec),
            (EffectKind::PsiDrain, Verdict::Backlash) => {
                drain_backlash(ctx, ec)?;
                ec.dam = 0;
            }
            (EffectKind::PsiDrain, Verdict::Normal) if ec.dam > 0 => convert_pain(ctx, ec),
            (EffectKind::Telekinesis, Verdict::Resist) => {
                ec.do_stun = 0;
                ec.obvious = false;
            }
            _ => {}
        }
        Ok(())
    }

    fn secondary(&self, ctx: &mut GameContext, ec: &mut EffectContext) {
        if ec.kind != EffectKind::Psi || ec.dam <= 0 || !ctx.rng.one_in(4) {
            return;
        }
        let dam = ec.dam;
        match ctx.rng.randint1(4) {
            1 => ec.do_conf = 3 + ctx.rng.randint1(dam),
            2 => ec.do_stun = 3 + ctx.rng.randint1(dam),
            3 => ec.do_fear = 3 + ctx.rng.randint1(dam),
            _ => {
                ec.note = Some(" falls asleep!");
                ec.do_sleep = 3 + ctx.rng.randint1(dam);
            }
        }
        tracing::trace!(
            conf = ec.do_conf,
            stun = ec.do_stun,
            fear = ec.do_fear,
            sleep = ec.do_sleep,
            "psychic aftershock"
        );
    }

    fn note_dies(&self, kind: EffectKind, species: &Species) -> &'static str {
        match kind {
            EffectKind::Psi | EffectKind::PsiDrain => " collapses, a mindless husk.",
            _ => default_note_dies(species),
        }
    }
}

fn backlash_message(ctx: &mut GameContext, ec: &EffectContext) {
    let whose = if ec.seen_msg {
        possessive(&capitalize(&ec.name))
    } else {
        "Its".to_string()
    };
    let attack = if ec.source_is_player() { "your" } else { "the" };
    ctx.message(format!("{whose} corrupted mind backlashes {attack} attack!"));
    tracing::debug!(target = ?ec.target, source = ?ec.source, "psychic attack reflected");
}

/// The player's saving throw against a reflected mind attack
fn player_saves(ctx: &mut GameContext, ec: &EffectContext) -> Result<bool, EngineError> {
    let level = ctx.species(ec.species)?.level;
    Ok(ctx.rng.randint0(100 + level / 2) < ctx.player.skill_sav && !ctx.check_multishadow())
}

/// Hit a monster caster with its own reflected attack
fn hurt_source_monster(
    ctx: &mut GameContext,
    ec: &EffectContext,
    source: MonsterId,
) -> Result<bool, EngineError> {
    let reflector = ActorRef::Monster(ec.target);
    if hurt_monster(ctx, source, ec.dam, reflector)? {
        let note = default_note_dies(ctx.species_of(source)?);
        kill_monster(ctx, source, reflector, note)?;
        return Ok(false);
    }
    Ok(true)
}

fn reflect_onto_source(ctx: &mut GameContext, ec: &mut EffectContext) -> Result<(), EngineError> {
    match ec.source {
        ActorRef::Player => {
            if player_saves(ctx, ec)? {
                ctx.message("You resist the effects!");
                return Ok(());
            }
            take_hit(ctx, ec.dam, &ec.name);
            reflect_extra_on_player(ctx, ec)
        }
        ActorRef::Monster(source) => {
            if hurt_source_monster(ctx, ec, source)? {
                reflect_extra_on_monster(ctx, ec, source)?;
            }
            Ok(())
        }
    }
}

fn reflect_extra_on_player(ctx: &mut GameContext, ec: &mut EffectContext) -> Result<(), EngineError> {
    if !ctx.rng.one_in(4) || ctx.check_multishadow() {
        return Ok(());
    }
    let dam = ec.dam;
    match ctx.rng.randint1(4) {
        1 => {
            let amount = 3 + ctx.rng.randint1(dam);
            add_player_timed(ctx, PlayerStatus::Confused, amount);
        }
        2 => {
            let amount = ctx.rng.randint1(dam);
            add_player_timed(ctx, PlayerStatus::Stun, amount);
        }
        3 => {
            if ctx.species(ec.species)?.flags.contains(RaceFlags::NO_FEAR) {
                ec.note = Some(" is unaffected.");
            } else {
                let amount = 3 + ctx.rng.randint1(dam);
                add_player_timed(ctx, PlayerStatus::Fear, amount);
            }
        }
        _ => {
            if !ctx.player.free_action {
                let amount = ctx.rng.randint1(dam);
                add_player_timed(ctx, PlayerStatus::Paralyzed, amount);
            }
        }
    }
    Ok(())
}

fn add_player_timed(ctx: &mut GameContext, status: PlayerStatus, amount: i32) {
    let cur = i32::from(ctx.player.timed.get(status));
    set_player_timed(ctx, status, cur + amount);
}

fn reflect_extra_on_monster(
    ctx: &mut GameContext,
    ec: &mut EffectContext,
    source: MonsterId,
) -> Result<(), EngineError> {
    if !ctx.rng.one_in(4) {
        return Ok(());
    }
    let dam = ec.dam;
    let (status, amount) = match ctx.rng.randint1(4) {
        1 => (MonsterStatus::Confused, 3 + ctx.rng.randint1(dam)),
        2 => (MonsterStatus::Stun, ctx.rng.randint1(dam)),
        3 => {
            if ctx.species(ec.species)?.flags.contains(RaceFlags::NO_FEAR) {
                ec.note = Some(" is unaffected.");
                return Ok(());
            }
            (MonsterStatus::Fear, 3 + ctx.rng.randint1(dam))
        }
        // Monsters have no free action; the blow knocks them out instead
        _ => (MonsterStatus::Sleep, ctx.rng.randint1(dam)),
    };
    let cur = i32::from(ctx.monster(source)?.timed.get(status));
    set_monster_timed(ctx, source, status, cur + amount)?;
    Ok(())
}

fn drain_backlash(ctx: &mut GameContext, ec: &mut EffectContext) -> Result<(), EngineError> {
    match ec.source {
        ActorRef::Player => {
            if player_saves(ctx, ec)? {
                ctx.message("You resist the effects!");
            } else if ctx.check_multishadow() {
                take_hit(ctx, ec.dam, &ec.name);
            } else {
                ctx.message("Your psychic energy is drained!");
                let drain = ctx.rng.damroll(5, ec.dam) / 2;
                ctx.player.csp = (ctx.player.csp - drain).max(0);
                ctx.redraw |= RedrawFlags::MANA | RedrawFlags::SPELL_WINDOW;
                take_hit(ctx, ec.dam, &ec.name);
                tracing::debug!(drain, "psychic drain backlash");
            }
        }
        ActorRef::Monster(source) => {
            hurt_source_monster(ctx, ec, source)?;
        }
    }
    Ok(())
}

fn convert_pain(ctx: &mut GameContext, ec: &EffectContext) {
    // Monsters have no mana to refill
    if !ec.source_is_player() {
        return;
    }
    let gain = ctx.rng.damroll(5, ec.dam) / 4;
    let energy = if ctx.player.class == PlayerClass::Mindcrafter {
        "psychic energy"
    } else {
        "mana"
    };
    ctx.message(format!("You convert {} pain into {energy}!", possessive(&ec.name)));
    ctx.player.csp = (ctx.player.csp + gain).min(ctx.player.msp);
    ctx.redraw |= RedrawFlags::MANA | RedrawFlags::SPELL_WINDOW;
    tracing::debug!(gain, csp = ctx.player.csp, "pain converted");
}
