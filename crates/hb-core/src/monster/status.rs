//! Monster timed statuses
//!
//! Counters wear off once per status tick with a status-specific recovery
//! rule. Sleep is special: it only wears off while the player is close
//! enough to be noticed, and then by an amount that grows as the player gets
//! closer and faster.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::monst::MonsterId;
use super::species::RaceFlags;
use crate::consts::{
    speed_to_energy, MAX_MONSTER_SENSING, MAX_PLAYER_SIGHT, PENETRATE_INVULNERABILITY,
};
use crate::dungeon::{distance, los};
use crate::world::{EngineError, GameContext, RedrawFlags, TimedKind};

/// Monster timed statuses
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum MonsterStatus {
    Sleep,
    Fast,
    Slow,
    Stun,
    Confused,
    Fear,
    Invulnerable,
}

impl TimedKind for MonsterStatus {
    fn index(self) -> usize {
        self as usize
    }
}

impl MonsterStatus {
    /// Narration when the status wears off, if any
    pub const fn end_note(self) -> Option<&'static str> {
        match self {
            MonsterStatus::Sleep => Some(" wakes up."),
            MonsterStatus::Fast => Some(" is no longer fast."),
            MonsterStatus::Slow => Some(" is no longer slow."),
            MonsterStatus::Stun => Some(" is no longer stunned."),
            MonsterStatus::Confused => Some(" is no longer confused."),
            MonsterStatus::Invulnerable => Some(" is no longer invulnerable."),
            // Needs a pronoun, see `process_monster_status`
            MonsterStatus::Fear => None,
        }
    }
}

/// Set a monster status counter.
///
/// Returns true when the status switched on or off.
pub fn set_monster_timed(
    ctx: &mut GameContext,
    id: MonsterId,
    status: MonsterStatus,
    value: i32,
) -> Result<bool, EngineError> {
    let monster = ctx.monster_mut(id)?;
    let transition = monster.timed.set(status, value);
    if !transition.noticed() {
        return Ok(false);
    }
    tracing::trace!(?id, ?status, value, ?transition, "monster status switched");
    if ctx.player.riding == Some(id)
        && matches!(status, MonsterStatus::Sleep | MonsterStatus::Fast | MonsterStatus::Slow)
    {
        ctx.redraw |= RedrawFlags::BONUS;
    }
    Ok(true)
}

/// Noise the player makes; the lower the stealth the louder
pub fn csleep_noise(stealth: i32) -> u64 {
    1u64 << (30 - stealth.clamp(0, 30))
}

/// One tick of one status of one monster.
///
/// Returns true when the status ended this tick. Inactive statuses are left
/// alone and draw nothing.
pub fn process_monster_status(
    ctx: &mut GameContext,
    id: MonsterId,
    status: MonsterStatus,
) -> Result<bool, EngineError> {
    let monster = ctx.live_monster(id)?;
    let current = i32::from(monster.timed.get(status));
    if current == 0 {
        return Ok(false);
    }
    let level = ctx.species_of(id)?.level;

    let ended = match status {
        MonsterStatus::Sleep => return process_sleep(ctx, id, current),
        MonsterStatus::Fast | MonsterStatus::Slow | MonsterStatus::Invulnerable => {
            set_monster_timed(ctx, id, status, current - 1)?
        }
        MonsterStatus::Stun => {
            let value = if ctx.rng.randint0(10_000) <= level * level {
                0
            } else {
                current - 1
            };
            set_monster_timed(ctx, id, status, value)?
        }
        MonsterStatus::Confused | MonsterStatus::Fear => {
            let recovery = ctx.rng.randint1(level / 20 + 1);
            set_monster_timed(ctx, id, status, current - recovery)?
        }
    };

    if ended {
        tracing::debug!(?id, ?status, "monster status expired");
        match status.end_note() {
            Some(note) => ctx.monster_note(id, note),
            None => {
                let pronoun = possessive_pronoun(ctx, id)?;
                ctx.monster_note(id, &format!(" recovers {pronoun} courage."));
            }
        }
    }
    Ok(ended)
}

fn possessive_pronoun(ctx: &GameContext, id: MonsterId) -> Result<&'static str, EngineError> {
    let species = ctx.species_of(id)?;
    if !ctx.monster(id)?.visible {
        return Ok("its");
    }
    Ok(if species.flags.contains(RaceFlags::FEMALE) {
        "her"
    } else if species.flags.contains(RaceFlags::MALE) {
        "his"
    } else {
        "its"
    })
}

fn process_sleep(ctx: &mut GameContext, id: MonsterId, current: i32) -> Result<bool, EngineError> {
    let monster = ctx.live_monster(id)?;
    let species = ctx.species.get(monster.species)?;
    let species_id = species.id;
    let cdis = distance(monster.pos, ctx.player.pos);

    // Within sensing radius, or within sight with a clear view
    let sense = if monster.pet {
        species.aaf.min(MAX_PLAYER_SIGHT)
    } else {
        species.aaf
    };
    let in_range = cdis < MAX_MONSTER_SENSING
        && (cdis <= sense
            || (cdis <= MAX_PLAYER_SIGHT && los(&ctx.floor, ctx.player.pos, monster.pos)));
    if !in_range {
        return Ok(false);
    }

    let mut notice = ctx.rng.randint0(1024) as u64;
    if ctx.options.nightmare {
        notice /= 2;
    }
    if notice * notice * notice > csleep_noise(ctx.player.skill_stl) {
        return Ok(false);
    }

    // Wake faster when the player is near and quick
    let mut reduce = if cdis < MAX_MONSTER_SENSING / 2 {
        MAX_MONSTER_SENSING / cdis.max(1)
    } else {
        1
    };
    reduce = (reduce * speed_to_energy(ctx.player.speed) / 10).max(1);

    if !set_monster_timed(ctx, id, MonsterStatus::Sleep, current - reduce)? {
        if ctx.is_original_ap_and_seen(id) {
            ctx.ledger.note_ignore(species_id);
        }
        return Ok(false);
    }

    tracing::debug!(?id, cdis, "monster woke up");
    if ctx.monster(id)?.visible {
        ctx.monster_note(id, " wakes up.");
    }
    if ctx.is_original_ap_and_seen(id) {
        ctx.ledger.note_wake(species_id);
    }
    Ok(true)
}

/// Strip haste, slowness and invulnerability
pub fn dispel_monster_status(ctx: &mut GameContext, id: MonsterId) -> Result<(), EngineError> {
    for status in [MonsterStatus::Invulnerable, MonsterStatus::Fast, MonsterStatus::Slow] {
        if set_monster_timed(ctx, id, status, 0)? && ctx.monster(id)?.visible {
            if let Some(note) = status.end_note() {
                ctx.monster_note(id, note);
            }
        }
    }
    Ok(())
}

/// Adjust damage for total resistance and invulnerability
pub fn mon_damage_mod(ctx: &mut GameContext, id: MonsterId, dam: i32) -> Result<i32, EngineError> {
    if dam <= 0 {
        return Ok(dam);
    }
    let resist_all = ctx
        .species_of(id)?
        .resist
        .contains(super::species::ResistFlags::RES_ALL);
    let mut dam = dam;
    if resist_all {
        dam /= 100;
        if dam == 0 && ctx.rng.one_in(3) {
            dam = 1;
        }
    }
    if ctx.monster(id)?.is_invulnerable() && !ctx.rng.one_in(PENETRATE_INVULNERABILITY) {
        return Ok(0);
    }
    Ok(dam)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Floor, Position};
    use crate::monster::{Species, SpeciesId, SpeciesTable};
    use crate::player::Player;
    use crate::rng::GameRng;
    use crate::world::EngineOptions;

    fn make_ctx(rng: GameRng, level: i32) -> (GameContext, MonsterId) {
        let species: SpeciesTable = [Species::new(SpeciesId(0), "ogre", level)
            .with_flags(RaceFlags::MALE)
            .with_aaf(10)]
        .into_iter()
        .collect();
        let mut ctx = GameContext::new(
            Floor::new(30, 12),
            species,
            Player::new(Position::new(5, 2), 10),
            EngineOptions::default(),
            rng,
        );
        let id = ctx.spawn_monster(SpeciesId(0), Position::new(5, 6)).unwrap();
        (ctx, id)
    }

    #[test]
    fn test_fast_expires_once() {
        let (mut ctx, id) = make_ctx(GameRng::new(1), 5);
        set_monster_timed(&mut ctx, id, MonsterStatus::Fast, 1).unwrap();
        assert!(process_monster_status(&mut ctx, id, MonsterStatus::Fast).unwrap());
        assert_eq!(ctx.messages, vec!["The ogre is no longer fast."]);
        assert!(!process_monster_status(&mut ctx, id, MonsterStatus::Fast).unwrap());
        assert_eq!(ctx.messages.len(), 1);
    }

    #[test]
    fn test_stun_recovers_outright() {
        // randint0(10000) = 20 <= 5*5
        let (mut ctx, id) = make_ctx(GameRng::scripted([20]), 5);
        set_monster_timed(&mut ctx, id, MonsterStatus::Stun, 50).unwrap();
        assert!(process_monster_status(&mut ctx, id, MonsterStatus::Stun).unwrap());
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Stun), 0);
    }

    #[test]
    fn test_stun_wears_down() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([9_000]), 5);
        set_monster_timed(&mut ctx, id, MonsterStatus::Stun, 50).unwrap();
        assert!(!process_monster_status(&mut ctx, id, MonsterStatus::Stun).unwrap());
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Stun), 49);
    }

    #[test]
    fn test_fear_recovery_message() {
        // level 40: recovery randint1(3) -> raw 2 -> 3
        let (mut ctx, id) = make_ctx(GameRng::scripted([2]), 40);
        set_monster_timed(&mut ctx, id, MonsterStatus::Fear, 3).unwrap();
        assert!(process_monster_status(&mut ctx, id, MonsterStatus::Fear).unwrap());
        assert_eq!(ctx.messages, vec!["The ogre recovers his courage."]);
    }

    #[test]
    fn test_sleep_wakes_noisy_player() {
        // Stealth 0 is as loud as it gets: any notice draw wakes
        let (mut ctx, id) = make_ctx(GameRng::scripted([1023]), 5);
        ctx.player.skill_stl = 0;
        set_monster_timed(&mut ctx, id, MonsterStatus::Sleep, 20).unwrap();
        // cdis 4: reduce = 100 / 4 = 25
        assert!(process_monster_status(&mut ctx, id, MonsterStatus::Sleep).unwrap());
        assert_eq!(ctx.messages, vec!["The ogre wakes up."]);
        assert_eq!(ctx.ledger.lore(SpeciesId(0)).unwrap().wake, 1);
    }

    #[test]
    fn test_sleep_ignores_quiet_player() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([1000]), 5);
        ctx.player.skill_stl = 10;
        set_monster_timed(&mut ctx, id, MonsterStatus::Sleep, 20).unwrap();
        assert!(!process_monster_status(&mut ctx, id, MonsterStatus::Sleep).unwrap());
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Sleep), 20);
        assert!(ctx.ledger.lore(SpeciesId(0)).is_none());
    }

    #[test]
    fn test_nightmare_halves_notice() {
        // stealth 10: noise 2^20; 120^3 stays asleep, 60^3 wakes
        let (mut ctx, id) = make_ctx(GameRng::scripted([120]), 5);
        ctx.player.skill_stl = 10;
        set_monster_timed(&mut ctx, id, MonsterStatus::Sleep, 20).unwrap();
        assert!(!process_monster_status(&mut ctx, id, MonsterStatus::Sleep).unwrap());
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Sleep), 20);

        let (mut ctx, id) = make_ctx(GameRng::scripted([120]), 5);
        ctx.player.skill_stl = 10;
        ctx.options.nightmare = true;
        set_monster_timed(&mut ctx, id, MonsterStatus::Sleep, 20).unwrap();
        assert!(process_monster_status(&mut ctx, id, MonsterStatus::Sleep).unwrap());
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Sleep), 0);
        assert_eq!(ctx.messages, vec!["The ogre wakes up."]);
    }

    #[test]
    fn test_sleep_partial_wake_counts_ignore() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([0]), 5);
        set_monster_timed(&mut ctx, id, MonsterStatus::Sleep, 500).unwrap();
        assert!(!process_monster_status(&mut ctx, id, MonsterStatus::Sleep).unwrap());
        assert_eq!(ctx.monster(id).unwrap().timed.get(MonsterStatus::Sleep), 475);
        assert_eq!(ctx.ledger.lore(SpeciesId(0)).unwrap().ignore, 1);
    }

    #[test]
    fn test_sleep_out_of_range_draws_nothing() {
        let (mut ctx, id) = make_ctx(GameRng::new(3), 5);
        ctx.player.pos = Position::new(5, 28);
        ctx.floor.set_terrain(Position::new(5, 20), crate::dungeon::TerrainKind::Granite);
        ctx.floor.set_terrain(Position::new(4, 20), crate::dungeon::TerrainKind::Granite);
        ctx.floor.set_terrain(Position::new(6, 20), crate::dungeon::TerrainKind::Granite);
        set_monster_timed(&mut ctx, id, MonsterStatus::Sleep, 20).unwrap();
        // cdis 22 > aaf 10 and > sight radius
        assert!(!process_monster_status(&mut ctx, id, MonsterStatus::Sleep).unwrap());
        assert_eq!(ctx.rng.call_count(), 0);
    }

    #[test]
    fn test_dispel() {
        let (mut ctx, id) = make_ctx(GameRng::new(1), 5);
        set_monster_timed(&mut ctx, id, MonsterStatus::Fast, 10).unwrap();
        set_monster_timed(&mut ctx, id, MonsterStatus::Invulnerable, 10).unwrap();
        dispel_monster_status(&mut ctx, id).unwrap();
        assert!(!ctx.monster(id).unwrap().is_invulnerable());
        assert_eq!(
            ctx.messages,
            vec!["The ogre is no longer invulnerable.", "The ogre is no longer fast."]
        );
    }

    #[test]
    fn test_damage_mod_invulnerable() {
        let (mut ctx, id) = make_ctx(GameRng::scripted([5, 0]), 5);
        set_monster_timed(&mut ctx, id, MonsterStatus::Invulnerable, 10).unwrap();
        assert_eq!(mon_damage_mod(&mut ctx, id, 30).unwrap(), 0);
        assert_eq!(mon_damage_mod(&mut ctx, id, 30).unwrap(), 30);
    }

    #[test]
    fn test_noise() {
        assert_eq!(csleep_noise(0), 1 << 30);
        assert_eq!(csleep_noise(10), 1 << 20);
    }
}
