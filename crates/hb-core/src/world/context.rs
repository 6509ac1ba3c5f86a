//! The per-session game context
//!
//! Every entry point takes the context by mutable reference. It owns the
//! floor, the monster arena, the species table, the player, the knowledge
//! ledger, the single random stream and the message and redraw sinks.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYER_SIGHT;
use crate::dungeon::geometry::pick_teleport_target;
use crate::dungeon::{distance, los, projectable, Floor, Position};
use crate::monster::{KnowledgeLedger, Monster, MonsterId, Species, SpeciesId, SpeciesTable};
use crate::player::{Player, PlayerStatus};
use crate::rng::GameRng;
use crate::world::{EngineError, EngineOptions, RedrawFlags};

/// Reference to an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRef {
    Player,
    Monster(MonsterId),
}

/// Everything the engine reads and mutates during one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub floor: Floor,
    /// Monster arena; a monster's id is its slot
    pub monsters: Vec<Monster>,
    pub species: SpeciesTable,
    pub player: Player,
    pub ledger: KnowledgeLedger,
    pub rng: GameRng,
    /// Player-visible narration
    pub messages: Vec<String>,
    /// Drop narration instead of recording it
    pub mute_messages: bool,
    #[serde(skip)]
    pub redraw: RedrawFlags,
    pub options: EngineOptions,
    pub game_turn: u64,
}

impl GameContext {
    pub fn new(
        floor: Floor,
        species: SpeciesTable,
        player: Player,
        options: EngineOptions,
        rng: GameRng,
    ) -> Self {
        Self {
            floor,
            monsters: Vec::new(),
            species,
            player,
            ledger: KnowledgeLedger::new(),
            rng,
            messages: Vec::new(),
            mute_messages: false,
            redraw: RedrawFlags::empty(),
            options,
            game_turn: 1,
        }
    }

    /// Emit player-visible narration
    pub fn message(&mut self, text: impl Into<String>) {
        if self.mute_messages {
            return;
        }
        self.messages.push(text.into());
    }

    // ========================================================================
    // Entity store
    // ========================================================================

    /// Place a new monster of `species` at `pos`
    pub fn spawn_monster(&mut self, species: SpeciesId, pos: Position) -> Result<MonsterId, EngineError> {
        let template = self.species.get(species)?;
        if !self.floor.is_empty_walkable(pos) || pos == self.player.pos {
            return Err(EngineError::Config(format!(
                "cannot place {} at ({}, {})",
                template.name, pos.y, pos.x
            )));
        }
        let id = MonsterId(self.monsters.len() as u32);
        let monster = Monster::new(id, template, pos);
        self.monsters.push(monster);
        self.floor.set_occupant(pos, Some(id));
        tracing::trace!(?id, ?species, ?pos, "monster spawned");
        Ok(id)
    }

    pub fn monster(&self, id: MonsterId) -> Result<&Monster, EngineError> {
        self.monsters
            .get(id.index())
            .ok_or(EngineError::InvalidReference(ActorRef::Monster(id)))
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Result<&mut Monster, EngineError> {
        self.monsters
            .get_mut(id.index())
            .ok_or(EngineError::InvalidReference(ActorRef::Monster(id)))
    }

    /// A monster that is still alive
    pub fn live_monster(&self, id: MonsterId) -> Result<&Monster, EngineError> {
        let monster = self.monster(id)?;
        if !monster.alive {
            return Err(EngineError::DeadActor(ActorRef::Monster(id)));
        }
        Ok(monster)
    }

    pub fn species(&self, id: SpeciesId) -> Result<&Species, EngineError> {
        self.species.get(id)
    }

    /// Species of a monster
    pub fn species_of(&self, id: MonsterId) -> Result<&Species, EngineError> {
        let species = self.monster(id)?.species;
        self.species.get(species)
    }

    /// Ids of all live monsters in arena order
    pub fn live_monster_ids(&self) -> Vec<MonsterId> {
        self.monsters.iter().filter(|m| m.alive).map(|m| m.id).collect()
    }

    pub fn position_of(&self, actor: ActorRef) -> Result<Position, EngineError> {
        match actor {
            ActorRef::Player => Ok(self.player.pos),
            ActorRef::Monster(id) => Ok(self.monster(id)?.pos),
        }
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// The player could see this cell if something stood there
    pub fn player_can_see(&self, pos: Position) -> bool {
        !self.player.is_blind()
            && distance(self.player.pos, pos) <= MAX_PLAYER_SIGHT
            && los(&self.floor, self.player.pos, pos)
    }

    /// The player sees this monster (honouring `ignore_unview`)
    pub fn is_seen(&self, id: MonsterId) -> bool {
        self.monster(id).is_ok_and(|m| {
            m.visible && (!self.options.ignore_unview || self.player_can_see(m.pos))
        })
    }

    /// The player sees the monster and knows what it really is
    pub fn is_original_ap_and_seen(&self, id: MonsterId) -> bool {
        self.monster(id)
            .is_ok_and(|m| m.visible && !self.player.is_hallucinating() && !m.is_disguised())
    }

    /// The player has an odd game turn and an active shadow double
    pub fn check_multishadow(&self) -> bool {
        self.player.timed.is_active(PlayerStatus::MultiShadow) && self.game_turn % 2 == 1
    }

    pub fn projectable(&self, from: Position, to: Position) -> bool {
        projectable(&self.floor, self.options.max_range, from, to)
    }

    // ========================================================================
    // Naming
    // ========================================================================

    /// How the player refers to a monster: "the orc", "Grip", or "it"
    pub fn monster_desc(&self, id: MonsterId) -> String {
        let Ok(monster) = self.monster(id) else {
            return "it".to_string();
        };
        if !monster.visible {
            return "it".to_string();
        }
        if self.player.is_hallucinating() {
            return "something weird".to_string();
        }
        match self.species.get(monster.apparent_species) {
            Ok(species) if species.is_unique() => species.name.clone(),
            Ok(species) => format!("the {}", species.name),
            Err(_) => "it".to_string(),
        }
    }

    /// Name of an actor as the subject of a sentence
    pub fn actor_desc(&self, actor: ActorRef) -> String {
        match actor {
            ActorRef::Player => "you".to_string(),
            ActorRef::Monster(id) => self.monster_desc(id),
        }
    }

    /// Narrate "<Monster><note>" if the player sees the monster
    pub fn monster_note(&mut self, id: MonsterId, note: &str) {
        if self.is_seen(id) {
            let text = format!("{}{}", capitalize(&self.monster_desc(id)), note);
            self.message(text);
        }
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Short-range teleport of a monster; false if no cell was found
    pub fn teleport_monster(&mut self, id: MonsterId, dist: i32) -> bool {
        let Ok(from) = self.live_monster(id).map(|m| m.pos) else {
            return false;
        };
        let floor = &self.floor;
        let Some(to) = pick_teleport_target(floor, &mut self.rng, from, dist, self.player.pos, |p| {
            floor.is_empty_walkable(p)
        }) else {
            return false;
        };
        self.floor.set_occupant(from, None);
        self.floor.set_occupant(to, Some(id));
        if let Some(monster) = self.monsters.get_mut(id.index()) {
            monster.pos = to;
        }
        tracing::debug!(?id, ?from, ?to, "monster teleported");
        true
    }
}

/// Upper-case the first letter
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Possessive form: "the orc's", "its"
pub fn possessive(name: &str) -> String {
    if name.eq_ignore_ascii_case("it") {
        format!("{name}s")
    } else {
        format!("{name}'s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::TerrainKind;
    use crate::monster::RaceFlags;

    fn make_ctx() -> GameContext {
        let species: SpeciesTable = [
            Species::new(SpeciesId(0), "orc", 5),
            Species::new(SpeciesId(1), "Grip", 2).with_flags(RaceFlags::UNIQUE),
        ]
        .into_iter()
        .collect();
        GameContext::new(
            Floor::new(20, 12),
            species,
            Player::new(Position::new(5, 2), 10),
            EngineOptions::default(),
            GameRng::new(42),
        )
    }

    #[test]
    fn test_spawn_and_lookup() {
        let mut ctx = make_ctx();
        let id = ctx.spawn_monster(SpeciesId(0), Position::new(5, 8)).unwrap();
        assert_eq!(ctx.monster(id).unwrap().hp, 5);
        assert_eq!(ctx.floor.cell(Position::new(5, 8)).unwrap().occupant, Some(id));
        assert!(ctx.spawn_monster(SpeciesId(0), Position::new(5, 8)).is_err());
        assert!(ctx.spawn_monster(SpeciesId(0), Position::new(5, 2)).is_err());
        assert_eq!(
            ctx.spawn_monster(SpeciesId(9), Position::new(6, 6)).unwrap_err(),
            EngineError::UnknownSpecies(SpeciesId(9))
        );
    }

    #[test]
    fn test_invalid_and_dead_references() {
        let mut ctx = make_ctx();
        let bogus = MonsterId(42);
        assert!(matches!(ctx.monster(bogus), Err(EngineError::InvalidReference(_))));
        let id = ctx.spawn_monster(SpeciesId(0), Position::new(5, 8)).unwrap();
        ctx.monster_mut(id).unwrap().alive = false;
        assert_eq!(
            ctx.live_monster(id).unwrap_err(),
            EngineError::DeadActor(ActorRef::Monster(id))
        );
    }

    #[test]
    fn test_monster_desc() {
        let mut ctx = make_ctx();
        let orc = ctx.spawn_monster(SpeciesId(0), Position::new(5, 8)).unwrap();
        let grip = ctx.spawn_monster(SpeciesId(1), Position::new(6, 8)).unwrap();
        assert_eq!(ctx.monster_desc(orc), "the orc");
        assert_eq!(ctx.monster_desc(grip), "Grip");
        ctx.monster_mut(orc).unwrap().visible = false;
        assert_eq!(ctx.monster_desc(orc), "it");
        assert_eq!(possessive("it"), "its");
        assert_eq!(possessive("the orc"), "the orc's");
        assert_eq!(capitalize("the orc"), "The orc");
    }

    #[test]
    fn test_seen_respects_ignore_unview() {
        let mut ctx = make_ctx();
        let orc = ctx.spawn_monster(SpeciesId(0), Position::new(5, 8)).unwrap();
        ctx.floor.set_terrain(Position::new(5, 5), TerrainKind::Granite);
        assert!(ctx.is_seen(orc));
        ctx.options.ignore_unview = true;
        assert!(!ctx.is_seen(orc));
    }

    #[test]
    fn test_mute_messages() {
        let mut ctx = make_ctx();
        ctx.mute_messages = true;
        ctx.message("hidden");
        assert!(ctx.messages.is_empty());
    }

    #[test]
    fn test_teleport_monster() {
        let mut ctx = make_ctx();
        let orc = ctx.spawn_monster(SpeciesId(0), Position::new(5, 8)).unwrap();
        assert!(ctx.teleport_monster(orc, 4));
        let pos = ctx.monster(orc).unwrap().pos;
        assert_ne!(pos, Position::new(5, 8));
        assert_eq!(ctx.floor.cell(pos).unwrap().occupant, Some(orc));
        assert_eq!(ctx.floor.cell(Position::new(5, 8)).unwrap().occupant, None);
    }

    #[test]
    fn test_multishadow_needs_odd_turn() {
        let mut ctx = make_ctx();
        ctx.player.timed.set(PlayerStatus::MultiShadow, 10);
        ctx.game_turn = 3;
        assert!(ctx.check_multishadow());
        ctx.game_turn = 4;
        assert!(!ctx.check_multishadow());
    }
}
