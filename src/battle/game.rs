//! Game session: players, turn rotation, round-end effects and win detection

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::battle::board::Board;
use crate::battle::hex::CubeCoord;
use crate::battle::powers::{PowerCatalog, PowerOutcome, Target};
use crate::battle::unit_type::{Archetype, UnitType};
use crate::battle::units::Unit;
use crate::core::config::GameConfig;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{PlayerId, TurnNumber, UnitId};

/// A side in the game and the units it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    units: Vec<UnitId>,
    /// Ids handed out so far; never decreases, so ids are never reused
    units_created: usize,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            units: Vec::new(),
            units_created: 0,
        }
    }

    /// Live units in creation order
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn owns(&self, unit: &UnitId) -> bool {
        self.units.contains(unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventKind {
    UnitCreated { unit: UnitId, owner: PlayerId },
    UnitMoved { unit: UnitId, from: CubeCoord, to: CubeCoord },
    PowerUsed { unit: UnitId, power: String, outcome: PowerOutcome },
    RoundEnded { turn: TurnNumber },
    UnitRemoved { unit: UnitId, owner: PlayerId },
    GameOver { winner: Option<PlayerId> },
}

/// One entry in the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub turn: TurnNumber,
    pub kind: GameEventKind,
    pub description: String,
}

/// A running game
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    current_player_index: usize,
    turn_number: TurnNumber,
    powers: Arc<PowerCatalog>,
    events: Vec<GameEvent>,
    game_over_announced: bool,
}

impl Game {
    /// New game with the standard power catalog.
    ///
    /// Players get ids `player_0`, `player_1`, ... in the order given.
    pub fn create_new_game<S: Into<String>>(
        radius: u32,
        hex_size: f64,
        player_names: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        Self::with_catalog(radius, hex_size, player_names, Arc::new(PowerCatalog::standard()))
    }

    /// New game sharing an existing power catalog
    pub fn with_catalog<S: Into<String>>(
        radius: u32,
        hex_size: f64,
        player_names: impl IntoIterator<Item = S>,
        powers: Arc<PowerCatalog>,
    ) -> Result<Self> {
        let players: Vec<Player> = player_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::from_index(i), name))
            .collect();
        if players.is_empty() {
            return Err(SkirmishError::NoPlayers);
        }

        info!(radius, players = players.len(), "New game created");

        Ok(Self {
            board: Board::new(radius, hex_size),
            players,
            current_player_index: 0,
            turn_number: 1,
            powers,
            events: Vec::new(),
            game_over_announced: false,
        })
    }

    /// Build a game from configuration: board, terrain patches, then units.
    ///
    /// Units of the same archetype and level share one template.
    pub fn from_config(config: &GameConfig, powers: Arc<PowerCatalog>) -> Result<Self> {
        config.validate().map_err(SkirmishError::InvalidConfig)?;

        let mut game = Self::with_catalog(
            config.board_radius,
            config.hex_size,
            config.players.iter().cloned(),
            powers,
        )?;

        for patch in &config.terrain {
            let position = patch.position();
            if !game.board.in_bounds(position) {
                warn!(%position, "Terrain patch outside the board ignored");
                continue;
            }
            game.board.set_zone_type(position, patch.kind);
        }

        let mut templates: HashMap<(Archetype, u32), Arc<UnitType>> = HashMap::new();
        for placement in &config.units {
            let template = templates
                .entry((placement.archetype, placement.level))
                .or_insert_with(|| Arc::new(placement.archetype.template(placement.level)))
                .clone();
            let owner = PlayerId::from_index(placement.player);
            game.create_unit(&owner, template, placement.position())?;
        }

        Ok(game)
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn turn_number(&self) -> TurnNumber {
        self.turn_number
    }

    pub fn powers(&self) -> &PowerCatalog {
        &self.powers
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    fn log_event(&mut self, kind: GameEventKind, description: String) {
        self.events.push(GameEvent {
            turn: self.turn_number,
            kind,
            description,
        });
    }

    /// Place a new unit for `player_id` at full resources.
    ///
    /// Fails without changing anything if the player is unknown, the position
    /// is off the board, or the zone is already occupied.
    pub fn create_unit(
        &mut self,
        player_id: &PlayerId,
        unit_type: Arc<UnitType>,
        position: CubeCoord,
    ) -> Result<UnitId> {
        let player_index = self
            .players
            .iter()
            .position(|p| &p.id == player_id)
            .ok_or_else(|| SkirmishError::PlayerNotFound(player_id.clone()))?;

        let zone = self
            .board
            .get_zone(position)
            .ok_or(SkirmishError::OutOfBounds(position))?;
        if zone.is_occupied() {
            return Err(SkirmishError::ZoneOccupied(position));
        }

        let type_name = unit_type.type_name.clone();
        let player = &mut self.players[player_index];
        let unit_id = UnitId::for_player(&player.id, player.units_created);
        if !self.board.add_unit(unit_id.clone(), Unit::new(unit_type, position)) {
            return Err(SkirmishError::ZoneOccupied(position));
        }
        player.units_created += 1;
        player.units.push(unit_id.clone());
        if !self.is_game_over() {
            self.game_over_announced = false;
        }

        debug!(unit = %unit_id, owner = %player_id, %position, "Unit created");
        self.log_event(
            GameEventKind::UnitCreated {
                unit: unit_id.clone(),
                owner: player_id.clone(),
            },
            format!("{} placed {} at {}", player_id, type_name, position),
        );

        Ok(unit_id)
    }

    /// Direct move for the current player's unit, limited by hex distance
    /// against the unit's movement (terrain costs are not consulted).
    pub fn move_unit(&mut self, unit_id: &UnitId, new_position: CubeCoord) -> bool {
        if !self.current_player().owns(unit_id) {
            return false;
        }
        let Some(unit) = self.board.get_unit(unit_id) else {
            return false;
        };
        if self.board.get_zone(new_position).is_none() {
            return false;
        }

        let from = unit.position();
        if from.distance(&new_position) > unit.unit_type().movement {
            return false;
        }
        if !self.board.move_unit(unit_id, new_position) {
            return false;
        }

        self.log_event(
            GameEventKind::UnitMoved {
                unit: unit_id.clone(),
                from,
                to: new_position,
            },
            format!("{} moved from {} to {}", unit_id, from, new_position),
        );
        true
    }

    /// Use a power with one of the current player's units.
    ///
    /// Returns None (nothing changes) if the unit isn't the current player's,
    /// its type doesn't list the power, or the target is invalid.
    pub fn use_power(&mut self, unit_id: &UnitId, power_name: &str, target: &Target) -> Option<PowerOutcome> {
        if !self.current_player().owns(unit_id) {
            return None;
        }
        let power = self.powers.get_power(power_name)?;
        let listed = self
            .board
            .get_unit(unit_id)
            .is_some_and(|unit| unit.unit_type().has_power(&power.name));
        if !listed {
            return None;
        }

        let name = power.name.clone();
        let outcome = self.powers.attempt(&mut self.board, unit_id, &name, target)?;

        self.log_event(
            GameEventKind::PowerUsed {
                unit: unit_id.clone(),
                power: name.clone(),
                outcome: outcome.clone(),
            },
            format!("{} used {} on {}", unit_id, name, target),
        );
        Some(outcome)
    }

    /// Hand play to the next player.
    ///
    /// When the rotation wraps, the turn number increments and every unit
    /// rests and regenerates veil. Units at 0 HP are then removed from the
    /// board and their rosters, on every call.
    pub fn next_turn(&mut self) {
        self.current_player_index = (self.current_player_index + 1) % self.players.len();

        if self.current_player_index == 0 {
            self.turn_number += 1;
            self.apply_round_end();
        }

        self.remove_dead_units();

        if self.is_game_over() && !self.game_over_announced {
            self.game_over_announced = true;
            let winner = self.winner().map(|p| p.id.clone());
            match &winner {
                Some(id) => info!(winner = %id, turn = self.turn_number, "Game over"),
                None => info!(turn = self.turn_number, "Game over with no survivors"),
            }
            let description = match &winner {
                Some(id) => format!("{} wins", id),
                None => "No player has units left".to_string(),
            };
            self.log_event(GameEventKind::GameOver { winner }, description);
        }
    }

    fn apply_round_end(&mut self) {
        for player in &self.players {
            for unit_id in &player.units {
                if let Some(unit) = self.board.get_unit_mut(unit_id) {
                    unit.rest();
                    unit.regenerate_veil();
                }
            }
        }
        debug!(turn = self.turn_number, "Round ended");
        let turn = self.turn_number;
        self.log_event(
            GameEventKind::RoundEnded { turn },
            format!("Round complete, turn {} begins", turn),
        );
    }

    fn remove_dead_units(&mut self) {
        let mut removed = Vec::new();
        for player in &mut self.players {
            let board = &mut self.board;
            let owner = player.id.clone();
            player.units.retain(|unit_id| {
                let dead = board.get_unit(unit_id).is_some_and(Unit::is_dead);
                if dead {
                    board.remove_unit(unit_id);
                    removed.push((unit_id.clone(), owner.clone()));
                }
                !dead
            });
        }

        for (unit, owner) in removed {
            debug!(unit = %unit, owner = %owner, "Dead unit removed");
            let description = format!("{} was destroyed", unit);
            self.log_event(GameEventKind::UnitRemoved { unit, owner }, description);
        }
    }

    /// True as soon as any player has no units (including before any are placed)
    pub fn is_game_over(&self) -> bool {
        self.players.iter().any(|p| p.units.is_empty())
    }

    /// First player in list order that still has units, once the game is over
    pub fn winner(&self) -> Option<&Player> {
        if !self.is_game_over() {
            return None;
        }
        self.players.iter().find(|p| !p.units.is_empty())
    }

    pub fn unit_at(&self, position: CubeCoord) -> Option<(&UnitId, &Unit)> {
        let id = self.board.get_zone(position)?.occupant()?;
        self.board.get_unit(id).map(|unit| (id, unit))
    }

    pub fn unit_owner(&self, unit_id: &UnitId) -> Option<&PlayerId> {
        self.players
            .iter()
            .find(|p| p.owns(unit_id))
            .map(|p| &p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::terrain::ZoneType;

    fn two_player_game() -> Game {
        Game::create_new_game(5, 60.0, ["Red", "Blue"]).unwrap()
    }

    fn p(i: usize) -> PlayerId {
        PlayerId::from_index(i)
    }

    #[test]
    fn test_new_game_state() {
        let game = two_player_game();
        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.current_player().id, p(0));
        assert_eq!(game.current_player().name, "Red");
        assert_eq!(game.players()[1].id, p(1));
        assert_eq!(game.board().get_all_zones().len(), 91);
    }

    #[test]
    fn test_no_players_rejected() {
        let result = Game::create_new_game(5, 60.0, Vec::<String>::new());
        assert!(matches!(result, Err(SkirmishError::NoPlayers)));
    }

    #[test]
    fn test_create_unit_ids() {
        let mut game = two_player_game();
        let template = Arc::new(UnitType::billmen(0));

        let a = game.create_unit(&p(0), template.clone(), CubeCoord::new(-1, 0, 1)).unwrap();
        let b = game.create_unit(&p(0), template.clone(), CubeCoord::new(-2, 0, 2)).unwrap();
        let c = game.create_unit(&p(1), template, CubeCoord::new(2, 0, -2)).unwrap();

        assert_eq!(a.as_str(), "player_0_unit_0");
        assert_eq!(b.as_str(), "player_0_unit_1");
        assert_eq!(c.as_str(), "player_1_unit_0");
        assert_eq!(game.unit_owner(&b), Some(&p(0)));
        assert_eq!(game.unit_at(CubeCoord::new(2, 0, -2)).map(|(id, _)| id), Some(&c));
    }

    #[test]
    fn test_create_unit_errors_leave_state_alone() {
        let mut game = two_player_game();
        let template = Arc::new(UnitType::billmen(0));

        let unknown = game.create_unit(&PlayerId::from("nobody"), template.clone(), CubeCoord::ORIGIN);
        assert!(matches!(unknown, Err(SkirmishError::PlayerNotFound(_))));

        let outside = game.create_unit(&p(0), template.clone(), CubeCoord::new(6, -6, 0));
        assert!(matches!(outside, Err(SkirmishError::OutOfBounds(_))));

        game.create_unit(&p(0), template.clone(), CubeCoord::ORIGIN).unwrap();
        let stacked = game.create_unit(&p(1), template, CubeCoord::ORIGIN);
        assert!(matches!(stacked, Err(SkirmishError::ZoneOccupied(_))));

        assert_eq!(game.board().unit_count(), 1);
        assert!(game.player(&p(1)).unwrap().units().is_empty());
    }

    #[test]
    fn test_turn_rotation() {
        let mut game = Game::create_new_game(3, 60.0, ["A", "B", "C"]).unwrap();
        game.next_turn();
        assert_eq!(game.current_player().id, p(1));
        assert_eq!(game.turn_number(), 1);
        game.next_turn();
        game.next_turn();
        assert_eq!(game.current_player().id, p(0));
        assert_eq!(game.turn_number(), 2);
    }

    #[test]
    fn test_move_unit_rules() {
        let mut game = two_player_game();
        let mine = game
            .create_unit(&p(0), Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN)
            .unwrap();
        let theirs = game
            .create_unit(&p(1), Arc::new(UnitType::billmen(0)), CubeCoord::new(3, 0, -3))
            .unwrap();

        // Beyond movement 1
        assert!(!game.move_unit(&mine, CubeCoord::new(2, 0, -2)));
        // Not the current player's unit
        assert!(!game.move_unit(&theirs, CubeCoord::new(2, 0, -2)));
        // Off the board
        assert!(!game.move_unit(&mine, CubeCoord::new(6, -6, 0)));

        assert!(game.move_unit(&mine, CubeCoord::new(1, 0, -1)));
        assert_eq!(game.board().get_unit(&mine).unwrap().position(), CubeCoord::new(1, 0, -1));
        assert!(matches!(
            game.events().last().map(|e| &e.kind),
            Some(GameEventKind::UnitMoved { .. })
        ));
    }

    #[test]
    fn test_use_power_requires_listed_power_and_ownership() {
        let mut game = two_player_game();
        let billmen = game
            .create_unit(&p(0), Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN)
            .unwrap();
        let lucifer = game
            .create_unit(&p(1), Arc::new(UnitType::lucifer(0)), CubeCoord::new(3, 0, -3))
            .unwrap();

        // Billmen don't shoot
        assert!(game.use_power(&billmen, "Shoot", &Target::Unit(lucifer.clone())).is_none());
        // Not Blue's turn
        assert!(game.use_power(&lucifer, "Shoot", &Target::Unit(billmen.clone())).is_none());

        game.next_turn();
        let outcome = game.use_power(&lucifer, "shoot", &Target::Unit(billmen.clone()));
        assert_eq!(
            outcome,
            Some(PowerOutcome::Damaged {
                target: billmen.clone(),
                amount: 4.0
            })
        );
        assert_eq!(game.board().get_unit(&billmen).unwrap().current_hp(), 1.0);
    }

    #[test]
    fn test_dead_units_removed_on_next_turn() {
        let mut game = two_player_game();
        let doomed = game
            .create_unit(&p(0), Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN)
            .unwrap();
        game.create_unit(&p(1), Arc::new(UnitType::billmen(0)), CubeCoord::new(2, 0, -2))
            .unwrap();

        game.board_mut().get_unit_mut(&doomed).unwrap().take_damage(50.0);
        assert!(!game.is_game_over());
        assert!(game.unit_at(CubeCoord::ORIGIN).is_some());

        game.next_turn();

        assert!(game.is_game_over());
        assert_eq!(game.winner().map(|w| &w.id), Some(&p(1)));
        assert!(game.board().get_unit(&doomed).is_none());
        assert!(game.unit_at(CubeCoord::ORIGIN).is_none());
        assert!(game
            .events()
            .iter()
            .any(|e| matches!(e.kind, GameEventKind::GameOver { .. })));
    }

    #[test]
    fn test_unit_ids_not_reused_after_removal() {
        let mut game = two_player_game();
        let template = Arc::new(UnitType::billmen(0));
        let first = game.create_unit(&p(0), template.clone(), CubeCoord::ORIGIN).unwrap();
        game.create_unit(&p(0), template.clone(), CubeCoord::new(1, 0, -1)).unwrap();
        game.board_mut().get_unit_mut(&first).unwrap().take_damage(50.0);
        game.next_turn();

        let third = game.create_unit(&p(0), template, CubeCoord::new(0, 1, -1)).unwrap();
        assert_eq!(third.as_str(), "player_0_unit_2");
    }

    #[test]
    fn test_game_over_before_units_placed() {
        let game = two_player_game();
        assert!(game.is_game_over());
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_elimination_announced_after_early_end_turn() {
        let mut game = two_player_game();
        // Ending a turn on an empty board announces a game with no survivors
        game.next_turn();
        game.next_turn();

        let template = Arc::new(UnitType::billmen(0));
        game.create_unit(&p(0), template.clone(), CubeCoord::ORIGIN).unwrap();
        let blue = game.create_unit(&p(1), template, CubeCoord::new(2, 0, -2)).unwrap();
        assert!(!game.is_game_over());

        game.board_mut().get_unit_mut(&blue).unwrap().take_damage(50.0);
        game.next_turn();

        let winners: Vec<Option<PlayerId>> = game
            .events()
            .iter()
            .filter_map(|e| match &e.kind {
                GameEventKind::GameOver { winner } => Some(winner.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(winners, vec![None, Some(p(0))]);
        assert_eq!(game.winner().map(|w| &w.id), Some(&p(0)));
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig::from_toml_str(
            r#"
            board_radius = 4
            players = ["Red", "Blue"]

            [[terrain]]
            q = 0
            r = 0
            kind = "water"

            [[terrain]]
            q = 9
            r = 0
            kind = "forest"

            [[units]]
            player = 0
            archetype = "billmen"
            q = -1
            r = 0

            [[units]]
            player = 0
            archetype = "billmen"
            q = -2
            r = 0

            [[units]]
            player = 1
            archetype = "lucifer"
            level = 1
            q = 2
            r = 0
            "#,
        )
        .unwrap();

        let game = Game::from_config(&config, Arc::new(PowerCatalog::standard())).unwrap();

        assert_eq!(game.board().radius(), 4);
        assert_eq!(game.board().get_zone(CubeCoord::ORIGIN).unwrap().zone_type, ZoneType::Water);
        assert_eq!(game.player(&p(0)).unwrap().units().len(), 2);

        let (_, first) = game.unit_at(CubeCoord::new(-1, 0, 1)).unwrap();
        assert_eq!(game.board().get_units_of_type(first.unit_type()).len(), 2);

        let (lucifer_id, lucifer) = game.unit_at(CubeCoord::new(2, 0, -2)).unwrap();
        assert_eq!(lucifer.current_hp(), 10.0);
        assert_eq!(game.unit_owner(lucifer_id), Some(&p(1)));
    }
}
