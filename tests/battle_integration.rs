//! Battle system integration tests

use std::collections::HashSet;
use std::sync::Arc;

use veil_skirmish::battle::*;
use veil_skirmish::core::config::GameConfig;
use veil_skirmish::core::error::SkirmishError;
use veil_skirmish::core::types::{PlayerId, UnitId};

fn red() -> PlayerId {
    PlayerId::from_index(0)
}

fn blue() -> PlayerId {
    PlayerId::from_index(1)
}

fn new_game() -> Game {
    Game::create_new_game(5, 60.0, ["Red", "Blue"]).unwrap()
}

#[test]
fn test_board_zone_count() {
    for radius in 1..=6u32 {
        let board = Board::new(radius, 60.0);
        let expected = (3 * radius * radius + 3 * radius + 1) as usize;
        assert_eq!(board.get_all_zones().len(), expected);
    }
    assert_eq!(Board::new(5, 60.0).get_all_zones().len(), 91);
}

#[test]
fn test_billmen_fight_lucifer() {
    let mut game = new_game();
    let billmen = game
        .create_unit(&red(), Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN)
        .unwrap();
    let lucifer = game
        .create_unit(&blue(), Arc::new(UnitType::lucifer(1)), CubeCoord::new(1, 0, -1))
        .unwrap();

    let outcome = game
        .use_power(&billmen, "Fight", &Target::Unit(lucifer.clone()))
        .unwrap();

    match outcome {
        PowerOutcome::Damaged { target, amount } => {
            assert_eq!(target, lucifer);
            assert!((amount - 4.4).abs() < 1e-9);
        }
        other => panic!("Expected damage, got {:?}", other),
    }

    let target = game.board().get_unit(&lucifer).unwrap();
    assert!((target.current_hp() - 5.6).abs() < 1e-9);
    assert_eq!(target.current_morale(), 7.0);

    let attacker = game.board().get_unit(&billmen).unwrap();
    assert_eq!(attacker.current_morale(), 6.0);
    assert_eq!(attacker.current_fatigue(), 2.0);
}

#[test]
fn test_death_is_deferred_until_next_turn() {
    let mut game = new_game();
    let attacker = game
        .create_unit(&red(), Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN)
        .unwrap();
    let victim = game
        .create_unit(&blue(), Arc::new(UnitType::billmen(0)), CubeCoord::new(0, 1, -1))
        .unwrap();

    // 4.4, then 4.4 - floor(2 / 2) = 3.4
    game.use_power(&attacker, "Fight", &Target::Unit(victim.clone())).unwrap();
    game.use_power(&attacker, "Fight", &Target::Unit(victim.clone())).unwrap();

    let dead = game.board().get_unit(&victim).unwrap();
    assert!(dead.is_dead());
    assert_eq!(dead.current_morale(), 0.0);

    // Still on the board and in the roster
    assert!(!game.is_game_over());
    assert!(game.winner().is_none());
    assert_eq!(game.unit_at(CubeCoord::new(0, 1, -1)).map(|(id, _)| id), Some(&victim));

    game.next_turn();

    assert!(game.is_game_over());
    assert_eq!(game.winner().map(|p| &p.id), Some(&red()));
    assert!(game.unit_at(CubeCoord::new(0, 1, -1)).is_none());
    assert!(game.player(&blue()).unwrap().units().is_empty());
    assert!(game.events().iter().any(|e| matches!(
        &e.kind,
        GameEventKind::UnitRemoved { unit, .. } if unit == &victim
    )));
}

#[test]
fn test_round_end_effects() {
    let mut game = new_game();
    let caster = game
        .create_unit(&red(), Arc::new(UnitType::lucifer(1)), CubeCoord::ORIGIN)
        .unwrap();
    let enemy = game
        .create_unit(&blue(), Arc::new(UnitType::lucifer(3)), CubeCoord::new(2, 0, -2))
        .unwrap();

    game.use_power(&caster, "Cast Spell", &Target::Unit(enemy.clone())).unwrap();
    game.use_power(&caster, "Cast Spell", &Target::Unit(enemy.clone())).unwrap();

    let before = game.board().get_unit(&caster).unwrap().clone();
    assert_eq!(before.current_veil(), 3.0);
    assert_eq!(before.current_fatigue(), 4.0);
    assert_eq!(game.board().get_unit(&enemy).unwrap().current_hp(), 2.0);

    // Blue's turn: no round end yet
    game.next_turn();
    assert_eq!(game.turn_number(), 1);
    assert_eq!(game.board().get_unit(&caster).unwrap().current_fatigue(), 4.0);

    // Back to Red: round end
    game.next_turn();
    assert_eq!(game.turn_number(), 2);
    assert_eq!(game.current_player().id, red());

    let after = game.board().get_unit(&caster).unwrap();
    assert_eq!(after.current_fatigue(), 2.0);
    assert_eq!(after.current_veil(), 4.5);

    let untouched = game.board().get_unit(&enemy).unwrap();
    assert_eq!(untouched.current_fatigue(), 0.0);
    assert_eq!(untouched.current_veil(), 5.0); // Capped at max
    assert!(game
        .events()
        .iter()
        .any(|e| e.kind == GameEventKind::RoundEnded { turn: 2 }));
}

#[test]
fn test_create_unit_out_of_bounds_does_not_mutate() {
    let mut game = new_game();
    let result = game.create_unit(
        &PlayerId::from("player_0"),
        Arc::new(UnitType::billmen(0)),
        CubeCoord::new(6, -6, 0),
    );

    assert!(matches!(result, Err(SkirmishError::OutOfBounds(pos)) if pos == CubeCoord::new(6, -6, 0)));
    assert_eq!(game.board().unit_count(), 0);
    assert!(game.player(&red()).unwrap().units().is_empty());
    assert!(game.events().is_empty());
}

#[test]
fn test_board_moves_leave_state_on_failure() {
    let mut board = Board::new(5, 60.0);
    let a = UnitId::from("a");
    let b = UnitId::from("b");
    board.add_unit(a.clone(), Unit::new(Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN));
    board.add_unit(b.clone(), Unit::new(Arc::new(UnitType::billmen(0)), CubeCoord::new(1, 0, -1)));
    let before: Vec<(UnitId, CubeCoord)> = board
        .iter_units()
        .map(|(id, unit)| (id.clone(), unit.position()))
        .collect();

    assert!(!board.move_unit(&a, CubeCoord::new(1, 0, -1)));
    assert!(!board.move_unit(&a, CubeCoord::new(6, -6, 0)));
    assert!(!board.update_unit_position(CubeCoord::ORIGIN, CubeCoord::new(1, 0, -1), &a));
    assert!(!board.update_unit_position(CubeCoord::ORIGIN, CubeCoord::new(0, 6, -6), &a));

    let after: Vec<(UnitId, CubeCoord)> = board
        .iter_units()
        .map(|(id, unit)| (id.clone(), unit.position()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(board.get_zone(CubeCoord::ORIGIN).unwrap().occupant(), Some(&a));
    assert_eq!(board.get_zone(CubeCoord::new(1, 0, -1)).unwrap().occupant(), Some(&b));
    assert_eq!(board.get_unit(&a).unwrap().current_fatigue(), 0.0);
}

#[test]
fn test_move_power_validation() {
    let mut game = new_game();
    let billmen = game
        .create_unit(&red(), Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN)
        .unwrap();
    game.create_unit(&blue(), Arc::new(UnitType::billmen(0)), CubeCoord::new(1, -1, 0))
        .unwrap();
    game.board_mut().set_zone_type(CubeCoord::new(-1, 1, 0), ZoneType::Water);

    let powers = PowerCatalog::standard();
    let board = game.board();
    let check = |pos: CubeCoord| powers.is_valid_target(board, &Target::Zone(pos), &billmen, "Move");

    assert!(check(CubeCoord::new(1, 0, -1)));
    assert!(!check(CubeCoord::new(1, -1, 0))); // Occupied
    assert!(!check(CubeCoord::new(-1, 1, 0))); // Water
    assert!(!check(CubeCoord::new(0, 2, -2))); // Beyond movement
}

#[test]
fn test_uniform_terrain_paths_match_distance() {
    let mut board = Board::new(5, 60.0);
    let mover = UnitId::from("mover");
    board.add_unit(mover.clone(), Unit::new(Arc::new(UnitType::billmen(0)), CubeCoord::ORIGIN));
    let finder = PathFinder::new(&board);

    for goal in CubeCoord::ORIGIN.hexes_in_range(5) {
        let path = finder.find_path(CubeCoord::ORIGIN, goal, &mover).unwrap();
        assert_eq!(path.len() - 1, CubeCoord::ORIGIN.distance(&goal) as usize);
        for step in path.windows(2) {
            assert_eq!(step[0].distance(&step[1]), 1);
        }
    }

    for budget in 0..=5u32 {
        let reachable = finder.find_reachable_tiles(&mover, budget as f64);
        let expected: HashSet<CubeCoord> = board
            .get_all_zones()
            .iter()
            .map(|zone| zone.position)
            .filter(|pos| pos.distance(&CubeCoord::ORIGIN) <= budget)
            .collect();
        assert_eq!(reachable, expected);
    }
}

#[test]
fn test_path_then_move_power() {
    let mut game = new_game();
    let lucifer = game
        .create_unit(&red(), Arc::new(UnitType::lucifer(0)), CubeCoord::new(-3, 0, 3))
        .unwrap();
    game.create_unit(&blue(), Arc::new(UnitType::billmen(0)), CubeCoord::new(3, 0, -3))
        .unwrap();

    let goal = CubeCoord::new(-1, 0, 1);
    let path = PathFinder::new(game.board())
        .find_path(CubeCoord::new(-3, 0, 3), goal, &lucifer)
        .unwrap();
    assert_eq!(path.len(), 3);

    let outcome = game.use_power(&lucifer, "Move", &Target::Zone(goal)).unwrap();
    assert_eq!(
        outcome,
        PowerOutcome::Moved {
            from: CubeCoord::new(-3, 0, 3),
            to: goal
        }
    );
    assert_eq!(game.unit_at(goal).map(|(id, _)| id), Some(&lucifer));
    assert!(game.unit_at(CubeCoord::new(-3, 0, 3)).is_none());
}

#[test]
fn test_game_from_config_plays_out() {
    let config = GameConfig::from_toml_str(
        r#"
        board_radius = 3
        players = ["Red", "Blue"]

        [[units]]
        player = 0
        archetype = "lucifer"
        level = 1
        q = 0
        r = 0

        [[units]]
        player = 1
        archetype = "billmen"
        q = 3
        r = 0
        "#,
    )
    .unwrap();
    let mut game = Game::from_config(&config, Arc::new(PowerCatalog::standard())).unwrap();

    let lucifer = UnitId::from("player_0_unit_0");
    let billmen = UnitId::from("player_1_unit_0");

    // Shoot for 5 kills a level 0 Billmen outright
    let outcome = game.use_power(&lucifer, "Shoot", &Target::Unit(billmen.clone()));
    assert!(matches!(outcome, Some(PowerOutcome::Damaged { amount, .. }) if amount == 5.0));

    game.next_turn();
    assert!(game.is_game_over());
    assert_eq!(game.winner().map(|p| p.name.as_str()), Some("Red"));
}
