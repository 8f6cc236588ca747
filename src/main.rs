//! Veil Skirmish - text harness
//!
//! Drives a game session from stdin, one command per line, so the engine can
//! be played and inspected without a graphical front end.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use veil_skirmish::battle::{
    Archetype, CubeCoord, Game, GameEvent, PathFinder, PowerCatalog, Target, ZoneType,
};
use veil_skirmish::core::config::GameConfig;
use veil_skirmish::core::error::Result;
use veil_skirmish::core::types::{PlayerId, UnitId};

/// Hex skirmish engine driven from the command line
#[derive(Parser, Debug)]
#[command(name = "veil-skirmish")]
#[command(about = "Play a hex-grid skirmish from a line-oriented command prompt")]
struct Args {
    /// TOML game configuration (board, players, terrain, starting units)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board radius, overriding the configuration
    #[arg(long)]
    radius: Option<u32>,

    /// Tracing filter used when RUST_LOG is not set
    #[arg(long, default_value = "veil_skirmish=info")]
    log_filter: String,
}

/// JSON view of one unit for `status json`
#[derive(Serialize)]
struct UnitStatus {
    id: UnitId,
    owner: Option<PlayerId>,
    type_name: String,
    q: i32,
    r: i32,
    hp: f64,
    fatigue: f64,
    veil: f64,
    morale: f64,
}

/// JSON view of the session for `status json`
#[derive(Serialize)]
struct GameStatus {
    turn: u32,
    current_player: PlayerId,
    game_over: bool,
    winner: Option<PlayerId>,
    units: Vec<UnitStatus>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(radius) = args.radius {
        config.board_radius = radius;
    }

    let mut game = Game::from_config(&config, Arc::new(PowerCatalog::standard()))?;
    tracing::info!(radius = config.board_radius, "Veil Skirmish starting");

    println!("\n=== VEIL SKIRMISH ===");
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("[turn {} | {}] > ", game.turn_number(), game.current_player().name);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if let Err(message) = run_command(&mut game, input) {
            println!("{}", message);
        }
    }

    println!("\nGoodbye! Final turn: {}", game.turn_number());
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  place <player> <archetype> <level> <q> <r>  - Place a unit (player is an index)");
    println!("  terrain <q> <r> <kind>                       - Set terrain (normal/water/forest/highground)");
    println!("  move <unit> <q> <r>                          - Move one of your units");
    println!("  use <unit> <power> unit <target>             - Use a power on a unit");
    println!("  use <unit> <power> zone <q> <r>              - Use a power on a zone");
    println!("  path <unit> <q> <r>                          - Show the cheapest path");
    println!("  reach <unit> [budget]                        - Show reachable zones");
    println!("  end                                          - End the current player's turn");
    println!("  status [json]                                - Show units and turn state");
    println!("  log [json]                                   - Show the event log");
    println!("  help                                         - Show this list");
    println!("  quit / q                                     - Exit");
    println!();
}

/// Execute one command line. Err carries a message for the player.
fn run_command(game: &mut Game, input: &str) -> std::result::Result<(), String> {
    let words: Vec<&str> = input.split_whitespace().collect();

    match words.as_slice() {
        ["help"] => print_help(),

        ["place", player, archetype, level, q, r] => {
            let player = PlayerId::from_index(parse_number(player)?);
            let archetype: Archetype = archetype.parse()?;
            let level = parse_number(level)?;
            let position = parse_coord(q, r)?;
            let id = game
                .create_unit(&player, Arc::new(archetype.template(level)), position)
                .map_err(|e| e.to_string())?;
            println!("Placed {} at {}", id, position);
        }

        ["terrain", q, r, kind] => {
            let position = parse_coord(q, r)?;
            let kind: ZoneType = kind.parse()?;
            if !game.board().in_bounds(position) {
                return Err(format!("{} is off the board", position));
            }
            game.board_mut().set_zone_type(position, kind);
            println!("{} is now {}", position, kind);
        }

        ["move", unit, q, r] => {
            let unit = UnitId::from(*unit);
            let position = parse_coord(q, r)?;
            if game.move_unit(&unit, position) {
                println!("{} moved to {}", unit, position);
            } else {
                return Err(format!("{} cannot move to {}", unit, position));
            }
        }

        ["use", unit, rest @ ..] => {
            let unit = UnitId::from(*unit);
            let (power, target) = parse_power_and_target(rest)?;
            match game.use_power(&unit, &power, &target) {
                Some(outcome) => println!("{} used {}: {:?}", unit, power, outcome),
                None => return Err(format!("{} cannot use {} on {}", unit, power, target)),
            }
        }

        ["path", unit, q, r] => {
            let unit = UnitId::from(*unit);
            let goal = parse_coord(q, r)?;
            let start = game
                .board()
                .get_unit(&unit)
                .map(|u| u.position())
                .ok_or_else(|| format!("Unknown unit {}", unit))?;
            let finder = PathFinder::new(game.board());
            match finder.find_path(start, goal, &unit) {
                Some(path) => {
                    let cost = finder.path_cost(&path, &unit).unwrap_or(0.0);
                    let steps: Vec<String> = path.iter().map(|c| c.to_string()).collect();
                    println!("Path (cost {}): {}", cost, steps.join(" -> "));
                }
                None => println!("No path from {} to {}", start, goal),
            }
        }

        ["reach", unit, budget @ ..] => {
            let unit = UnitId::from(*unit);
            let movement = game
                .board()
                .get_unit(&unit)
                .map(|u| u.unit_type().movement)
                .ok_or_else(|| format!("Unknown unit {}", unit))?;
            let budget = match budget {
                [] => movement as f64,
                [value] => value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid budget: {}", value))?,
                _ => return Err("Usage: reach <unit> [budget]".into()),
            };
            let reachable: BTreeSet<CubeCoord> =
                PathFinder::new(game.board()).find_reachable_tiles(&unit, budget).into_iter().collect();
            println!("{} zones reachable within {}:", reachable.len(), budget);
            for coord in reachable {
                println!("  {}", coord);
            }
        }

        ["end"] => {
            game.next_turn();
            if game.is_game_over() {
                match game.winner() {
                    Some(winner) => println!("Game over! {} ({}) wins.", winner.name, winner.id),
                    None => println!("Game over!"),
                }
            }
            println!("Turn {}: {} to act", game.turn_number(), game.current_player().name);
        }

        ["status"] => display_status(game),
        ["status", "json"] => {
            let json = serde_json::to_string_pretty(&game_status(game)).map_err(|e| e.to_string())?;
            println!("{}", json);
        }

        ["log"] => {
            for event in game.events() {
                println!("[turn {}] {}", event.turn, event.description);
            }
        }
        ["log", "json"] => {
            let events: &[GameEvent] = game.events();
            let json = serde_json::to_string_pretty(events).map_err(|e| e.to_string())?;
            println!("{}", json);
        }

        _ => return Err("Unknown command. Type 'help' for the list.".into()),
    }

    Ok(())
}

/// `<power words...> unit <id>` or `<power words...> zone <q> <r>`
fn parse_power_and_target(words: &[&str]) -> std::result::Result<(String, Target), String> {
    const USAGE: &str = "Usage: use <unit> <power> unit <target> | use <unit> <power> zone <q> <r>";

    let split = words
        .iter()
        .rposition(|w| *w == "unit" || *w == "zone")
        .ok_or(USAGE)?;
    let power = words[..split].join(" ");
    if power.is_empty() {
        return Err(USAGE.into());
    }

    let target = match &words[split..] {
        ["unit", id] => Target::Unit(UnitId::from(*id)),
        ["zone", q, r] => Target::Zone(parse_coord(q, r)?),
        _ => return Err(USAGE.into()),
    };
    Ok((power, target))
}

fn parse_number<T: std::str::FromStr>(word: &str) -> std::result::Result<T, String> {
    word.parse().map_err(|_| format!("Invalid number: {}", word))
}

fn parse_coord(q: &str, r: &str) -> std::result::Result<CubeCoord, String> {
    Ok(CubeCoord::from_qr(parse_number(q)?, parse_number(r)?))
}

fn game_status(game: &Game) -> GameStatus {
    let units = game
        .board()
        .iter_units()
        .map(|(id, unit)| {
            let axial = unit.position().to_axial();
            UnitStatus {
                id: id.clone(),
                owner: game.unit_owner(id).cloned(),
                type_name: unit.unit_type().type_name.clone(),
                q: axial.q,
                r: axial.r,
                hp: unit.current_hp(),
                fatigue: unit.current_fatigue(),
                veil: unit.current_veil(),
                morale: unit.current_morale(),
            }
        })
        .collect();

    GameStatus {
        turn: game.turn_number(),
        current_player: game.current_player().id.clone(),
        game_over: game.is_game_over(),
        winner: game.winner().map(|p| p.id.clone()),
        units,
    }
}

fn display_status(game: &Game) {
    println!("\n--- Turn {} | {} to act ---", game.turn_number(), game.current_player().name);
    for player in game.players() {
        println!("{} ({}): {} unit(s)", player.name, player.id, player.units().len());
        for id in player.units() {
            if let Some(unit) = game.board().get_unit(id) {
                println!(
                    "  {} {} at {}  hp {:.1}/{}  fatigue {}/{}  veil {}/{}  morale {}/{}",
                    id,
                    unit.unit_type().type_name,
                    unit.position(),
                    unit.current_hp(),
                    unit.unit_type().max_hp,
                    unit.current_fatigue(),
                    unit.unit_type().max_fatigue,
                    unit.current_veil(),
                    unit.unit_type().max_veil,
                    unit.current_morale(),
                    unit.unit_type().max_morale,
                );
            }
        }
    }
    if game.is_game_over() {
        println!("Game over");
    }
    println!();
}
