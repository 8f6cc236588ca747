//! Battle system - hex-grid skirmishes between players' units
//!
//! Units occupy one zone each and spend their turn on a single power.
//! Fatigue, veil and morale shape how hard they hit; the session sweeps
//! the dead at every turn change and ends the game when a side is empty.

pub mod board;
pub mod constants;
pub mod game;
pub mod hex;
pub mod pathfinding;
pub mod powers;
pub mod terrain;
pub mod unit_type;
pub mod units;

// Re-exports for convenient access
pub use board::{Board, Zone};
pub use constants::*;
pub use game::{Game, GameEvent, GameEventKind, Player};
pub use hex::{
    AxialCoord, CubeCoord, FractionalCube, HexDirection, HexLayout, OffsetCoord, PixelCoord,
};
pub use pathfinding::PathFinder;
pub use powers::{PowerCatalog, PowerDefinition, PowerKind, PowerOutcome, Target, TargetType};
pub use terrain::ZoneType;
pub use unit_type::{Archetype, MoraleCategory, MusterCategory, Resistances, UnitType, Weapons};
pub use units::Unit;
