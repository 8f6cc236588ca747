//! Engine constants - all tunable values in one place
//!
//! Morale thresholds are fractions of a unit's maximum morale.

// Board defaults
pub const DEFAULT_BOARD_RADIUS: u32 = 5;
pub const DEFAULT_HEX_SIZE: f64 = 60.0;

// Morale bands
pub const CONFIDENT_MORALE_RATIO: f64 = 0.8;
pub const SHAKY_MORALE_RATIO: f64 = 0.2;
pub const CONFIDENT_ATTACK_MULTIPLIER: f64 = 1.1;
pub const SHAKY_ATTACK_MULTIPLIER: f64 = 0.8;

// Fatigue
pub const MOVE_FATIGUE: f64 = 1.0;
pub const REST_RECOVERY: f64 = 2.0;
pub const FATIGUE_PENALTY_DIVISOR: f64 = 2.0;

// Ground movement cost per zone entered (flyers always pay BASE_MOVE_COST)
pub const BASE_MOVE_COST: f64 = 1.0;
pub const FOREST_MOVE_COST: f64 = 2.0;
pub const HIGH_GROUND_MOVE_COST: f64 = 1.5;

// Power effects
pub const HELLFIRE_MAGIC_MULTIPLIER: f64 = 1.5;
pub const HELLFIRE_MORALE_LOSS: f64 = 2.0;
pub const CAST_SPELL_MORALE_LOSS: f64 = 1.0;
pub const FIGHT_MORALE_SWING: f64 = 1.0;
