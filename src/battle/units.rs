//! Unit runtime state and combat arithmetic
//!
//! Resources are `f64` throughout: attack values pick up morale multipliers
//! (4 x 1.1 = 4.4), so HP and veil can hold fractional values.

use std::sync::Arc;

use crate::battle::constants::{
    CONFIDENT_ATTACK_MULTIPLIER, CONFIDENT_MORALE_RATIO, FATIGUE_PENALTY_DIVISOR, MOVE_FATIGUE,
    REST_RECOVERY, SHAKY_ATTACK_MULTIPLIER, SHAKY_MORALE_RATIO,
};
use crate::battle::hex::CubeCoord;
use crate::battle::unit_type::{MoraleCategory, UnitType};

/// A unit placed on the board
#[derive(Debug, Clone)]
pub struct Unit {
    unit_type: Arc<UnitType>,
    position: CubeCoord,
    current_hp: f64,
    current_fatigue: f64,
    current_veil: f64,
    current_morale: f64,
}

impl Unit {
    /// New unit at full HP, veil and morale with no fatigue
    pub fn new(unit_type: Arc<UnitType>, position: CubeCoord) -> Self {
        Self {
            current_hp: unit_type.max_hp,
            current_fatigue: 0.0,
            current_veil: unit_type.max_veil,
            current_morale: unit_type.max_morale,
            unit_type,
            position,
        }
    }

    pub fn unit_type(&self) -> &Arc<UnitType> {
        &self.unit_type
    }

    pub fn position(&self) -> CubeCoord {
        self.position
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn current_fatigue(&self) -> f64 {
        self.current_fatigue
    }

    pub fn current_veil(&self) -> f64 {
        self.current_veil
    }

    pub fn current_morale(&self) -> f64 {
        self.current_morale
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0.0
    }

    pub fn can_fly(&self) -> bool {
        self.unit_type.can_fly
    }

    /// Relocate and pay one fatigue.
    ///
    /// Only the board calls this, after it has moved the zone occupancy.
    pub(crate) fn move_to(&mut self, new_position: CubeCoord) {
        self.position = new_position;
        self.increase_fatigue(MOVE_FATIGUE);
    }

    /// Subtract HP (floored at 0). A unit reduced to 0 HP also loses all morale.
    pub fn take_damage(&mut self, amount: f64) {
        self.current_hp = (self.current_hp - amount).max(0.0);
        if self.current_hp == 0.0 {
            self.current_morale = 0.0;
        }
    }

    pub fn increase_fatigue(&mut self, amount: f64) {
        self.current_fatigue = (self.current_fatigue + amount).min(self.unit_type.max_fatigue);
    }

    /// Round-end fatigue recovery
    pub fn rest(&mut self) {
        self.current_fatigue = (self.current_fatigue - REST_RECOVERY).max(0.0);
    }

    pub fn update_morale(&mut self, change: f64) {
        self.current_morale = (self.current_morale + change)
            .min(self.unit_type.max_morale)
            .max(0.0);
    }

    /// Spend veil if enough is available. Leaves veil untouched on failure.
    pub fn use_veil(&mut self, amount: f64) -> bool {
        if self.current_veil >= amount {
            self.current_veil -= amount;
            true
        } else {
            false
        }
    }

    /// Round-end veil regeneration, capped at max veil
    pub fn regenerate_veil(&mut self) {
        self.current_veil =
            (self.current_veil + self.unit_type.veil_rate).min(self.unit_type.max_veil);
    }

    /// Melee attack value after morale and fatigue modifiers (never negative)
    pub fn calculate_attack_value(&self) -> f64 {
        let max_morale = self.unit_type.max_morale;
        let mut value = self.unit_type.attack;

        if self.current_morale >= max_morale * CONFIDENT_MORALE_RATIO {
            value *= CONFIDENT_ATTACK_MULTIPLIER;
        } else if self.current_morale <= max_morale * SHAKY_MORALE_RATIO {
            value *= SHAKY_ATTACK_MULTIPLIER;
        }

        value -= (self.current_fatigue / FATIGUE_PENALTY_DIVISOR).floor();

        value.max(0.0)
    }

    pub fn morale_category(&self) -> MoraleCategory {
        let ratio = self.current_morale / self.unit_type.max_morale;
        if ratio >= CONFIDENT_MORALE_RATIO {
            MoraleCategory::Exasperation
        } else if ratio <= SHAKY_MORALE_RATIO {
            MoraleCategory::Enraged
        } else {
            MoraleCategory::Standard
        }
    }

    pub fn available_powers(&self) -> &[String] {
        &self.unit_type.powers
    }
}
