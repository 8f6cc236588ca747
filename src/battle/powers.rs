//! Power definitions, targeting rules and effects
//!
//! The catalog is an immutable table built once and shared by reference.
//! Effects are dispatched on `PowerKind`; targets are an explicit
//! `Target::{Unit, Zone}` variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::board::Board;
use crate::battle::constants::{
    CAST_SPELL_MORALE_LOSS, FIGHT_MORALE_SWING, HELLFIRE_MAGIC_MULTIPLIER, HELLFIRE_MORALE_LOSS,
};
use crate::battle::hex::CubeCoord;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// What a power may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// Any unit other than the caster
    EnemyUnit,
    /// The caster itself
    FriendlyUnit,
    /// A zone the caster's terrain rules allow it to enter
    PassableZone,
    /// A zone with no occupant
    EmptyZone,
    Any,
}

/// The thing a power is aimed at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Unit(UnitId),
    Zone(CubeCoord),
}

impl Target {
    /// Board position of the target, if it exists
    pub fn position(&self, board: &Board) -> Option<CubeCoord> {
        match self {
            Target::Unit(id) => board.get_unit(id).map(Unit::position),
            Target::Zone(pos) => board.get_zone(*pos).map(|zone| zone.position),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Unit(id) => write!(f, "unit {}", id),
            Target::Zone(pos) => write!(f, "zone {}", pos),
        }
    }
}

/// What happened when a power resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PowerOutcome {
    Moved { from: CubeCoord, to: CubeCoord },
    Damaged { target: UnitId, amount: f64 },
    Waited,
    /// Wrong target kind, missing unit, blocked zone or not enough veil.
    /// Nothing was changed.
    Fizzled,
}

/// Every power the engine knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    Move,
    Fight,
    Wait,
    Hellfire,
    CastSpell,
    Shoot,
}

impl PowerKind {
    pub const ALL: [PowerKind; 6] = [
        PowerKind::Move,
        PowerKind::Fight,
        PowerKind::Wait,
        PowerKind::Hellfire,
        PowerKind::CastSpell,
        PowerKind::Shoot,
    ];

    /// Display name, as listed in a unit type's powers
    pub fn name(&self) -> &'static str {
        match self {
            PowerKind::Move => "Move",
            PowerKind::Fight => "Fight",
            PowerKind::Wait => "Wait",
            PowerKind::Hellfire => "Hellfire",
            PowerKind::CastSpell => "Cast Spell",
            PowerKind::Shoot => "Shoot",
        }
    }

    pub fn range(&self) -> (u32, u32) {
        match self {
            PowerKind::Move | PowerKind::Fight => (1, 1),
            PowerKind::Wait => (0, 0),
            PowerKind::Hellfire => (2, 4),
            PowerKind::CastSpell => (1, 3),
            PowerKind::Shoot => (2, 5),
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            PowerKind::Move => TargetType::PassableZone,
            PowerKind::Wait => TargetType::Any,
            PowerKind::Fight | PowerKind::Hellfire | PowerKind::CastSpell | PowerKind::Shoot => {
                TargetType::EnemyUnit
            }
        }
    }

    pub fn fatigue_increase(&self) -> f64 {
        match self {
            PowerKind::Wait => 0.0,
            PowerKind::Move => 1.0,
            PowerKind::Fight | PowerKind::CastSpell | PowerKind::Shoot => 2.0,
            PowerKind::Hellfire => 3.0,
        }
    }

    pub fn veil_cost(&self) -> f64 {
        match self {
            PowerKind::Hellfire => 2.0,
            PowerKind::CastSpell => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for PowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PowerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', " ").to_ascii_lowercase();
        PowerKind::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("Unknown power: {}", s))
    }
}

/// One row of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerDefinition {
    pub kind: PowerKind,
    pub name: String,
    pub min_range: u32,
    pub max_range: u32,
    pub target_type: TargetType,
    pub fatigue_increase: f64,
    pub veil_cost: f64,
}

impl PowerDefinition {
    pub fn from_kind(kind: PowerKind) -> Self {
        let (min_range, max_range) = kind.range();
        Self {
            kind,
            name: kind.name().to_string(),
            min_range,
            max_range,
            target_type: kind.target_type(),
            fatigue_increase: kind.fatigue_increase(),
            veil_cost: kind.veil_cost(),
        }
    }

    /// Apply the power's effect.
    ///
    /// Range, target type and veil sufficiency are the caller's
    /// responsibility (see `PowerCatalog::is_valid_target`, or use
    /// `PowerCatalog::attempt`). Veil-costing powers still spend veil through
    /// `Unit::use_veil` and fizzle without side effects if it fails.
    pub fn execute(&self, board: &mut Board, caster: &UnitId, target: &Target) -> PowerOutcome {
        let outcome = match self.kind {
            PowerKind::Move => self.execute_move(board, caster, target),
            PowerKind::Wait => PowerOutcome::Waited,
            PowerKind::Fight => {
                let Target::Unit(target_id) = target else {
                    return PowerOutcome::Fizzled;
                };
                if board.get_unit(target_id).is_none() {
                    return PowerOutcome::Fizzled;
                }
                let Some(damage) = board.get_unit(caster).map(Unit::calculate_attack_value) else {
                    return PowerOutcome::Fizzled;
                };
                if let Some(victim) = board.get_unit_mut(target_id) {
                    victim.take_damage(damage);
                    if damage > 0.0 {
                        victim.update_morale(-FIGHT_MORALE_SWING);
                    }
                }
                if let Some(attacker) = board.get_unit_mut(caster) {
                    if damage > 0.0 {
                        attacker.update_morale(FIGHT_MORALE_SWING);
                    }
                    attacker.increase_fatigue(self.fatigue_increase);
                }
                PowerOutcome::Damaged {
                    target: target_id.clone(),
                    amount: damage,
                }
            }
            PowerKind::Hellfire => {
                self.execute_veiled_strike(board, caster, target, HELLFIRE_MORALE_LOSS, |unit| {
                    (unit.unit_type().magic * HELLFIRE_MAGIC_MULTIPLIER).floor()
                })
            }
            PowerKind::CastSpell => {
                self.execute_veiled_strike(board, caster, target, CAST_SPELL_MORALE_LOSS, |unit| {
                    unit.unit_type().magic.floor()
                })
            }
            PowerKind::Shoot => self.execute_veiled_strike(board, caster, target, 0.0, |unit| {
                unit.unit_type().weapons.ranged_damage.floor()
            }),
        };

        debug!(caster = %caster, power = %self.name, target = %target, ?outcome, "Power resolved");
        outcome
    }

    fn execute_move(&self, board: &mut Board, caster: &UnitId, target: &Target) -> PowerOutcome {
        let Target::Zone(destination) = target else {
            return PowerOutcome::Fizzled;
        };
        let Some(from) = board.get_unit(caster).map(Unit::position) else {
            return PowerOutcome::Fizzled;
        };
        if !board.update_unit_position(from, *destination, caster) {
            return PowerOutcome::Fizzled;
        }
        if let Some(unit) = board.get_unit_mut(caster) {
            unit.move_to(*destination);
        }
        PowerOutcome::Moved {
            from,
            to: *destination,
        }
    }

    /// Ranged or magic hit: spend veil (if any), deal floored damage, apply
    /// the morale loss to the target and this power's fatigue to the caster.
    fn execute_veiled_strike(
        &self,
        board: &mut Board,
        caster: &UnitId,
        target: &Target,
        morale_loss: f64,
        damage_of: impl Fn(&Unit) -> f64,
    ) -> PowerOutcome {
        let Target::Unit(target_id) = target else {
            return PowerOutcome::Fizzled;
        };
        if board.get_unit(target_id).is_none() {
            return PowerOutcome::Fizzled;
        }

        let Some(attacker) = board.get_unit_mut(caster) else {
            return PowerOutcome::Fizzled;
        };
        if self.veil_cost > 0.0 && !attacker.use_veil(self.veil_cost) {
            return PowerOutcome::Fizzled;
        }
        let damage = damage_of(&*attacker);
        attacker.increase_fatigue(self.fatigue_increase);

        if let Some(victim) = board.get_unit_mut(target_id) {
            victim.take_damage(damage);
            if morale_loss > 0.0 {
                victim.update_morale(-morale_loss);
            }
        }

        PowerOutcome::Damaged {
            target: target_id.clone(),
            amount: damage,
        }
    }
}

/// Read-only table of power definitions
#[derive(Debug, Clone)]
pub struct PowerCatalog {
    powers: Vec<PowerDefinition>,
}

impl Default for PowerCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PowerCatalog {
    /// Catalog holding every `PowerKind` with its standard parameters
    pub fn standard() -> Self {
        Self {
            powers: PowerKind::ALL.into_iter().map(PowerDefinition::from_kind).collect(),
        }
    }

    /// Look up a power by name (case-insensitive, `_` for spaces)
    pub fn get_power(&self, name: &str) -> Option<&PowerDefinition> {
        let kind: PowerKind = name.parse().ok()?;
        self.powers.iter().find(|power| power.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerDefinition> {
        self.powers.iter()
    }

    /// Can `caster` aim the named power at `target` right now?
    ///
    /// Move checks terrain, occupancy and the caster's movement allowance
    /// instead of the power's own range. Every power then checks veil and the
    /// target type. Unknown powers, casters or targets are never valid.
    pub fn is_valid_target(&self, board: &Board, target: &Target, caster: &UnitId, power_name: &str) -> bool {
        let Some(power) = self.get_power(power_name) else {
            return false;
        };
        let Some(caster_unit) = board.get_unit(caster) else {
            return false;
        };
        let Some(target_position) = target.position(board) else {
            return false;
        };
        let distance = caster_unit.position().distance(&target_position);

        if power.kind == PowerKind::Move {
            let Target::Zone(pos) = target else {
                return false;
            };
            let Some(zone) = board.get_zone(*pos) else {
                return false;
            };
            if !zone.is_passable_for(caster_unit.can_fly()) || zone.is_occupied() {
                return false;
            }
            if distance > caster_unit.unit_type().movement {
                return false;
            }
        } else if distance < power.min_range || distance > power.max_range {
            return false;
        }

        if caster_unit.current_veil() < power.veil_cost {
            return false;
        }

        match power.target_type {
            TargetType::EnemyUnit => matches!(target, Target::Unit(id) if id != caster),
            TargetType::FriendlyUnit => matches!(target, Target::Unit(id) if id == caster),
            TargetType::PassableZone => match target {
                Target::Zone(pos) => board
                    .get_zone(*pos)
                    .is_some_and(|zone| zone.is_passable_for(caster_unit.can_fly())),
                Target::Unit(_) => false,
            },
            TargetType::EmptyZone => match target {
                Target::Zone(pos) => board.get_zone(*pos).is_some_and(|zone| !zone.is_occupied()),
                Target::Unit(_) => false,
            },
            TargetType::Any => true,
        }
    }

    /// Validate and, if legal, execute in one step. None means the attempt
    /// was rejected and nothing changed.
    pub fn attempt(
        &self,
        board: &mut Board,
        caster: &UnitId,
        power_name: &str,
        target: &Target,
    ) -> Option<PowerOutcome> {
        if !self.is_valid_target(board, target, caster, power_name) {
            debug!(caster = %caster, power = power_name, target = %target, "Power rejected");
            return None;
        }
        let power = self.get_power(power_name)?;
        Some(power.execute(board, caster, target))
    }
}
