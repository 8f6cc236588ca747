//! Board: a bounded hex region of zones plus the registry of live units
//!
//! The board is the sole owner of both the coordinate -> occupant mapping and
//! the units themselves. Every live unit occupies exactly one zone, and a
//! zone's occupant always has that zone's position recorded.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::hex::{CubeCoord, HexLayout};
use crate::battle::terrain::ZoneType;
use crate::battle::unit_type::UnitType;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// A single hex cell on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub position: CubeCoord,
    pub zone_type: ZoneType,
    occupant: Option<UnitId>,
}

impl Zone {
    pub fn new(position: CubeCoord, zone_type: ZoneType) -> Self {
        Self {
            position,
            zone_type,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&UnitId> {
        self.occupant.as_ref()
    }

    /// Can a unit (flying or not) stand here, terrain-wise?
    pub fn is_passable_for(&self, can_fly: bool) -> bool {
        self.zone_type.is_passable(can_fly)
    }
}

/// The full board
#[derive(Debug, Clone)]
pub struct Board {
    radius: u32,
    layout: HexLayout,
    /// Zones in generation order (q-major)
    zones: Vec<Zone>,
    zone_index: AHashMap<CubeCoord, usize>,
    units: AHashMap<UnitId, Unit>,
    /// Registration order, for deterministic scans
    unit_order: Vec<UnitId>,
}

impl Board {
    /// Create a board of `radius` rings around the origin, all Normal terrain
    pub fn new(radius: u32, hex_size: f64) -> Self {
        let zones: Vec<Zone> = CubeCoord::ORIGIN
            .hexes_in_range(radius)
            .into_iter()
            .map(|coord| Zone::new(coord, ZoneType::Normal))
            .collect();
        let zone_index = zones
            .iter()
            .enumerate()
            .map(|(i, zone)| (zone.position, i))
            .collect();

        Self {
            radius,
            layout: HexLayout::new(hex_size),
            zones,
            zone_index,
            units: AHashMap::new(),
            unit_order: Vec::new(),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Membership test: max(|q|, |r|, |s|) <= radius
    pub fn in_bounds(&self, position: CubeCoord) -> bool {
        position.length() <= self.radius
    }

    pub fn get_zone(&self, position: CubeCoord) -> Option<&Zone> {
        if !self.in_bounds(position) {
            return None;
        }
        self.zone_index.get(&position).map(|&i| &self.zones[i])
    }

    fn get_zone_mut(&mut self, position: CubeCoord) -> Option<&mut Zone> {
        if !self.in_bounds(position) {
            return None;
        }
        match self.zone_index.get(&position) {
            Some(&i) => Some(&mut self.zones[i]),
            None => None,
        }
    }

    /// Replace a zone's terrain, keeping its occupant. Off-board positions are ignored.
    pub fn set_zone_type(&mut self, position: CubeCoord, zone_type: ZoneType) {
        if let Some(zone) = self.get_zone_mut(position) {
            zone.zone_type = zone_type;
        }
    }

    /// Register a unit and occupy the zone at its position.
    ///
    /// Fails (returns false, no change) if the id is already registered or the
    /// unit's zone is missing or occupied.
    pub fn add_unit(&mut self, id: UnitId, unit: Unit) -> bool {
        if self.units.contains_key(&id) {
            return false;
        }
        let Some(zone) = self.get_zone_mut(unit.position()) else {
            return false;
        };
        if zone.is_occupied() {
            return false;
        }
        zone.occupant = Some(id.clone());
        self.unit_order.push(id.clone());
        self.units.insert(id, unit);
        true
    }

    pub fn get_unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Mutable access for resource changes (damage, fatigue, veil, morale).
    /// Position changes must go through `move_unit` / `update_unit_position`.
    pub fn get_unit_mut(&mut self, id: &UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    /// Relocate a registered unit: vacate the source zone, occupy the
    /// destination and update the unit's own position (paying move fatigue).
    ///
    /// Returns false, leaving the board untouched, if the unit is unknown or
    /// the destination is off-board or occupied.
    pub fn move_unit(&mut self, id: &UnitId, new_position: CubeCoord) -> bool {
        let Some(old_position) = self.units.get(id).map(|u| u.position()) else {
            return false;
        };
        if !self.swap_occupancy(old_position, new_position, id) {
            return false;
        }
        if let Some(unit) = self.units.get_mut(id) {
            unit.move_to(new_position);
        }
        debug!(unit = %id, from = %old_position, to = %new_position, "Unit moved");
        true
    }

    /// Zone-occupancy swap only; the unit's stored position is left alone.
    ///
    /// Returns false, leaving the board untouched, if either zone is missing
    /// or the destination is occupied.
    pub fn update_unit_position(
        &mut self,
        old_position: CubeCoord,
        new_position: CubeCoord,
        id: &UnitId,
    ) -> bool {
        self.swap_occupancy(old_position, new_position, id)
    }

    fn swap_occupancy(&mut self, old_position: CubeCoord, new_position: CubeCoord, id: &UnitId) -> bool {
        if self.get_zone(old_position).is_none() {
            return false;
        }
        match self.get_zone(new_position) {
            Some(zone) if !zone.is_occupied() => {}
            _ => return false,
        }

        if let Some(old_zone) = self.get_zone_mut(old_position) {
            old_zone.occupant = None;
        }
        if let Some(new_zone) = self.get_zone_mut(new_position) {
            new_zone.occupant = Some(id.clone());
        }
        true
    }

    /// Vacate the unit's zone and drop it from the registry
    pub fn remove_unit(&mut self, id: &UnitId) -> Option<Unit> {
        let unit = self.units.remove(id)?;
        if let Some(zone) = self.get_zone_mut(unit.position()) {
            if zone.occupant.as_ref() == Some(id) {
                zone.occupant = None;
            }
        }
        self.unit_order.retain(|other| other != id);
        Some(unit)
    }

    /// Units whose position is within `range` of `position`
    pub fn get_units_in_range(&self, position: CubeCoord, range: u32) -> Vec<(&UnitId, &Unit)> {
        self.iter_units()
            .filter(|(_, unit)| position.distance(&unit.position()) <= range)
            .collect()
    }

    /// Units built from exactly this template instance
    pub fn get_units_of_type(&self, unit_type: &Arc<UnitType>) -> Vec<(&UnitId, &Unit)> {
        self.iter_units()
            .filter(|(_, unit)| Arc::ptr_eq(unit.unit_type(), unit_type))
            .collect()
    }

    pub fn get_all_zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Snapshot of all registered units in registration order
    pub fn get_all_units(&self) -> Vec<(UnitId, Unit)> {
        self.iter_units()
            .map(|(id, unit)| (id.clone(), unit.clone()))
            .collect()
    }

    pub fn iter_units(&self) -> impl Iterator<Item = (&UnitId, &Unit)> {
        self.unit_order
            .iter()
            .filter_map(|id| self.units.get(id).map(|unit| (id, unit)))
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// The six adjacent zones that lie on the board
    pub fn get_neighbors(&self, position: CubeCoord) -> Vec<&Zone> {
        position
            .neighbors()
            .into_iter()
            .filter_map(|pos| self.get_zone(pos))
            .collect()
    }

    pub fn get_hex_grid(&self) -> &HexLayout {
        &self.layout
    }
}
