//! Zone terrain kinds and their movement effects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{BASE_MOVE_COST, FOREST_MOVE_COST, HIGH_GROUND_MOVE_COST};

/// Terrain of a single zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ZoneType {
    #[default]
    Normal,
    Water,
    Forest,
    HighGround,
}

impl ZoneType {
    /// Cost to enter a zone of this terrain
    pub fn movement_cost(&self, can_fly: bool) -> f64 {
        if can_fly {
            return BASE_MOVE_COST;
        }
        match self {
            ZoneType::Normal | ZoneType::Water => BASE_MOVE_COST,
            ZoneType::Forest => FOREST_MOVE_COST,
            ZoneType::HighGround => HIGH_GROUND_MOVE_COST,
        }
    }

    /// Ground units cannot enter water
    pub fn is_passable(&self, can_fly: bool) -> bool {
        can_fly || !matches!(self, ZoneType::Water)
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZoneType::Normal => "normal",
            ZoneType::Water => "water",
            ZoneType::Forest => "forest",
            ZoneType::HighGround => "highGround",
        };
        f.write_str(name)
    }
}

impl FromStr for ZoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "normal" => Ok(ZoneType::Normal),
            "water" => Ok(ZoneType::Water),
            "forest" => Ok(ZoneType::Forest),
            "highground" => Ok(ZoneType::HighGround),
            other => Err(format!("Unknown zone type: {}", other)),
        }
    }
}
