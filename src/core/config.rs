//! Session configuration loaded from TOML
//!
//! ```toml
//! board_radius = 5
//! hex_size = 60.0
//! players = ["Red", "Blue"]
//!
//! [[terrain]]
//! q = 1
//! r = 0
//! kind = "forest"
//!
//! [[units]]
//! player = 0
//! archetype = "billmen"
//! level = 0
//! q = -2
//! r = 0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{DEFAULT_BOARD_RADIUS, DEFAULT_HEX_SIZE};
use crate::battle::hex::CubeCoord;
use crate::battle::terrain::ZoneType;
use crate::battle::unit_type::Archetype;
use crate::core::error::{Result, SkirmishError};

/// Terrain override for one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainPatch {
    pub q: i32,
    pub r: i32,
    pub kind: ZoneType,
}

impl TerrainPatch {
    pub fn position(&self) -> CubeCoord {
        CubeCoord::from_qr(self.q, self.r)
    }
}

/// Initial unit placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// Index into `players`
    pub player: usize,
    pub archetype: Archetype,
    #[serde(default)]
    pub level: u32,
    pub q: i32,
    pub r: i32,
}

impl UnitPlacement {
    pub fn position(&self) -> CubeCoord {
        CubeCoord::from_qr(self.q, self.r)
    }
}

/// Everything needed to set up a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rings around the origin; the board holds 3R²+3R+1 zones
    pub board_radius: u32,

    /// Hex size in pixels (center to corner), used only for pixel conversion
    pub hex_size: f64,

    /// Display names; player ids are assigned by position (`player_0`, ...)
    pub players: Vec<String>,

    /// Applied in order after the board is built
    pub terrain: Vec<TerrainPatch>,

    /// Applied in order after terrain
    pub units: Vec<UnitPlacement>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_radius: DEFAULT_BOARD_RADIUS,
            hex_size: DEFAULT_HEX_SIZE,
            players: vec!["Red".to_string(), "Blue".to_string()],
            terrain: Vec::new(),
            units: Vec::new(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate().map_err(SkirmishError::InvalidConfig)?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.board_radius == 0 {
            return Err("board_radius must be at least 1".into());
        }

        if !self.hex_size.is_finite() || self.hex_size <= 0.0 {
            return Err(format!("hex_size ({}) must be positive", self.hex_size));
        }

        if self.players.is_empty() {
            return Err("at least one player is required".into());
        }

        for placement in &self.units {
            if placement.player >= self.players.len() {
                return Err(format!(
                    "unit placement refers to player {} but only {} players are configured",
                    placement.player,
                    self.players.len()
                ));
            }
        }

        Ok(())
    }
}
