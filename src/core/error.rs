use thiserror::Error;

use crate::battle::hex::CubeCoord;
use crate::core::types::PlayerId;

/// Setup and misuse errors.
///
/// Expected gameplay outcomes (occupied destination, out-of-range move,
/// no path, invalid target) are returned as plain values instead.
#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Invalid position {0}: outside board boundaries")]
    OutOfBounds(CubeCoord),

    #[error("Zone {0} is already occupied")]
    ZoneOccupied(CubeCoord),

    #[error("A game needs at least one player")]
    NoPlayers,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
