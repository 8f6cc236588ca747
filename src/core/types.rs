//! Identifier types shared across the engine
//!
//! Ids are plain strings so they stay readable in logs and in the
//! text harness (`player_0`, `player_0_unit_3`).

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Unique identifier for players (`player_<index>`)
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Id for the player at `index` in the session's player list
    pub fn from_index(index: usize) -> Self {
        Self(format!("player_{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for units (`<player>_unit_<ordinal>`)
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
pub struct UnitId(pub String);

impl UnitId {
    /// Id for the `ordinal`-th unit ever created for `owner`
    pub fn for_player(owner: &PlayerId, ordinal: usize) -> Self {
        Self(format!("{}_unit_{}", owner, ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Turn counter (one increment per full player rotation)
pub type TurnNumber = u32;
