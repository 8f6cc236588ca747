pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{Result, SkirmishError};
pub use types::{PlayerId, TurnNumber, UnitId};
