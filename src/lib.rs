//! Veil Skirmish - turn-based hex tactics engine

pub mod battle;
pub mod core;
