//! Cavern Skirmish - deterministic turn-based grid combat

pub mod battle;
pub mod core;
