pub mod config;
pub mod error;
pub mod types;

pub use config::SimConfig;
pub use error::{Result, SkirmishError};
pub use types::{Faction, Position, Round, UnitId};
