use thiserror::Error;

use crate::battle::map::MapError;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
