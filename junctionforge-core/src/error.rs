use thiserror::Error;

use crate::{JunctionId, RoadId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Road {0} not found")]
    RoadNotFound(RoadId),
    #[error("Junction {0} not found")]
    JunctionNotFound(JunctionId),
    #[error("Road {0} cannot be linked to itself")]
    SelfLink(RoadId),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Formatting error: {0}")]
    FormatError(#[from] std::fmt::Error),
}
