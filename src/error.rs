//! Error types for the colony.

use crate::route::Coordinate;
use thiserror::Error;

/// Everything that can go wrong while loading a problem or searching for a
/// route.
#[derive(Error, Debug)]
pub enum AcoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed maze: {0}")]
    MalformedMaze(String),

    #[error("Malformed coordinates: {0}")]
    MalformedCoordinates(String),

    #[error("Invalid specification: {0}")]
    InvalidSpecification(String),

    #[error("Cannot deposit pheromone along an empty route")]
    EmptyRouteDeposit,

    #[error("Backtracked out of an empty route at {0}")]
    BacktrackUnderflow(Coordinate),

    #[error("No route found between start and end")]
    NoRouteFound,

    #[error("Trace error: {0}")]
    Trace(String),
}

impl From<serde_json::Error> for AcoError {
    fn from(e: serde_json::Error) -> Self {
        AcoError::Trace(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AcoError>;
