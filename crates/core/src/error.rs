//! Error types for chess-review-core

use thiserror::Error;

use crate::engine::EngineError;
use crate::rules::IllegalMove;

/// Why a game review stopped
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),

    #[error("engine failed while reviewing move {index}: {source}")]
    Engine {
        index: usize,
        #[source]
        source: EngineError,
    },
}

impl ReviewError {
    /// Engine errors caused by the wait window running out
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReviewError::Engine { source, .. } if source.is_timeout())
    }
}

/// Errors from reading game files
#[derive(Error, Debug)]
pub enum Error {
    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
