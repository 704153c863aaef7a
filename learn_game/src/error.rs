use std::path::PathBuf;

use thiserror::Error;

/// Why a move was refused by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    Occupied,
    GameOver,
    OutOfRange,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            IllegalMoveReason::Occupied => "the cell is already taken",
            IllegalMoveReason::GameOver => "the game is already over",
            IllegalMoveReason::OutOfRange => "cells are numbered 0-8",
        };
        f.write_str(reason)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("illegal move at cell {cell}: {reason}")]
    IllegalMove {
        cell: usize,
        reason: IllegalMoveReason,
    },

    #[error("no legal move available")]
    NoLegalMove,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("input closed before the game ended")]
    InputClosed,

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
