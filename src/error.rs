/// Error type shared by session setup, persistence and the terminal layer.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Configuration error: a difficulty label outside the table.
    #[error("unknown difficulty `{0}` (expected Easy, Medium or Hard)")]
    UnknownDifficulty(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode high scores: {0}")]
    ScoreEncode(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
