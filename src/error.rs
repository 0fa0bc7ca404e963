/// Errors that can stop the terminal host.  The simulation itself has none.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GameError>;
