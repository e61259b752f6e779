use thiserror::Error;

#[derive(Error, Debug)]
pub enum HgError {
    #[error("Player not found: {0}")]
    PlayerNotFound(crate::core::types::PlayerId),

    #[error("Team not found: {0:?}")]
    TeamNotFound(crate::core::types::TeamId),

    #[error("Unknown event category: {0}")]
    UnknownCategory(String),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event catalog is not loaded: {0}")]
    CatalogUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, HgError>;
