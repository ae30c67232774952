use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColonyError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No template configured for {0}")]
    MissingTemplate(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ColonyError>;
