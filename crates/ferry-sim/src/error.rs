use ferry_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn actor thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("actor {actor} panicked")]
    ActorPanicked { actor: String },
}

pub type SimResult<T> = Result<T, SimError>;
