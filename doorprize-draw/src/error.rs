use doorprize_core::DoorprizeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Participant pool is empty")]
    EmptyPool,

    #[error("Invalid winner count {requested}: must be between 1 and {pool_size}")]
    InvalidCount { requested: usize, pool_size: usize },

    #[error("A draw session is already running")]
    SessionBusy,

    #[error("Invalid draw timing: {0}")]
    InvalidTiming(String),

    #[error("Participant store error: {0}")]
    Store(#[from] DoorprizeError),
}

impl DrawError {
    pub fn timing(msg: impl Into<String>) -> Self {
        Self::InvalidTiming(msg.into())
    }
}
