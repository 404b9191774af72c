use thiserror::Error;

pub type Result<T> = std::result::Result<T, DoorprizeError>;

#[derive(Error, Debug)]
pub enum DoorprizeError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid CSV header: expected 'nama,unit', found '{found}'")]
    InvalidCsvHeader { found: String },

    #[error("Incomplete CSV row at line {line}: both name and unit are required")]
    IncompleteRow { line: usize },

    #[error("Malformed CSV row at line {line}: unbalanced quote")]
    MalformedRow { line: usize },

    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Participant already registered: {name} ({unit})")]
    DuplicateRegistration { name: String, unit: String },

    #[error("Admin password rejected")]
    AdminRejected,

    #[error("Backup checksum mismatch")]
    BackupChecksumMismatch,

    #[error("Unsupported backup version: {0}")]
    UnsupportedBackupVersion(u32),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DoorprizeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }
}
