use thiserror::Error;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("not initialized: run 'vigil init'")]
    NotInitialized,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("sequence violation for session '{session}': expected {expected}, got {got}")]
    SequenceViolation {
        session: String,
        expected: u64,
        got: u64,
    },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("session is retired: {0}")]
    SessionRetired(String),

    #[error("invalid session id '{0}': must be alphanumeric with '-', '_', '.', ':' and at most 128 chars")]
    InvalidSessionId(String),

    #[error("alert not found: {0}")]
    AlertNotFound(String),

    #[error("alert {id} already {state} by '{by}'")]
    AlreadyAcknowledged {
        id: String,
        state: String,
        by: String,
    },

    #[error("invalid risk level: {0}")]
    InvalidRiskLevel(String),

    #[error("invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, VigilError>;
