use thiserror::Error;

/// Errors surfaced by the scoring engine.
///
/// Nothing here is fatal to a scoring session: the worst case is a rejected
/// operation reported back to the caller. Malformed persisted fragments are
/// recovered locally at the `api` boundary and only reach this enum when a
/// record is unusable even after recovery.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid point: {0}")]
    InvalidPoint(String),

    #[error("match is already complete")]
    AlreadyComplete,

    #[error("point log is empty, nothing to undo")]
    NothingToUndo,

    #[error("malformed match state: {0}")]
    MalformedState(String),
}

impl EngineError {
    /// Whether the caller can keep the scoring session alive after this
    /// error. Currently every variant is recoverable; the classifier exists
    /// so callers do not have to match on variants.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EngineError::InvalidPoint(_) => true,
            EngineError::AlreadyComplete => true,
            EngineError::NothingToUndo => true,
            EngineError::MalformedState(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
