use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown archetype key '{key}'")]
    UnknownArchetype { key: String },

    #[error("Duplicate {kind} id '{id}' in catalog")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Question bank has {available} questions, need at least {required}")]
    BankTooSmall { available: usize, required: usize },

    #[error("Candidate pool is empty")]
    EmptyCandidatePool,

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MatchResult<T> = Result<T, MatchError>;

/// Why an incoming shared link was not applied.
/// The engine never surfaces these; it logs them and keeps its state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Missing query parameter '{0}'")]
    MissingParam(&'static str),

    #[error("Unknown archetype key '{0}'")]
    UnknownArchetype(String),

    #[error("Unknown candidate id '{0}'")]
    UnknownCandidate(String),

    #[error("Compatibility '{0}' is not a finite number")]
    InvalidCompatibility(String),
}

/// Failures reported by a platform share or clipboard integration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("Share sheet unavailable")]
    Unavailable,

    #[error("Share failed: {0}")]
    Failed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),
}
