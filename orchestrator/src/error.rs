//! Orchestrator-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Candidate {id} already decided: {status}")]
    CandidateAlreadyDecided { id: String, status: String },

    #[error("{stage} stage is disabled by configuration")]
    StageDisabled { stage: &'static str },

    #[error("Throttled call exhausted its retry budget after {attempts} attempts")]
    MaxRetriesExceeded { attempts: u32 },

    #[error("External dependency failed: {message}")]
    DependencyFailure { message: String },

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("Illegal venture transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Record store operation failed: {message}")]
    StoreError { message: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl OrchestratorError {
    pub fn store(message: impl Into<String>) -> Self {
        OrchestratorError::StoreError {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        OrchestratorError::InvariantViolation {
            message: message.into(),
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
