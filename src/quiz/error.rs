use thiserror::Error;

use crate::quiz::session::Phase;
use crate::quiz::Scope;

/// Errors surfaced by question generation, session transitions and dataset loading.
#[derive(Debug, Error)]
pub enum QuizError {
    /// No question generator was supplied to the session.
    #[error("no question generator configured: make_question must be implemented for this quiz")]
    GeneratorMissing,

    /// The scope filter left nothing to draw questions from.
    #[error("no dataset items match scope '{scope}'")]
    EmptyPool { scope: Scope },

    /// The event is not accepted in the current phase. State was not changed.
    #[error("'{event}' is not allowed while {phase}")]
    InvalidTransition { event: &'static str, phase: Phase },

    #[error("dataset contains no items")]
    EmptyDataset,

    #[error("failed to parse dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}
