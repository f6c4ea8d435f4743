//! Orchestration of the two screens that share a sample selection.
//!
//! - `PendingSamplesWorkflow`: loads pending samples and toggles the selection
//! - `HandoverWorkflow`: loads shifts and submits the selection as a handover
//!
//! Both receive their collaborators through the constructor; the
//! `SelectionCoordinator` instance is the only state they share.

pub mod handover;
pub mod pending;

use thiserror::Error;

pub use handover::{HandoverState, HandoverWorkflow};
pub use pending::PendingSamplesWorkflow;

/// A precondition of submission is missing. The workflow stays where it
/// was; the user can fix the input and try again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a shift")]
    NoShiftSelected,

    #[error("No samples selected")]
    NoSamplesSelected,

    #[error("User not authenticated")]
    NotAuthenticated,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No shifts available")]
    NoShiftsAvailable,

    #[error("Could not create the shift handover")]
    SubmissionFailed,

    #[error("Unknown shift: {0}")]
    UnknownShift(i64),

    #[error("Sample {0} is not in the pending list")]
    UnknownSample(i64),

    #[error("Not allowed while {0}")]
    InvalidState(&'static str),
}
