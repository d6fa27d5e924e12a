use thiserror::Error;

mod artifact;
mod controller;
mod state;

pub use artifact::{decode_upload, ImageArtifact};
pub use controller::{CallKind, StudioController};
pub use state::{FinalAd, Step, WorkflowState};

/// Failures an intent can report directly. Remote generation failures are
/// not among them: those land in the workflow's `last_error` slot when the
/// call's outcome is applied, carrying the gateway's own message.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The uploaded file could not be read as an image.
    #[error("could not decode image: {0}")]
    Decode(String),
    /// A generation call is still outstanding; the action was rejected.
    #[error("another generation is still running")]
    Busy,
    /// An action arrived in a step that cannot accept it. A well-behaved
    /// front end never triggers this; state is left untouched.
    #[error("{0}")]
    Precondition(&'static str),
}
