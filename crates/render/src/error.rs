use thiserror::Error;

/// Failures reported by render collaborators.
///
/// A frame that cannot be acquired is not an error: `begin_frame` returns
/// `Ok(None)` and the loop skips the iteration.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Unrecoverable device or surface failure. The loop stops.
    #[error("fatal device error: {0}")]
    DeviceFatal(String),

    /// The collaborator was used in a way it does not support.
    #[error("invalid render state: {0}")]
    InvalidState(String),
}
