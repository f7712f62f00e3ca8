//! Common result and error types for the Mosaic toolchain.

/// The standard result type for fallible internal operations.
///
/// `Ok` contains the result value (which may be partial or degraded after
/// recovery). `Err` indicates an unrecoverable internal error (a bug in
/// Mosaic), not a user-facing condition. User-facing conditions — an
/// unlegalizable cell, a skipped input record — are reported through the
/// diagnostic sink and the operation still returns `Ok`.
pub type MosaicResult<T> = Result<T, InternalError>;

/// An internal engine error indicating a bug in Mosaic, not a problem with
/// the user's input.
///
/// These errors should never occur during normal operation. If one does,
/// it means an invariant of the placement engine was violated.
#[derive(Debug, thiserror::Error)]
#[error("internal placement engine error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
