// Completion invocation error types

use thiserror::Error;

/// Result type for completion invocations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by hidden completion mode itself
///
/// Distinct from completion-function failures, which are reported in-band
/// through the Error directive: an `EngineError` means the invocation was
/// unusable and the host must exit non-zero with a diagnostic on stderr.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The hidden completion invocation carried no word to complete
    #[error("malformed completion invocation: {0}")]
    MalformedInvocation(String),
}
