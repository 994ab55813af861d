//! Programmer-error surface for this crate: these are bugs in the
//! caller, not recoverable formatting failures - propagate and stop,
//! never patch around them with a fallback.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("pending whitespace flushed while still ambiguous; call preserve_newlines first")]
    AmbiguousWhitespace,
}
