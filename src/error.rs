//! Error types returned by the library.
//!
//! Most public APIs return [`crate::Result`], which uses [`Error`] as the error
//! type. The variants provide access to more specific error categories when
//! needed.

use std::io;

use thiserror::Error;

/// Convenient result alias for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top level error surfaced by the library APIs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input JSON failed to parse, or parsed but was missing a required field.
    #[error("malformed IR input: {0}")]
    MalformedInput(String),

    /// A `jmp`/`br` target referenced a label absent from the function.
    #[error("unresolved label {label:?} in function {function:?}")]
    UnresolvedLabel {
        /// The function containing the dangling reference.
        function: String,
        /// The label that could not be resolved.
        label: String,
    },

    /// Two blocks (or label markers) in the same function declared the same label.
    #[error("duplicate label {label:?} in function {function:?}")]
    DuplicateLabel {
        /// The function containing the clash.
        function: String,
        /// The label that was declared twice.
        label: String,
    },

    /// The dominator engine was given a node/block that is not the function's entry.
    #[error("invalid entry {0:?}: node has predecessors")]
    InvalidEntry(String),

    /// SSA validation found a duplicate definition or a use not dominated by its def.
    #[error("SSA violation: {0}")]
    SsaViolation(String),

    /// The CLI was invoked without a required flag (e.g. `-t`/`-f`/`--to`/`--from`).
    #[error("usage error: {0}")]
    UsageError(String),

    /// I/O failure reading stdin, a trace file, or writing stdout.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}
