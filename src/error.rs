//! Error types for the codec.

use thiserror::Error;

/// Errors that can occur while configuring or running the codec.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value was rejected at construction time, before any I/O.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A bounded read channel was asked for more bits than its budget allows.
    ///
    /// This is fatal: the missing bits cannot be conjured, so the whole
    /// operation aborts. It is also the typical symptom of mismatched bit
    /// budgets between the compressing and decompressing endpoints.
    #[error("bit budget underrun: requested {requested} bits with {remaining} remaining")]
    Underrun {
        /// Number of bits the caller asked for.
        requested: u64,
        /// Number of bits the channel had left in its budget.
        remaining: u64,
    },

    /// The underlying byte channel failed, including ending before the bit
    /// budget was satisfied.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
