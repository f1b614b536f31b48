//! Error types for register statement accumulation

use thiserror::Error;

/// Result type for register-group operations
pub type Result<T> = std::result::Result<T, RegisterError>;

/// Consistency violations raised while accumulating register statements
///
/// These are internal-consistency errors in the calling passes, not
/// user-data errors: retrying without fixing the input reproduces the
/// same failure, so the driver is expected to abort the generation run
/// on any of them.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// A register group was requested with a clock or edge differing
    /// from the one it was created with
    #[error("mismatched clock or edge for register group '{group}'")]
    ClockMismatch { group: String },

    /// A reset-bearing statement was added before any reset signal was
    /// declared for the module
    #[error("no reset signals declared before use")]
    NoResetsDeclared,

    /// A reset-bearing statement names a reset signal that was never
    /// declared
    #[error("reset signal '{reset}' is not declared before use")]
    UndeclaredReset { reset: String },
}
