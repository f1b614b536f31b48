//! regmill SystemVerilog register emission
//!
//! This crate handles:
//! - Per-group accumulation of combinational and synchronous assignment statements
//! - Reset polarity tracking for each output module
//! - Rendering of `always_ff`/`always_comb` process blocks with reset priority chains
//! - Legacy `always`-style dialect output

pub mod error;
pub mod registers;
pub mod reset;
pub mod writer;

pub use error::{RegisterError, Result};
pub use registers::{ModuleRegisters, RegisterGroup};
pub use reset::ResetRegistry;
pub use writer::{StatementWriter, StringWriter};

/// Output dialect and reset style selection for rendering
///
/// Passed by reference into every render call so that emission is a pure
/// function of the accumulated state and these options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvOptions {
    /// Emit Verilog-2001 `always` headers instead of `always_comb`/`always_ff`
    pub legacy_verilog: bool,
    /// Include each used reset in the synchronous sensitivity list
    pub async_resets: bool,
}

impl SvOptions {
    /// Create options with the default dialect (SystemVerilog, sync resets)
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the legacy `always`-style block headers
    pub fn with_legacy_verilog(mut self, legacy: bool) -> Self {
        self.legacy_verilog = legacy;
        self
    }

    /// Enable asynchronous reset sensitivity
    pub fn with_async_resets(mut self, async_resets: bool) -> Self {
        self.async_resets = async_resets;
        self
    }
}
