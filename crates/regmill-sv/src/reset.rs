//! Reset signal polarity registry
//!
//! One registry exists per output module. The driver populates it before
//! (or interleaved with) statement accumulation, and every register group
//! of the module consults it when reset branches and sensitivity lists
//! are rendered.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Polarity table for the reset signals of one output module
///
/// Entries are kept in declaration order so everything rendered from the
/// table is deterministic. Re-declaring a signal overwrites its polarity:
/// the table mirrors configuration, not a protected invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetRegistry {
    active_low: IndexMap<String, bool>,
}

impl ResetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a reset signal and its polarity (last declaration wins)
    pub fn declare(&mut self, name: &str, active_low: bool) {
        log::debug!("declared reset '{}' (active_low={})", name, active_low);
        self.active_low.insert(name.to_string(), active_low);
    }

    /// Polarity of a declared reset, `None` if never declared
    pub fn active_low(&self, name: &str) -> Option<bool> {
        self.active_low.get(name).copied()
    }

    /// Check whether a reset signal has been declared
    pub fn contains(&self, name: &str) -> bool {
        self.active_low.contains_key(name)
    }

    /// Check whether any reset has been declared
    pub fn is_empty(&self) -> bool {
        self.active_low.is_empty()
    }

    /// Number of declared resets
    pub fn len(&self) -> usize {
        self.active_low.len()
    }

    /// Iterate declared resets and polarities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.active_low
            .iter()
            .map(|(name, active_low)| (name.as_str(), *active_low))
    }
}
