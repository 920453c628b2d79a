//! `[batch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [batch]
//! atomic = false   # true = write nothing unless every size converts
//! ```

use serde::{Deserialize, Serialize};

/// Failure semantics of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// Stop at the first failure; outputs written so far stay on disk.
    #[default]
    BestEffort,
    /// Stage every output first and commit only if all sizes succeed.
    Atomic,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// All-or-nothing output (see [`BatchMode::Atomic`]).
    pub atomic: bool,
}

impl BatchConfig {
    pub fn mode(&self) -> BatchMode {
        if self.atomic {
            BatchMode::Atomic
        } else {
            BatchMode::BestEffort
        }
    }
}
