//! Two-state reentrancy guard.

use serde::{Deserialize, Serialize};

use crate::error::DexError;

/// Guard held by a pool for the duration of every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// No operation in progress.
    #[default]
    Unlocked,
    /// An operation is in progress; any further entry is rejected.
    Locked,
}

impl LockState {
    /// Moves `Unlocked → Locked`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Reentrant`] if already locked.
    pub fn acquire(&mut self) -> Result<(), DexError> {
        match self {
            Self::Unlocked => {
                *self = Self::Locked;
                Ok(())
            }
            Self::Locked => Err(DexError::Reentrant),
        }
    }

    /// Moves back to `Unlocked`.
    pub fn release(&mut self) {
        *self = Self::Unlocked;
    }

    /// Returns `true` while an operation holds the guard.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}
