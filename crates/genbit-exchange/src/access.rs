//! Single-owner access control.

use genbit_types::{Address, GenbitError, Result};
use serde::{Deserialize, Serialize};

/// Gates privileged operations to the identity fixed at genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    #[must_use]
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn is_owner(&self, caller: Address) -> bool {
        caller == self.owner
    }

    /// # Errors
    /// `AccessDenied` naming `operation` when `caller` is not the owner.
    pub fn ensure_owner(&self, caller: Address, operation: &'static str) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(GenbitError::AccessDenied { caller, operation })
        }
    }
}
