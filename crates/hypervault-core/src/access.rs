//! Owner gating.
//!
//! Owner-only operations take an [`OwnerAuth`] by reference. The only way to
//! obtain one is [`AccessControl::authorize`], so the ownership check always
//! runs before any argument of the gated operation is looked at.

use crate::error::{CoreError, CoreResult};
use alloy_primitives::Address;
use tracing::warn;

/// Proof that the caller of the current operation is the vault owner.
#[derive(Debug)]
pub struct OwnerAuth {
    owner: Address,
}

impl OwnerAuth {
    pub fn owner(&self) -> Address {
        self.owner
    }
}

/// Records the vault owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Check `caller` against the recorded owner.
    pub fn authorize(&self, caller: Address) -> CoreResult<OwnerAuth> {
        if caller != self.owner {
            warn!(%caller, "Unauthorized owner-gated call");
            return Err(CoreError::Unauthorized { caller });
        }
        Ok(OwnerAuth { owner: caller })
    }

    /// Hand ownership to `new_owner`.
    pub fn transfer_ownership(&mut self, auth: &OwnerAuth, new_owner: Address) {
        debug_assert_eq!(auth.owner, self.owner);
        self.owner = new_owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_owner() {
        let owner = Address::repeat_byte(1);
        let access = AccessControl::new(owner);
        let auth = access.authorize(owner).unwrap();
        assert_eq!(auth.owner(), owner);
    }

    #[test]
    fn test_authorize_rejects_non_owner() {
        let access = AccessControl::new(Address::repeat_byte(1));
        let stranger = Address::repeat_byte(2);
        assert_eq!(
            access.authorize(stranger).unwrap_err(),
            CoreError::Unauthorized { caller: stranger }
        );
    }

    #[test]
    fn test_transfer_ownership() {
        let owner = Address::repeat_byte(1);
        let next = Address::repeat_byte(2);
        let mut access = AccessControl::new(owner);

        let auth = access.authorize(owner).unwrap();
        access.transfer_ownership(&auth, next);

        assert!(access.authorize(owner).is_err());
        assert!(access.authorize(next).is_ok());
    }
}
