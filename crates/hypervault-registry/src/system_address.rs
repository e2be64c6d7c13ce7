//! System address derivation.
//!
//! Transferring a token to its system address moves it from the EVM layer
//! into the sender's Core spot balance. Addresses are always computed from
//! the token id; nothing here is a lookup table.

use alloy_primitives::{address, Address};

/// System address of the native gas token.
pub const NATIVE_SYSTEM_ADDRESS: Address = address!("2222222222222222222222222222222222222222");

/// High-order byte of every non-native system address.
const SYSTEM_ADDRESS_PREFIX: u8 = 0x20;

/// Derive the system address for `core_token_id`.
///
/// The native token is special-cased first; every other id maps to
/// `0x20` followed by the id big-endian, right-aligned and zero-filled.
pub fn system_address_for(core_token_id: u64, native_token_id: u64) -> Address {
    if core_token_id == native_token_id {
        return NATIVE_SYSTEM_ADDRESS;
    }

    let mut bytes = [0u8; 20];
    bytes[0] = SYSTEM_ADDRESS_PREFIX;
    bytes[12..].copy_from_slice(&core_token_id.to_be_bytes());
    Address::from(bytes)
}

/// Canonical rendering: `0x` + 40 lowercase hex digits.
pub fn format_system_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_token_maps_to_fixed_address() {
        let addr = system_address_for(135, 135);
        assert_eq!(
            format_system_address(&addr),
            "0x2222222222222222222222222222222222222222"
        );
        // mainnet native id
        assert_eq!(system_address_for(150, 150), NATIVE_SYSTEM_ADDRESS);
    }

    #[test]
    fn test_generic_token_ids() {
        assert_eq!(
            format_system_address(&system_address_for(0, 135)),
            "0x2000000000000000000000000000000000000000"
        );
        assert_eq!(
            format_system_address(&system_address_for(255, 135)),
            "0x20000000000000000000000000000000000000ff"
        );
        assert_eq!(
            format_system_address(&system_address_for(268, 150)),
            "0x200000000000000000000000000000000000010c"
        );
    }

    #[test]
    fn test_native_carve_out_is_network_specific() {
        // 135 is native on testnet but an ordinary token on mainnet
        assert_eq!(
            format_system_address(&system_address_for(135, 150)),
            "0x2000000000000000000000000000000000000087"
        );
    }

    #[test]
    fn test_max_token_id() {
        assert_eq!(
            format_system_address(&system_address_for(u64::MAX, 135)),
            "0x200000000000000000000000ffffffffffffffff"
        );
    }

    #[test]
    fn test_distinct_ids_give_distinct_addresses() {
        let native = 135;
        let mut seen = std::collections::HashSet::new();
        for id in (0u64..2048).chain([u64::MAX - 1, u64::MAX]) {
            assert!(seen.insert(system_address_for(id, native)), "collision at {id}");
        }
    }
}
