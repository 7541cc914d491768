use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, ledger-native address. The core never interprets the bytes;
/// it only compares, hashes, and — for the canonical hash in spec.md §6.2 —
/// pads them to 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(Vec<u8>);

impl Address {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self(hex::decode(s.trim_start_matches("0x"))?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Canonical 32-byte encoding used by `hash_immutables` and
    /// `order_hash_of` (spec.md §6.2: "addresses use the ledger's native
    /// canonical byte form padded to 32 bytes"). Left-padded with zeros;
    /// addresses longer than 32 bytes are truncated from the left, which
    /// never happens for any ledger this crate targets (Move/EVM addresses
    /// are both <= 32 bytes).
    pub fn to_padded32(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let len = self.0.len().min(32);
        out[32 - len..].copy_from_slice(&self.0[self.0.len() - len..]);
        out
    }

    /// The reserved address `rescue_funds` (spec.md §4.3) compares `token`
    /// against to decide whether to drain the safety deposit rather than
    /// the principal balance. No real ledger address is the empty byte
    /// string, so it can never collide with a caller-supplied token.
    pub fn native_sentinel() -> Self {
        Self(Vec::new())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        match Self::from_hex(s) {
            Ok(addr) if s.starts_with("0x") => addr,
            _ => Self(s.as_bytes().to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded32_left_pads_short_addresses() {
        let addr = Address::new(vec![0xAB, 0xCD]);
        let padded = addr.to_padded32();
        assert_eq!(&padded[..30], &[0u8; 30]);
        assert_eq!(&padded[30..], &[0xAB, 0xCD]);
    }

    #[test]
    fn display_round_trips_through_from_hex() {
        let addr = Address::from_hex("0x1122334455").unwrap();
        assert_eq!(addr.to_string(), "0x1122334455");
    }
}
