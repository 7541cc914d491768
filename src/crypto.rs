//! The `Crypto` collaborator (spec.md §1): Keccak-256 and optional
//! signature verification. The core never picks a signature scheme itself —
//! that is ledger-specific — so `verify_signature` defaults to `false` and
//! hosts override it only if their on-chain flow needs it.

use crate::address::Address;
use sha3::{Digest, Keccak256};

pub trait CryptoProvider {
    fn keccak256(&self, data: &[u8]) -> [u8; 32];

    fn verify_signature(&self, _msg: &[u8], _sig: &[u8], _signer: &Address) -> bool {
        false
    }
}

/// Reference implementation backed by `sha3`'s Keccak-256. Every ledger
/// host that has deployed this protocol (Move, EVM) ends up agreeing on
/// Keccak-256 for `hashlock`/`order_hash`/`immutables_hash`, so this is
/// also what production hosts should wrap rather than reimplement.
#[derive(Debug, Default, Clone, Copy)]
pub struct Keccak256Crypto;

impl CryptoProvider for Keccak256Crypto {
    fn keccak256(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}
