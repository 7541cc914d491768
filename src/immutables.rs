//! The per-swap parameter bundle (spec.md §3) and the two canonical hashes
//! derived from it (spec.md §6.2).

use crate::address::Address;
use crate::crypto::CryptoProvider;
use crate::timelocks::Timelocks;
use serde::{Deserialize, Serialize};

/// The canonical, ledger-agnostic per-swap parameter bundle. Semantically
/// immutable after creation — every field here is exactly as spec.md §3
/// lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Immutables {
    pub order_hash: [u8; 32],
    pub hashlock: [u8; 32],
    pub maker: Address,
    pub taker: Address,
    pub token: Address,
    pub amount: u64,
    pub safety_deposit: u64,
    pub timelocks: Timelocks,
}

impl Immutables {
    /// spec.md §4.2 `hash_immutables`: Keccak-256 over the concatenation of
    /// every field in declaration order, fixed-width, addresses padded to
    /// 32 bytes. This is the escrow's binding identity (spec.md §3).
    pub fn hash(&self, crypto: &dyn CryptoProvider) -> [u8; 32] {
        let mut buf = Vec::with_capacity(32 * 7 + 8 + 8);
        buf.extend_from_slice(&self.order_hash);
        buf.extend_from_slice(&self.hashlock);
        buf.extend_from_slice(&self.maker.to_padded32());
        buf.extend_from_slice(&self.taker.to_padded32());
        buf.extend_from_slice(&self.token.to_padded32());
        buf.extend_from_slice(&self.amount.to_le_bytes());
        buf.extend_from_slice(&self.safety_deposit.to_le_bytes());
        buf.extend_from_slice(&self.timelocks.0);
        crypto.keccak256(&buf)
    }
}

/// spec.md §6.2: two counterpart escrows are cross-chain compatible only
/// if `order_hash`/`hashlock` are bitwise equal and maker/taker are
/// mirrored.
pub fn verify_cross_chain_compatibility(src: &Immutables, dst: &Immutables) -> bool {
    src.order_hash == dst.order_hash
        && src.hashlock == dst.hashlock
        && src.maker == dst.taker
        && src.taker == dst.maker
}

/// Every field of the eventual source-side `Immutables` except `taker`
/// (spec.md §3 "PendingOrder"), plus the order-level fields needed to
/// compute `order_hash` (spec.md §6.2) and the cross-chain destination
/// parameters a resolver needs to mirror on the other ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderImmutablesTemplate {
    pub hashlock: [u8; 32],
    pub salt: [u8; 32],
    pub nonce: u64,
    pub maker: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: u64,
    pub taking_amount: u64,
    pub safety_deposit: u64,
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    pub src_safety_deposit: u64,
    pub dst_safety_deposit: u64,
    pub timelocks: Timelocks,
    pub allow_partial_fills: bool,
    pub allow_multiple_fills: bool,
}

impl OrderImmutablesTemplate {
    /// Builds the eventual source-side `Immutables` by filling in `taker`
    /// (spec.md §4.6 `claim_and_create_escrow` step 2).
    pub fn to_src_immutables(&self, order_hash: [u8; 32], taker: Address) -> Immutables {
        Immutables {
            order_hash,
            hashlock: self.hashlock,
            maker: self.maker.clone(),
            taker,
            token: self.maker_asset.clone(),
            amount: self.making_amount,
            safety_deposit: self.src_safety_deposit,
            timelocks: self.timelocks,
        }
    }
}

/// spec.md §6.2 `order_hash`: Keccak-256 over the template fields, in the
/// exact declared order, scalars as fixed-width little-endian, addresses
/// padded to 32 bytes, booleans as a single 0/1 byte.
pub fn order_hash_of(template: &OrderImmutablesTemplate, crypto: &dyn CryptoProvider) -> [u8; 32] {
    let mut buf = Vec::with_capacity(256);
    buf.extend_from_slice(&template.hashlock);
    buf.extend_from_slice(&template.salt);
    buf.extend_from_slice(&template.nonce.to_le_bytes());
    buf.extend_from_slice(&template.maker.to_padded32());
    buf.extend_from_slice(&template.maker_asset.to_padded32());
    buf.extend_from_slice(&template.taker_asset.to_padded32());
    buf.extend_from_slice(&template.making_amount.to_le_bytes());
    buf.extend_from_slice(&template.taking_amount.to_le_bytes());
    buf.extend_from_slice(&template.safety_deposit.to_le_bytes());
    buf.extend_from_slice(&template.src_chain_id.to_le_bytes());
    buf.extend_from_slice(&template.dst_chain_id.to_le_bytes());
    buf.extend_from_slice(&template.src_safety_deposit.to_le_bytes());
    buf.extend_from_slice(&template.dst_safety_deposit.to_le_bytes());
    buf.extend_from_slice(&template.timelocks.0);
    buf.push(template.allow_partial_fills as u8);
    buf.push(template.allow_multiple_fills as u8);
    crypto.keccak256(&buf)
}
