//! BaseEscrow predicate primitives (spec.md §4.2), shared by `EscrowSrc`
//! and `EscrowDst`. Pure validators — no storage, no transfers — so both
//! escrow flavors and the Factory can reuse them without inheritance
//! (spec.md §9 "tagged variants over inheritance").

use crate::address::Address;
use crate::crypto::CryptoProvider;
use crate::error::SwapError;
use crate::immutables::Immutables;
use crate::timelocks::Phase;
use subtle::ConstantTimeEq;

pub fn assert_caller_is(caller: &Address, expected: &Address) -> Result<(), SwapError> {
    if caller == expected {
        Ok(())
    } else {
        Err(SwapError::InvalidCaller)
    }
}

/// Recomputes `Keccak-256(secret)` and compares it to `imm.hashlock` in
/// constant time (spec.md §4.2): the secret is the swap's only bearer
/// credential, so timing leakage here would leak partial-preimage
/// information to a network observer.
pub fn assert_secret_matches(
    secret: &[u8],
    imm: &Immutables,
    crypto: &dyn CryptoProvider,
) -> Result<(), SwapError> {
    let computed = crypto.keccak256(secret);
    if computed.ct_eq(&imm.hashlock).into() {
        Ok(())
    } else {
        Err(SwapError::InvalidSecret)
    }
}

/// `current_time >= deadline` (spec.md §4.1/§4.2).
pub fn assert_after(imm: &Immutables, phase: Phase, now: u64) -> Result<(), SwapError> {
    if imm.timelocks.is_after(phase, now) {
        Ok(())
    } else {
        Err(SwapError::InvalidTime)
    }
}

/// `current_time < deadline` (spec.md §4.1/§4.2).
pub fn assert_before(imm: &Immutables, phase: Phase, now: u64) -> Result<(), SwapError> {
    if imm.timelocks.is_before(phase, now) {
        Ok(())
    } else {
        Err(SwapError::InvalidTime)
    }
}

/// A window gated by `[start, end)` — the shape every withdrawal /
/// cancellation transition in spec.md §4.3/§4.4 checks.
pub fn assert_within_window(
    imm: &Immutables,
    start: Phase,
    end: Phase,
    now: u64,
) -> Result<(), SwapError> {
    assert_after(imm, start, now)?;
    assert_before(imm, end, now)
}
