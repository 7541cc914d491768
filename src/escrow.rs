//! Shared shape for `EscrowSrc`/`EscrowDst` (spec.md §3, §9 "tagged variants
//! over inheritance"): the two flavors diverge on recipient addressing but
//! share an identity/state surface so the Factory and logging can treat
//! them uniformly.

use crate::address::Address;
use crate::coin::Coin;
use crate::immutables::Immutables;

pub type EscrowId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowState {
    Funded,
    Withdrawn,
    Cancelled,
    Rescued,
}

/// Common read-only surface of both escrow flavors (spec.md §9).
pub trait Escrow {
    fn id(&self) -> EscrowId;
    fn immutables(&self) -> &Immutables;
    fn state(&self) -> EscrowState;
}

/// What a successful withdraw/cancel transition hands back to its caller:
/// who receives the principal and who receives the safety-deposit bounty.
/// The host transfers these coins on the ledger; this crate only decides
/// who gets what and by how much.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout<C: Coin> {
    pub principal: (Address, C),
    pub safety_deposit: (Address, C),
}
