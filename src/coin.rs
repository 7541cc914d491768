//! The `Coin` capability (spec.md §9 "Dynamic typing"): the source encodes
//! heterogeneous coin types via a generic/phantom type parameter. Every
//! escrow, pool entry, and factory in this crate is generic over `C: Coin`
//! rather than over a single hardcoded balance type.

/// A movable balance of some (principal or native) asset. `split`/`merge`
/// model ledger-native coin objects (Move "coin of value N", a Solana
/// token account debit, …) without committing to one.
pub trait Coin: Sized + Clone {
    fn balance(&self) -> u64;

    /// Remove `amount` from `self` and return it as a new `Coin`. Panics
    /// if `amount > self.balance()` — callers must check first, mirroring
    /// every ledger's native coin-splitting primitive.
    fn split(&mut self, amount: u64) -> Self;

    fn merge(&mut self, other: Self);

    fn zero() -> Self;

    fn is_zero(&self) -> bool {
        self.balance() == 0
    }
}

/// Reference `Coin`: a bare `u64`. Sufficient for single-asset tests and
/// for hosts that don't need multi-asset accounting in the core (spec.md
/// §3: "unsigned 64-bit sufficient for protocol; implementations may
/// widen").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleCoin(pub u64);

impl Coin for SimpleCoin {
    fn balance(&self) -> u64 {
        self.0
    }

    fn split(&mut self, amount: u64) -> Self {
        assert!(amount <= self.0, "split amount exceeds balance");
        self.0 -= amount;
        SimpleCoin(amount)
    }

    fn merge(&mut self, other: Self) {
        self.0 += other.0;
    }

    fn zero() -> Self {
        SimpleCoin(0)
    }
}
