//! The `ObjectStore` collaborator (spec.md §1, §5): persist and fetch
//! escrow/order records by identity. Every method here models one atomic
//! storage operation — spec.md §5 requires that a second transaction
//! racing on the same key observe the first's terminal state rather than
//! silently overwrite it, so the trait exposes remove-and-check /
//! insert-if-absent primitives instead of plain get/set pairs.

use crate::coin::Coin;
use crate::error::SwapError;
use crate::escrow::EscrowId;
use crate::escrow_dst::EscrowDst;
use crate::escrow_src::EscrowSrc;
use crate::order_pool::PendingOrder;
use std::collections::HashMap;

pub type OrderHash = [u8; 32];

pub trait ObjectStore<C: Coin> {
    fn next_escrow_id(&mut self) -> EscrowId;

    fn insert_src_escrow(&mut self, escrow: EscrowSrc<C>) -> Result<(), SwapError>;
    fn insert_dst_escrow(&mut self, escrow: EscrowDst<C>) -> Result<(), SwapError>;

    fn get_src_escrow(&self, id: EscrowId) -> Option<&EscrowSrc<C>>;
    fn get_dst_escrow(&self, id: EscrowId) -> Option<&EscrowDst<C>>;
    fn get_src_escrow_mut(&mut self, id: EscrowId) -> Option<&mut EscrowSrc<C>>;
    fn get_dst_escrow_mut(&mut self, id: EscrowId) -> Option<&mut EscrowDst<C>>;

    fn remove_src_escrow(&mut self, id: EscrowId) -> Option<EscrowSrc<C>>;
    fn remove_dst_escrow(&mut self, id: EscrowId) -> Option<EscrowDst<C>>;

    /// Atomically removes and returns the order if present. Two racing
    /// transactions for the same `order_hash` can never both receive
    /// `Some` (spec.md §5, §8 P1).
    fn take_order(&mut self, order_hash: &OrderHash) -> Option<PendingOrder<C>>;

    fn get_order(&self, order_hash: &OrderHash) -> Option<&PendingOrder<C>>;

    /// Fails with [`SwapError::OrderAlreadyExists`] rather than overwriting.
    fn insert_order(&mut self, order: PendingOrder<C>) -> Result<(), SwapError>;
}

/// Reference `ObjectStore`: an in-memory map, sufficient for tests and for
/// simulating the protocol end to end. A real ledger host backs
/// [`ObjectStore`] with its own native object/account storage.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore<C: Coin> {
    next_id: EscrowId,
    src_escrows: HashMap<EscrowId, EscrowSrc<C>>,
    dst_escrows: HashMap<EscrowId, EscrowDst<C>>,
    orders: HashMap<OrderHash, PendingOrder<C>>,
}

impl<C: Coin> InMemoryObjectStore<C> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            src_escrows: HashMap::new(),
            dst_escrows: HashMap::new(),
            orders: HashMap::new(),
        }
    }
}

impl<C: Coin> ObjectStore<C> for InMemoryObjectStore<C> {
    fn next_escrow_id(&mut self) -> EscrowId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_src_escrow(&mut self, escrow: EscrowSrc<C>) -> Result<(), SwapError> {
        if self.src_escrows.contains_key(&escrow.id) {
            return Err(SwapError::EscrowExists);
        }
        self.src_escrows.insert(escrow.id, escrow);
        Ok(())
    }

    fn insert_dst_escrow(&mut self, escrow: EscrowDst<C>) -> Result<(), SwapError> {
        if self.dst_escrows.contains_key(&escrow.id) {
            return Err(SwapError::EscrowExists);
        }
        self.dst_escrows.insert(escrow.id, escrow);
        Ok(())
    }

    fn get_src_escrow(&self, id: EscrowId) -> Option<&EscrowSrc<C>> {
        self.src_escrows.get(&id)
    }

    fn get_dst_escrow(&self, id: EscrowId) -> Option<&EscrowDst<C>> {
        self.dst_escrows.get(&id)
    }

    fn get_src_escrow_mut(&mut self, id: EscrowId) -> Option<&mut EscrowSrc<C>> {
        self.src_escrows.get_mut(&id)
    }

    fn get_dst_escrow_mut(&mut self, id: EscrowId) -> Option<&mut EscrowDst<C>> {
        self.dst_escrows.get_mut(&id)
    }

    fn remove_src_escrow(&mut self, id: EscrowId) -> Option<EscrowSrc<C>> {
        self.src_escrows.remove(&id)
    }

    fn remove_dst_escrow(&mut self, id: EscrowId) -> Option<EscrowDst<C>> {
        self.dst_escrows.remove(&id)
    }

    fn take_order(&mut self, order_hash: &OrderHash) -> Option<PendingOrder<C>> {
        self.orders.remove(order_hash)
    }

    fn get_order(&self, order_hash: &OrderHash) -> Option<&PendingOrder<C>> {
        self.orders.get(order_hash)
    }

    fn insert_order(&mut self, order: PendingOrder<C>) -> Result<(), SwapError> {
        if self.orders.contains_key(&order.order_hash) {
            return Err(SwapError::OrderAlreadyExists);
        }
        self.orders.insert(order.order_hash, order);
        Ok(())
    }
}
