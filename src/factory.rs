//! Deterministic creation of `EscrowSrc`/`EscrowDst` objects (spec.md §4.5):
//! deployment-timestamp stamping, per-`(order_hash, side)` uniqueness, and
//! the running statistics a deployment dashboard would read.

use crate::address::Address;
use crate::clock::Clock;
use crate::coin::Coin;
use crate::error::SwapError;
use crate::escrow::EscrowId;
use crate::escrow_dst::EscrowDst;
use crate::escrow_src::EscrowSrc;
use crate::events::{Event, EventSink};
use crate::immutables::{verify_cross_chain_compatibility, Immutables};
use crate::store::ObjectStore;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Src,
    Dst,
}

/// spec.md §3 Factory "Persistent configuration".
#[derive(Debug, Clone, Copy)]
pub struct FactoryConfig {
    pub src_rescue_delay: u64,
    pub dst_rescue_delay: u64,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            src_rescue_delay: 86_400,
            dst_rescue_delay: 86_400,
        }
    }
}

/// spec.md §3 Factory "Statistics": cumulative and active counts,
/// cumulative volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryStats {
    pub active_escrows: u64,
    pub completed_escrows: u64,
    pub cumulative_volume: u128,
}

/// Process-wide (per ledger) singleton, modeled as an explicit handle
/// threaded through every call rather than module-level state (spec.md §9
/// "Avoid global mutable state").
#[derive(Debug)]
pub struct EscrowFactory {
    pub factory_id: u64,
    pub admin: Address,
    pub config: FactoryConfig,
    pub stats: FactoryStats,
    index: HashMap<([u8; 32], Side), EscrowId>,
}

impl EscrowFactory {
    pub fn new(factory_id: u64, admin: Address, config: FactoryConfig) -> Self {
        Self {
            factory_id,
            admin,
            config,
            stats: FactoryStats::default(),
            index: HashMap::new(),
        }
    }

    pub fn escrow_id_for(&self, order_hash: &[u8; 32], side: Side) -> Option<EscrowId> {
        self.index.get(&(*order_hash, side)).copied()
    }

    /// spec.md §4.5 steps 1-5. On failure the caller gets its coins back
    /// unconsumed — the handoff between a funding component (OrderPool, a
    /// resolver) and the Factory is a plain function call that moves owned
    /// coins (spec.md §9 "message passing over callbacks"), so a rejected
    /// creation must be a true no-op rather than a silent burn.
    pub fn create_src_escrow<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        imm: Immutables,
        principal: C,
        safety_deposit: C,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<EscrowId, (SwapError, C, C)> {
        let span = tracing::info_span!("factory.create_src_escrow", order_hash = %hex::encode(imm.order_hash));
        let _enter = span.enter();
        let key = (imm.order_hash, Side::Src);
        if self.index.contains_key(&key) {
            tracing::warn!("create_src_escrow rejected: EscrowExists");
            return Err((SwapError::EscrowExists, principal, safety_deposit));
        }
        if principal.balance() != imm.amount || safety_deposit.balance() != imm.safety_deposit {
            tracing::warn!("create_src_escrow rejected: FactoryMismatch");
            return Err((SwapError::FactoryMismatch, principal, safety_deposit));
        }

        let mut stamped = imm;
        stamped.timelocks = stamped.timelocks.with_deployed_at(clock.now() as u32);
        if let Err(e) = stamped.timelocks.validate_ordering() {
            tracing::warn!("create_src_escrow rejected: ill-ordered timelocks");
            return Err((e, principal, safety_deposit));
        }
        let id = store.next_escrow_id();
        let (maker, taker, token_amount, safety_amount) =
            (stamped.maker.clone(), stamped.taker.clone(), stamped.amount, stamped.safety_deposit);
        let order_hash = stamped.order_hash;
        let escrow = EscrowSrc::new(id, stamped, principal, safety_deposit, self.config.src_rescue_delay);
        store
            .insert_src_escrow(escrow)
            .map_err(|e| (e, C::zero(), C::zero()))?;

        self.index.insert(key, id);
        self.stats.active_escrows += 1;
        self.stats.cumulative_volume += token_amount as u128;
        events.emit(Event::EscrowCreated {
            escrow_id: id,
            factory_id: self.factory_id,
            order_hash,
            is_src: true,
            maker,
            taker,
            token_amount,
            safety_amount,
        });
        Ok(id)
    }

    pub fn create_dst_escrow<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        imm: Immutables,
        principal: C,
        safety_deposit: C,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<EscrowId, (SwapError, C, C)> {
        let span = tracing::info_span!("factory.create_dst_escrow", order_hash = %hex::encode(imm.order_hash));
        let _enter = span.enter();
        let key = (imm.order_hash, Side::Dst);
        if self.index.contains_key(&key) {
            tracing::warn!("create_dst_escrow rejected: EscrowExists");
            return Err((SwapError::EscrowExists, principal, safety_deposit));
        }
        if principal.balance() != imm.amount || safety_deposit.balance() != imm.safety_deposit {
            tracing::warn!("create_dst_escrow rejected: FactoryMismatch");
            return Err((SwapError::FactoryMismatch, principal, safety_deposit));
        }

        let mut stamped = imm;
        stamped.timelocks = stamped.timelocks.with_deployed_at(clock.now() as u32);
        if let Err(e) = stamped.timelocks.validate_ordering() {
            tracing::warn!("create_dst_escrow rejected: ill-ordered timelocks");
            return Err((e, principal, safety_deposit));
        }
        let id = store.next_escrow_id();
        let (maker, taker, token_amount, safety_amount) =
            (stamped.maker.clone(), stamped.taker.clone(), stamped.amount, stamped.safety_deposit);
        let order_hash = stamped.order_hash;
        let escrow = EscrowDst::new(id, stamped, principal, safety_deposit, self.config.dst_rescue_delay);
        store
            .insert_dst_escrow(escrow)
            .map_err(|e| (e, C::zero(), C::zero()))?;

        self.index.insert(key, id);
        self.stats.active_escrows += 1;
        self.stats.cumulative_volume += token_amount as u128;
        events.emit(Event::EscrowCreated {
            escrow_id: id,
            factory_id: self.factory_id,
            order_hash,
            is_src: false,
            maker,
            taker,
            token_amount,
            safety_amount,
        });
        Ok(id)
    }

    /// spec.md §4.5 `initiate_cross_chain_swap`: composes the two creation
    /// calls and additionally asserts cross-chain compatibility up front,
    /// so a mismatched pair never touches either side's coins.
    #[allow(clippy::too_many_arguments)]
    pub fn initiate_cross_chain_swap<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        src_imm: Immutables,
        src_principal: C,
        src_safety: C,
        dst_imm: Immutables,
        dst_principal: C,
        dst_safety: C,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<(EscrowId, EscrowId), (SwapError, C, C, C, C)> {
        if !verify_cross_chain_compatibility(&src_imm, &dst_imm) {
            return Err((SwapError::FactoryMismatch, src_principal, src_safety, dst_principal, dst_safety));
        }

        let order_hash = src_imm.order_hash;
        let maker = src_imm.maker.clone();
        let taker = src_imm.taker.clone();
        let src_amount = src_imm.amount;
        let dst_amount = dst_imm.amount;

        let src_id = match self.create_src_escrow(store, src_imm, src_principal, src_safety, clock, events) {
            Ok(id) => id,
            Err((err, p, s)) => return Err((err, p, s, dst_principal, dst_safety)),
        };
        let dst_id = match self.create_dst_escrow(store, dst_imm, dst_principal, dst_safety, clock, events) {
            Ok(id) => id,
            Err((err, p, s)) => {
                // The matching src escrow already committed to `store`; the
                // caller's ledger transaction is expected to roll the whole
                // call back on `Err` (spec.md §7), undoing it along with
                // everything else.
                return Err((err, C::zero(), C::zero(), p, s));
            }
        };

        events.emit(Event::CrossChainSwapInitiated {
            src_escrow_id: src_id,
            dst_escrow_id: dst_id,
            order_hash,
            maker,
            taker,
            src_token_amount: src_amount,
            dst_token_amount: dst_amount,
        });
        Ok((src_id, dst_id))
    }

    /// Package-internal: drops the `(order_hash, side)` index entry once the
    /// escrow it points at has reached a terminal state (spec.md §4.5
    /// "Uniqueness invariant"). Does not touch the escrow record itself —
    /// callers remove that from the `ObjectStore` separately if desired.
    pub(crate) fn remove_escrow_reference(&mut self, order_hash: &[u8; 32], side: Side) {
        if self.index.remove(&(*order_hash, side)).is_some() {
            self.stats.active_escrows = self.stats.active_escrows.saturating_sub(1);
            self.stats.completed_escrows += 1;
        }
    }
}
