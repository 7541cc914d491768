//! Maker-funded pending swap orders awaiting resolver claim (spec.md §4.6).
//! Holds coins owned by the pool itself until a terminal transition moves
//! them into an `EscrowSrc` (claimed) or back to the maker (cancelled,
//! expired) — spec.md §9 "no cyclic ownership".

use crate::address::Address;
use crate::clock::Clock;
use crate::coin::Coin;
use crate::crypto::CryptoProvider;
use crate::error::SwapError;
use crate::escrow::{EscrowId, Payout};
use crate::events::{Event, EventSink};
use crate::factory::EscrowFactory;
use crate::immutables::{order_hash_of, OrderImmutablesTemplate};
use crate::store::{ObjectStore, OrderHash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Active,
    Taken,
    Cancelled,
}

/// spec.md §3 "PendingOrder (OrderPool entry)".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder<C: Coin> {
    pub order_hash: OrderHash,
    pub maker: Address,
    pub principal: C,
    pub safety_deposit: C,
    pub expiry: u64,
    pub status: OrderStatus,
    pub created_at: u64,
    pub template: OrderImmutablesTemplate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStats {
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug)]
pub struct OrderPool {
    pub pool_id: u64,
    pub stats: PoolStats,
}

impl OrderPool {
    pub fn new(pool_id: u64) -> Self {
        Self {
            pool_id,
            stats: PoolStats::default(),
        }
    }

    /// spec.md §4.6 `create_order`: recomputes `order_hash` from the
    /// template and aborts with `HashMismatch` on any mismatch against the
    /// caller-supplied value, rather than trusting it.
    #[allow(clippy::too_many_arguments)]
    pub fn create_order<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        order_hash: OrderHash,
        template: OrderImmutablesTemplate,
        principal: C,
        safety_deposit: C,
        expiry: u64,
        clock: &dyn Clock,
        crypto: &dyn CryptoProvider,
        events: &mut dyn EventSink,
    ) -> Result<(), SwapError> {
        let span = tracing::info_span!("order_pool.create_order", order_hash = %hex::encode(order_hash));
        let _enter = span.enter();
        if order_hash_of(&template, crypto) != order_hash {
            tracing::warn!("create_order rejected: HashMismatch");
            return Err(SwapError::HashMismatch);
        }

        let maker = template.maker.clone();
        let token = template.maker_asset.clone();
        let amount = principal.balance();
        let order = PendingOrder {
            order_hash,
            maker: maker.clone(),
            principal,
            safety_deposit,
            expiry,
            status: OrderStatus::Active,
            created_at: clock.now(),
            template,
        };
        store.insert_order(order)?;
        self.stats.active += 1;
        events.emit(Event::OrderCreated {
            order_hash,
            maker,
            token,
            amount,
            expiry,
            pool_id: self.pool_id,
        });
        Ok(())
    }

    /// spec.md §2 lists `create_fusion_order` alongside `create_order` with
    /// identical stated behavior; kept as a distinct, named entry point for
    /// callers that originate orders through a Fusion-style intent rather
    /// than a plain limit order, without diverging in semantics.
    #[allow(clippy::too_many_arguments)]
    pub fn create_fusion_order<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        order_hash: OrderHash,
        template: OrderImmutablesTemplate,
        principal: C,
        safety_deposit: C,
        expiry: u64,
        clock: &dyn Clock,
        crypto: &dyn CryptoProvider,
        events: &mut dyn EventSink,
    ) -> Result<(), SwapError> {
        self.create_order(store, order_hash, template, principal, safety_deposit, expiry, clock, crypto, events)
    }

    /// spec.md §4.6 `cancel_order`. Removes the entry for the duration of
    /// the call and restores it unchanged on any rejection, so a failed
    /// cancel is a true no-op.
    pub fn cancel_order<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        order_hash: &OrderHash,
        caller: &Address,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::info_span!("order_pool.cancel_order", order_hash = %hex::encode(order_hash));
        let _enter = span.enter();
        let order = store.take_order(order_hash).ok_or(SwapError::OrderNotFound)?;

        if order.status != OrderStatus::Active {
            tracing::warn!("cancel_order rejected: OrderCancelled");
            let err = SwapError::OrderCancelled;
            store.insert_order(order).expect("order_hash was just removed");
            return Err(err);
        }
        if order.maker != *caller {
            tracing::warn!("cancel_order rejected: InvalidCaller");
            let err = SwapError::InvalidCaller;
            store.insert_order(order).expect("order_hash was just removed");
            return Err(err);
        }

        let PendingOrder {
            order_hash,
            maker,
            principal,
            safety_deposit,
            ..
        } = order;
        let refunded_amount = principal.balance();
        self.stats.active = self.stats.active.saturating_sub(1);
        self.stats.cancelled += 1;
        events.emit(Event::OrderCancelled {
            order_hash,
            maker: maker.clone(),
            refunded_amount,
        });
        Ok(Payout {
            principal: (maker.clone(), principal),
            safety_deposit: (maker, safety_deposit),
        })
    }

    /// spec.md §4.6 `claim_and_create_escrow` / §8 P1: the PendingOrder is
    /// removed and a matching EscrowSrc created, or neither happens. A
    /// rejection after the order has been taken out of `store` puts it back
    /// untouched before returning.
    #[allow(clippy::too_many_arguments)]
    pub fn claim_and_create_escrow<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        factory: &mut EscrowFactory,
        order_hash: &OrderHash,
        resolver: &Address,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<EscrowId, SwapError> {
        let span = tracing::info_span!("order_pool.claim_and_create_escrow", order_hash = %hex::encode(order_hash));
        let _enter = span.enter();
        let order = store.take_order(order_hash).ok_or(SwapError::OrderNotFound)?;

        if order.status != OrderStatus::Active {
            let err = SwapError::OrderAlreadyTaken;
            tracing::warn!("claim rejected: OrderAlreadyTaken");
            store.insert_order(order).expect("order_hash was just removed");
            return Err(err);
        }
        if clock.now() >= order.expiry {
            let err = SwapError::OrderExpired;
            tracing::warn!("claim rejected: OrderExpired");
            store.insert_order(order).expect("order_hash was just removed");
            return Err(err);
        }

        let PendingOrder {
            order_hash,
            maker,
            principal,
            safety_deposit,
            expiry,
            status,
            created_at,
            template,
        } = order;
        let imm = template.to_src_immutables(order_hash, resolver.clone());

        match factory.create_src_escrow(store, imm, principal, safety_deposit, clock, events) {
            Ok(src_id) => {
                self.stats.active = self.stats.active.saturating_sub(1);
                self.stats.completed += 1;
                events.emit(Event::OrderTaken {
                    order_hash,
                    maker,
                    taker: resolver.clone(),
                    resolver: resolver.clone(),
                    src_escrow_id: src_id,
                });
                Ok(src_id)
            }
            Err((err, principal, safety_deposit)) => {
                tracing::warn!(?err, "claim rejected by factory, restoring order");
                store
                    .insert_order(PendingOrder {
                        order_hash,
                        maker,
                        principal,
                        safety_deposit,
                        expiry,
                        status,
                        created_at,
                        template,
                    })
                    .expect("order_hash was just removed");
                Err(err)
            }
        }
    }

    /// spec.md §4.6 "Expiry sweep": optional housekeeping, callable by
    /// anyone, refunding the maker once `expiry` has passed without a claim.
    pub fn expire<C: Coin>(
        &mut self,
        store: &mut dyn ObjectStore<C>,
        order_hash: &OrderHash,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::info_span!("order_pool.expire", order_hash = %hex::encode(order_hash));
        let _enter = span.enter();
        let order = store.take_order(order_hash).ok_or(SwapError::OrderNotFound)?;

        if order.status != OrderStatus::Active || clock.now() < order.expiry {
            let err = if order.status != OrderStatus::Active {
                SwapError::OrderCancelled
            } else {
                SwapError::InvalidTime
            };
            tracing::warn!(?err, "expire rejected");
            store.insert_order(order).expect("order_hash was just removed");
            return Err(err);
        }

        let PendingOrder {
            order_hash,
            maker,
            principal,
            safety_deposit,
            ..
        } = order;
        let refunded_amount = principal.balance();
        self.stats.active = self.stats.active.saturating_sub(1);
        self.stats.cancelled += 1;
        events.emit(Event::OrderCancelled {
            order_hash,
            maker: maker.clone(),
            refunded_amount,
        });
        Ok(Payout {
            principal: (maker.clone(), principal),
            safety_deposit: (maker, safety_deposit),
        })
    }
}
