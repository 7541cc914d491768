//! Append-only protocol events (spec.md §6.1). The teacher contract
//! expresses these as `Response::new().add_attribute(...)` string pairs;
//! here they are a typed enum so a host can match on them instead of
//! re-parsing strings, while still being trivially rendered to
//! attribute-style logs (see [`Event::name`]).

use crate::address::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    OrderCreated {
        order_hash: [u8; 32],
        maker: Address,
        token: Address,
        amount: u64,
        expiry: u64,
        pool_id: u64,
    },
    OrderTaken {
        order_hash: [u8; 32],
        maker: Address,
        taker: Address,
        resolver: Address,
        src_escrow_id: u64,
    },
    OrderCancelled {
        order_hash: [u8; 32],
        maker: Address,
        refunded_amount: u64,
    },
    EscrowCreated {
        escrow_id: u64,
        factory_id: u64,
        order_hash: [u8; 32],
        is_src: bool,
        maker: Address,
        taker: Address,
        token_amount: u64,
        safety_amount: u64,
    },
    CrossChainSwapInitiated {
        src_escrow_id: u64,
        dst_escrow_id: u64,
        order_hash: [u8; 32],
        maker: Address,
        taker: Address,
        src_token_amount: u64,
        dst_token_amount: u64,
    },
    /// `secret` is deliberately public: its emission is the cross-chain
    /// signaling primitive (spec.md §6.1).
    Withdrawal {
        escrow_id: u64,
        secret: Vec<u8>,
    },
    EscrowCancelled {
        escrow_id: u64,
    },
    FundsRescued {
        escrow_id: u64,
        token: Address,
        amount: u64,
    },
    NodeInvalidated {
        merkle_root: [u8; 32],
        index: u64,
        leaf_hash: [u8; 32],
    },
}

impl Event {
    /// Short, stable name used in `tracing` spans and for any host that
    /// wants attribute-style ("method", name) logging akin to the
    /// teacher's `add_attribute("method", ...)` convention.
    pub fn name(&self) -> &'static str {
        match self {
            Event::OrderCreated { .. } => "order_created",
            Event::OrderTaken { .. } => "order_taken",
            Event::OrderCancelled { .. } => "order_cancelled",
            Event::EscrowCreated { .. } => "escrow_created",
            Event::CrossChainSwapInitiated { .. } => "cross_chain_swap_initiated",
            Event::Withdrawal { .. } => "withdrawal",
            Event::EscrowCancelled { .. } => "escrow_cancelled",
            Event::FundsRescued { .. } => "funds_rescued",
            Event::NodeInvalidated { .. } => "node_invalidated",
        }
    }
}

/// The `EventSink` collaborator (spec.md §1): append-only event emission.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Reference `EventSink` for tests: collects every emitted event in
/// arrival order so assertions can inspect the full history.
#[derive(Debug, Default)]
pub struct VecEventSink(pub Vec<Event>);

impl EventSink for VecEventSink {
    fn emit(&mut self, event: Event) {
        tracing::debug!(event = event.name(), "emit");
        self.0.push(event);
    }
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Event> {
        self.0.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_event_sink_preserves_arrival_order() {
        let mut sink = VecEventSink::new();
        sink.emit(Event::EscrowCancelled { escrow_id: 1 });
        sink.emit(Event::EscrowCancelled { escrow_id: 2 });
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.last(), Some(&Event::EscrowCancelled { escrow_id: 2 }));
    }
}
