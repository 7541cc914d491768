//! Ledger-agnostic core of a trust-minimized cross-chain atomic-swap
//! protocol: packed timelocks, the `EscrowSrc`/`EscrowDst` hash-time-locked
//! state machines, the maker-funded `OrderPool`, the deterministic
//! `EscrowFactory`, and a sorted-pair `MerkleInvalidator`.
//!
//! The crate consumes four collaborator traits rather than embedding a
//! concrete ledger runtime: [`Clock`](clock::Clock),
//! [`CryptoProvider`](crypto::CryptoProvider), [`EventSink`](events::EventSink),
//! and [`ObjectStore`](store::ObjectStore). A host wires its own
//! implementations of these in; the in-memory reference implementations
//! under each module are what the test suite drives against.

pub mod address;
pub mod base_escrow;
pub mod clock;
pub mod coin;
pub mod crypto;
pub mod error;
pub mod escrow;
pub mod escrow_dst;
pub mod escrow_src;
pub mod events;
pub mod factory;
pub mod immutables;
pub mod merkle;
pub mod order_pool;
pub mod store;
pub mod timelocks;

pub use address::Address;
pub use clock::{Clock, FixedClock};
pub use coin::{Coin, SimpleCoin};
pub use crypto::{CryptoProvider, Keccak256Crypto};
pub use error::{ErrorCategory, SwapError};
pub use escrow::{Escrow, EscrowId, EscrowState, Payout};
pub use escrow_dst::EscrowDst;
pub use escrow_src::EscrowSrc;
pub use events::{Event, EventSink, VecEventSink};
pub use factory::{EscrowFactory, FactoryConfig, FactoryStats, Side};
pub use immutables::{order_hash_of, verify_cross_chain_compatibility, Immutables, OrderImmutablesTemplate};
pub use merkle::MerkleInvalidator;
pub use order_pool::{OrderPool, OrderStatus, PendingOrder, PoolStats};
pub use store::{InMemoryObjectStore, ObjectStore, OrderHash};
pub use timelocks::{Phase, PhaseOffsets, Timelocks};
