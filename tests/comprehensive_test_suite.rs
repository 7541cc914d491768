//! Cross-module invariants from spec.md §8 that don't fit naturally inside
//! a single unit test file: atomicity of claim (P1), fund conservation
//! (P4), per-`(order_hash, side)` uniqueness (P5), and secret propagation
//! across the two escrow instances of one swap (P6).

use swap_escrow_core::{
    order_hash_of, Address, Coin, Event, FactoryConfig, FixedClock, InMemoryObjectStore, Keccak256Crypto,
    ObjectStore, OrderImmutablesTemplate, OrderPool, PhaseOffsets, Side, SimpleCoin, SwapError, Timelocks,
    VecEventSink,
};
use swap_escrow_core::EscrowFactory;

fn offsets() -> PhaseOffsets {
    PhaseOffsets {
        src_withdrawal: 10,
        src_public_withdrawal: 120,
        src_cancellation: 300,
        src_public_cancellation: 400,
        dst_withdrawal: 10,
        dst_public_withdrawal: 100,
        dst_cancellation: 290,
    }
}

fn template(crypto: &Keccak256Crypto, maker: Address) -> OrderImmutablesTemplate {
    OrderImmutablesTemplate {
        hashlock: crypto.keccak256(b"s0"),
        salt: [5u8; 32],
        nonce: 0,
        maker,
        maker_asset: Address::new(vec![0xAA]),
        taker_asset: Address::new(vec![0xBB]),
        making_amount: 1_000_000_000,
        taking_amount: 2_000_000_000,
        safety_deposit: 100_000_000,
        src_chain_id: 1,
        dst_chain_id: 2,
        src_safety_deposit: 100_000_000,
        dst_safety_deposit: 100_000_000,
        timelocks: Timelocks::pack(offsets(), 0),
        allow_partial_fills: false,
        allow_multiple_fills: false,
    }
}

/// P1: a rejected claim (expired order) leaves the PendingOrder present
/// and byte-for-byte unchanged, and creates no EscrowSrc.
#[test]
fn claim_against_an_expired_order_is_a_true_no_op() {
    let crypto = Keccak256Crypto;
    let clock = FixedClock::new(5_000);
    let mut sink = VecEventSink::new();
    let mut store: InMemoryObjectStore<SimpleCoin> = InMemoryObjectStore::new();
    let mut pool = OrderPool::new(1);
    let mut factory = EscrowFactory::new(1, Address::new(vec![0x01]), FactoryConfig::default());
    let maker = Address::new(vec![0x11]);
    let tmpl = template(&crypto, maker.clone());
    let order_hash = order_hash_of(&tmpl, &crypto);

    let creation_clock = FixedClock::new(1_000);
    pool.create_order(
        &mut store,
        order_hash,
        tmpl,
        SimpleCoin(1_000_000_000),
        SimpleCoin(100_000_000),
        2_000, // expires at t=2_000, well before the claim attempt at t=5_000
        &creation_clock,
        &crypto,
        &mut sink,
    )
    .expect("order creation succeeds");

    let before = store.get_order(&order_hash).cloned();
    let resolver = Address::new(vec![0x22]);
    let err = pool
        .claim_and_create_escrow(&mut store, &mut factory, &order_hash, &resolver, &clock, &mut sink)
        .unwrap_err();
    assert_eq!(err, SwapError::OrderExpired);

    let after = store.get_order(&order_hash).cloned();
    assert_eq!(before, after, "PendingOrder must be restored unchanged");
    assert!(factory.escrow_id_for(&order_hash, Side::Src).is_none());
}

/// P4: the sum of balances held by the escrow plus whatever a completed
/// transition reports as paid out equals the amount the escrow started
/// with — no mint, no burn.
#[test]
fn withdraw_conserves_total_funds() {
    let crypto = Keccak256Crypto;
    let clock = FixedClock::new(1_000);
    let mut sink = VecEventSink::new();
    let mut store: InMemoryObjectStore<SimpleCoin> = InMemoryObjectStore::new();
    let mut pool = OrderPool::new(1);
    let mut factory = EscrowFactory::new(1, Address::new(vec![0x01]), FactoryConfig::default());
    let maker = Address::new(vec![0x11]);
    let taker = Address::new(vec![0x22]);
    let tmpl = template(&crypto, maker.clone());
    let order_hash = order_hash_of(&tmpl, &crypto);
    let principal_in = 1_000_000_000u64;
    let safety_in = 100_000_000u64;

    pool.create_order(
        &mut store,
        order_hash,
        tmpl,
        SimpleCoin(principal_in),
        SimpleCoin(safety_in),
        10_000,
        &clock,
        &crypto,
        &mut sink,
    )
    .expect("order creation succeeds");
    let src_id = pool
        .claim_and_create_escrow(&mut store, &mut factory, &order_hash, &taker, &clock, &mut sink)
        .expect("claim succeeds");

    clock.advance(21);
    let escrow = store.get_src_escrow_mut(src_id).unwrap();
    let payout = escrow.withdraw(b"s0", &taker, &crypto, &clock, &mut sink).expect("withdraw succeeds");

    let remaining = escrow.principal.balance() + escrow.safety_deposit.balance();
    let paid_out = payout.principal.1.balance() + payout.safety_deposit.1.balance();
    assert_eq!(remaining, 0);
    assert_eq!(paid_out, principal_in + safety_in);
}

/// P5: for a given `(order_hash, side)`, the Factory emits at most one
/// `EscrowCreated` — a second attempt is rejected, never double-counted.
#[test]
fn factory_emits_escrow_created_at_most_once_per_order_hash_and_side() {
    let crypto = Keccak256Crypto;
    let clock = FixedClock::new(1_000);
    let mut sink = VecEventSink::new();
    let mut store: InMemoryObjectStore<SimpleCoin> = InMemoryObjectStore::new();
    let mut factory = EscrowFactory::new(1, Address::new(vec![0x01]), FactoryConfig::default());
    let tmpl = template(&crypto, Address::new(vec![0x11]));
    let order_hash = order_hash_of(&tmpl, &crypto);
    let imm = tmpl.to_src_immutables(order_hash, Address::new(vec![0x22]));

    factory
        .create_src_escrow(&mut store, imm.clone(), SimpleCoin(1_000_000_000), SimpleCoin(100_000_000), &clock, &mut sink)
        .expect("first creation succeeds");
    let (err, returned_principal, returned_safety) = factory
        .create_src_escrow(&mut store, imm, SimpleCoin(1_000_000_000), SimpleCoin(100_000_000), &clock, &mut sink)
        .unwrap_err();
    assert_eq!(err, SwapError::EscrowExists);
    assert_eq!(returned_principal.balance(), 1_000_000_000);
    assert_eq!(returned_safety.balance(), 100_000_000);

    let escrow_created_count = sink.0.iter().filter(|e| matches!(e, Event::EscrowCreated { .. })).count();
    assert_eq!(escrow_created_count, 1);
}

/// P6: the secret revealed in a `Withdrawal` event on one side of a swap
/// also satisfies the counterpart escrow's hashlock, since both sides are
/// built from the same `hashlock` by construction.
#[test]
fn secret_from_one_side_satisfies_the_counterpart_hashlock() {
    let crypto = Keccak256Crypto;
    let clock = FixedClock::new(1_000);
    let mut sink = VecEventSink::new();
    let mut store: InMemoryObjectStore<SimpleCoin> = InMemoryObjectStore::new();
    let mut factory = EscrowFactory::new(1, Address::new(vec![0x01]), FactoryConfig::default());
    let maker = Address::new(vec![0x11]);
    let taker = Address::new(vec![0x22]);
    let tmpl = template(&crypto, maker.clone());
    let order_hash = order_hash_of(&tmpl, &crypto);
    let src_imm = tmpl.to_src_immutables(order_hash, taker.clone());
    let mut dst_imm = src_imm.clone();
    dst_imm.maker = taker.clone();
    dst_imm.taker = maker.clone();
    dst_imm.amount = 2_000_000_000;

    let (src_id, dst_id) = factory
        .initiate_cross_chain_swap(
            &mut store,
            src_imm,
            SimpleCoin(1_000_000_000),
            SimpleCoin(100_000_000),
            dst_imm,
            SimpleCoin(2_000_000_000),
            SimpleCoin(100_000_000),
            &clock,
            &mut sink,
        )
        .expect("mirrored roles succeed");

    clock.advance(20);
    let dst = store.get_dst_escrow_mut(dst_id).unwrap();
    dst.withdraw(b"s0", &taker, &crypto, &clock, &mut sink).expect("dst withdraw succeeds");
    let revealed = match sink.last() {
        Some(Event::Withdrawal { secret, .. }) => secret.clone(),
        _ => panic!("expected a Withdrawal event"),
    };

    clock.advance(1);
    let src = store.get_src_escrow_mut(src_id).unwrap();
    let payout = src
        .withdraw(&revealed, &taker, &crypto, &clock, &mut sink)
        .expect("the same secret settles the src side");
    assert_eq!(payout.principal, (taker, SimpleCoin(1_000_000_000)));
}
