//! Destination-side escrow lifecycle (spec.md §4.4): funded by the taker
//! to mirror a source-side swap, released to the maker on secret reveal,
//! or returned to the taker if the maker never shows.

use crate::address::Address;
use crate::base_escrow::{assert_caller_is, assert_secret_matches, assert_within_window};
use crate::clock::Clock;
use crate::coin::Coin;
use crate::crypto::CryptoProvider;
use crate::error::SwapError;
use crate::escrow::{Escrow, EscrowId, EscrowState, Payout};
use crate::events::{Event, EventSink};
use crate::immutables::Immutables;
use crate::timelocks::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowDst<C: Coin> {
    pub id: EscrowId,
    pub immutables: Immutables,
    pub principal: C,
    pub safety_deposit: C,
    pub rescue_delay: u64,
    pub state: EscrowState,
}

impl<C: Coin> Escrow for EscrowDst<C> {
    fn id(&self) -> EscrowId {
        self.id
    }

    fn immutables(&self) -> &Immutables {
        &self.immutables
    }

    fn state(&self) -> EscrowState {
        self.state
    }
}

impl<C: Coin> EscrowDst<C> {
    pub fn new(id: EscrowId, immutables: Immutables, principal: C, safety_deposit: C, rescue_delay: u64) -> Self {
        Self {
            id,
            immutables,
            principal,
            safety_deposit,
            rescue_delay,
            state: EscrowState::Funded,
        }
    }

    fn assert_funded(&self) -> Result<(), SwapError> {
        if self.state == EscrowState::Funded {
            Ok(())
        } else {
            Err(SwapError::InvalidTime)
        }
    }

    fn drain(&mut self) -> (C, C) {
        let principal = self.principal.split(self.principal.balance());
        let safety = self.safety_deposit.split(self.safety_deposit.balance());
        (principal, safety)
    }

    /// caller == taker (the party who funded this side); principal goes
    /// to `imm.maker` rather than the caller (spec.md §4.4, first bullet).
    pub fn withdraw(
        &mut self,
        secret: &[u8],
        caller: &Address,
        crypto: &dyn CryptoProvider,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let maker = self.immutables.maker.clone();
        self.withdraw_to(secret, caller, &maker, crypto, clock, events)
    }

    pub fn withdraw_to(
        &mut self,
        secret: &[u8],
        caller: &Address,
        target: &Address,
        crypto: &dyn CryptoProvider,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::debug_span!("escrow_dst.withdraw", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        assert_caller_is(caller, &self.immutables.taker).log_rejection()?;
        assert_within_window(&self.immutables, Phase::DstWithdrawal, Phase::DstCancellation, clock.now())
            .log_rejection()?;
        assert_secret_matches(secret, &self.immutables, crypto).log_rejection()?;

        let (principal, safety) = self.drain();
        self.state = EscrowState::Withdrawn;
        events.emit(Event::Withdrawal {
            escrow_id: self.id,
            secret: secret.to_vec(),
        });
        Ok(Payout {
            principal: (target.clone(), principal),
            safety_deposit: (caller.clone(), safety),
        })
    }

    pub fn public_withdraw(
        &mut self,
        secret: &[u8],
        caller: &Address,
        crypto: &dyn CryptoProvider,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let maker = self.immutables.maker.clone();
        self.public_withdraw_to(secret, caller, &maker, crypto, clock, events)
    }

    pub fn public_withdraw_to(
        &mut self,
        secret: &[u8],
        caller: &Address,
        target: &Address,
        crypto: &dyn CryptoProvider,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::debug_span!("escrow_dst.public_withdraw", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        assert_within_window(
            &self.immutables,
            Phase::DstPublicWithdrawal,
            Phase::DstCancellation,
            clock.now(),
        )
        .log_rejection()?;
        assert_secret_matches(secret, &self.immutables, crypto).log_rejection()?;

        let (principal, safety) = self.drain();
        self.state = EscrowState::Withdrawn;
        events.emit(Event::Withdrawal {
            escrow_id: self.id,
            secret: secret.to_vec(),
        });
        Ok(Payout {
            principal: (target.clone(), principal),
            safety_deposit: (caller.clone(), safety),
        })
    }

    /// Returns principal to `imm.taker` (the funder), but — unlike the src
    /// side's symmetric `cancel`/`public_cancel` pair — is authenticated by
    /// the maker and has no public variant (spec.md §4.4, third bullet).
    pub fn cancel(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::info_span!("escrow_dst.cancel", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        assert_caller_is(caller, &self.immutables.maker).log_rejection()?;
        if !self.immutables.timelocks.is_after(Phase::DstCancellation, clock.now()) {
            tracing::warn!("cancel rejected: InvalidTime");
            return Err(SwapError::InvalidTime);
        }

        let taker = self.immutables.taker.clone();
        let (principal, safety) = self.drain();
        self.state = EscrowState::Cancelled;
        events.emit(Event::EscrowCancelled { escrow_id: self.id });
        Ok(Payout {
            principal: (taker, principal),
            safety_deposit: (caller.clone(), safety),
        })
    }

    pub fn rescue_funds(
        &mut self,
        token: &Address,
        amount: u64,
        caller: &Address,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<(Address, C), SwapError> {
        let span = tracing::debug_span!("escrow_dst.rescue_funds", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        let deadline = self.immutables.timelocks.rescue_deadline(self.rescue_delay);
        if clock.now() < deadline {
            tracing::warn!("rescue_funds rejected: RescueTooEarly");
            return Err(SwapError::RescueTooEarly);
        }

        let coin = if *token == Address::native_sentinel() {
            let drained = amount.min(self.safety_deposit.balance());
            self.safety_deposit.split(drained)
        } else {
            let drained = amount.min(self.principal.balance());
            self.principal.split(drained)
        };
        events.emit(Event::FundsRescued {
            escrow_id: self.id,
            token: token.clone(),
            amount: coin.balance(),
        });
        if self.principal.is_zero() && self.safety_deposit.is_zero() {
            self.state = EscrowState::Rescued;
        }
        Ok((caller.clone(), coin))
    }
}

trait LogRejection {
    fn log_rejection(self) -> Self;
}

impl<T> LogRejection for Result<T, SwapError> {
    fn log_rejection(self) -> Self {
        if let Err(ref err) = self {
            tracing::warn!(?err, "escrow_dst transition rejected");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::coin::SimpleCoin;
    use crate::crypto::Keccak256Crypto;
    use crate::events::VecEventSink;
    use crate::timelocks::{PhaseOffsets, Timelocks};

    fn sample(crypto: &Keccak256Crypto) -> EscrowDst<SimpleCoin> {
        let imm = Immutables {
            order_hash: [7u8; 32],
            hashlock: crypto.keccak256(b"s0"),
            maker: Address::new(vec![0x11]),
            taker: Address::new(vec![0x22]),
            token: Address::new(vec![0x44]),
            amount: 2_000_000_000,
            safety_deposit: 100_000_000,
            timelocks: Timelocks::pack(
                PhaseOffsets {
                    src_withdrawal: 10,
                    src_public_withdrawal: 120,
                    src_cancellation: 300,
                    src_public_cancellation: 400,
                    dst_withdrawal: 10,
                    dst_public_withdrawal: 100,
                    dst_cancellation: 290,
                },
                1_000,
            ),
        };
        EscrowDst::new(2, imm, SimpleCoin(2_000_000_000), SimpleCoin(100_000_000), 3_600)
    }

    #[test]
    fn withdraw_pays_maker_not_caller() {
        let crypto = Keccak256Crypto;
        let clock = FixedClock::new(1_020);
        let mut sink = VecEventSink::new();
        let mut escrow = sample(&crypto);
        let taker = escrow.immutables.taker.clone();
        let maker = escrow.immutables.maker.clone();

        let payout = escrow
            .withdraw(b"s0", &taker, &crypto, &clock, &mut sink)
            .expect("withdraw succeeds");

        assert_eq!(payout.principal, (maker, SimpleCoin(2_000_000_000)));
        assert_eq!(payout.safety_deposit, (taker, SimpleCoin(100_000_000)));
        assert_eq!(escrow.state, EscrowState::Withdrawn);
    }

    #[test]
    fn withdraw_rejects_caller_other_than_taker() {
        let crypto = Keccak256Crypto;
        let clock = FixedClock::new(1_020);
        let mut sink = VecEventSink::new();
        let mut escrow = sample(&crypto);
        let maker = escrow.immutables.maker.clone();

        let err = escrow
            .withdraw(b"s0", &maker, &crypto, &clock, &mut sink)
            .unwrap_err();
        assert_eq!(err, SwapError::InvalidCaller);
    }

    #[test]
    fn cancel_is_authenticated_by_maker_and_refunds_taker() {
        let crypto = Keccak256Crypto;
        let clock = FixedClock::new(1_290);
        let mut sink = VecEventSink::new();
        let mut escrow = sample(&crypto);
        let maker = escrow.immutables.maker.clone();
        let taker = escrow.immutables.taker.clone();

        let err = escrow.cancel(&taker, &clock, &mut sink).unwrap_err();
        assert_eq!(err, SwapError::InvalidCaller);

        let payout = escrow.cancel(&maker, &clock, &mut sink).expect("cancel succeeds");
        assert_eq!(payout.principal, (taker, SimpleCoin(2_000_000_000)));
        assert_eq!(escrow.state, EscrowState::Cancelled);
    }

    #[test]
    fn secret_revealed_on_dst_also_satisfies_src_hashlock() {
        let crypto = Keccak256Crypto;
        let clock = FixedClock::new(1_020);
        let mut sink = VecEventSink::new();
        let mut dst = sample(&crypto);
        let taker = dst.immutables.taker.clone();

        dst.withdraw(b"s0", &taker, &crypto, &clock, &mut sink)
            .expect("withdraw succeeds");
        let revealed = match sink.last() {
            Some(Event::Withdrawal { secret, .. }) => secret.clone(),
            _ => panic!("expected Withdrawal event"),
        };
        assert!(crate::base_escrow::assert_secret_matches(&revealed, &dst.immutables, &crypto).is_ok());
    }
}
