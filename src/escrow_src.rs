//! Source-side escrow lifecycle (spec.md §4.3): funded by the pool on
//! behalf of the maker, released to the taker on secret reveal, or
//! returned to the maker once the cancellation phase opens.

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
pub struct EscrowSrc<C: Coin> {
    pub id: EscrowId,
    pub immutables: Immutables,
    pub principal: C,
    pub safety_deposit: C,
    pub rescue_delay: u64,
    pub state: EscrowState,
}

impl<C: Coin> Escrow for EscrowSrc<C> {
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

impl<C: Coin> EscrowSrc<C> {
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

    /// Every transition in spec.md §4.3 requires `state == Funded`; once an
    /// escrow leaves Funded, the table's own scenario 6 expects subsequent
    /// calls to fail with `InvalidTime` rather than a distinct "wrong
    /// state" code.
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

    pub fn withdraw(
        &mut self,
        secret: &[u8],
        caller: &Address,
        crypto: &dyn CryptoProvider,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let taker = self.immutables.taker.clone();
        self.withdraw_to(secret, caller, &taker, crypto, clock, events)
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
        let span = tracing::debug_span!("escrow_src.withdraw", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        assert_caller_is(caller, &self.immutables.taker).log_rejection()?;
        assert_within_window(&self.immutables, Phase::SrcWithdrawal, Phase::SrcCancellation, clock.now())
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

    /// Same as [`Self::withdraw`], callable by anyone once the public
    /// window opens; the safety deposit becomes the caller's incentive for
    /// completing a swap the taker left unfinished.
    pub fn public_withdraw(
        &mut self,
        secret: &[u8],
        caller: &Address,
        crypto: &dyn CryptoProvider,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let taker = self.immutables.taker.clone();
        self.public_withdraw_to(secret, caller, &taker, crypto, clock, events)
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
        let span = tracing::debug_span!("escrow_src.public_withdraw", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        assert_within_window(
            &self.immutables,
            Phase::SrcPublicWithdrawal,
            Phase::SrcCancellation,
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

    pub fn cancel(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::info_span!("escrow_src.cancel", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        assert_caller_is(caller, &self.immutables.maker).log_rejection()?;
        if !self.immutables.timelocks.is_after(Phase::SrcCancellation, clock.now()) {
            tracing::warn!("cancel rejected: InvalidTime");
            return Err(SwapError::InvalidTime);
        }

        let maker = self.immutables.maker.clone();
        let (principal, safety) = self.drain();
        self.state = EscrowState::Cancelled;
        events.emit(Event::EscrowCancelled { escrow_id: self.id });
        Ok(Payout {
            principal: (maker, principal),
            safety_deposit: (caller.clone(), safety),
        })
    }

    /// Same as [`Self::cancel`], callable by anyone once the public
    /// cancellation window opens; the safety deposit rewards whoever
    /// triggers it.
    pub fn public_cancel(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<Payout<C>, SwapError> {
        let span = tracing::info_span!("escrow_src.public_cancel", escrow_id = self.id);
        let _enter = span.enter();
        self.assert_funded()?;
        if !self
            .immutables
            .timelocks
            .is_after(Phase::SrcPublicCancellation, clock.now())
        {
            tracing::warn!("public_cancel rejected: InvalidTime");
            return Err(SwapError::InvalidTime);
        }

        let maker = self.immutables.maker.clone();
        let (principal, safety) = self.drain();
        self.state = EscrowState::Cancelled;
        events.emit(Event::EscrowCancelled { escrow_id: self.id });
        Ok(Payout {
            principal: (maker, principal),
            safety_deposit: (caller.clone(), safety),
        })
    }

    /// spec.md §4.3: drains up to `amount` of the principal (or the
    /// safety deposit, if `token` is [`Address::native_sentinel`]) to
    /// `caller` once `rescue_deadline` elapses. Stays `Funded` so it can
    /// be called repeatedly; only flips to `Rescued` once both balances
    /// are fully drained.
    pub fn rescue_funds(
        &mut self,
        token: &Address,
        amount: u64,
        caller: &Address,
        clock: &dyn Clock,
        events: &mut dyn EventSink,
    ) -> Result<(Address, C), SwapError> {
        let span = tracing::debug_span!("escrow_src.rescue_funds", escrow_id = self.id);
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
            tracing::warn!(?err, "escrow_src transition rejected");
        }
        self
    }
}
