use thiserror::Error;

/// The sub-taxonomy a [`SwapError`] belongs to. Error codes in spec.md §6.3
/// are only unique *within* a category — `InvalidCaller` (Escrow, 1) and
/// `OrderNotFound` (Order, 1) share a numeric code but not a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Escrow,
    Order,
    Factory,
    Merkle,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    // ── BaseEscrow / EscrowSrc / EscrowDst (category: Escrow) ──────────────
    #[error("caller is not the expected maker/taker")]
    InvalidCaller,

    #[error("secret does not hash to the immutables' hashlock")]
    InvalidSecret,

    #[error("current time is outside the required window for this transition")]
    InvalidTime,

    #[error("rescue_deadline has not yet elapsed")]
    RescueTooEarly,

    // ── OrderPool (category: Order) ────────────────────────────────────────
    #[error("no pending order exists for this order_hash")]
    OrderNotFound,

    #[error("an order already exists for this order_hash")]
    OrderAlreadyExists,

    #[error("order was already claimed by another resolver")]
    OrderAlreadyTaken,

    #[error("order's expiry has passed")]
    OrderExpired,

    #[error("order was cancelled by its maker")]
    OrderCancelled,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("recomputed order_hash does not match the caller-supplied value")]
    HashMismatch,

    // ── EscrowFactory (category: Factory) ──────────────────────────────────
    #[error("an escrow already exists for this (order_hash, side)")]
    EscrowExists,

    #[error("src and dst immutables are not cross-chain compatible")]
    FactoryMismatch,

    // ── MerkleInvalidator (category: Merkle) ───────────────────────────────
    #[error("this (root, index) pair has already been invalidated")]
    AlreadyInvalidated,

    #[error("inclusion proof does not resolve to the claimed root")]
    InvalidProof,
}

impl SwapError {
    /// The stable numeric code from spec.md §6.3. Only unique within
    /// [`Self::category`].
    pub fn code(&self) -> u32 {
        match self {
            SwapError::InvalidCaller => 1,
            SwapError::InvalidSecret => 2,
            SwapError::InvalidTime => 3,
            SwapError::RescueTooEarly => 4,
            SwapError::OrderNotFound => 1,
            SwapError::OrderAlreadyExists => 2,
            SwapError::OrderExpired => 4,
            SwapError::OrderAlreadyTaken => 5,
            SwapError::InvalidSignature => 6,
            SwapError::OrderCancelled => 8,
            SwapError::HashMismatch => 10,
            SwapError::EscrowExists => 1,
            SwapError::FactoryMismatch => 2,
            SwapError::AlreadyInvalidated => 1,
            SwapError::InvalidProof => 2,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SwapError::InvalidCaller
            | SwapError::InvalidSecret
            | SwapError::InvalidTime
            | SwapError::RescueTooEarly => ErrorCategory::Escrow,
            SwapError::OrderNotFound
            | SwapError::OrderAlreadyExists
            | SwapError::OrderAlreadyTaken
            | SwapError::OrderExpired
            | SwapError::OrderCancelled
            | SwapError::InvalidSignature
            | SwapError::HashMismatch => ErrorCategory::Order,
            SwapError::EscrowExists | SwapError::FactoryMismatch => ErrorCategory::Factory,
            SwapError::AlreadyInvalidated | SwapError::InvalidProof => ErrorCategory::Merkle,
        }
    }

    /// Fatal errors indicate a bug or an attack (spec.md §7): the host
    /// should log loudly, but must not special-case the state machine's
    /// handling of them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SwapError::HashMismatch | SwapError::FactoryMismatch)
    }
}
