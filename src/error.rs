//! Unified error types for the exchange.
//!
//! Every fallible operation in the crate returns [`DexError`].  Failures of
//! the external asset ledger are carried as [`LedgerError`] and converted
//! with `?` through the `#[from]` variant.
//!
//! Variants fall into four families, exposed through [`DexError::kind`]:
//!
//! | Kind | Meaning |
//! |------|---------|
//! | [`ErrorKind::Precondition`] | caller-correctable input problem |
//! | [`ErrorKind::Invariant`] | the operation would break a pool guarantee |
//! | [`ErrorKind::Concurrency`] | a recursive call into a locked pool |
//! | [`ErrorKind::Collaborator`] | the asset ledger or native wrapper refused |

use thiserror::Error;

use crate::domain::Address;

/// Crate-wide result alias.
pub type Result<T, E = DexError> = core::result::Result<T, E>;

/// Errors raised by the in-memory asset ledger and native wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// `owner` holds less of `asset` than the transfer requires.
    #[error("insufficient balance of {asset} held by {owner}")]
    InsufficientBalance {
        /// Asset being moved.
        asset: Address,
        /// Account being debited.
        owner: Address,
    },

    /// `spender` is not approved for enough of `owner`'s `asset`.
    #[error("insufficient allowance of {asset} from {owner} to {spender}")]
    InsufficientAllowance {
        /// Asset being moved.
        asset: Address,
        /// Account whose balance is being spent.
        owner: Address,
        /// Account spending the allowance.
        spender: Address,
    },

    /// `owner` holds less native value than requested.
    #[error("insufficient native balance held by {owner}")]
    InsufficientNativeBalance {
        /// Account being debited.
        owner: Address,
    },

    /// A balance would exceed `u128::MAX`.
    #[error("ledger balance overflow")]
    BalanceOverflow,
}

/// Unified error enum for pool, registry and router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    // -- precondition -------------------------------------------------------
    /// The two assets of a pair are the same.
    #[error("identical assets")]
    IdenticalAssets,

    /// An asset identifier is the zero address.
    #[error("zero address")]
    ZeroAddress,

    /// A pool already exists for the unordered pair.
    #[error("pool exists")]
    PoolExists,

    /// No pool is registered at the address or for the pair.
    #[error("pool not found")]
    PoolNotFound,

    /// The block time is past the caller's deadline.
    #[error("expired")]
    Expired,

    /// The matched amount of asset A is below the caller's minimum.
    #[error("insufficient A amount")]
    InsufficientAAmount,

    /// The matched amount of asset B is below the caller's minimum.
    #[error("insufficient B amount")]
    InsufficientBAmount,

    /// No output requested, or the output is below the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// A swap or quote received no input.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// The required input is above the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// A swap path is too short or does not start/end with the wrapped
    /// native asset where required.
    #[error("invalid path")]
    InvalidPath,

    /// A swap recipient is one of the pool's own assets.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// The caller is not allowed to perform the administrative action.
    #[error("forbidden")]
    Forbidden,

    /// A permit signature does not recover to the stated owner.
    #[error("invalid signature")]
    InvalidSignature,

    /// Configuration rejected during validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // -- invariant ----------------------------------------------------------
    /// The fee-adjusted reserve product would decrease.
    #[error("constant product invariant violated")]
    InvariantViolation,

    /// A fixed-ratio swap does not match the pool's initial ratio exactly.
    #[error("invalid input output")]
    InvalidInputOutput,

    /// The pool cannot pay the requested output.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A deposit would mint zero shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A redemption would return zero of either asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Arithmetic overflow, with context.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow, with context.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    // -- concurrency --------------------------------------------------------
    /// The pool is locked by an operation still in progress.
    #[error("reentrant call")]
    Reentrant,

    // -- collaborator -------------------------------------------------------
    /// The asset ledger or native wrapper refused the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Error family of a [`DexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-correctable by adjusting inputs.
    Precondition,
    /// Would break a pool guarantee; never retry with the same arguments.
    Invariant,
    /// Disallowed recursive call.
    Concurrency,
    /// Raised by an external collaborator.
    Collaborator,
}

impl DexError {
    /// Classifies the error into its family.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IdenticalAssets
            | Self::ZeroAddress
            | Self::PoolExists
            | Self::PoolNotFound
            | Self::Expired
            | Self::InsufficientAAmount
            | Self::InsufficientBAmount
            | Self::InsufficientOutputAmount
            | Self::InsufficientInputAmount
            | Self::ExcessiveInputAmount
            | Self::InvalidPath
            | Self::InvalidRecipient
            | Self::Forbidden
            | Self::InvalidSignature
            | Self::InvalidConfiguration(_) => ErrorKind::Precondition,
            Self::InvariantViolation
            | Self::InvalidInputOutput
            | Self::InsufficientLiquidity
            | Self::InsufficientLiquidityMinted
            | Self::InsufficientLiquidityBurned
            | Self::Overflow(_)
            | Self::Underflow(_)
            | Self::DivisionByZero => ErrorKind::Invariant,
            Self::Reentrant => ErrorKind::Concurrency,
            Self::Ledger(_) => ErrorKind::Collaborator,
        }
    }
}
