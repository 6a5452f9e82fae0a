//! Error types for the GenBit ledger and exchange.
//!
//! All errors use the `GB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Balance errors
//! - 3xx: Access errors
//! - 4xx: Governance errors
//! - 5xx: Parameter errors
//! - 6xx: Invariant / arithmetic errors
//! - 9xx: General / configuration / replay errors

use thiserror::Error;

use crate::{Address, Amount, OrderId};

/// Central error enum for all GenBit operations.
#[derive(Debug, Error)]
pub enum GenbitError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// No resting order carries this ID.
    #[error("GB_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough available balance (or reserve, or quote funds).
    #[error("GB_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Escrow held for an account is smaller than what a fill consumes.
    #[error("GB_ERR_201: Insufficient escrow for {account}: need {needed}, have {escrowed}")]
    InsufficientEscrow {
        account: Address,
        needed: Amount,
        escrowed: Amount,
    },

    // =================================================================
    // Access Errors (3xx)
    // =================================================================
    /// The caller is not allowed to perform this operation.
    #[error("GB_ERR_300: Access denied for {caller}: {operation}")]
    AccessDenied {
        caller: Address,
        operation: &'static str,
    },

    // =================================================================
    // Governance Errors (4xx)
    // =================================================================
    /// The caller has already cast its one vote.
    #[error("GB_ERR_400: Duplicate vote from {0}")]
    DuplicateVote(Address),

    // =================================================================
    // Parameter Errors (5xx)
    // =================================================================
    /// A call argument is out of bounds (zero amount, tax above ceiling, ...).
    #[error("GB_ERR_500: Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    // =================================================================
    // Invariant Errors (6xx)
    // =================================================================
    /// Sum of balances no longer equals total supply. Critical.
    #[error("GB_ERR_600: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// A fixed-point computation left the representable range.
    #[error("GB_ERR_601: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Replaying a journal produced a different outcome than recorded.
    #[error("GB_ERR_900: Replay diverged at entry {sequence}: {reason}")]
    ReplayDivergence { sequence: u64, reason: String },

    /// Serialization / deserialization error.
    #[error("GB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, inconsistent thresholds, etc.).
    #[error("GB_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("GB_ERR_903: I/O error: {0}")]
    Io(String),
}

impl GenbitError {
    /// Stable `GB_ERR_nnn` code, used in journals to compare rejections.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OrderNotFound(_) => "GB_ERR_100",
            Self::InsufficientBalance { .. } => "GB_ERR_200",
            Self::InsufficientEscrow { .. } => "GB_ERR_201",
            Self::AccessDenied { .. } => "GB_ERR_300",
            Self::DuplicateVote(_) => "GB_ERR_400",
            Self::InvalidParameter { .. } => "GB_ERR_500",
            Self::SupplyInvariantViolation { .. } => "GB_ERR_600",
            Self::ArithmeticOverflow { .. } => "GB_ERR_601",
            Self::ReplayDivergence { .. } => "GB_ERR_900",
            Self::Serialization(_) => "GB_ERR_901",
            Self::Configuration(_) => "GB_ERR_902",
            Self::Io(_) => "GB_ERR_903",
        }
    }

    /// Shorthand for [`GenbitError::InvalidParameter`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, GenbitError>;

impl From<std::io::Error> for GenbitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GenbitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
