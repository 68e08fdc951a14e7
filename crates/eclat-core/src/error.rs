//! Error types for Eclat mining.
//!
//! A single error type covers the whole pipeline, from reading transactions
//! to expanding the lattice. Error codes follow the pattern `ECLAT-XXX`.

use thiserror::Error;

use crate::guardrails::LimitViolation;

/// Result type alias for Eclat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, indexing or mining transactions.
#[derive(Error, Debug)]
pub enum Error {
    /// A bitset, lattice node or array reservation failed (ECLAT-001).
    ///
    /// Fatal to the current run. Everything built so far has already been
    /// released when this error reaches the caller.
    #[error("[ECLAT-001] Allocation failed: {0}")]
    AllocationFailure(String),

    /// The transaction input contains a byte that is neither a digit, a
    /// separator nor a line break (ECLAT-002).
    #[error("[ECLAT-002] Invalid character 0x{byte:02x} at line {line}")]
    MalformedInput {
        /// 1-based line number.
        line: usize,
        /// Offending byte.
        byte: u8,
    },

    /// An item token does not fit a 32-bit item identifier (ECLAT-003).
    #[error("[ECLAT-003] Invalid item '{token}' at line {line}")]
    InvalidItem {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// More transactions than a 32-bit transaction index can address (ECLAT-004).
    #[error("[ECLAT-004] Too many transactions: {0} (maximum is 2^32)")]
    TooManyTransactions(usize),

    /// Minimum support fraction is not a positive finite number (ECLAT-005).
    #[error("[ECLAT-005] Invalid minimum support {0}: expected a positive value")]
    InvalidSupport(f64),

    /// Input fraction is not a positive finite number (ECLAT-006).
    #[error("[ECLAT-006] Invalid fraction of transactions {0}: expected a positive value")]
    InvalidFraction(f64),

    /// A mining guard rail tripped (ECLAT-007).
    #[error("[ECLAT-007] Mining limit exceeded: {0}")]
    LimitExceeded(#[from] LimitViolation),

    /// Configuration error (ECLAT-008).
    #[error("[ECLAT-008] Configuration error: {0}")]
    Config(String),

    /// IO error (ECLAT-009).
    #[error("[ECLAT-009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The lattice handed to the miner was built with another minimum
    /// support or has already been expanded (ECLAT-010).
    #[error("[ECLAT-010] Lattice cannot be mined: {0}")]
    InvalidLattice(String),
}

impl Error {
    /// Returns the error code (e.g., "ECLAT-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AllocationFailure(_) => "ECLAT-001",
            Self::MalformedInput { .. } => "ECLAT-002",
            Self::InvalidItem { .. } => "ECLAT-003",
            Self::TooManyTransactions(_) => "ECLAT-004",
            Self::InvalidSupport(_) => "ECLAT-005",
            Self::InvalidFraction(_) => "ECLAT-006",
            Self::LimitExceeded(_) => "ECLAT-007",
            Self::Config(_) => "ECLAT-008",
            Self::Io(_) => "ECLAT-009",
            Self::InvalidLattice(_) => "ECLAT-010",
        }
    }

    /// Returns true if the error stems from the input or the configuration
    /// and retrying with different parameters can succeed.
    ///
    /// Allocation failures abort the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllocationFailure(_))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::AllocationFailure(err.to_string())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
