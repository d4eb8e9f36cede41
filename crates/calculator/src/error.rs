//! Calculation error types.

use thiserror::Error;

/// Inputs that would make a formula divide by a non-positive factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalculationError {
    /// `1 + vat_percent / 100` is zero or negative.
    #[error("Invalid VAT")]
    InvalidVat,

    /// `1 + buyers_premium_percent / 100` is zero or negative.
    #[error("Invalid buyer's premium")]
    InvalidBuyersPremium,

    /// The selling multiple is zero or negative.
    #[error("Selling multiple must be greater than 0.")]
    InvalidSellingMultiple,
}

/// Result type for calculations.
pub type Result<T> = std::result::Result<T, CalculationError>;
