//! Formula engine for BizTools.
//!
//! Three stateless conversions used by auction buyers and resellers:
//!
//! - [`budget_to_bid`]: the highest bid that keeps the final bill within a budget.
//! - [`bid_to_total`]: the final bill for a given hammer price.
//! - [`profit`]: cost, selling price and profit from a selling multiple.
//!
//! Every output is rounded to two decimal places with [`round2`].
//!
//! # Example
//!
//! ```
//! use calculator::{profit, ProfitInput};
//!
//! let result = profit(&ProfitInput {
//!     purchase_price: 10_000.0,
//!     total_expenses: 5_000.0,
//!     selling_multiple: 2.0,
//!     extra_fee: 500.0,
//! })
//! .unwrap();
//!
//! assert_eq!(result.total_selling_price, 30_500.0);
//! ```

pub mod bid;
pub mod error;
pub mod lenient;
pub mod profit;
pub mod rounding;
pub mod total;

pub use bid::{budget_to_bid, BudgetToBidInput, BudgetToBidOutput};
pub use error::{CalculationError, Result};
pub use profit::{profit, ProfitInput, ProfitOutput};
pub use rounding::round2;
pub use total::{bid_to_total, BidToTotalInput, BidToTotalOutput};

/// Convert a percentage into a fraction.
pub(crate) fn fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Cash handling fee on `base`, or zero when not paying cash.
pub(crate) fn cash_fee_on(base: f64, paying_in_cash: bool, cash_fee_percent: f64) -> f64 {
    if paying_in_cash && cash_fee_percent > 0.0 {
        base * fraction(cash_fee_percent)
    } else {
        0.0
    }
}
