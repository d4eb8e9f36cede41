//! Budget → bid: the largest hammer price that keeps the final bill on budget.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalculationError, Result};
use crate::lenient;
use crate::rounding::round2;
use crate::{cash_fee_on, fraction};

/// Budget → bid request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BudgetToBidInput {
    /// The most the buyer wants to pay in total, VAT included.
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_total: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub vat_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub buyers_premium_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub document_fee: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub extra_fee: f64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paying_in_cash: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cash_fee_percent: f64,
}

/// Budget → bid breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetToBidOutput {
    /// Target total with VAT backed out.
    pub subtotal: f64,
    pub vat_amount: f64,
    pub buyers_premium: f64,
    pub estimated_bid: f64,
    pub document_fee: f64,
    pub extra_fee: f64,
    /// Pre-VAT share of the cash handling fee.
    pub cash_fee: f64,
}

/// Work back from a target total to the bid that produces it.
///
/// ```text
/// subtotal      = target_total / (1 + vat%)
/// cash_fee      = target_total * cash% / (1 + vat%)     (cash only)
/// estimated_bid = (subtotal - document_fee - extra_fee - cash_fee) / (1 + premium%)
/// ```
///
/// Fails when either divisor is zero or negative.
pub fn budget_to_bid(input: &BudgetToBidInput) -> Result<BudgetToBidOutput> {
    let vat_factor = 1.0 + fraction(input.vat_percent);
    if vat_factor <= 0.0 {
        return Err(CalculationError::InvalidVat);
    }

    let subtotal = input.target_total / vat_factor;
    let cash_fee = cash_fee_on(
        input.target_total,
        input.paying_in_cash,
        input.cash_fee_percent,
    ) / vat_factor;

    let bp_factor = 1.0 + fraction(input.buyers_premium_percent);
    if bp_factor <= 0.0 {
        return Err(CalculationError::InvalidBuyersPremium);
    }

    let estimated_bid =
        (subtotal - input.document_fee - input.extra_fee - cash_fee) / bp_factor;
    let buyers_premium = estimated_bid * fraction(input.buyers_premium_percent);
    let vat_amount = input.target_total - subtotal;

    debug!(
        target_total = input.target_total,
        estimated_bid, "Computed bid from budget"
    );

    Ok(BudgetToBidOutput {
        subtotal: round2(subtotal),
        vat_amount: round2(vat_amount),
        buyers_premium: round2(buyers_premium),
        estimated_bid: round2(estimated_bid),
        document_fee: round2(input.document_fee),
        extra_fee: round2(input.extra_fee),
        cash_fee: round2(cash_fee),
    })
}
