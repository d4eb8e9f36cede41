//! Profit and selling price from a selling multiple.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalculationError, Result};
use crate::lenient;
use crate::rounding::round2;

/// Profit request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfitInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub purchase_price: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_expenses: f64,
    /// Factor applied to the total cost; must be positive.
    #[serde(default, deserialize_with = "lenient::number")]
    pub selling_multiple: f64,
    /// Flat fee added on top of the selling price.
    #[serde(default, deserialize_with = "lenient::number")]
    pub extra_fee: f64,
}

/// Profit breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitOutput {
    pub total_cost: f64,
    pub selling_price: f64,
    pub profit_value: f64,
    pub selling_multiple: f64,
    pub extra_fee: f64,
    pub total_selling_price: f64,
}

/// Price goods at a multiple of what they cost.
pub fn profit(input: &ProfitInput) -> Result<ProfitOutput> {
    if input.selling_multiple <= 0.0 {
        return Err(CalculationError::InvalidSellingMultiple);
    }

    let total_cost = input.purchase_price + input.total_expenses;
    let selling_price = total_cost * input.selling_multiple;
    let profit_value = selling_price - total_cost;
    let total_selling_price = selling_price + input.extra_fee;

    debug!(total_cost, selling_price, "Computed profit");

    Ok(ProfitOutput {
        total_cost: round2(total_cost),
        selling_price: round2(selling_price),
        profit_value: round2(profit_value),
        selling_multiple: round2(input.selling_multiple),
        extra_fee: round2(input.extra_fee),
        total_selling_price: round2(total_selling_price),
    })
}
