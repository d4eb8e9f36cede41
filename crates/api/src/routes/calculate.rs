//! Calculator endpoints. No authentication, no persistence.

use axum::Json;
use calculator::{
    BidToTotalInput, BidToTotalOutput, BudgetToBidInput, BudgetToBidOutput, ProfitInput,
    ProfitOutput,
};

use crate::error::Result;
use crate::extract::ApiJson;

/// Budget → bid.
pub async fn calculate_bid(
    ApiJson(input): ApiJson<BudgetToBidInput>,
) -> Result<Json<BudgetToBidOutput>> {
    Ok(Json(calculator::budget_to_bid(&input)?))
}

/// Bid → total.
pub async fn calculate_total(
    ApiJson(input): ApiJson<BidToTotalInput>,
) -> Result<Json<BidToTotalOutput>> {
    Ok(Json(calculator::bid_to_total(&input)))
}

/// Profit and selling price.
pub async fn calculate_profit(ApiJson(input): ApiJson<ProfitInput>) -> Result<Json<ProfitOutput>> {
    Ok(Json(calculator::profit(&input)?))
}
