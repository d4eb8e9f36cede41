//! Bid → total: the final bill for a hammer price.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lenient;
use crate::rounding::round2;
use crate::{cash_fee_on, fraction};

/// Bid → total request.
///
/// `bid_amount` should be positive; the browser form enforces that, the
/// formula itself accepts anything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BidToTotalInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub bid_amount: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub buyers_premium_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub document_fee: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub vat_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub extra_fee: f64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paying_in_cash: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cash_fee_percent: f64,
}

/// Bid → total breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidToTotalOutput {
    pub bid: f64,
    pub buyers_premium: f64,
    pub document_fee: f64,
    pub extra_fee: f64,
    pub subtotal: f64,
    pub vat: f64,
    pub cash_fee: f64,
    pub total: f64,
}

/// Build the total payable for a bid.
///
/// VAT is charged on the subtotal plus the cash handling fee.
pub fn bid_to_total(input: &BidToTotalInput) -> BidToTotalOutput {
    let buyers_premium = input.bid_amount * fraction(input.buyers_premium_percent);
    let subtotal = input.bid_amount + buyers_premium + input.document_fee + input.extra_fee;
    let cash_fee = cash_fee_on(subtotal, input.paying_in_cash, input.cash_fee_percent);
    let vat = (subtotal + cash_fee) * fraction(input.vat_percent);
    let total = subtotal + cash_fee + vat;

    debug!(bid_amount = input.bid_amount, total, "Computed total from bid");

    BidToTotalOutput {
        bid: round2(input.bid_amount),
        buyers_premium: round2(buyers_premium),
        document_fee: round2(input.document_fee),
        extra_fee: round2(input.extra_fee),
        subtotal: round2(subtotal),
        vat: round2(vat),
        cash_fee: round2(cash_fee),
        total: round2(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_to_total_breakdown() {
        let out = bid_to_total(&BidToTotalInput {
            bid_amount: 100_000.0,
            buyers_premium_percent: 10.0,
            document_fee: 5_000.0,
            vat_percent: 7.5,
            ..Default::default()
        });

        assert_eq!(out.bid, 100_000.0);
        assert_eq!(out.buyers_premium, 10_000.0);
        assert_eq!(out.subtotal, 115_000.0);
        assert_eq!(out.vat, 8_625.0);
        assert_eq!(out.cash_fee, 0.0);
        assert_eq!(out.total, 123_625.0);
    }

    #[test]
    fn test_cash_fee_is_taxed() {
        let out = bid_to_total(&BidToTotalInput {
            bid_amount: 1_000.0,
            extra_fee: 200.0,
            vat_percent: 10.0,
            paying_in_cash: true,
            cash_fee_percent: 5.0,
            ..Default::default()
        });

        assert_eq!(out.subtotal, 1_200.0);
        assert_eq!(out.cash_fee, 60.0);
        assert_eq!(out.vat, 126.0);
        assert_eq!(out.total, 1_386.0);
    }

    #[test]
    fn test_zero_bid() {
        let out = bid_to_total(&BidToTotalInput::default());
        assert_eq!(out.total, 0.0);
        assert_eq!(out.subtotal, 0.0);
    }

    #[test]
    fn test_serialized_field_names() {
        let out = bid_to_total(&BidToTotalInput {
            bid_amount: 10.0,
            ..Default::default()
        });
        let value = serde_json::to_value(&out).unwrap();

        for field in [
            "bid",
            "buyers_premium",
            "document_fee",
            "extra_fee",
            "subtotal",
            "vat",
            "cash_fee",
            "total",
        ] {
            assert!(value.get(field).is_some(), "missing {}", field);
        }
    }
}
