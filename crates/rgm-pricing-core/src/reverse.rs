//! Reverse (breakdown) margin simulation.
//!
//! Given a target shelf price, work back to the retailer's gross profit and
//! margin using the client cost from the last buildup pass.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fiscal::{pct_of, share_pct};
use crate::pipeline::RetailResult;
use crate::types::{Money, Percent};

/// Shown in place of results until a buildup pass has run.
pub const NOT_READY_MESSAGE: &str = "Run the buildup simulation first";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseResult {
    /// Client cost taken from the buildup snapshot
    pub client_cost: Money,
    pub target_sale_price: Money,
    /// ICMS plus PIS/COFINS on the target price
    pub taxes_on_sale: Money,
    pub gross_profit: Money,
    /// Gross profit as % of the target price
    pub gross_margin_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReverseOutcome {
    Ready(ReverseResult),
    NotReady { message: String },
}

impl ReverseOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReverseOutcome::Ready(_))
    }

    pub fn result(&self) -> Option<&ReverseResult> {
        match self {
            ReverseOutcome::Ready(r) => Some(r),
            ReverseOutcome::NotReady { .. } => None,
        }
    }
}

/// Margin implied by a target sale price.
///
/// taxes_on_sale = price × icms/100 + price × composite/100
/// gross_profit = price − client_cost − taxes_on_sale
/// gross_margin_pct = gross_profit / price × 100 (zero when price ≤ 0)
///
/// The sale tax rates are the buildup view's retail rates, so both
/// simulations tax the sale identically.
pub fn simulate_reverse(
    snapshot: Option<&RetailResult>,
    target_sale_price: Money,
    sale_icms_pct: Percent,
    sale_composite_pct: Percent,
) -> ReverseOutcome {
    let Some(retail) = snapshot else {
        return ReverseOutcome::NotReady {
            message: NOT_READY_MESSAGE.to_string(),
        };
    };

    let taxes_on_sale = pct_of(sale_icms_pct, target_sale_price)
        .saturating_add(pct_of(sale_composite_pct, target_sale_price));
    let gross_profit = target_sale_price
        .saturating_sub(retail.client_cost)
        .saturating_sub(taxes_on_sale);

    ReverseOutcome::Ready(ReverseResult {
        client_cost: retail.client_cost,
        target_sale_price,
        taxes_on_sale,
        gross_profit,
        gross_margin_pct: share_pct(gross_profit, target_sale_price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn snapshot(client_cost: Money) -> RetailResult {
        RetailResult {
            client_cost,
            combined_rate: dec!(0.4725),
            sale_price: Decimal::ZERO,
            sale_icms_amount: Decimal::ZERO,
            sale_composite_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_not_ready_without_snapshot() {
        let out = simulate_reverse(None, dec!(1000), dec!(18), dec!(9.25));
        assert_eq!(
            out,
            ReverseOutcome::NotReady {
                message: NOT_READY_MESSAGE.to_string()
            }
        );
        assert!(out.result().is_none());
    }

    #[test]
    fn test_margin_from_target_price() {
        let snap = snapshot(dec!(500));
        let out = simulate_reverse(Some(&snap), dec!(1000), dec!(18), dec!(9.25));
        let r = out.result().unwrap();
        assert_eq!(r.taxes_on_sale, dec!(272.5));
        assert_eq!(r.gross_profit, dec!(227.5));
        assert_eq!(r.gross_margin_pct, dec!(22.75));
    }

    #[test]
    fn test_buildup_price_recovers_buildup_margin() {
        // 500 / (1 - 0.4725) is the price the buildup view quotes for a 20% margin
        let snap = snapshot(dec!(500));
        let price = dec!(500) / dec!(0.5275);
        let out = simulate_reverse(Some(&snap), price, dec!(18), dec!(9.25));
        let margin = out.result().unwrap().gross_margin_pct;
        assert!(
            (margin - dec!(20)).abs() < dec!(0.0001),
            "Margin: expected 20, got {margin}"
        );
    }

    #[test]
    fn test_zero_target_price_gives_zero_margin() {
        let snap = snapshot(dec!(500));
        let out = simulate_reverse(Some(&snap), Decimal::ZERO, dec!(18), dec!(9.25));
        let r = out.result().unwrap();
        assert_eq!(r.gross_profit, dec!(-500));
        assert_eq!(r.gross_margin_pct, Decimal::ZERO);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(simulate_reverse(None, dec!(1), dec!(0), dec!(0))).unwrap();
        assert_eq!(json["status"], "not_ready");
        assert_eq!(json["message"], NOT_READY_MESSAGE);
    }
}
