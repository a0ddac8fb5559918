use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fields::FieldId;
use crate::fiscal::share_pct;
use crate::ledger::Ledger;
use crate::pipeline::industry::IndustryResult;
use crate::pipeline::retail::RetailResult;
use crate::types::{Money, Percent};

/// One income-statement line: an amount and its share of the line's base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DreLine {
    pub amount: Money,
    pub pct: Percent,
}

impl DreLine {
    fn of(amount: Money, base: Money) -> Self {
        DreLine {
            amount,
            pct: share_pct(amount, base),
        }
    }
}

/// Tri-state profit/loss indicator driven by the variable margin's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitFlag {
    Profit,
    Loss,
    Neutral,
}

impl ProfitFlag {
    pub fn from_margin(margin: Money) -> Self {
        if margin > Decimal::ZERO {
            ProfitFlag::Profit
        } else if margin < Decimal::ZERO {
            ProfitFlag::Loss
        } else {
            ProfitFlag::Neutral
        }
    }
}

/// DRE (income statement) cascade for the industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub gross_revenue: Money,
    /// ICMS + PIS/COFINS, % of gross revenue
    pub total_taxes: DreLine,
    /// Gross revenue − taxes − trade agreements, % of gross revenue
    pub net_revenue: DreLine,
    /// Net revenue − COGS, % of net revenue
    pub gross_margin: DreLine,
    /// Gross margin − freight, % of net revenue
    pub variable_margin: DreLine,
    pub outcome: ProfitFlag,
}

/// Break the industry invoice down into the DRE cascade.
///
/// The retail result is part of the stage contract so the DRE always runs
/// after retail within a pass, but no DRE line currently reads from it.
pub fn compute_analysis(
    ledger: &Ledger,
    industry: &IndustryResult,
    _retail: &RetailResult,
) -> AnalysisResult {
    let gross = industry.gross_revenue;

    let total_taxes = industry
        .icms_amount
        .saturating_add(industry.composite_tax_amount);
    let net_revenue = gross
        .saturating_sub(total_taxes)
        .saturating_sub(ledger.value(FieldId::TradeAgreementsAmount));
    let gross_margin = net_revenue.saturating_sub(ledger.value(FieldId::CogsAmount));
    let variable_margin = gross_margin.saturating_sub(ledger.value(FieldId::FreightAmount));

    AnalysisResult {
        gross_revenue: gross,
        total_taxes: DreLine::of(total_taxes, gross),
        net_revenue: DreLine::of(net_revenue, gross),
        gross_margin: DreLine::of(gross_margin, net_revenue),
        variable_margin: DreLine::of(variable_margin, net_revenue),
        outcome: ProfitFlag::from_margin(variable_margin),
    }
}
