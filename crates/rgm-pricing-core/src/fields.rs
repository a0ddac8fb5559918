use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RgmError;

/// Every input field the presentation layer exposes.
///
/// The serialized (snake_case) name doubles as the field's id in form
/// state, edit notifications and display writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    NetRevenue,
    IcmsPct,
    IcmsAmount,
    CompositePct,
    CompositeAmount,
    ExcisePct,
    ExciseAmount,
    SubstitutionPct,
    SubstitutionAmount,
    TradeAgreementsPct,
    TradeAgreementsAmount,
    CogsPct,
    CogsAmount,
    FreightPct,
    FreightAmount,
    RecoversComposite,
    RetailMarginPct,
    SaleIcmsPct,
    SaleCompositePct,
    TargetSalePrice,
}

/// How a field's raw presentation state is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Percentage,
    Amount,
    Flag,
}

/// The two simulation views. Each owns its own input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Forward cost-plus pricing (industry → retail → DRE)
    Buildup,
    /// Reverse margin simulation from a target sale price
    Breakdown,
}

impl FieldId {
    pub const ALL: [FieldId; 20] = [
        FieldId::NetRevenue,
        FieldId::IcmsPct,
        FieldId::IcmsAmount,
        FieldId::CompositePct,
        FieldId::CompositeAmount,
        FieldId::ExcisePct,
        FieldId::ExciseAmount,
        FieldId::SubstitutionPct,
        FieldId::SubstitutionAmount,
        FieldId::TradeAgreementsPct,
        FieldId::TradeAgreementsAmount,
        FieldId::CogsPct,
        FieldId::CogsAmount,
        FieldId::FreightPct,
        FieldId::FreightAmount,
        FieldId::RecoversComposite,
        FieldId::RetailMarginPct,
        FieldId::SaleIcmsPct,
        FieldId::SaleCompositePct,
        FieldId::TargetSalePrice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::NetRevenue => "net_revenue",
            FieldId::IcmsPct => "icms_pct",
            FieldId::IcmsAmount => "icms_amount",
            FieldId::CompositePct => "composite_pct",
            FieldId::CompositeAmount => "composite_amount",
            FieldId::ExcisePct => "excise_pct",
            FieldId::ExciseAmount => "excise_amount",
            FieldId::SubstitutionPct => "substitution_pct",
            FieldId::SubstitutionAmount => "substitution_amount",
            FieldId::TradeAgreementsPct => "trade_agreements_pct",
            FieldId::TradeAgreementsAmount => "trade_agreements_amount",
            FieldId::CogsPct => "cogs_pct",
            FieldId::CogsAmount => "cogs_amount",
            FieldId::FreightPct => "freight_pct",
            FieldId::FreightAmount => "freight_amount",
            FieldId::RecoversComposite => "recovers_composite",
            FieldId::RetailMarginPct => "retail_margin_pct",
            FieldId::SaleIcmsPct => "sale_icms_pct",
            FieldId::SaleCompositePct => "sale_composite_pct",
            FieldId::TargetSalePrice => "target_sale_price",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldId::RecoversComposite => FieldKind::Flag,
            FieldId::IcmsPct
            | FieldId::CompositePct
            | FieldId::ExcisePct
            | FieldId::SubstitutionPct
            | FieldId::TradeAgreementsPct
            | FieldId::CogsPct
            | FieldId::FreightPct
            | FieldId::RetailMarginPct
            | FieldId::SaleIcmsPct
            | FieldId::SaleCompositePct => FieldKind::Percentage,
            _ => FieldKind::Amount,
        }
    }

    /// The view whose edit notifications this field raises.
    pub fn view(self) -> View {
        match self {
            FieldId::TargetSalePrice => View::Breakdown,
            _ => View::Buildup,
        }
    }

    /// Human-readable label, used by the `fields` listing.
    pub fn label(self) -> &'static str {
        match self {
            FieldId::NetRevenue => "Net revenue (industry)",
            FieldId::IcmsPct => "ICMS %",
            FieldId::IcmsAmount => "ICMS amount",
            FieldId::CompositePct => "PIS/COFINS %",
            FieldId::CompositeAmount => "PIS/COFINS amount",
            FieldId::ExcisePct => "IPI %",
            FieldId::ExciseAmount => "IPI amount",
            FieldId::SubstitutionPct => "ST %",
            FieldId::SubstitutionAmount => "ST amount",
            FieldId::TradeAgreementsPct => "Trade agreements %",
            FieldId::TradeAgreementsAmount => "Trade agreements amount",
            FieldId::CogsPct => "COGS %",
            FieldId::CogsAmount => "COGS amount",
            FieldId::FreightPct => "Freight %",
            FieldId::FreightAmount => "Freight amount",
            FieldId::RecoversComposite => "Retailer recovers PIS/COFINS",
            FieldId::RetailMarginPct => "Retail margin %",
            FieldId::SaleIcmsPct => "ICMS on sale %",
            FieldId::SaleCompositePct => "PIS/COFINS on sale %",
            FieldId::TargetSalePrice => "Target sale price",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = RgmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| RgmError::UnknownField(s.to_string()))
    }
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Buildup => "buildup",
            View::Breakdown => "breakdown",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = RgmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buildup" => Ok(View::Buildup),
            "breakdown" => Ok(View::Breakdown),
            other => Err(RgmError::InvalidInput {
                field: "view".into(),
                reason: format!("expected 'buildup' or 'breakdown', got '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_str() {
        for id in FieldId::ALL {
            assert_eq!(id.as_str().parse::<FieldId>().unwrap(), id);
        }
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for id in FieldId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        match "ind_icms_perc".parse::<FieldId>() {
            Err(RgmError::UnknownField(name)) => assert_eq!(name, "ind_icms_perc"),
            other => panic!("Expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn test_only_recovery_toggle_is_a_flag() {
        let flags: Vec<FieldId> = FieldId::ALL
            .into_iter()
            .filter(|id| id.kind() == FieldKind::Flag)
            .collect();
        assert_eq!(flags, vec![FieldId::RecoversComposite]);
    }

    #[test]
    fn test_target_price_belongs_to_breakdown_view() {
        assert_eq!(FieldId::TargetSalePrice.view(), View::Breakdown);
        assert_eq!(FieldId::SaleIcmsPct.view(), View::Buildup);
        assert!("sideways".parse::<View>().is_err());
    }
}
