//! Percentage/amount pair reconciliation.
//!
//! Seven inputs can be typed either as a percentage of a base or as a BRL
//! amount. When one member of a pair is edited, the other is rederived from
//! it against the pair's base; all other pairs are left exactly as typed.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::fields::FieldId;
use crate::fiscal::{fraction, gross_revenue, pct_of, share_pct};
use crate::ledger::Ledger;
use crate::types::Money;

/// Base a pair's percentage is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairBase {
    /// Gross revenue from the gross-up formula
    GrossRevenue,
    /// Gross revenue minus its ICMS (`gross − gross × icms`)
    GrossNetOfIcms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRule {
    pub percent: FieldId,
    pub amount: FieldId,
    pub base: PairBase,
}

/// Reconciled pairs, in evaluation order.
pub const PAIR_RULES: [PairRule; 7] = [
    PairRule {
        percent: FieldId::CompositePct,
        amount: FieldId::CompositeAmount,
        base: PairBase::GrossNetOfIcms,
    },
    PairRule {
        percent: FieldId::IcmsPct,
        amount: FieldId::IcmsAmount,
        base: PairBase::GrossRevenue,
    },
    PairRule {
        percent: FieldId::ExcisePct,
        amount: FieldId::ExciseAmount,
        base: PairBase::GrossRevenue,
    },
    PairRule {
        percent: FieldId::SubstitutionPct,
        amount: FieldId::SubstitutionAmount,
        base: PairBase::GrossRevenue,
    },
    PairRule {
        percent: FieldId::TradeAgreementsPct,
        amount: FieldId::TradeAgreementsAmount,
        base: PairBase::GrossRevenue,
    },
    PairRule {
        percent: FieldId::CogsPct,
        amount: FieldId::CogsAmount,
        base: PairBase::GrossRevenue,
    },
    PairRule {
        percent: FieldId::FreightPct,
        amount: FieldId::FreightAmount,
        base: PairBase::GrossRevenue,
    },
];

/// The pair a field belongs to, if any.
pub fn pair_for(field: FieldId) -> Option<&'static PairRule> {
    PAIR_RULES
        .iter()
        .find(|rule| rule.percent == field || rule.amount == field)
}

/// A counterpart value rederived by reconciliation, to be pushed back to the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WriteBack {
    pub field: FieldId,
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub ledger: Ledger,
    /// Gross revenue the pair bases were derived from
    pub gross_revenue_base: Money,
    pub write_backs: Vec<WriteBack>,
}

/// Restore consistency of the pair containing `edited`.
///
/// With no edited field (initial or programmatic pass) the ledger passes
/// through unchanged.
pub fn reconcile(ledger: Ledger, edited: Option<FieldId>) -> Reconciliation {
    let icms_pct = ledger.value(FieldId::IcmsPct);
    let gross = gross_revenue(
        ledger.value(FieldId::NetRevenue),
        icms_pct,
        ledger.value(FieldId::CompositePct),
    );

    let Some(edited) = edited else {
        return Reconciliation {
            ledger,
            gross_revenue_base: gross,
            write_backs: Vec::new(),
        };
    };

    let net_of_icms = gross.saturating_sub(gross.saturating_mul(fraction(icms_pct)));
    let mut ledger = ledger;
    let mut write_backs = Vec::new();

    for rule in &PAIR_RULES {
        let base = match rule.base {
            PairBase::GrossRevenue => gross,
            PairBase::GrossNetOfIcms => net_of_icms,
        };

        let write_back = if edited == rule.percent {
            WriteBack {
                field: rule.amount,
                value: pct_of(ledger.value(rule.percent), base),
            }
        } else if edited == rule.amount {
            WriteBack {
                field: rule.percent,
                value: share_pct(ledger.value(rule.amount), base),
            }
        } else {
            continue;
        };

        trace!(field = %write_back.field, value = %write_back.value, %base, "reconciled pair");
        ledger = ledger.with_value(write_back.field, write_back.value);
        write_backs.push(write_back);
    }

    Reconciliation {
        ledger,
        gross_revenue_base: gross,
        write_backs,
    }
}
