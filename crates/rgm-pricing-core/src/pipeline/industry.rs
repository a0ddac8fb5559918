use serde::{Deserialize, Serialize};

use crate::fields::FieldId;
use crate::fiscal::{fraction, gross_revenue};
use crate::ledger::Ledger;
use crate::types::Money;

/// Output of the industry (manufacturer invoice) stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryResult {
    /// Gross revenue grossed up from net revenue
    pub gross_revenue: Money,
    /// ICMS on gross revenue
    pub icms_amount: Money,
    /// PIS/COFINS on gross revenue net of ICMS
    pub composite_tax_amount: Money,
    /// Gross revenue plus IPI
    pub invoice_price_with_excise: Money,
    /// Invoice price with IPI plus ST
    pub total_invoice_value: Money,
}

/// Compute the industry invoice from the ledger.
///
/// gross = net / (1 − icms − composite × (1 − icms))
/// icms_amount = gross × icms
/// composite_amount = (gross − icms_amount) × composite
///
/// Gross revenue is recomputed here rather than taken from reconciliation so
/// the stage is self-consistent on its own.
pub fn compute_industry(ledger: &Ledger) -> IndustryResult {
    let icms_pct = ledger.value(FieldId::IcmsPct);
    let composite_pct = ledger.value(FieldId::CompositePct);

    let gross = gross_revenue(ledger.value(FieldId::NetRevenue), icms_pct, composite_pct);
    let icms_amount = gross.saturating_mul(fraction(icms_pct));
    let composite_tax_amount = gross
        .saturating_sub(icms_amount)
        .saturating_mul(fraction(composite_pct));

    let invoice_price_with_excise = gross.saturating_add(ledger.value(FieldId::ExciseAmount));
    let total_invoice_value =
        invoice_price_with_excise.saturating_add(ledger.value(FieldId::SubstitutionAmount));

    IndustryResult {
        gross_revenue: gross,
        icms_amount,
        composite_tax_amount,
        invoice_price_with_excise,
        total_invoice_value,
    }
}

impl IndustryResult {
    /// Write the stage's tax amounts into the ledger.
    ///
    /// The industry stage is authoritative for the ICMS and PIS/COFINS
    /// amounts; whatever reconciliation produced for them is replaced.
    pub fn apply_tax_amounts(&self, ledger: Ledger) -> Ledger {
        ledger
            .with_value(FieldId::IcmsAmount, self.icms_amount)
            .with_value(FieldId::CompositeAmount, self.composite_tax_amount)
    }
}
