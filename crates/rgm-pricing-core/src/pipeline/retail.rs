use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fields::FieldId;
use crate::fiscal::{fraction, guarded_div, pct_of};
use crate::ledger::Ledger;
use crate::pipeline::industry::IndustryResult;
use crate::types::{Money, Rate};

/// Output of the retail buildup stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailResult {
    /// Retailer's landed cost: total invoice, less recoverable PIS/COFINS
    pub client_cost: Money,
    /// Margin plus sale taxes as a fraction of the sale price
    pub combined_rate: Rate,
    /// Sale price that yields the target margin after sale taxes
    pub sale_price: Money,
    pub sale_icms_amount: Money,
    pub sale_composite_amount: Money,
}

/// Build the retail sale price on top of the industry invoice.
///
/// sale_price = client_cost / (1 − (margin + icms + pis/cofins) / 100),
/// zero when the combined rate reaches 100%.
pub fn compute_retail(ledger: &Ledger, industry: &IndustryResult) -> RetailResult {
    let mut client_cost = industry.total_invoice_value;
    if ledger.flag(FieldId::RecoversComposite) {
        client_cost = client_cost.saturating_sub(industry.composite_tax_amount);
    }

    let sale_icms_pct = ledger.value(FieldId::SaleIcmsPct);
    let sale_composite_pct = ledger.value(FieldId::SaleCompositePct);
    let combined_rate = fraction(
        ledger
            .value(FieldId::RetailMarginPct)
            .saturating_add(sale_icms_pct)
            .saturating_add(sale_composite_pct),
    );

    let sale_price = if combined_rate < Decimal::ONE {
        guarded_div(client_cost, Decimal::ONE - combined_rate)
    } else {
        Decimal::ZERO
    };

    RetailResult {
        client_cost,
        combined_rate,
        sale_price,
        sale_icms_amount: pct_of(sale_icms_pct, sale_price),
        sale_composite_amount: pct_of(sale_composite_pct, sale_price),
    }
}
