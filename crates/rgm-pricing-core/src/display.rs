//! Presentation sync: the writes a pass pushes back to the display layer.
//!
//! The core never touches a view directly. It hands the host a list of
//! `DisplayWrite`s already formatted the way the form shows them.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::fields::FieldId;
use crate::ledger::FormState;
use crate::pipeline::{BuildupPass, DreLine, ProfitFlag};
use crate::reverse::ReverseOutcome;
use crate::types::{Money, Percent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DisplayValue {
    /// Two-decimal text for an editable input (`"241.89"`)
    InputText(String),
    /// BRL currency text (`"R$ 1.343,82"`)
    Currency(String),
    /// Two-decimal percentage text (`"25.59%"`)
    Percent(String),
    /// Profit/loss styling of a result
    Indicator(ProfitFlag),
    /// Instructional text shown instead of a result
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayWrite {
    pub target: &'static str,
    pub value: DisplayValue,
}

impl DisplayWrite {
    fn input(field: FieldId, value: Decimal) -> Self {
        DisplayWrite {
            target: field.as_str(),
            value: DisplayValue::InputText(format_fixed2(value)),
        }
    }

    fn currency(target: &'static str, value: Money) -> Self {
        DisplayWrite {
            target,
            value: DisplayValue::Currency(format_brl(value)),
        }
    }

    fn percent(target: &'static str, value: Percent) -> Self {
        DisplayWrite {
            target,
            value: DisplayValue::Percent(format_percent(value)),
        }
    }
}

fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded
}

/// Fixed two-decimal text, period separator.
pub fn format_fixed2(value: Decimal) -> String {
    round2(value).to_string()
}

/// Two-decimal percentage text.
pub fn format_percent(value: Percent) -> String {
    format!("{}%", format_fixed2(value))
}

/// pt-BR currency text: `R$ 1.234,56`, negatives as `-R$ 1.234,56`.
pub fn format_brl(value: Money) -> String {
    let rounded = round2(value);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

fn dre_line(writes: &mut Vec<DisplayWrite>, amount: &'static str, pct: &'static str, line: DreLine) {
    writes.push(DisplayWrite::currency(amount, line.amount));
    writes.push(DisplayWrite::percent(pct, line.pct));
}

/// Writes for the buildup view after a forward pass.
pub fn render_buildup(pass: &BuildupPass) -> Vec<DisplayWrite> {
    let mut writes: Vec<DisplayWrite> = pass
        .write_backs
        .iter()
        .filter(|wb| !matches!(wb.field, FieldId::IcmsAmount | FieldId::CompositeAmount))
        .map(|wb| DisplayWrite::input(wb.field, wb.value))
        .collect();

    // the industry stage owns these two, whatever reconciliation wrote
    writes.push(DisplayWrite::input(
        FieldId::IcmsAmount,
        pass.ledger.value(FieldId::IcmsAmount),
    ));
    writes.push(DisplayWrite::input(
        FieldId::CompositeAmount,
        pass.ledger.value(FieldId::CompositeAmount),
    ));

    let industry = &pass.industry;
    writes.push(DisplayWrite::currency("industry.gross_revenue", industry.gross_revenue));
    writes.push(DisplayWrite::currency(
        "industry.invoice_price_with_excise",
        industry.invoice_price_with_excise,
    ));
    writes.push(DisplayWrite::currency(
        "industry.total_invoice_value",
        industry.total_invoice_value,
    ));

    let retail = &pass.retail;
    writes.push(DisplayWrite::currency("retail.client_cost", retail.client_cost));
    writes.push(DisplayWrite::currency("retail.sale_price", retail.sale_price));
    writes.push(DisplayWrite::currency("retail.sale_icms_amount", retail.sale_icms_amount));
    writes.push(DisplayWrite::currency(
        "retail.sale_composite_amount",
        retail.sale_composite_amount,
    ));

    let dre = &pass.analysis;
    writes.push(DisplayWrite::currency("dre.gross_revenue", dre.gross_revenue));
    dre_line(&mut writes, "dre.total_taxes", "dre.total_taxes_pct", dre.total_taxes);
    dre_line(&mut writes, "dre.net_revenue", "dre.net_revenue_pct", dre.net_revenue);
    dre_line(&mut writes, "dre.gross_margin", "dre.gross_margin_pct", dre.gross_margin);
    dre_line(
        &mut writes,
        "dre.variable_margin",
        "dre.variable_margin_pct",
        dre.variable_margin,
    );
    writes.push(DisplayWrite {
        target: "dre.variable_margin",
        value: DisplayValue::Indicator(dre.outcome),
    });

    writes
}

/// Apply the input-text writes of a pass to a form state, the way a form
/// shows the rederived counterparts so the next pass reads them back.
///
/// Result targets (`industry.*`, `dre.*`, ...) name no field and are skipped.
pub fn sync_inputs(form: &mut FormState, writes: &[DisplayWrite]) {
    for write in writes {
        if let DisplayValue::InputText(text) = &write.value {
            if let Ok(field) = write.target.parse::<FieldId>() {
                form.set_text(field, text.clone());
            }
        }
    }
}

/// Writes for the breakdown view.
pub fn render_breakdown(outcome: &ReverseOutcome) -> Vec<DisplayWrite> {
    match outcome {
        ReverseOutcome::NotReady { message } => vec![DisplayWrite {
            target: "breakdown.client_cost",
            value: DisplayValue::Message(message.clone()),
        }],
        ReverseOutcome::Ready(r) => vec![
            DisplayWrite::currency("breakdown.client_cost", r.client_cost),
            DisplayWrite::currency("breakdown.taxes_on_sale", r.taxes_on_sale),
            DisplayWrite::currency("breakdown.gross_profit", r.gross_profit),
            DisplayWrite::percent("breakdown.gross_margin_pct", r.gross_margin_pct),
        ],
    }
}
