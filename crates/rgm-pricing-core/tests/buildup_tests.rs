use pretty_assertions::assert_eq;
use rgm_pricing_core::fiscal::{gross_up_divisor, share_pct};
use rgm_pricing_core::pipeline::{compute_industry, run_buildup, ProfitFlag};
use rgm_pricing_core::reconcile::{reconcile, PairBase, PAIR_RULES};
use rgm_pricing_core::{FieldId, FormState, Ledger, Session};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A realistic industry form: R$ 1.000 net, ICMS 18%, PIS/COFINS 9,25%.
fn industry_form() -> FormState {
    FormState::new()
        .with_text(FieldId::NetRevenue, "1000")
        .with_text(FieldId::IcmsPct, "18")
        .with_text(FieldId::CompositePct, "9,25")
        .with_text(FieldId::ExcisePct, "5")
        .with_text(FieldId::SubstitutionPct, "3")
        .with_text(FieldId::TradeAgreementsPct, "4")
        .with_text(FieldId::CogsPct, "35")
        .with_text(FieldId::FreightPct, "2,5")
        .with_text(FieldId::RetailMarginPct, "20")
        .with_text(FieldId::SaleIcmsPct, "18")
        .with_text(FieldId::SaleCompositePct, "9.25")
}

// ===========================================================================
// Reconciliation laws
// ===========================================================================

#[test]
fn test_percentage_round_trip_for_every_pair() {
    let ledger = Ledger::rebuild(&industry_form());
    let gross = reconcile(ledger.clone(), None).gross_revenue_base;
    let icms = ledger.value(FieldId::IcmsPct) / dec!(100);

    for rule in &PAIR_RULES {
        let typed_pct = ledger.value(rule.percent);
        let out = reconcile(ledger.clone(), Some(rule.percent));
        let amount = out.ledger.value(rule.amount);

        let base = match rule.base {
            PairBase::GrossRevenue => gross,
            PairBase::GrossNetOfIcms => gross - gross * icms,
        };
        let back = share_pct(amount, base);
        assert!(
            (back - typed_pct).abs() < dec!(0.01),
            "{}: typed {typed_pct}%, derived {amount}, re-derived {back}%",
            rule.percent
        );
    }
}

#[test]
fn test_value_edit_round_trip() {
    let form = industry_form().with_text(FieldId::CogsAmount, "500");
    let out = reconcile(Ledger::rebuild(&form), Some(FieldId::CogsAmount));
    let pct = out.ledger.value(FieldId::CogsPct);

    let form = form.with_text(FieldId::CogsPct, pct.to_string());
    let back = reconcile(Ledger::rebuild(&form), Some(FieldId::CogsPct));
    assert!(
        (back.ledger.value(FieldId::CogsAmount) - dec!(500)).abs() < dec!(0.01),
        "COGS amount after round trip: {}",
        back.ledger.value(FieldId::CogsAmount)
    );
}

// ===========================================================================
// Industry stage
// ===========================================================================

#[test]
fn test_reference_scenario() {
    // divisor = 1 - 0.18 - 0.0925 * (1 - 0.18) = 0.74415
    let pass = run_buildup(&industry_form(), None);
    let ind = &pass.industry;
    assert!((ind.gross_revenue - dec!(1343.82)).abs() < dec!(0.01));
    assert!((ind.icms_amount - dec!(241.89)).abs() < dec!(0.01));
    assert!((ind.composite_tax_amount - dec!(101.93)).abs() < dec!(0.01));
}

#[test]
fn test_industry_idempotent() {
    let ledger = Ledger::rebuild(&industry_form());
    let first = compute_industry(&ledger);
    let second = compute_industry(&ledger);
    assert_eq!(first, second);
}

#[test]
fn test_saturated_tax_rates_zero_gross_revenue() {
    for (icms, composite) in [("100", "0"), ("50", "100"), ("95", "100"), ("120", "9.25")] {
        let form = industry_form()
            .with_text(FieldId::IcmsPct, icms)
            .with_text(FieldId::CompositePct, composite);
        let ledger = Ledger::rebuild(&form);
        assert!(
            gross_up_divisor(ledger.value(FieldId::IcmsPct), ledger.value(FieldId::CompositePct))
                <= Decimal::ZERO
        );
        let pass = run_buildup(&form, Some(FieldId::IcmsPct));
        assert_eq!(
            pass.industry.gross_revenue,
            Decimal::ZERO,
            "icms {icms}% composite {composite}%"
        );
    }
}

// ===========================================================================
// Retail stage
// ===========================================================================

#[test]
fn test_combined_rate_at_hundred_zeroes_sale_price() {
    let form = industry_form().with_text(FieldId::RetailMarginPct, "72,75");
    let pass = run_buildup(&form, Some(FieldId::RetailMarginPct));
    assert_eq!(pass.retail.sale_price, Decimal::ZERO);

    let form = industry_form().with_text(FieldId::RetailMarginPct, "150");
    assert_eq!(run_buildup(&form, None).retail.sale_price, Decimal::ZERO);
}

#[test]
fn test_recovery_toggle_changes_only_client_cost() {
    let off = industry_form().with_checked(FieldId::RecoversComposite, false);
    let on = industry_form().with_checked(FieldId::RecoversComposite, true);

    let a = run_buildup(&off, None);
    let b = run_buildup(&on, Some(FieldId::RecoversComposite));

    let delta = a.retail.client_cost - b.retail.client_cost;
    assert!(
        (delta - a.industry.composite_tax_amount).abs() < dec!(0.000000000001),
        "Client cost moved by {delta}, PIS/COFINS is {}",
        a.industry.composite_tax_amount
    );
    assert_eq!(a.industry, b.industry);
    assert_eq!(a.analysis, b.analysis);
    assert!(b.write_backs.is_empty());
}

// ===========================================================================
// Full pass
// ===========================================================================

#[test]
fn test_full_pass_dre() {
    let pass = run_buildup(&industry_form(), None);
    let dre = &pass.analysis;
    // percentages were typed without an edit, so their amounts are still zero
    assert_eq!(pass.ledger.value(FieldId::CogsAmount), Decimal::ZERO);
    assert!((dre.net_revenue.amount - dec!(1000)).abs() < dec!(0.0001));
    assert_eq!(dre.outcome, ProfitFlag::Profit);
}

#[test]
fn test_edit_sequence_keeps_pairs_consistent() {
    let mut session = Session::new();
    let mut form = industry_form();

    // the user types each percentage in turn; each edit fills its amount
    for field in [
        FieldId::ExcisePct,
        FieldId::SubstitutionPct,
        FieldId::TradeAgreementsPct,
        FieldId::CogsPct,
        FieldId::FreightPct,
    ] {
        let pass = session.on_edit(&form, Some(field));
        for wb in &pass.write_backs {
            form.set_text(wb.field, wb.value.round_dp(2).to_string());
        }
    }

    let pass = session.on_edit(&form, None);
    let gross = pass.industry.gross_revenue;
    assert!((pass.ledger.value(FieldId::CogsAmount) - gross * dec!(0.35)).abs() < dec!(0.01));
    assert!((pass.ledger.value(FieldId::FreightAmount) - gross * dec!(0.025)).abs() < dec!(0.01));
    assert!(
        (pass.industry.total_invoice_value - gross * dec!(1.08)).abs() < dec!(0.02),
        "IPI and ST should add 8% of gross"
    );

    // 1000 - 4% trade - 35% COGS - 2.5% freight of gross
    let expected = dec!(1000) - gross * dec!(0.415);
    assert!(
        (pass.analysis.variable_margin.amount - expected).abs() < dec!(0.05),
        "Variable margin: expected ~{expected}, got {}",
        pass.analysis.variable_margin.amount
    );
    assert_eq!(session.passes(), 6);
}

#[test]
fn test_garbage_input_never_faults() {
    let form = FormState::new()
        .with_text(FieldId::NetRevenue, "abc")
        .with_text(FieldId::IcmsPct, "-500")
        .with_text(FieldId::CompositePct, "1e9")
        .with_text(FieldId::CogsAmount, "79228162514264337593543950335")
        .with_text(FieldId::RetailMarginPct, "")
        .with_text(FieldId::SaleIcmsPct, ",,,");

    for field in FieldId::ALL {
        let pass = run_buildup(&form, Some(field));
        assert!(pass.industry.gross_revenue >= Decimal::ZERO);
    }
}
