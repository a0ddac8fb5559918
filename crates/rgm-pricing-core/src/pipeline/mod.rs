//! Forward (buildup) recomputation pass.
//!
//! ledger rebuild → reconcile → industry → retail → analysis. Each stage is a
//! pure function of the ledger and the stages before it, and every pass
//! starts again from the presentation layer.

pub mod analysis;
pub mod industry;
pub mod retail;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::fields::FieldId;
use crate::ledger::{FormSource, Ledger};
use crate::reconcile::{reconcile, WriteBack};

pub use analysis::{compute_analysis, AnalysisResult, DreLine, ProfitFlag};
pub use industry::{compute_industry, IndustryResult};
pub use retail::{compute_retail, RetailResult};

/// Everything one forward pass derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildupPass {
    /// Field whose edit triggered the pass, `None` for a programmatic pass
    pub edited: Option<FieldId>,
    /// Ledger after reconciliation and the industry tax write-back
    pub ledger: Ledger,
    /// Counterpart values reconciliation rederived
    pub write_backs: Vec<WriteBack>,
    pub industry: IndustryResult,
    pub retail: RetailResult,
    pub analysis: AnalysisResult,
}

/// Run one forward pass against the current presentation state.
pub fn run_buildup(source: &impl FormSource, edited: Option<FieldId>) -> BuildupPass {
    debug!(edited = ?edited, "buildup pass");

    let reconciled = reconcile(Ledger::rebuild(source), edited);
    trace!(
        write_backs = reconciled.write_backs.len(),
        base = %reconciled.gross_revenue_base,
        "reconciled"
    );

    let industry = compute_industry(&reconciled.ledger);
    let ledger = industry.apply_tax_amounts(reconciled.ledger);
    let retail = compute_retail(&ledger, &industry);
    let analysis = compute_analysis(&ledger, &industry, &retail);

    debug!(
        gross_revenue = %industry.gross_revenue,
        sale_price = %retail.sale_price,
        variable_margin = %analysis.variable_margin.amount,
        "buildup pass complete"
    );

    BuildupPass {
        edited,
        ledger,
        write_backs: reconciled.write_backs,
        industry,
        retail,
        analysis,
    }
}

/// Non-fatal conditions worth surfacing next to a pass's results.
pub fn buildup_warnings(pass: &BuildupPass) -> Vec<String> {
    let mut warnings = Vec::new();
    let net_revenue = pass.ledger.value(FieldId::NetRevenue);

    if pass.industry.gross_revenue.is_zero() && !net_revenue.is_zero() {
        warnings.push(
            "ICMS and PIS/COFINS rates consume the whole gross revenue; gross revenue set to zero"
                .to_string(),
        );
    }
    if pass.retail.sale_price.is_zero() && !pass.retail.client_cost.is_zero() {
        warnings.push(format!(
            "Retail margin plus sale taxes reach {}% of the sale price; sale price set to zero",
            pass.retail.combined_rate.saturating_mul(dec!(100)).normalize()
        ));
    }
    if pass.analysis.outcome == ProfitFlag::Loss {
        warnings.push(format!(
            "Variable margin is negative ({})",
            pass.analysis.variable_margin.amount.round_dp(2)
        ));
    }
    warnings
}
