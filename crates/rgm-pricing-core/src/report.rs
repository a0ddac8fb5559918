use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Instant;

use crate::display::{render_breakdown, render_buildup, DisplayWrite};
use crate::fields::FieldId;
use crate::ledger::FormSource;
use crate::pipeline::{buildup_warnings, BuildupPass};
use crate::reverse::ReverseOutcome;
use crate::session::{FormEvent, Session, SessionOutcome};
use crate::types::{with_metadata, ComputationOutput};

const BUILDUP_METHODOLOGY: &str =
    "Tese do Século buildup: gross-up with ICMS excluded from the PIS/COFINS base";
const BREAKDOWN_METHODOLOGY: &str = "Reverse margin from target sale price";

/// A forward pass together with the display writes it produces.
#[derive(Debug, Clone, Serialize)]
pub struct BuildupReport {
    #[serde(flatten)]
    pub pass: BuildupPass,
    pub display: Vec<DisplayWrite>,
}

/// A reverse simulation together with the display writes it produces.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownReport {
    pub outcome: ReverseOutcome,
    pub display: Vec<DisplayWrite>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventReport {
    Buildup(ComputationOutput<BuildupReport>),
    Breakdown(ComputationOutput<BreakdownReport>),
    Idle,
}

#[derive(Serialize)]
struct BuildupAssumptions {
    edited: Option<FieldId>,
}

/// Wrap a forward pass in the standard output envelope.
pub fn report_buildup(pass: BuildupPass, started: Instant) -> ComputationOutput<BuildupReport> {
    let warnings = buildup_warnings(&pass);
    let display = render_buildup(&pass);
    let assumptions = BuildupAssumptions {
        edited: pass.edited,
    };
    let elapsed = started.elapsed().as_micros() as u64;
    with_metadata(
        BUILDUP_METHODOLOGY,
        &assumptions,
        warnings,
        elapsed,
        BuildupReport { pass, display },
    )
}

/// Wrap a reverse simulation in the standard output envelope.
pub fn report_breakdown(
    outcome: ReverseOutcome,
    started: Instant,
) -> ComputationOutput<BreakdownReport> {
    let mut warnings = Vec::new();
    match &outcome {
        ReverseOutcome::NotReady { message } => warnings.push(message.clone()),
        ReverseOutcome::Ready(r) if r.gross_profit < Decimal::ZERO => {
            warnings.push("Target sale price does not cover client cost and sale taxes".to_string())
        }
        ReverseOutcome::Ready(_) => {}
    }
    let display = render_breakdown(&outcome);
    let elapsed = started.elapsed().as_micros() as u64;
    with_metadata(
        BREAKDOWN_METHODOLOGY,
        &serde_json::Value::Null,
        warnings,
        elapsed,
        BreakdownReport { outcome, display },
    )
}

/// Feed one event through a session and wrap whatever it produced.
pub fn report_event(
    session: &mut Session,
    form: &impl FormSource,
    event: FormEvent,
) -> EventReport {
    let started = Instant::now();
    match session.on_event(form, event) {
        SessionOutcome::Buildup(pass) => EventReport::Buildup(report_buildup(*pass, started)),
        SessionOutcome::Breakdown(outcome) => {
            EventReport::Breakdown(report_breakdown(outcome, started))
        }
        SessionOutcome::Idle => EventReport::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::View;
    use crate::ledger::FormState;

    fn sample_form() -> FormState {
        FormState::new()
            .with_text(FieldId::NetRevenue, "1000")
            .with_text(FieldId::IcmsPct, "18")
            .with_text(FieldId::CompositePct, "9.25")
            .with_text(FieldId::RetailMarginPct, "20")
            .with_text(FieldId::TargetSalePrice, "100")
    }

    #[test]
    fn test_buildup_report_shape() {
        let mut session = Session::new();
        let report = report_event(&mut session, &sample_form(), FormEvent::Programmatic);
        let json = serde_json::to_value(report).unwrap();

        assert_eq!(json["methodology"], BUILDUP_METHODOLOGY);
        assert!(json["result"]["industry"]["gross_revenue"].is_string());
        assert!(json["result"]["display"].is_array());
        assert!(json["assumptions"]["edited"].is_null());
        assert_eq!(json["metadata"]["currency"], "BRL");
    }

    #[test]
    fn test_breakdown_not_ready_is_a_warning_not_an_error() {
        let mut session = Session::new();
        let report = report_event(
            &mut session,
            &sample_form(),
            FormEvent::Activate {
                view: View::Breakdown,
            },
        );
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["result"]["outcome"]["status"], "not_ready");
        assert_eq!(json["warnings"][0], crate::reverse::NOT_READY_MESSAGE);
    }

    #[test]
    fn test_breakdown_below_cost_warns() {
        let mut session = Session::new();
        session.on_edit(&sample_form(), None);
        let report = report_breakdown(session.on_breakdown(&sample_form()), Instant::now());
        assert!(report.warnings.iter().any(|w| w.contains("does not cover")));
    }
}
