use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fields::{FieldId, View};
use crate::ledger::{FormSource, Ledger};
use crate::pipeline::{run_buildup, BuildupPass, RetailResult};
use crate::reverse::{simulate_reverse, ReverseOutcome};

/// A notification from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormEvent {
    /// A field's value changed
    Edit { field: FieldId },
    /// Recompute without a triggering field (initial load, programmatic)
    Programmatic,
    /// A view became active
    Activate { view: View },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", content = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    Buildup(Box<BuildupPass>),
    Breakdown(ReverseOutcome),
    /// Nothing to recompute (e.g. the buildup view was re-activated)
    Idle,
}

/// The calculator's only state that outlives a pass: the retail result the
/// reverse simulation reads from.
///
/// Passes are synchronous and take `&mut self`, so two can never overlap.
#[derive(Debug, Clone, Default)]
pub struct Session {
    snapshot: Option<RetailResult>,
    passes: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last retail result, `None` until a buildup pass has run.
    pub fn snapshot(&self) -> Option<&RetailResult> {
        self.snapshot.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Number of completed buildup passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run a full buildup pass and keep its retail result as the snapshot.
    pub fn on_edit(&mut self, form: &impl FormSource, edited: Option<FieldId>) -> BuildupPass {
        let pass = run_buildup(form, edited);
        self.snapshot = Some(pass.retail.clone());
        self.passes += 1;
        pass
    }

    /// Run the reverse simulation against the current snapshot.
    ///
    /// The target price and the sale tax rates are read from the live form,
    /// never from the snapshot.
    pub fn on_breakdown(&self, form: &impl FormSource) -> ReverseOutcome {
        let ledger = Ledger::rebuild(form);
        let outcome = simulate_reverse(
            self.snapshot.as_ref(),
            ledger.value(FieldId::TargetSalePrice),
            ledger.value(FieldId::SaleIcmsPct),
            ledger.value(FieldId::SaleCompositePct),
        );
        if !outcome.is_ready() {
            info!("breakdown requested before any buildup pass");
        }
        outcome
    }

    /// Dispatch a presentation event to the view it belongs to.
    pub fn on_event(&mut self, form: &impl FormSource, event: FormEvent) -> SessionOutcome {
        debug!(?event, "form event");
        match event {
            FormEvent::Edit { field } if field.view() == View::Breakdown => {
                SessionOutcome::Breakdown(self.on_breakdown(form))
            }
            FormEvent::Edit { field } => {
                SessionOutcome::Buildup(Box::new(self.on_edit(form, Some(field))))
            }
            FormEvent::Programmatic => SessionOutcome::Buildup(Box::new(self.on_edit(form, None))),
            FormEvent::Activate {
                view: View::Breakdown,
            } => SessionOutcome::Breakdown(self.on_breakdown(form)),
            FormEvent::Activate { view: View::Buildup } => SessionOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::FormState;
    use crate::reverse::NOT_READY_MESSAGE;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_form() -> FormState {
        FormState::new()
            .with_text(FieldId::NetRevenue, "1000")
            .with_text(FieldId::IcmsPct, "18")
            .with_text(FieldId::CompositePct, "9.25")
            .with_text(FieldId::RetailMarginPct, "20")
            .with_text(FieldId::SaleIcmsPct, "18")
            .with_text(FieldId::SaleCompositePct, "9.25")
            .with_text(FieldId::TargetSalePrice, "2500")
    }

    #[test]
    fn test_breakdown_before_buildup_is_not_ready() {
        let session = Session::new();
        assert!(!session.is_ready());
        assert_eq!(
            session.on_breakdown(&sample_form()),
            ReverseOutcome::NotReady {
                message: NOT_READY_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_buildup_pass_stores_snapshot() {
        let mut session = Session::new();
        let pass = session.on_edit(&sample_form(), None);
        assert_eq!(session.snapshot(), Some(&pass.retail));
        assert_eq!(session.passes(), 1);
        assert!(session.on_breakdown(&sample_form()).is_ready());
    }

    #[test]
    fn test_breakdown_uses_live_sale_rates() {
        let mut session = Session::new();
        session.on_edit(&sample_form(), None);

        // change the sale rates without a buildup pass: breakdown picks them up
        let form = sample_form().with_text(FieldId::SaleCompositePct, "0");
        let out = session.on_breakdown(&form);
        let r = out.result().unwrap();
        assert_eq!(r.taxes_on_sale, dec!(450));
    }

    #[test]
    fn test_target_price_edit_does_not_run_buildup() {
        let mut session = Session::new();
        let out = session.on_event(
            &sample_form(),
            FormEvent::Edit {
                field: FieldId::TargetSalePrice,
            },
        );
        assert!(matches!(out, SessionOutcome::Breakdown(ReverseOutcome::NotReady { .. })));
        assert_eq!(session.passes(), 0);
    }

    #[test]
    fn test_view_activation() {
        let mut session = Session::new();
        let form = sample_form();
        assert_eq!(
            session.on_event(&form, FormEvent::Activate { view: View::Buildup }),
            SessionOutcome::Idle
        );
        session.on_event(&form, FormEvent::Programmatic);
        let out = session.on_event(
            &form,
            FormEvent::Activate {
                view: View::Breakdown,
            },
        );
        assert!(matches!(out, SessionOutcome::Breakdown(ReverseOutcome::Ready(_))));
    }

    #[test]
    fn test_snapshot_superseded_by_next_pass() {
        let mut session = Session::new();
        session.on_edit(&sample_form(), None);
        let first = session.snapshot().cloned().unwrap();

        let form = sample_form().with_text(FieldId::NetRevenue, "2000");
        session.on_event(
            &form,
            FormEvent::Edit {
                field: FieldId::NetRevenue,
            },
        );
        let second = session.snapshot().unwrap();
        assert!(second.client_cost > first.client_cost);
    }

    #[test]
    fn test_event_deserializes_from_tagged_json() {
        let event: FormEvent = serde_json::from_str(r#"{"kind":"edit","field":"cogs_pct"}"#).unwrap();
        assert_eq!(
            event,
            FormEvent::Edit {
                field: FieldId::CogsPct
            }
        );
        let event: FormEvent =
            serde_json::from_str(r#"{"kind":"activate","view":"breakdown"}"#).unwrap();
        assert_eq!(
            event,
            FormEvent::Activate {
                view: View::Breakdown
            }
        );
    }
}
