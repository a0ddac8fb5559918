use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;
use std::time::Instant;

use rgm_pricing_core::report::{report_breakdown, report_buildup, report_event};
use rgm_pricing_core::{FieldId, FieldKind, FormEvent, FormState, Session, View};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_form(form_json: &str) -> NapiResult<FormState> {
    serde_json::from_str(form_json).map_err(to_napi_error)
}

/// One calculator session for a single page.
///
/// Holds the retail snapshot between calls so the breakdown view can read
/// the last buildup pass.
#[napi]
pub struct PricingEngine {
    session: Session,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[napi]
impl PricingEngine {
    #[napi(constructor)]
    pub fn new() -> Self {
        PricingEngine {
            session: Session::new(),
        }
    }

    /// Buildup pass after an edit; `edited` is the field id that changed.
    #[napi]
    pub fn on_edit(&mut self, form_json: String, edited: Option<String>) -> NapiResult<String> {
        let form = parse_form(&form_json)?;
        let edited = edited
            .as_deref()
            .map(str::parse::<FieldId>)
            .transpose()
            .map_err(to_napi_error)?;
        let started = Instant::now();
        let pass = self.session.on_edit(&form, edited);
        serde_json::to_string(&report_buildup(pass, started)).map_err(to_napi_error)
    }

    /// Reverse simulation against the last buildup pass.
    #[napi]
    pub fn on_breakdown(&self, form_json: String) -> NapiResult<String> {
        let form = parse_form(&form_json)?;
        let started = Instant::now();
        let outcome = self.session.on_breakdown(&form);
        serde_json::to_string(&report_breakdown(outcome, started)).map_err(to_napi_error)
    }

    /// View switch: `"breakdown"` runs the reverse simulation, `"buildup"` returns null.
    #[napi]
    pub fn activate_view(&mut self, form_json: String, view: String) -> NapiResult<String> {
        let form = parse_form(&form_json)?;
        let view: View = view.parse().map_err(to_napi_error)?;
        let report = report_event(&mut self.session, &form, FormEvent::Activate { view });
        serde_json::to_string(&report).map_err(to_napi_error)
    }

    #[napi(getter)]
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }
}

#[derive(Serialize)]
struct CatalogueEntry {
    id: FieldId,
    label: &'static str,
    kind: FieldKind,
    view: View,
}

/// Every field id the engine reads, for wiring up the form.
#[napi]
pub fn field_catalogue() -> NapiResult<String> {
    let entries: Vec<CatalogueEntry> = FieldId::ALL
        .into_iter()
        .map(|id| CatalogueEntry {
            id,
            label: id.label(),
            kind: id.kind(),
            view: id.view(),
        })
        .collect();
    serde_json::to_string(&entries).map_err(to_napi_error)
}
