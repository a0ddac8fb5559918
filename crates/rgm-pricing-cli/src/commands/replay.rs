use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use rgm_pricing_core::display::sync_inputs;
use rgm_pricing_core::report::{report_event, EventReport};
use rgm_pricing_core::{FieldId, FormEvent, FormState, RawField, Session, View};

use super::form::warn_unknown_keys;
use crate::input;

/// Arguments for replaying a recorded form session
#[derive(Args)]
pub struct ReplayArgs {
    /// Path to a JSON or YAML replay script (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

/// A recorded session: the starting form and the user's actions in order.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub form: FormState,
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Type a value into a field
    Edit { field: FieldId, value: RawField },
    /// Tick or untick a checkbox
    Toggle { field: FieldId, checked: bool },
    /// Switch to a view
    Activate { view: View },
    /// Overlay a saved form and recompute without an edited field
    Load { form: FormState },
}

impl ScriptEvent {
    /// Apply the action to the form and name the notification it raises.
    fn apply(&self, form: &mut FormState) -> FormEvent {
        match self {
            ScriptEvent::Edit { field, value } => {
                form.set(*field, value.clone());
                FormEvent::Edit { field: *field }
            }
            ScriptEvent::Toggle { field, checked } => {
                form.set_checked(*field, *checked);
                FormEvent::Edit { field: *field }
            }
            ScriptEvent::Activate { view } => FormEvent::Activate { view: *view },
            ScriptEvent::Load { form: saved } => {
                warn_unknown_keys(saved);
                form.merge(saved.clone());
                FormEvent::Programmatic
            }
        }
    }
}

/// Drive one session through every scripted event, reporting each step.
pub fn replay(script: ReplayScript) -> Result<Value, Box<dyn std::error::Error>> {
    let mut form = script.form;
    warn_unknown_keys(&form);
    let mut session = Session::new();
    let mut steps = Vec::with_capacity(script.events.len());

    for (i, scripted) in script.events.iter().enumerate() {
        let event = scripted.apply(&mut form);
        debug!(step = i + 1, ?event, "replaying");
        let report = report_event(&mut session, &form, event);
        // the form shows rederived counterparts, so the next pass reads them
        if let EventReport::Buildup(out) = &report {
            sync_inputs(&mut form, &out.result.display);
        }
        steps.push(json!({
            "step": i + 1,
            "event": serde_json::to_value(scripted)?,
            "report": serde_json::to_value(report)?,
        }));
    }

    Ok(Value::Array(steps))
}

pub fn run_replay(args: ReplayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("a replay script is required (provide --input or pipe it on stdin)".into());
    };
    replay(serde_json::from_value(data)?)
}
