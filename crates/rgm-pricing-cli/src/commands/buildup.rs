use clap::Args;
use serde_json::Value;
use std::time::Instant;

use rgm_pricing_core::report::report_buildup;
use rgm_pricing_core::{FieldId, Session};

use super::form::FormArgs;

/// Arguments for the forward buildup pass
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BuildupArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Field the user just edited (e.g. cogs_pct); its pair counterpart is rederived
    #[arg(long)]
    pub edited: Option<String>,
}

pub fn run_buildup(args: BuildupArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let edited = args
        .edited
        .as_deref()
        .map(str::parse::<FieldId>)
        .transpose()?;
    let form = args.form.load()?;

    let started = Instant::now();
    let mut session = Session::new();
    let pass = session.on_edit(&form, edited);
    Ok(serde_json::to_value(report_buildup(pass, started))?)
}
