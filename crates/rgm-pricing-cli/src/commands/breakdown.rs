use clap::Args;
use serde_json::Value;
use std::time::Instant;

use rgm_pricing_core::report::report_breakdown;
use rgm_pricing_core::Session;

use super::form::FormArgs;

/// Arguments for the reverse margin simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Skip the buildup pass that normally seeds the breakdown
    #[arg(long)]
    pub cold: bool,
}

pub fn run_breakdown(args: BreakdownArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = args.form.load()?;

    let mut session = Session::new();
    if !args.cold {
        session.on_edit(&form, None);
    }

    let started = Instant::now();
    let outcome = session.on_breakdown(&form);
    Ok(serde_json::to_value(report_breakdown(outcome, started))?)
}
