mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::breakdown::BreakdownArgs;
use commands::buildup::BuildupArgs;
use commands::replay::ReplayArgs;

/// RGM pricing matrix: tax buildup, reverse breakdown and DRE
#[derive(Parser)]
#[command(
    name = "rgm",
    version,
    about = "RGM pricing matrix: tax buildup, reverse breakdown and DRE",
    long_about = "A CLI for Brazilian revenue-growth-management pricing with decimal \
                  precision. Grosses up industry net revenue for ICMS and PIS/COFINS \
                  (ICMS excluded from the PIS/COFINS base), builds the retail sale \
                  price, summarises the industry DRE, and runs the reverse margin \
                  simulation from a target sale price."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a forward pass: industry gross-up, retail price and DRE
    Buildup(BuildupArgs),
    /// Run the reverse margin simulation from a target sale price
    Breakdown(BreakdownArgs),
    /// Replay a recorded sequence of form events through one session
    Replay(ReplayArgs),
    /// List every form field id with its kind, view and pair
    Fields,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Buildup(args) => commands::buildup::run_buildup(args),
        Commands::Breakdown(args) => commands::breakdown::run_breakdown(args),
        Commands::Replay(args) => commands::replay::run_replay(args),
        Commands::Fields => commands::fields::run_fields(),
        Commands::Version => {
            println!("rgm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
