use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use schedule_advisor_lib::commands::analysis::{self, AnalysisPayload};
use schedule_advisor_lib::commands::{self, CommandResult};
use schedule_advisor_lib::utils::logger;
use schedule_advisor_lib::AppError;

#[derive(Parser)]
#[command(
    name = "schedule-advisor",
    version,
    about = "Advisory checks over a schedule snapshot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run analyses over a snapshot file and print JSON
    Analyze {
        /// JSON array of scheduled items
        #[arg(long)]
        snapshot: PathBuf,
        /// Partial settings override (JSON)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Run a single analysis instead of the combined report
        #[arg(long, value_enum)]
        only: Option<Analysis>,
        #[arg(long)]
        pretty: bool,
        /// Also write logs to a daily rolling file in this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// Snap a minute-of-day offset onto the 15-minute grid
    Snap {
        #[arg(allow_negative_numbers = true)]
        minutes: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Analysis {
    Conflicts,
    Workload,
    Suggestions,
    Redistribution,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze {
            snapshot,
            settings,
            only,
            pretty,
            log_dir,
        } => run_analyze(snapshot, settings, only, pretty, log_dir),
        Commands::Snap { minutes } => {
            analysis::analysis_snap_minutes(minutes).and_then(|snapped| print_json(&snapped, false))
        }
    };

    if let Err(err) = result {
        match serde_json::to_string(&err) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("error: {err}"),
        }
        std::process::exit(1);
    }
}

fn run_analyze(
    snapshot: PathBuf,
    settings: Option<PathBuf>,
    only: Option<Analysis>,
    pretty: bool,
    log_dir: Option<PathBuf>,
) -> CommandResult<()> {
    logger::init_logging(log_dir.as_deref())?;

    let items = commands::load_snapshot(&snapshot)?;
    let settings = commands::load_settings(settings.as_deref())?;
    let payload = AnalysisPayload::new(items, Some(settings));

    match only {
        None => print_json(&analysis::analysis_run_all(payload)?, pretty),
        Some(Analysis::Conflicts) => {
            print_json(&analysis::analysis_conflicts_evaluate(payload)?, pretty)
        }
        Some(Analysis::Workload) => print_json(&analysis::analysis_workload_fetch(payload)?, pretty),
        Some(Analysis::Suggestions) => {
            print_json(&analysis::analysis_suggestions_generate(payload)?, pretty)
        }
        Some(Analysis::Redistribution) => {
            print_json(&analysis::analysis_redistribution_plan(payload)?, pretty)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> CommandResult<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let rendered = rendered.map_err(AppError::from)?;
    println!("{rendered}");
    Ok(())
}
