//! controller — park admission controller.
//!
//! Opens the inbound FIFO, runs the simulated day, prints each hour's
//! transitions and the final report, and optionally writes run output.
//!
//! ```text
//! controller -i 9 -f 17 -s 2 -t 10 -p pipe_controller --output output/
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pk_coord::{CoordinatorBuilder, ParkObserver, RunSummary, outcome_code};
use pk_core::{Hour, ParkConfig};
use pk_output::{CsvWriter, OutputWriter, RunRows};
use pk_venue::{Decision, FinalReport, HourReport};
use pk_wire::Message;

#[derive(Parser)]
#[command(name = "controller")]
#[command(about = "Park admission controller: grants two-hour visit slots to reservation agents")]
struct Cli {
    /// Opening hour (7..=19)
    #[arg(short = 'i', long = "open")]
    open_hour: i32,

    /// Closing hour (open..=19)
    #[arg(short = 'f', long = "close")]
    close_hour: i32,

    /// Real seconds per simulated hour
    #[arg(short = 's', long = "seconds-per-hour", value_parser = clap::value_parser!(u64).range(1..))]
    seconds_per_hour: u64,

    /// People allowed in the park during any one hour
    #[arg(short = 't', long = "capacity", value_parser = clap::value_parser!(u32).range(1..))]
    capacity: u32,

    /// Inbound FIFO that agents write to
    #[arg(short = 'p', long = "pipe")]
    pipe: PathBuf,

    /// Directory for reservations/occupancy/summary output
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn park_config(&self) -> ParkConfig {
        ParkConfig {
            open_hour:     Hour(self.open_hour),
            close_hour:    Hour(self.close_hour),
            hour_duration: Duration::from_secs(self.seconds_per_hour),
            capacity:      self.capacity,
        }
    }
}

// ── Console observer ──────────────────────────────────────────────────────────

/// Prints what the operator watches: registrations, decisions, hours.
struct ConsolePrinter;

impl ParkObserver for ConsolePrinter {
    fn on_register(&self, agent: &str, hour: Hour, added: bool) {
        if added {
            println!("Controller: agent {agent} registered at hour {hour}");
        }
    }

    fn on_decision(&self, request: &Message, decision: &Decision) {
        let assigned = decision.assigned_hour.map_or(-1, |h| h.0);
        println!(
            "Controller: request from agent {}, family {}, hour {}, people {} -> code={}, assigned hour={}",
            request.agent,
            request.family,
            request.hour,
            request.people,
            outcome_code(decision.outcome).code(),
            assigned,
        );
    }

    fn on_hour(&self, report: &HourReport) {
        println!("{report}");
    }

    fn on_run_end(&self, report: &FinalReport) {
        println!();
        println!("{report}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.park_config();
    if let Err(e) = config.validate() {
        Cli::command().error(ErrorKind::ValueValidation, e).exit();
    }

    let summary = run(config, &cli.pipe)?;

    if let Some(dir) = &cli.output {
        write_output(dir, &summary)?;
    }
    Ok(())
}

#[cfg(unix)]
fn run(config: ParkConfig, pipe: &Path) -> Result<RunSummary> {
    use pk_wire::FifoConnector;
    use pk_wire::fifo::open_inbound;

    let inbound = open_inbound(pipe)
        .with_context(|| format!("opening inbound FIFO {}", pipe.display()))?;
    info!(pipe = %pipe.display(), "listening for agents");

    let summary = CoordinatorBuilder::new(config, FifoConnector)
        .observer(ConsolePrinter)
        .build()?
        .run(inbound)?;
    Ok(summary)
}

#[cfg(not(unix))]
fn run(_config: ParkConfig, _pipe: &Path) -> Result<RunSummary> {
    anyhow::bail!("the FIFO transport needs a Unix platform")
}

fn write_output(dir: &Path, summary: &RunSummary) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let rows = RunRows::from_venue(&summary.venue);

    CsvWriter::new(dir)?.write_run(&rows)?;

    #[cfg(feature = "sqlite")]
    pk_output::SqliteWriter::new(dir)?.write_run(&rows)?;

    println!(
        "Run output written to {} ({} reservations, {} hours)",
        dir.display(),
        rows.reservations.len(),
        rows.occupancy.len()
    );
    Ok(())
}
