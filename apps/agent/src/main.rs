//! agent — submits a file of family reservations to the park controller.
//!
//! ```text
//! agent -s a1 -a requests.csv -p pipe_controller
//! ```
//!
//! The reply FIFO is `pipe_resp_<name>` in the working directory; run the
//! agent from the same directory as the controller.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pk_agent::{SessionSummary, load_requests};

#[derive(Parser)]
#[command(name = "agent")]
#[command(about = "Reservation agent for the park admission controller")]
struct Cli {
    /// Agent name
    #[arg(short = 's', long = "name")]
    name: String,

    /// Request file: headerless CSV rows of family,hour,people
    #[arg(short = 'a', long = "requests")]
    requests: PathBuf,

    /// Controller's inbound FIFO
    #[arg(short = 'p', long = "pipe")]
    pipe: PathBuf,

    /// Milliseconds to wait after each response
    #[arg(long, default_value_t = pk_agent::DEFAULT_PAUSE.as_millis() as u64)]
    pause_ms: u64,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let requests = load_requests(&cli.requests)
        .with_context(|| format!("loading {}", cli.requests.display()))?;
    println!("Agent {}: loaded {} requests", cli.name, requests.len());

    let summary = run(&cli, &requests)?;

    for response in &summary.responses {
        let outcome = response.outcome.map_or(0, |o| o.code());
        let assigned = response.assigned_hour.map_or(-1, |h| h.0);
        println!(
            "Agent {}: family {} -> requested hour={}, people={}, code={}, assigned hour={}",
            cli.name, response.family, response.hour, response.people, outcome, assigned
        );
    }
    println!(
        "Agent {} finished: {} sent, {} skipped{}",
        cli.name,
        summary.sent(),
        summary.skipped,
        if summary.shut_down { ", stopped by controller shutdown" } else { "" }
    );
    Ok(())
}

#[cfg(unix)]
fn run(cli: &Cli, requests: &[pk_agent::ParkRequest]) -> Result<SessionSummary> {
    use std::path::Path;

    use pk_agent::{AgentSession, reply_channel_name};
    use pk_wire::fifo::ensure_fifo;
    use pk_wire::{FifoSink, FifoSource};
    use tracing::info;

    let channel = reply_channel_name(&cli.name);
    let reply_path = Path::new(&channel);
    ensure_fifo(reply_path).with_context(|| format!("creating reply FIFO {channel}"))?;

    let outbound = FifoSink::open(&cli.pipe)
        .with_context(|| format!("opening controller FIFO {}", cli.pipe.display()))?;
    info!(pipe = %cli.pipe.display(), reply = %channel, "registering with controller");

    let mut session = AgentSession::register(&cli.name, &channel, outbound, || {
        Ok(FifoSource::open(reply_path)?)
    })?
    .with_pause(Duration::from_millis(cli.pause_ms));
    if session.is_closed() {
        println!("Agent {}: the park is already closed", cli.name);
    } else {
        println!("Agent {} registered. Current simulated hour: {}", cli.name, session.registered_hour());
    }

    Ok(session.run(requests)?)
}

#[cfg(not(unix))]
fn run(_cli: &Cli, _requests: &[pk_agent::ParkRequest]) -> Result<SessionSummary> {
    anyhow::bail!("the FIFO transport needs a Unix platform")
}
