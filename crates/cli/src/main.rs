//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory-access trace through a cache hierarchy. It performs:
//! 1. **Configuration:** Load the JSON hierarchy description and build every level.
//! 2. **Simulation:** Stream the trace through the reader/walker pipeline (or sequentially).
//! 3. **Reporting:** Print per-level hits/misses and main-memory accesses as JSON on stdout.
//!
//! Diagnostics go to stderr via `tracing`; set `RUST_LOG` or pass `-v` for more.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cachesim_core::config::{HierarchyConfig, SimulatorConfig};
use cachesim_core::{HierarchyStats, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven multi-level cache simulator",
    long_about = "Replay a memory-access trace through a cache hierarchy described in JSON.\n\nTrace lines are `<pc-hex> <address-hex> <kind> <size>`.\n\nExamples:\n  cachesim config.json trace.out\n  cachesim --sequential -vv config.json trace.out"
)]
struct Cli {
    /// JSON hierarchy description (`{"caches": [...]}`).
    config: PathBuf,

    /// Memory-access trace to replay.
    trace: PathBuf,

    /// Records the trace reader may run ahead of the simulator.
    #[arg(long)]
    queue_depth: Option<usize>,

    /// Parse and simulate on one thread instead of the two-stage pipeline.
    #[arg(long)]
    sequential: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(stats) => match stats.to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize statistics: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the configuration, builds the hierarchy and replays the trace.
fn run(cli: &Cli) -> Result<HierarchyStats, cachesim_core::SimError> {
    let hierarchy = HierarchyConfig::from_file(&cli.config)?;
    let mut settings = SimulatorConfig::default();
    if let Some(depth) = cli.queue_depth {
        settings.queue_depth = depth;
    }

    let mut sim = Simulator::from_config(&hierarchy, settings)?;
    tracing::info!(
        config = %cli.config.display(),
        trace = %cli.trace.display(),
        levels = sim.hierarchy().caches().len(),
        "simulating"
    );
    sim.run_file(&cli.trace, !cli.sequential)
}
