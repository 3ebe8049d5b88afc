//! # Concentrator Network Planner Binary
//!
//! Prints the layer geometry and buffer overhead of concentrator networks.
//!
//! # Usage
//!
//! ```bash
//! # Density network for a 64 GiB, 64 processor machine
//! cnet_planner density --heap "64 GiB" --processors 64
//!
//! # Fixed buffers of 8 KiB, as JSON for a renderer
//! cnet_planner --emit json fixed --heap 16GiB --processors 16 --buf-bytes 8KiB
//!
//! # Everything from a plan file
//! cnet_planner plan plans/density_64g.toml
//!
//! # Machine-size sweep and overhead grid, with debug logs on stderr
//! cnet_planner -v sweep --steps 6
//! cnet_planner grid
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use cnet_common::bytes::ByteQuantity;
use cnet_common::config::{ConfigLoader, LogLevel};
use cnet_common::consts::{
    DEFAULT_WORD_BYTES, DENSITY_DEFAULT_FAN_IN, DENSITY_DEFAULT_FAN_OUT,
    DENSITY_DEFAULT_MARK_REGION, DENSITY_DEFAULT_ONE_BIT_PER_N_BYTES, FIXED_DEFAULT_BUF_BYTES,
    FIXED_DEFAULT_FAN_IN, FIXED_DEFAULT_FAN_OUT,
};
use cnet_common::system::Config;
use cnet_planner::{
    build_network, render_report, DensityParams, FixedBufParams, Network,
    NetworkSnapshot, OverheadGrid, PlanFile, Strategy, Sweep,
};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Concentrator network planner - buffer sizing for parallel marking
#[derive(Parser, Debug)]
#[command(name = "cnet_planner")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Size concentrator networks and report their buffer overhead")]
#[command(long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Output format of single-network commands
    #[arg(long, global = true, value_enum, default_value_t = Emit::Text)]
    emit: Emit,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Same buffer size at every layer, 2^16-word mark regions
    Fixed {
        #[command(flatten)]
        system: SystemArgs,

        /// Heap fan-out per layer
        #[arg(long, default_value_t = FIXED_DEFAULT_FAN_OUT)]
        fan_out: u64,

        /// Processor fan-in per layer
        #[arg(long, default_value_t = FIXED_DEFAULT_FAN_IN)]
        fan_in: u64,

        /// Capacity of every buffer
        #[arg(long, default_value_t = FIXED_DEFAULT_BUF_BYTES)]
        buf_bytes: ByteQuantity,
    },

    /// Buffer size derived from a target dartboard density
    Density {
        #[command(flatten)]
        system: SystemArgs,

        /// One set dartboard bit per this many heap bytes
        #[arg(long, default_value_t = DENSITY_DEFAULT_ONE_BIT_PER_N_BYTES)]
        one_bit_per_n_bytes: u64,

        /// Heap span of one leaf buffer
        #[arg(long, default_value_t = DENSITY_DEFAULT_MARK_REGION)]
        mark_region: ByteQuantity,

        /// Heap fan-out per layer
        #[arg(long, default_value_t = DENSITY_DEFAULT_FAN_OUT)]
        fan_out: u64,

        /// Processor fan-in per layer
        #[arg(long, default_value_t = DENSITY_DEFAULT_FAN_IN)]
        fan_in: u64,
    },

    /// Build the network described by a TOML plan file
    Plan {
        /// Path to the plan file
        file: PathBuf,
    },

    /// Both strategies for 1, 2, 4, ... processors with 1 GiB each
    Sweep {
        /// Number of machine sizes
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=24))]
        steps: u32,
    },

    /// Density network overhead over heap sizes and processor counts
    Grid {
        /// Number of heap sizes, starting at 64 MiB and growing by 4x
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=16))]
        heaps: u32,

        /// Number of processor counts, starting at 1 and doubling
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=24))]
        procs: u32,
    },
}

/// The machine being sized.
#[derive(ClapArgs, Debug)]
struct SystemArgs {
    /// Total heap size, e.g. "64 GiB" or 68719476736
    #[arg(long)]
    heap: ByteQuantity,

    /// Number of processors
    #[arg(short, long)]
    processors: u64,

    /// Heap word size
    #[arg(long, default_value_t = DEFAULT_WORD_BYTES)]
    word_bytes: ByteQuantity,
}

impl SystemArgs {
    fn to_config(&self) -> Result<Config, cnet_common::error::ModelError> {
        Config::with_word_bytes(self.heap, self.processors, self.word_bytes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Human-readable report
    Text,
    /// Pretty-printed JSON snapshot
    Json,
}

fn main() {
    if let Err(e) = run() {
        error!("FATAL: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The plan's log level applies unless -v overrides it.
    let plan = match &args.command {
        Command::Plan { file } => Some(PlanFile::load(file)),
        _ => None,
    };
    let file_level = plan
        .as_ref()
        .and_then(|p| p.as_ref().ok())
        .map(|p| p.shared.log_level);

    setup_tracing(&args, file_level);

    info!("Concentrator network planner v{}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Fixed {
            system,
            fan_out,
            fan_in,
            buf_bytes,
        } => {
            let strategy = Strategy::Fixed(FixedBufParams {
                fan_out: *fan_out,
                fan_in: *fan_in,
                buf_bytes: *buf_bytes,
            });
            let network = build_network(system.to_config()?, strategy)?;
            emit(&network, args.emit)?;
        }
        Command::Density {
            system,
            one_bit_per_n_bytes,
            mark_region,
            fan_out,
            fan_in,
        } => {
            let strategy = Strategy::Density(DensityParams {
                one_bit_per_n_bytes: *one_bit_per_n_bytes,
                mark_region: *mark_region,
                fan_out: *fan_out,
                fan_in: *fan_in,
            });
            let network = build_network(system.to_config()?, strategy)?;
            emit(&network, args.emit)?;
        }
        Command::Plan { file } => {
            info!("Loading plan from {}", file.display());
            let plan = match plan {
                Some(loaded) => loaded?,
                None => PlanFile::load(file)?,
            };
            let network = plan.build()?;
            if args.emit == Emit::Text {
                println!("# {}", plan.shared.service_name);
            }
            emit(&network, args.emit)?;
        }
        Command::Sweep { steps } => {
            print!("{}", Sweep::compute(*steps as usize)?);
        }
        Command::Grid { heaps, procs } => {
            let grid = OverheadGrid::standard(*heaps as usize, *procs as usize)?;
            print!("{grid}");
        }
    }

    Ok(())
}

fn emit(network: &Network, format: Emit) -> Result<(), serde_json::Error> {
    match format {
        Emit::Text => print!("{}", render_report(network)),
        Emit::Json => println!("{}", NetworkSnapshot::from(network).to_json()?),
    }
    Ok(())
}

fn setup_tracing(args: &Args, file_level: Option<LogLevel>) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        file_level.map(Level::from).unwrap_or(Level::INFO)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
