//! Cycle-accurate VR4300 pipeline simulator CLI.
//!
//! This binary provides the command-line entry point. It performs:
//! 1. **ROM run:** Load a raw boot ROM image into the boot window and drive
//!    the CPU for a fixed or unbounded cycle count.
//! 2. **Configuration:** Built-in defaults or a JSON config file.
//! 3. **Diagnostics:** `tracing` subscriber setup and the statistics report
//!    on exit.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use vrsim_core::config::Config;
use vrsim_core::sim::loader;
use vrsim_core::sim::Simulator;
use vrsim_core::soc::MemoryController;

#[derive(Parser, Debug)]
#[command(
    name = "vrsim",
    author,
    version,
    about = "Cycle-accurate VR4300 CPU pipeline simulator",
    long_about = "Boot a raw ROM image on the simulated CPU core.\n\nExamples:\n  vrsim run --rom boot.z64\n  vrsim run --rom boot.z64 --cycles 50000000 --config timing.json\n  vrsim run --rom boot.z64 --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a raw ROM image.
    Run {
        /// ROM image loaded at the boot window.
        #[arg(short, long)]
        rom: PathBuf,

        /// Stop after this many cycles (default: run until a fatal error).
        #[arg(long)]
        cycles: Option<u64>,

        /// JSON configuration file (default: built-in config).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable per-cycle retirement tracing.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            rom,
            cycles,
            config,
            trace,
        } => cmd_run(&rom, cycles, config.as_deref(), trace),
    }
}

/// Loads the ROM, builds the machine, and drives the tick loop.
fn cmd_run(rom: &std::path::Path, cycles: Option<u64>, config: Option<&std::path::Path>, trace: bool) {
    let mut config = match config {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    config.general.trace_instructions |= trace;

    let image = match loader::load_rom_image(rom) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let mut memory = MemoryController::new(&config);
    memory.load_rom(&image);

    let mut sim = Simulator::new(Box::new(memory), &config);

    println!("[*] ROM: {} ({} bytes)", rom.display(), image.len());
    println!(
        "[*] Timing: exception entry {}c, uncached fetch {}c, bus {}c",
        config.timing.exception_entry_latency,
        config.timing.uncached_fetch_latency,
        config.timing.bus_latency
    );

    let result = match cycles {
        Some(n) => sim.run(n),
        None => loop {
            if let Err(e) = sim.tick() {
                break Err(e);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("\n[!] fatal: {e}");
        sim.cpu.regs.dump();
        sim.cpu.stats.print();
        process::exit(1);
    }

    sim.cpu.stats.print();
}

/// Reads and parses a JSON configuration file.
fn load_config(path: &std::path::Path) -> Result<Config, vrsim_core::common::SimError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
