//! Multicore simulator CLI.
//!
//! One entry point: load the four instruction images and the main memory
//! image, run the machine to completion (or the safety ceiling), and write
//! every dump. Accepts the three positional-path forms — no paths for the
//! conventional names, five paths naming the inputs, or all 27 paths — plus
//! a JSON file-set alternative. Exits 0 on success and 1 on any I/O failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quadsim_core::common::constants::{DEFAULT_MAX_CYCLES, NUM_CORES};
use quadsim_core::common::Result;
use quadsim_core::sim::{loader, output};
use quadsim_core::{FileSet, SimConfig, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "quadsim",
    version,
    about = "Cycle-accurate quad-core MESI simulator",
    long_about = "Run four hex instruction images against a shared memory image.\n\n\
        File arguments: none (conventional names in the working directory),\n\
        five (imem0..imem3 memin), or all 27 (inputs followed by every output\n\
        path: memout regout0..3 core0..3trace bustrace dsram0..3 tsram0..3\n\
        stats0..3)."
)]
struct Cli {
    /// Input and output paths: none, five, or 27 of them.
    files: Vec<String>,

    /// Load the file set from a JSON object instead of positional paths.
    #[arg(long, conflicts_with = "files")]
    file_set: Option<PathBuf>,

    /// Abort a run that has not drained by this many cycles.
    #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
    max_cycles: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quadsim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let files = match &cli.file_set {
        Some(path) => FileSet::from_json_file(path)?,
        None => FileSet::from_args(&cli.files)?,
    };

    let mut sim = Simulator::new();
    for i in 0..NUM_CORES {
        loader::load_imem(&files.imem[i], &mut sim.cores[i].imem)?;
    }
    loader::load_memin(&files.memin, &mut sim.memory)?;

    let config = SimConfig {
        max_cycles: cli.max_cycles,
    };
    let completed = sim.run(&config);
    if !completed {
        eprintln!(
            "quadsim: warning: stopped after {} cycles without draining",
            sim.cycle
        );
    }

    output::write_all(&files, &sim)?;

    for core in &sim.cores {
        info!(
            core = core.id,
            cycles = core.stats.cycles,
            instructions = core.stats.instructions,
            "core finished"
        );
    }
    Ok(())
}
