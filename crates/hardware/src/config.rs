//! Run configuration.
//!
//! Two small structures parameterize a run:
//! 1. **[`FileSet`]:** The 27 input and output paths. Built from the
//!    positional argument forms (none / five inputs / all 27), deserialized
//!    from JSON, or defaulted to conventional names in the working directory.
//! 2. **[`SimConfig`]:** Everything else — currently the safety ceiling.
//!
//! Machine geometry is architectural, not configurable; it lives in
//! [`crate::common::constants`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::constants::{DEFAULT_MAX_CYCLES, NUM_CORES};
use crate::common::{Result, SimError};

/// Count of positional paths naming only the inputs.
const INPUT_ARGS: usize = NUM_CORES + 1;
/// Count of positional paths naming every input and output.
const ALL_ARGS: usize = 27;

/// The input and output files of one run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSet {
    /// Instruction memory image, one per core.
    pub imem: [PathBuf; NUM_CORES],
    /// Main memory input image.
    pub memin: PathBuf,
    /// Main memory dump.
    pub memout: PathBuf,
    /// Register dump, one per core.
    pub regout: [PathBuf; NUM_CORES],
    /// Execution trace, one per core.
    pub core_trace: [PathBuf; NUM_CORES],
    /// Bus trace.
    pub bus_trace: PathBuf,
    /// Cache data-array dump, one per core.
    pub dsram: [PathBuf; NUM_CORES],
    /// Cache tag-array dump, one per core.
    pub tsram: [PathBuf; NUM_CORES],
    /// Statistics file, one per core.
    pub stats: [PathBuf; NUM_CORES],
}

fn per_core(stem: &str, suffix: &str) -> [PathBuf; NUM_CORES] {
    std::array::from_fn(|i| PathBuf::from(format!("{stem}{i}{suffix}.txt")))
}

impl Default for FileSet {
    /// Conventional file names in the working directory.
    fn default() -> Self {
        Self {
            imem: per_core("imem", ""),
            memin: PathBuf::from("memin.txt"),
            memout: PathBuf::from("memout.txt"),
            regout: per_core("regout", ""),
            core_trace: per_core("core", "trace"),
            bus_trace: PathBuf::from("bustrace.txt"),
            dsram: per_core("dsram", ""),
            tsram: per_core("tsram", ""),
            stats: per_core("stats", ""),
        }
    }
}

impl FileSet {
    /// Builds a file set from the positional argument list: empty for the
    /// defaults, five paths to name the inputs, or all 27 paths in input
    /// order (`imem0..3 memin memout regout0..3 core0..3trace bustrace
    /// dsram0..3 tsram0..3 stats0..3`).
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut set = Self::default();
        match args.len() {
            0 => {}
            INPUT_ARGS => {
                for i in 0..NUM_CORES {
                    set.imem[i] = PathBuf::from(&args[i]);
                }
                set.memin = PathBuf::from(&args[NUM_CORES]);
            }
            ALL_ARGS => {
                let mut it = args.iter().map(PathBuf::from);
                let mut next = || it.next().unwrap_or_default();
                for i in 0..NUM_CORES {
                    set.imem[i] = next();
                }
                set.memin = next();
                set.memout = next();
                for i in 0..NUM_CORES {
                    set.regout[i] = next();
                }
                for i in 0..NUM_CORES {
                    set.core_trace[i] = next();
                }
                set.bus_trace = next();
                for i in 0..NUM_CORES {
                    set.dsram[i] = next();
                }
                for i in 0..NUM_CORES {
                    set.tsram[i] = next();
                }
                for i in 0..NUM_CORES {
                    set.stats[i] = next();
                }
            }
            n => return Err(SimError::InvalidArgs(n)),
        }
        Ok(set)
    }

    /// Loads a file set from a JSON object; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| SimError::Config(e.to_string()))
    }
}

/// Knobs of the simulation loop itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Global cycle ceiling for runaway programs.
    pub max_cycles: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}
