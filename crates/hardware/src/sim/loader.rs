//! Hex image loaders.
//!
//! Both input formats are one 32-bit hexadecimal word per line, addressed by
//! line number from zero; unlisted addresses stay zero. Lines that fail to
//! parse are skipped with a warning, and loading stops silently once the
//! target memory is full.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::common::constants::MAIN_MEM_WORDS;
use crate::common::{Result, SimError};
use crate::soc::memory::MainMemory;

/// Parses one image line; `None` for blank or malformed lines.
fn parse_line(line: &str, lineno: usize, path: &Path) -> Option<u32> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }
    match u32::from_str_radix(text, 16) {
        Ok(word) => Some(word),
        Err(_) => {
            warn!(
                path = %path.display(),
                lineno,
                "skipping malformed image line {text:?}"
            );
            None
        }
    }
}

/// Loads an instruction memory image into `imem` (up to its length).
pub fn load_imem(path: &Path, imem: &mut [u32]) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
    let mut loaded = 0usize;
    for (lineno, line) in text.lines().enumerate() {
        if loaded >= imem.len() {
            break;
        }
        if let Some(word) = parse_line(line, lineno, path) {
            imem[loaded] = word;
            loaded += 1;
        }
    }
    info!(path = %path.display(), words = loaded, "loaded instruction memory");
    Ok(())
}

/// Loads the main memory image.
pub fn load_memin(path: &Path, memory: &mut MainMemory) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
    let mut loaded = 0usize;
    for (lineno, line) in text.lines().enumerate() {
        if loaded >= MAIN_MEM_WORDS {
            break;
        }
        if let Some(word) = parse_line(line, lineno, path) {
            memory.write_word(loaded as u32, word);
            loaded += 1;
        }
    }
    info!(path = %path.display(), words = loaded, "loaded main memory");
    Ok(())
}
