use std::path::PathBuf;

use mmu::{ReplacementPolicy, DEFAULT_FRAMES, PAGE_TABLE_SIZE};

use crate::error::SimulationError;

pub const DEFAULT_ADDRESSES: &str = "addresses.txt";
pub const DEFAULT_ORACLE: &str = "correct.txt";
pub const DEFAULT_BACKING_STORE: &str = "BACKING_STORE.bin";
pub const DEFAULT_COUNT: usize = 1000;

/// Everything a run needs, fixed before the first address is translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addresses: PathBuf,
    pub oracle: PathBuf,
    pub backing_store: PathBuf,
    pub frames: usize,
    pub policy: ReplacementPolicy,
    /// Number of records to process; both input streams must hold at least this many.
    pub count: usize,
    /// Print one trace line per translated address.
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addresses: PathBuf::from(DEFAULT_ADDRESSES),
            oracle: PathBuf::from(DEFAULT_ORACLE),
            backing_store: PathBuf::from(DEFAULT_BACKING_STORE),
            frames: DEFAULT_FRAMES,
            policy: ReplacementPolicy::Fifo,
            count: DEFAULT_COUNT,
            trace: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.frames == 0 || self.frames > PAGE_TABLE_SIZE {
            return Err(SimulationError::InvalidConfig(format!(
                "frames must be between 1 and {}, got {}",
                PAGE_TABLE_SIZE, self.frames
            )));
        }
        if self.count == 0 {
            return Err(SimulationError::InvalidConfig(
                "count must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// The oracle's physical addresses assume one frame per page, so they
    /// only hold when replacement can never happen.
    pub fn checks_physical(&self) -> bool {
        self.frames == PAGE_TABLE_SIZE
    }
}
