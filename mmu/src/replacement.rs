use std::{fmt, str::FromStr};

use crate::page_table::{FrameAllocator, PageTable};

/// Victim selection strategy, chosen once before translation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacementPolicy {
    /// Reclaim frames in allocation order by wrapping the frame cursor.
    #[default]
    Fifo,
    /// Reclaim the frame of a page whose used bit is clear (clock approximation).
    Lru,
}

/// Frame to reuse, and the resident page that has to give it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub frame: usize,
    pub victim: Option<usize>,
}

impl ReplacementPolicy {
    /// Picks the frame for a faulting page once every frame has been handed out.
    ///
    /// Only chooses; the caller evicts the victim. Returns `None` when LRU
    /// finds no resident page at all.
    pub fn select<const ENTRIES: usize>(
        &self,
        page_table: &mut PageTable<ENTRIES>,
        frames: &mut FrameAllocator,
    ) -> Option<Eviction> {
        match self {
            ReplacementPolicy::Fifo => {
                let frame = frames.rotate();
                Some(Eviction {
                    frame,
                    victim: page_table.find_by_frame(frame),
                })
            }
            ReplacementPolicy::Lru => {
                let victim = page_table.find_victim_lru()?;
                let frame = page_table.frame_of(victim)?;
                Some(Eviction {
                    frame,
                    victim: Some(victim),
                })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplacementPolicy::Fifo => "fifo",
            ReplacementPolicy::Lru => "lru",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(ReplacementPolicy::Fifo),
            "lru" => Ok(ReplacementPolicy::Lru),
            other => Err(format!("unknown replacement policy '{}'", other)),
        }
    }
}
