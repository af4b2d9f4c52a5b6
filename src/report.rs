use std::io::{self, Write};

use mmu::{ReplacementPolicy, Stats, Translation};

use crate::validation::Mismatch;

/// Records per block of trace output.
const TRACE_GROUP: usize = 5;

pub fn write_trace<W: Write>(
    out: &mut W,
    index: usize,
    translation: &Translation,
    passed: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "logical: {:5} (page:{:3}, offset:{:3}) ---> physical: {:5} (frame: {:3})---> value: {:4} -- {}",
        translation.logical,
        translation.page,
        translation.offset,
        translation.physical,
        translation.frame,
        translation.value,
        if passed { "passed" } else { "FAILED" }
    )?;
    if index % TRACE_GROUP == TRACE_GROUP - 1 {
        writeln!(out)?;
    }
    Ok(())
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct Report {
    pub frames: usize,
    pub policy: ReplacementPolicy,
    pub stats: Stats,
    pub mismatches: Vec<Mismatch>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "frames: {}, policy: {}", self.frames, self.policy)?;
        writeln!(out, "Page Fault: {:1.3}%", self.stats.page_fault_rate())?;
        writeln!(out, "TLB Hit: {:1.3}%", self.stats.tlb_hit_rate())?;
        writeln!(out)?;
        if self.passed() {
            writeln!(out, "ALL logical ---> physical assertions PASSED!")?;
        } else {
            writeln!(
                out,
                "{} logical ---> physical assertions FAILED:",
                self.mismatches.len()
            )?;
            for mismatch in &self.mismatches {
                writeln!(out, "  {}", mismatch)?;
            }
        }
        Ok(())
    }
}
