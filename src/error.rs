use std::{fmt, io};

use disk::DiskError;
use mmu::TranslationError;

/// The three input files of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Addresses,
    Oracle,
    BackingStore,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Artifact::Addresses => "address stream",
            Artifact::Oracle => "oracle",
            Artifact::BackingStore => "backing store",
        })
    }
}

#[derive(Debug)]
pub enum OpenError {
    Io(io::Error),
    Disk(DiskError),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::Io(e) => write!(f, "{}", e),
            OpenError::Disk(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenError::Io(e) => e.source(),
            OpenError::Disk(e) => e.source(),
        }
    }
}

#[derive(Debug)]
pub enum SimulationError {
    /// An input could not be opened. Raised before any record is processed.
    Configuration {
        artifact: Artifact,
        path: String,
        source: OpenError,
    },
    InvalidConfig(String),
    /// An input stream ran out before `expected` records were read.
    EndOfInput {
        artifact: Artifact,
        index: usize,
        expected: usize,
    },
    Parse {
        artifact: Artifact,
        index: usize,
        token: String,
    },
    Read {
        artifact: Artifact,
        index: usize,
        source: io::Error,
    },
    Translation {
        index: usize,
        source: TranslationError,
    },
    Output(io::Error),
}

impl SimulationError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SimulationError::Configuration { artifact, .. } => match artifact {
                Artifact::Addresses => 2,
                Artifact::Oracle => 3,
                Artifact::BackingStore => 4,
            },
            SimulationError::EndOfInput { .. }
            | SimulationError::Parse { .. }
            | SimulationError::Read { .. } => 5,
            SimulationError::InvalidConfig(_) => 64,
            SimulationError::Translation { .. } => 70,
            SimulationError::Output(_) => 74,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Configuration { artifact, path, .. } => {
                write!(f, "could not open {} '{}'", artifact, path)
            }
            SimulationError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            SimulationError::EndOfInput {
                artifact,
                index,
                expected,
            } => write!(
                f,
                "insufficient input: {} ended at record #{} of {}",
                artifact, index, expected
            ),
            SimulationError::Parse {
                artifact,
                index,
                token,
            } => write!(
                f,
                "{} record #{}: expected a number, found '{}'",
                artifact, index, token
            ),
            SimulationError::Read {
                artifact, index, ..
            } => write!(f, "failed reading {} at record #{}", artifact, index),
            SimulationError::Translation { index, .. } => {
                write!(f, "translation of record #{} failed", index)
            }
            SimulationError::Output(_) => write!(f, "failed writing output"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Configuration { source, .. } => Some(source),
            SimulationError::Read { source, .. } => Some(source),
            SimulationError::Translation { source, .. } => Some(source),
            SimulationError::Output(e) => Some(e),
            _ => None,
        }
    }
}
