//! Virtual-to-physical address translation driven by an address stream and
//! checked against an oracle of expected results.

pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod validation;

use std::io::{BufRead, Write};

use log::info;
use mmu::{BackingStore, BackingStoreDisk, Translator};

pub use config::Config;
pub use error::{Artifact, OpenError, SimulationError};
pub use report::Report;

/// Opens the three inputs named by `config` and runs every record through the translator.
///
/// All inputs are opened before the first record is processed, so a missing
/// file never leaves a partial trace behind.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<Report, SimulationError> {
    config.validate()?;
    let addresses = input::open_addresses(&config.addresses, config.count)?;
    let oracle = input::open_oracle(&config.oracle, config.count)?;
    let backing_store = BackingStoreDisk::open(&config.backing_store).map_err(|e| {
        SimulationError::Configuration {
            artifact: Artifact::BackingStore,
            path: config.backing_store.display().to_string(),
            source: OpenError::Disk(e),
        }
    })?;
    run_with(config, addresses, oracle, backing_store, out)
}

/// Same as [`run`], over already opened inputs. The paths in `config` are ignored.
pub fn run_with<A, O, B, W>(
    config: &Config,
    mut addresses: input::AddressReader<A>,
    mut oracle: input::OracleReader<O>,
    backing_store: B,
    out: &mut W,
) -> Result<Report, SimulationError>
where
    A: BufRead,
    O: BufRead,
    B: BackingStore,
    W: Write,
{
    config.validate()?;
    let mut translator = Translator::new(config.frames, config.policy, backing_store)
        .map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;
    let check_physical = config.checks_physical();
    info!(
        "translating {} addresses with {} frames, {} replacement",
        config.count, config.frames, config.policy
    );

    let mut mismatches = Vec::new();
    for index in 0..config.count {
        let expected = oracle.next_record(index)?;
        let logical = addresses.next_address(index)?;

        let translation = translator
            .translate(logical)
            .map_err(|source| SimulationError::Translation { index, source })?;

        let found = validation::check(index, &translation, &expected, check_physical);
        if config.trace {
            report::write_trace(out, index, &translation, found.is_empty())
                .map_err(SimulationError::Output)?;
        }
        mismatches.extend(found);
    }

    let report = Report {
        frames: config.frames,
        policy: config.policy,
        stats: translator.stats(),
        mismatches,
    };
    report.write_summary(out).map_err(SimulationError::Output)?;
    info!(
        "done: {} page faults, {} tlb hits, {} mismatches",
        report.stats.page_faults,
        report.stats.tlb_hits,
        report.mismatches.len()
    );
    Ok(report)
}
