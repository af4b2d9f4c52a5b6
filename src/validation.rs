use std::fmt;

use log::warn;
use mmu::Translation;

use crate::input::OracleRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    VirtualAddress,
    PhysicalAddress,
    Value,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::VirtualAddress => "virtual address",
            Field::PhysicalAddress => "physical address",
            Field::Value => "value",
        })
    }
}

/// A translation that disagrees with the oracle. Recorded, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub index: usize,
    pub field: Field,
    pub expected: i64,
    pub actual: i64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record #{}: {} expected {}, got {}",
            self.index, self.field, self.expected, self.actual
        )
    }
}

/// Compares a translation against its oracle record.
///
/// Physical addresses are compared only when `check_physical` is set.
pub fn check(
    index: usize,
    translation: &Translation,
    record: &OracleRecord,
    check_physical: bool,
) -> Vec<Mismatch> {
    let mut candidates = vec![
        (
            Field::VirtualAddress,
            record.virtual_address as i64,
            translation.logical as i64,
        ),
        (Field::Value, record.value as i64, translation.value as i64),
    ];
    if check_physical {
        candidates.push((
            Field::PhysicalAddress,
            record.physical_address as i64,
            translation.physical as i64,
        ));
    }

    candidates
        .into_iter()
        .filter(|(_, expected, actual)| expected != actual)
        .map(|(field, expected, actual)| {
            let mismatch = Mismatch {
                index,
                field,
                expected,
                actual,
            };
            warn!("{}", mismatch);
            mismatch
        })
        .collect()
}
