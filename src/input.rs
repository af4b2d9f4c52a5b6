use std::{
    collections::VecDeque,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use mmu::address::ADDRESS_MASK;

use crate::error::{Artifact, OpenError, SimulationError};

/// Whitespace separated tokens read lazily, line by line.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }
}

fn open(artifact: Artifact, path: &Path) -> Result<BufReader<File>, SimulationError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| SimulationError::Configuration {
            artifact,
            path: path.display().to_string(),
            source: OpenError::Io(e),
        })
}

/// Reads one token of record `index`, failing with `EndOfInput` when the stream is dry.
fn expect_token<R: BufRead>(
    tokens: &mut Tokens<R>,
    artifact: Artifact,
    index: usize,
    expected: usize,
) -> Result<String, SimulationError> {
    tokens
        .next_token()
        .map_err(|source| SimulationError::Read {
            artifact,
            index,
            source,
        })?
        .ok_or(SimulationError::EndOfInput {
            artifact,
            index,
            expected,
        })
}

fn parse_number<T: std::str::FromStr>(
    token: String,
    artifact: Artifact,
    index: usize,
) -> Result<T, SimulationError> {
    token.parse().map_err(|_| SimulationError::Parse {
        artifact,
        index,
        token,
    })
}

/// The logical address stream: one decimal address per record.
pub struct AddressReader<R> {
    tokens: Tokens<R>,
    expected: usize,
}

impl<R: BufRead> AddressReader<R> {
    /// `expected` is the record count the run needs; it is only used in error reports.
    pub fn new(reader: R, expected: usize) -> Self {
        Self {
            tokens: Tokens::new(reader),
            expected,
        }
    }

    /// Next logical address, masked to 16 bits.
    pub fn next_address(&mut self, index: usize) -> Result<u32, SimulationError> {
        let token = expect_token(&mut self.tokens, Artifact::Addresses, index, self.expected)?;
        let address: u64 = parse_number(token, Artifact::Addresses, index)?;
        Ok((address & ADDRESS_MASK as u64) as u32)
    }
}

pub fn open_addresses(
    path: &Path,
    expected: usize,
) -> Result<AddressReader<BufReader<File>>, SimulationError> {
    Ok(AddressReader::new(open(Artifact::Addresses, path)?, expected))
}

/// One line of the oracle: what the translation of the matching address must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleRecord {
    pub virtual_address: u32,
    pub physical_address: u32,
    pub value: i8,
}

/// Tokens per oracle record: `Virtual address: V Physical address: P Value: X`.
const ORACLE_TOKENS: usize = 8;
const VIRTUAL_FIELD: usize = 2;
const PHYSICAL_FIELD: usize = 5;
const VALUE_FIELD: usize = 7;

/// Expected results, read by field position. The label tokens are skipped unchecked.
pub struct OracleReader<R> {
    tokens: Tokens<R>,
    expected: usize,
}

impl<R: BufRead> OracleReader<R> {
    pub fn new(reader: R, expected: usize) -> Self {
        Self {
            tokens: Tokens::new(reader),
            expected,
        }
    }

    pub fn next_record(&mut self, index: usize) -> Result<OracleRecord, SimulationError> {
        let mut fields = Vec::with_capacity(ORACLE_TOKENS);
        for _ in 0..ORACLE_TOKENS {
            fields.push(expect_token(
                &mut self.tokens,
                Artifact::Oracle,
                index,
                self.expected,
            )?);
        }
        let mut take = |i: usize| std::mem::take(&mut fields[i]);

        Ok(OracleRecord {
            virtual_address: parse_number(take(VIRTUAL_FIELD), Artifact::Oracle, index)?,
            physical_address: parse_number(take(PHYSICAL_FIELD), Artifact::Oracle, index)?,
            value: parse_number(take(VALUE_FIELD), Artifact::Oracle, index)?,
        })
    }
}

pub fn open_oracle(
    path: &Path,
    expected: usize,
) -> Result<OracleReader<BufReader<File>>, SimulationError> {
    Ok(OracleReader::new(open(Artifact::Oracle, path)?, expected))
}
