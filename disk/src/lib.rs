use std::{
    fmt,
    fs::File,
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::{trace, warn};

#[derive(Debug)]
pub enum DiskError {
    IncorrectBlockSize { expected: usize, actual: usize },
    OverCapacity { block_number: usize, blocks: usize },
    /// The image holds fewer bytes than `CAPACITY`
    ShortImage { expected: u64, actual: u64 },
    Io(std::io::Error),
}

impl fmt::Display for DiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskError::IncorrectBlockSize { expected, actual } => {
                write!(f, "block must be {} bytes, got {}", expected, actual)
            }
            DiskError::OverCapacity {
                block_number,
                blocks,
            } => write!(
                f,
                "block {} is out of range (disk has {} blocks)",
                block_number, blocks
            ),
            DiskError::ShortImage { expected, actual } => write!(
                f,
                "disk image is {} bytes but {} are required",
                actual, expected
            ),
            DiskError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiskError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DiskError {
    fn from(e: std::io::Error) -> Self {
        DiskError::Io(e)
    }
}

/// A flat, headerless disk image addressed in `BLOCKSIZE` blocks.
///
/// Block `n` lives at byte offset `n * BLOCKSIZE`. The image must hold at
/// least `CAPACITY` bytes; anything after that is ignored.
#[derive(Debug)]
pub struct Disk<const BLOCKSIZE: usize, const CAPACITY: usize> {
    path: PathBuf,
    file: File,
}

impl<const BLOCKSIZE: usize, const CAPACITY: usize> Disk<BLOCKSIZE, CAPACITY> {
    /// Creates a zero-filled image of exactly `CAPACITY` bytes, truncating any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, DiskError> {
        assert_eq!(
            CAPACITY % BLOCKSIZE,
            0,
            "Capacity must be a multiply of BlockSize"
        );
        let file = File::options()
            .truncate(true)
            .write(true)
            .read(true)
            .create(true)
            .open(path.as_ref())?;
        file.set_len(CAPACITY as u64)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    /// Opens an existing image for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DiskError> {
        assert_eq!(
            CAPACITY % BLOCKSIZE,
            0,
            "Capacity must be a multiply of BlockSize"
        );
        let file = File::options().read(true).open(path.as_ref())?;
        let len = file.metadata()?.len();
        if len < CAPACITY as u64 {
            return Err(DiskError::ShortImage {
                expected: CAPACITY as u64,
                actual: len,
            });
        }
        if len > CAPACITY as u64 {
            warn!(
                "{} is {} bytes, only the first {} are used",
                path.as_ref().display(),
                len,
                CAPACITY
            );
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    pub const fn block_count() -> usize {
        CAPACITY / BLOCKSIZE
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_block(block_number: usize) -> Result<(), DiskError> {
        if block_number >= Self::block_count() {
            return Err(DiskError::OverCapacity {
                block_number,
                blocks: Self::block_count(),
            });
        }
        Ok(())
    }

    pub fn read_block(&mut self, block_number: usize) -> Result<Box<[u8; BLOCKSIZE]>, DiskError> {
        Self::check_block(block_number)?;
        trace!("reading block[{}]", block_number);
        self.file
            .seek(SeekFrom::Start((block_number * BLOCKSIZE) as u64))?;
        let mut buf = Box::new([0; BLOCKSIZE]);
        self.file.read_exact(&mut *buf)?;
        Ok(buf)
    }

    pub fn write_block(&mut self, block_number: usize, block: &[u8]) -> Result<(), DiskError> {
        if block.len() != BLOCKSIZE {
            return Err(DiskError::IncorrectBlockSize {
                expected: BLOCKSIZE,
                actual: block.len(),
            });
        }
        Self::check_block(block_number)?;
        trace!("writing block[{}]", block_number);
        self.file
            .seek(SeekFrom::Start((block_number * BLOCKSIZE) as u64))?;
        self.file.write_all(block)?;
        Ok(())
    }
}
