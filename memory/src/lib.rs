use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum MemoryError {
    OverCapacity { address: usize, capacity: usize },
    InvalidFrame { frame: usize, frames: usize },
    IncorrectFrameSize { expected: usize, actual: usize },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OverCapacity { address, capacity } => write!(
                f,
                "physical address {} is out of range (memory is {} bytes)",
                address, capacity
            ),
            MemoryError::InvalidFrame { frame, frames } => {
                write!(f, "frame {} does not exist ({} frames)", frame, frames)
            }
            MemoryError::IncorrectFrameSize { expected, actual } => {
                write!(f, "frame data must be {} bytes, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

/// Main memory as a contiguous pool of `frames` frames of `FRAME_SIZE` bytes.
///
/// Byte `offset` of frame `n` lives at physical address `n * FRAME_SIZE + offset`.
#[derive(Clone)]
pub struct PhysicalMemory<const FRAME_SIZE: usize> {
    frames: usize,
    buffer: Box<[u8]>,
}

impl<const FRAME_SIZE: usize> PhysicalMemory<FRAME_SIZE> {
    pub fn new(frames: usize) -> Self {
        Self {
            frames,
            buffer: vec![0; frames * FRAME_SIZE].into_boxed_slice(),
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn check_address(&self, address: usize) -> Result<(), MemoryError> {
        if address >= self.capacity() {
            return Err(MemoryError::OverCapacity {
                address,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn check_frame(&self, frame: usize) -> Result<(), MemoryError> {
        if frame >= self.frames {
            return Err(MemoryError::InvalidFrame {
                frame,
                frames: self.frames,
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, address: usize) -> Result<u8, MemoryError> {
        self.check_address(address)?;
        Ok(self.buffer[address])
    }

    /// Overwrites a whole frame with `data`, which must be exactly one frame long.
    pub fn write_frame(&mut self, frame: usize, data: &[u8]) -> Result<(), MemoryError> {
        self.check_frame(frame)?;
        if data.len() != FRAME_SIZE {
            return Err(MemoryError::IncorrectFrameSize {
                expected: FRAME_SIZE,
                actual: data.len(),
            });
        }
        let start = frame * FRAME_SIZE;
        self.buffer[start..start + FRAME_SIZE].copy_from_slice(data);
        Ok(())
    }

    pub fn frame(&self, frame: usize) -> Result<&[u8], MemoryError> {
        self.check_frame(frame)?;
        let start = frame * FRAME_SIZE;
        Ok(&self.buffer[start..start + FRAME_SIZE])
    }
}

impl<const FRAME_SIZE: usize> fmt::Debug for PhysicalMemory<FRAME_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalMemory")
            .field("frames", &self.frames)
            .field("frame_size", &FRAME_SIZE)
            .finish()
    }
}
