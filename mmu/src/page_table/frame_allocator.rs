/// Hands out frames in order 0, 1, 2, ... until every frame has been used once.
///
/// The cursor keeps cycling after that through [`FrameAllocator::rotate`], which
/// is how FIFO replacement picks the frame to reclaim.
#[derive(Debug, Clone)]
pub struct FrameAllocator {
    frames: usize,
    cursor: usize,
    full: bool,
}

impl FrameAllocator {
    pub fn new(frames: usize) -> Self {
        Self {
            frames,
            cursor: 0,
            full: frames == 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// How many distinct frames have been handed out so far.
    pub fn used(&self) -> usize {
        if self.full {
            self.frames
        } else {
            self.cursor
        }
    }

    /// Next never-used frame, or `None` once the pool is exhausted.
    pub fn allocate(&mut self) -> Option<usize> {
        if self.full {
            return None;
        }
        let frame = self.cursor;
        self.cursor += 1;
        if self.cursor == self.frames {
            self.full = true;
        }
        Some(frame)
    }

    /// Advances the cursor, wrapping to 0 when it has passed the last frame.
    pub fn rotate(&mut self) -> usize {
        if self.cursor >= self.frames {
            self.cursor = 0;
        }
        let frame = self.cursor;
        self.cursor += 1;
        frame
    }
}
