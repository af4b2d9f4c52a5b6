/// Maps one page to the frame holding it.
///
/// `frame_number` is stale whenever `present` is false and must not be read
/// until the page is mapped again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub page_number: usize,
    pub frame_number: usize,
    pub present: bool,
    /// Set on every access, cleared only by the LRU sweep.
    pub used: bool,
}

impl PageTableEntry {
    pub fn new(page_number: usize) -> Self {
        PageTableEntry {
            page_number,
            frame_number: 0,
            present: false,
            used: false,
        }
    }

    pub(super) fn map_to_frame(&mut self, frame_number: usize) {
        self.frame_number = frame_number;
        self.present = true;
        self.used = true;
    }
}
