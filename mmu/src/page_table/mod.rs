mod frame_allocator;
mod page_table_entry;

pub use frame_allocator::FrameAllocator;
pub use page_table_entry::PageTableEntry;

/// This table maps every page of the logical address space to its frame in physical memory.
/// Each entry represents a map from page ---> frame, valid only while the page is present.
#[derive(Debug, Clone)]
pub struct PageTable<const ENTRIES: usize> {
    entries: Vec<PageTableEntry>,
}

impl<const ENTRIES: usize> PageTable<ENTRIES> {
    pub fn init() -> Self {
        let entries = (0..ENTRIES).map(PageTableEntry::new).collect();
        Self { entries }
    }

    pub fn entry(&self, page_number: usize) -> &PageTableEntry {
        &self.entries[page_number]
    }

    pub fn is_resident(&self, page_number: usize) -> bool {
        self.entries[page_number].present
    }

    /// Frame holding `page_number`, if the page is resident.
    pub fn frame_of(&self, page_number: usize) -> Option<usize> {
        let entry = &self.entries[page_number];
        entry.present.then_some(entry.frame_number)
    }

    pub fn map_and_mark(&mut self, page_number: usize, frame_number: usize) {
        self.entries[page_number].map_to_frame(frame_number);
    }

    pub fn mark_used(&mut self, page_number: usize) {
        self.entries[page_number].used = true;
    }

    pub fn evict(&mut self, page_number: usize) {
        self.entries[page_number].present = false;
    }

    /// Resident page owning `frame_number`.
    pub fn find_by_frame(&self, frame_number: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.present && entry.frame_number == frame_number)
            .map(|entry| entry.page_number)
    }

    /// Clock approximation of LRU: the first resident page whose used bit is
    /// clear. When every resident page has been used, all used bits are
    /// cleared and the scan runs once more.
    pub fn find_victim_lru(&mut self) -> Option<usize> {
        if let Some(page_number) = self.first_unused_resident() {
            return Some(page_number);
        }
        for entry in self.entries.iter_mut() {
            entry.used = false;
        }
        self.first_unused_resident()
    }

    fn first_unused_resident(&self) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.present && !entry.used)
            .map(|entry| entry.page_number)
    }

    pub fn resident_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.present).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageTableEntry> {
        self.entries.iter()
    }
}
