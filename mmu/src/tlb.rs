use crate::page_table::PageTableEntry;

/// Translation-lookaside buffer: a ring of `SIZE` cached page table entries.
///
/// Inserts always overwrite the slot under the cursor and advance it, whether
/// or not the page is already cached. Slots hold copies, so a page evicted
/// from the page table has to be [`Tlb::remove`]d before its frame is reused.
#[derive(Debug, Clone)]
pub struct Tlb<const SIZE: usize> {
    slots: [Option<PageTableEntry>; SIZE],
    cursor: usize,
}

impl<const SIZE: usize> Tlb<SIZE> {
    pub fn new() -> Self {
        Self {
            slots: [None; SIZE],
            cursor: 0,
        }
    }

    /// Slot the next insert will overwrite.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn lookup(&self, page_number: usize) -> Option<&PageTableEntry> {
        self.slots
            .iter()
            .flatten()
            .find(|entry| entry.present && entry.page_number == page_number)
    }

    /// Caches `entry`, returning whatever occupied the slot before.
    pub fn insert(&mut self, entry: PageTableEntry) -> Option<PageTableEntry> {
        let old = self.slots[self.cursor].replace(entry);
        self.cursor = (self.cursor + 1) % SIZE;
        old
    }

    /// Drops every slot caching `page_number`. Returns how many were dropped.
    pub fn remove(&mut self, page_number: usize) -> usize {
        let mut removed = 0;
        for slot in self.slots.iter_mut() {
            if matches!(slot, Some(entry) if entry.page_number == page_number) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageTableEntry> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for Tlb<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
