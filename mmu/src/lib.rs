//! Paging memory-management unit: splits logical addresses, caches
//! translations in a TLB, tracks residency in a page table and loads pages
//! from a backing store into a bounded pool of frames on demand.

pub mod address;
pub mod page_table;
pub mod replacement;
pub mod stats;
pub mod tlb;
pub mod translator;

pub use page_table::{FrameAllocator, PageTable, PageTableEntry};
pub use replacement::{Eviction, ReplacementPolicy};
pub use stats::Stats;
pub use tlb::Tlb;
pub use translator::{BackingStore, Outcome, Translation, TranslationError, Translator};

/// Bytes per page, and per frame.
pub const FRAME_SIZE: usize = 256;
/// One entry per page number a 16-bit address can name.
pub const PAGE_TABLE_SIZE: usize = 256;
pub const TLB_SIZE: usize = 16;
pub const BACKING_STORE_SIZE: usize = PAGE_TABLE_SIZE * FRAME_SIZE;
pub const DEFAULT_FRAMES: usize = 128;

pub type BackingStoreDisk = disk::Disk<FRAME_SIZE, BACKING_STORE_SIZE>;
