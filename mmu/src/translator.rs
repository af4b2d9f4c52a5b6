use std::fmt;

use disk::{Disk, DiskError};
use log::{debug, trace};
use memory::{MemoryError, PhysicalMemory};

use crate::{
    address,
    page_table::{FrameAllocator, PageTable},
    replacement::ReplacementPolicy,
    stats::Stats,
    tlb::Tlb,
    FRAME_SIZE, PAGE_TABLE_SIZE, TLB_SIZE,
};

/// Source of page contents on a fault.
pub trait BackingStore {
    fn read_page(&mut self, page_number: usize) -> Result<Box<[u8; FRAME_SIZE]>, DiskError>;
}

impl<const CAPACITY: usize> BackingStore for Disk<FRAME_SIZE, CAPACITY> {
    fn read_page(&mut self, page_number: usize) -> Result<Box<[u8; FRAME_SIZE]>, DiskError> {
        self.read_block(page_number)
    }
}

#[derive(Debug)]
pub enum TranslationError {
    InvalidFrameCount { frames: usize, max: usize },
    BackingStore { page: usize, source: DiskError },
    Memory(MemoryError),
    /// Memory is full but no resident page could be chosen for eviction.
    NoVictim { page: usize },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::InvalidFrameCount { frames, max } => {
                write!(f, "frame count must be between 1 and {}, got {}", max, frames)
            }
            TranslationError::BackingStore { page, .. } => {
                write!(f, "failed to load page {} from the backing store", page)
            }
            TranslationError::Memory(e) => write!(f, "physical memory: {}", e),
            TranslationError::NoVictim { page } => {
                write!(f, "no page can be evicted to load page {}", page)
            }
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslationError::BackingStore { source, .. } => Some(source),
            TranslationError::Memory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MemoryError> for TranslationError {
    fn from(e: MemoryError) -> Self {
        TranslationError::Memory(e)
    }
}

/// Where a translation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TlbHit,
    PageTableHit,
    PageFault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub logical: u32,
    pub page: usize,
    pub offset: usize,
    pub physical: u32,
    pub frame: usize,
    pub value: i8,
    pub outcome: Outcome,
}

/// Owns the whole translation state for one run: TLB, page table, frame
/// pool and physical memory, plus the backing store pages are loaded from.
pub struct Translator<B> {
    page_table: PageTable<PAGE_TABLE_SIZE>,
    tlb: Tlb<TLB_SIZE>,
    frames: FrameAllocator,
    memory: PhysicalMemory<FRAME_SIZE>,
    backing_store: B,
    policy: ReplacementPolicy,
    stats: Stats,
}

impl<B: BackingStore> Translator<B> {
    pub fn new(
        frames: usize,
        policy: ReplacementPolicy,
        backing_store: B,
    ) -> Result<Self, TranslationError> {
        if frames == 0 || frames > PAGE_TABLE_SIZE {
            return Err(TranslationError::InvalidFrameCount {
                frames,
                max: PAGE_TABLE_SIZE,
            });
        }
        Ok(Self {
            page_table: PageTable::init(),
            tlb: Tlb::new(),
            frames: FrameAllocator::new(frames),
            memory: PhysicalMemory::new(frames),
            backing_store,
            policy,
            stats: Stats::default(),
        })
    }

    pub fn translate(&mut self, logical: u32) -> Result<Translation, TranslationError> {
        let (page, offset) = address::decompose(logical);

        let (frame, outcome) = if let Some(frame) = self.tlb.lookup(page).map(|e| e.frame_number) {
            self.page_table.mark_used(page);
            self.stats.tlb_hits += 1;
            (frame, Outcome::TlbHit)
        } else if let Some(frame) = self.page_table.frame_of(page) {
            self.page_table.mark_used(page);
            self.tlb.insert(*self.page_table.entry(page));
            trace!("tlb refill: page {} -> frame {}", page, frame);
            self.stats.page_table_hits += 1;
            (frame, Outcome::PageTableHit)
        } else {
            (self.handle_fault(page)?, Outcome::PageFault)
        };

        let physical = address::compose(frame, offset);
        let value = self.memory.read_u8(physical as usize)? as i8;
        self.stats.translations += 1;

        Ok(Translation {
            logical,
            page,
            offset,
            physical,
            frame,
            value,
            outcome,
        })
    }

    /// Loads `page` into a free or reclaimed frame. Nothing is committed
    /// until the page has been read.
    fn handle_fault(&mut self, page: usize) -> Result<usize, TranslationError> {
        let contents = self
            .backing_store
            .read_page(page)
            .map_err(|source| TranslationError::BackingStore { page, source })?;

        let frame = match self.frames.allocate() {
            Some(frame) => frame,
            None => self.reclaim_frame(page)?,
        };
        self.stats.page_faults += 1;
        debug!("page fault: page {} -> frame {}", page, frame);
        self.memory.write_frame(frame, &contents[..])?;

        self.page_table.map_and_mark(page, frame);
        self.tlb.insert(*self.page_table.entry(page));
        Ok(frame)
    }

    fn reclaim_frame(&mut self, page: usize) -> Result<usize, TranslationError> {
        let eviction = self
            .policy
            .select(&mut self.page_table, &mut self.frames)
            .ok_or(TranslationError::NoVictim { page })?;

        if let Some(victim) = eviction.victim {
            self.page_table.evict(victim);
            // stale copies must go before the frame is handed to `page`
            let purged = self.tlb.remove(victim);
            self.stats.evictions += 1;
            debug!(
                "{} evicted page {} from frame {} ({} tlb entries purged)",
                self.policy, victim, eviction.frame, purged
            );
        } else {
            trace!("frame {} reclaimed without an owner", eviction.frame);
        }
        Ok(eviction.frame)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    pub fn frames_used(&self) -> usize {
        self.frames.used()
    }

    pub fn page_table(&self) -> &PageTable<PAGE_TABLE_SIZE> {
        &self.page_table
    }

    pub fn tlb(&self) -> &Tlb<TLB_SIZE> {
        &self.tlb
    }

    pub fn memory(&self) -> &PhysicalMemory<FRAME_SIZE> {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::DEFAULT_FRAMES;

    /// Backing store whose byte at (page, offset) is `page ^ offset`.
    #[derive(Default)]
    struct PatternStore {
        reads: Vec<usize>,
    }

    fn pattern(page: usize, offset: usize) -> i8 {
        (page ^ offset) as u8 as i8
    }

    impl BackingStore for PatternStore {
        fn read_page(&mut self, page_number: usize) -> Result<Box<[u8; FRAME_SIZE]>, DiskError> {
            self.reads.push(page_number);
            let mut buf = Box::new([0; FRAME_SIZE]);
            for (offset, b) in buf.iter_mut().enumerate() {
                *b = (page_number ^ offset) as u8;
            }
            Ok(buf)
        }
    }

    struct FailingStore;

    impl BackingStore for FailingStore {
        fn read_page(&mut self, _: usize) -> Result<Box<[u8; FRAME_SIZE]>, DiskError> {
            Err(DiskError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short read",
            )))
        }
    }

    fn translator(frames: usize, policy: ReplacementPolicy) -> Translator<PatternStore> {
        let _ = env_logger::builder().is_test(true).try_init();
        Translator::new(frames, policy, PatternStore::default()).unwrap()
    }

    fn address(page: usize, offset: usize) -> u32 {
        (page * FRAME_SIZE + offset) as u32
    }

    fn assert_consistent(t: &Translator<PatternStore>) {
        let mut frames = HashSet::new();
        for entry in t.page_table().iter().filter(|e| e.present) {
            assert!(
                frames.insert(entry.frame_number),
                "frame {} owned twice",
                entry.frame_number
            );
        }
        for cached in t.tlb().iter() {
            assert_eq!(
                t.page_table().frame_of(cached.page_number),
                Some(cached.frame_number),
                "tlb caches page {} out of sync",
                cached.page_number
            );
        }
    }

    #[test]
    fn rejects_bad_frame_counts() {
        assert!(matches!(
            Translator::new(0, ReplacementPolicy::Fifo, PatternStore::default()),
            Err(TranslationError::InvalidFrameCount { frames: 0, .. })
        ));
        assert!(matches!(
            Translator::new(257, ReplacementPolicy::Lru, PatternStore::default()),
            Err(TranslationError::InvalidFrameCount { frames: 257, .. })
        ));
    }

    #[test]
    fn first_access_faults_then_hits_tlb() {
        let mut t = translator(DEFAULT_FRAMES, ReplacementPolicy::Fifo);
        let first = t.translate(16916).unwrap();
        assert_eq!(first.outcome, Outcome::PageFault);
        assert_eq!((first.page, first.offset), (66, 20));
        assert_eq!(first.frame, 0);
        assert_eq!(first.physical, 20);
        assert_eq!(first.value, pattern(66, 20));
        assert_eq!(t.memory().frame(0).unwrap()[255], (66 ^ 255) as u8);

        let second = t.translate(16916).unwrap();
        assert_eq!(second.outcome, Outcome::TlbHit);
        assert_eq!(second.physical, first.physical);
        assert_eq!(second.value, first.value);

        let stats = t.stats();
        assert_eq!(stats.translations, 2);
        assert_eq!(stats.page_faults, 1);
        assert_eq!(stats.tlb_hits, 1);
        assert_eq!(t.backing_store.reads, vec![66]);
    }

    #[test]
    fn page_table_hit_refills_tlb() {
        let mut t = translator(DEFAULT_FRAMES, ReplacementPolicy::Fifo);
        t.translate(address(0, 1)).unwrap();
        // push page 0 out of the TLB ring
        for page in 1..=TLB_SIZE {
            t.translate(address(page, 0)).unwrap();
        }
        assert!(t.tlb().lookup(0).is_none());
        assert!(t.page_table().is_resident(0));

        let hit = t.translate(address(0, 9)).unwrap();
        assert_eq!(hit.outcome, Outcome::PageTableHit);
        assert_eq!(hit.frame, 0);
        assert_eq!(hit.value, pattern(0, 9));
        assert!(t.tlb().lookup(0).is_some());

        assert_eq!(t.translate(address(0, 9)).unwrap().outcome, Outcome::TlbHit);
    }

    #[test]
    fn frames_are_handed_out_sequentially() {
        let mut t = translator(8, ReplacementPolicy::Fifo);
        for (i, page) in [200, 3, 77, 15].into_iter().enumerate() {
            let r = t.translate(address(page, 0)).unwrap();
            assert_eq!(r.frame, i);
            assert_eq!(t.frames_used(), i + 1);
        }
    }

    #[test]
    fn fifo_evicts_the_page_in_frame_zero_after_wraparound() {
        let mut t = translator(128, ReplacementPolicy::Fifo);
        for page in 0..130 {
            assert_eq!(
                t.translate(address(page, 0)).unwrap().outcome,
                Outcome::PageFault
            );
        }
        // pages 128 and 129 took frames 0 and 1 from pages 0 and 1
        assert!(!t.page_table().is_resident(0));
        assert!(!t.page_table().is_resident(1));
        assert_eq!(t.page_table().frame_of(128), Some(0));
        assert_eq!(t.page_table().frame_of(129), Some(1));
        assert!(t.tlb().lookup(0).is_none());

        let again = t.translate(address(0, 42)).unwrap();
        assert_eq!(again.outcome, Outcome::PageFault);
        assert_eq!(again.frame, 2);
        assert_eq!(again.value, pattern(0, 42));
        assert!(!t.page_table().is_resident(2));
        assert_eq!(t.stats().page_faults, 131);
        assert_eq!(t.stats().evictions, 3);
        assert_consistent(&t);
    }

    #[test]
    fn fifo_evicts_hot_pages_too() {
        let mut t = translator(4, ReplacementPolicy::Fifo);
        for page in 0..4 {
            t.translate(address(page, 0)).unwrap();
        }
        t.translate(address(0, 0)).unwrap();
        t.translate(address(10, 0)).unwrap();
        assert!(!t.page_table().is_resident(0));
    }

    #[test]
    fn lru_keeps_the_hot_page_and_evicts_cold_ones_in_order() {
        let mut t = translator(128, ReplacementPolicy::Lru);
        for page in 0..128 {
            t.translate(address(page, 0)).unwrap();
        }
        // everything is used, so this sweeps and takes page 0
        t.translate(address(128, 0)).unwrap();
        assert!(!t.page_table().is_resident(0));
        assert_eq!(t.page_table().frame_of(128), Some(0));

        let hot = 5;
        let mut victims = Vec::new();
        for round in 0..20 {
            let r = t.translate(address(hot, round)).unwrap();
            assert_ne!(r.outcome, Outcome::PageFault);

            let before: Vec<usize> = (0..256).filter(|&p| t.page_table().is_resident(p)).collect();
            let fault = t.translate(address(129 + round, 0)).unwrap();
            assert_eq!(fault.outcome, Outcome::PageFault);
            let victim = before
                .into_iter()
                .find(|&p| !t.page_table().is_resident(p))
                .unwrap();
            victims.push(victim);
            assert!(t.page_table().is_resident(hot));
            assert_consistent(&t);
        }
        let expected: Vec<usize> = (1..=21).filter(|&p| p != hot).collect();
        assert_eq!(victims, expected);
    }

    #[test]
    fn lru_reuses_the_victims_frame() {
        let mut t = translator(2, ReplacementPolicy::Lru);
        t.translate(address(7, 0)).unwrap();
        t.translate(address(9, 0)).unwrap();
        // sweep, victim is page 7 in frame 0
        let r = t.translate(address(11, 3)).unwrap();
        assert_eq!(r.frame, 0);
        assert_eq!(r.value, pattern(11, 3));
        // page 9 is now the only unused resident page
        let r = t.translate(address(12, 0)).unwrap();
        assert_eq!(r.frame, 1);
        assert!(!t.page_table().is_resident(9));
        assert!(t.page_table().is_resident(11));
    }

    #[test]
    fn eviction_purges_the_tlb() {
        for policy in [ReplacementPolicy::Fifo, ReplacementPolicy::Lru] {
            let mut t = translator(2, policy);
            t.translate(address(1, 0)).unwrap();
            t.translate(address(2, 0)).unwrap();
            assert!(t.tlb().lookup(1).is_some());
            t.translate(address(3, 0)).unwrap();
            assert!(!t.page_table().is_resident(1));
            assert!(t.tlb().lookup(1).is_none());
            assert!(t.tlb().iter().all(|e| e.page_number != 1));
            // must fault again rather than hit a stale TLB copy
            assert_eq!(
                t.translate(address(1, 0)).unwrap().outcome,
                Outcome::PageFault
            );
        }
    }

    #[test]
    fn full_sized_memory_never_evicts() {
        for policy in [ReplacementPolicy::Fifo, ReplacementPolicy::Lru] {
            let mut t = translator(PAGE_TABLE_SIZE, policy);
            let mut rng = StdRng::seed_from_u64(7);
            for _ in 0..5000 {
                t.translate(rng.gen_range(0..=0xffff)).unwrap();
            }
            assert_eq!(t.stats().evictions, 0);
            assert!(t.stats().page_faults <= PAGE_TABLE_SIZE as u64);
            assert_consistent(&t);
        }
    }

    #[test]
    fn random_streams_keep_tables_consistent() {
        for policy in [ReplacementPolicy::Fifo, ReplacementPolicy::Lru] {
            for frames in [1, 16, 128] {
                let mut t = translator(frames, policy);
                let mut rng = StdRng::seed_from_u64(frames as u64);
                for _ in 0..2000 {
                    let logical = rng.gen_range(0..=0xffff);
                    let r = t.translate(logical).unwrap();
                    assert_eq!(r.value, pattern(r.page, r.offset));
                    assert!(r.frame < frames);
                    assert_consistent(&t);

                    let again = t.translate(logical).unwrap();
                    assert_eq!(again.outcome, Outcome::TlbHit);
                    assert_eq!(again.physical, r.physical);
                }
                assert!(t.page_table().resident_count() <= frames);
            }
        }
    }

    #[test]
    fn fault_count_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let stream: Vec<u32> = (0..1000).map(|_| rng.gen_range(0..=0xffff)).collect();
        for policy in [ReplacementPolicy::Fifo, ReplacementPolicy::Lru] {
            let run = || {
                let mut t = translator(32, policy);
                for &a in &stream {
                    t.translate(a).unwrap();
                }
                t.stats()
            };
            assert_eq!(run(), run());
        }
    }

    #[test]
    fn backing_store_failure_is_reported() {
        let mut t = Translator::new(4, ReplacementPolicy::Fifo, FailingStore).unwrap();
        assert!(matches!(
            t.translate(address(3, 0)),
            Err(TranslationError::BackingStore { page: 3, .. })
        ));
    }

    /// Fails for one page, otherwise behaves like `PatternStore`.
    struct PickyStore {
        bad_page: usize,
        inner: PatternStore,
    }

    impl BackingStore for PickyStore {
        fn read_page(&mut self, page_number: usize) -> Result<Box<[u8; FRAME_SIZE]>, DiskError> {
            if page_number == self.bad_page {
                return FailingStore.read_page(page_number);
            }
            self.inner.read_page(page_number)
        }
    }

    #[test]
    fn failed_load_leaves_state_untouched() {
        let store = PickyStore {
            bad_page: 9,
            inner: PatternStore::default(),
        };
        let mut t = Translator::new(4, ReplacementPolicy::Fifo, store).unwrap();
        for page in 0..4 {
            t.translate(address(page, 0)).unwrap();
        }
        let before = t.stats();

        assert!(matches!(
            t.translate(address(9, 0)),
            Err(TranslationError::BackingStore { page: 9, .. })
        ));
        assert_eq!(t.stats(), before);
        assert_eq!(t.frames_used(), 4);
        assert_eq!(t.page_table().resident_count(), 4);
        assert_eq!(t.page_table().frame_of(0), Some(0));
        assert!(t.tlb().lookup(0).is_some());

        // the FIFO cursor did not move, so page 0 is still the next victim
        let next = t.translate(address(10, 1)).unwrap();
        assert_eq!(next.frame, 0);
        assert_eq!(next.value, pattern(10, 1));
        assert_eq!(t.page_table().frame_of(0), None);
        assert_eq!(t.stats().page_faults, before.page_faults + 1);
        assert_eq!(t.stats().evictions, 1);
    }
}
