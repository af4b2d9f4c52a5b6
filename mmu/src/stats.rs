#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub translations: u64,
    pub tlb_hits: u64,
    pub page_table_hits: u64,
    pub page_faults: u64,
    pub evictions: u64,
}

impl Stats {
    fn percent(count: u64, total: u64) -> f64 {
        if total > 0 {
            count as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn page_fault_rate(&self) -> f64 {
        Self::percent(self.page_faults, self.translations)
    }

    pub fn tlb_hit_rate(&self) -> f64 {
        Self::percent(self.tlb_hits, self.translations)
    }
}
