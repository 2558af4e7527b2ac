use crate::utils::fmt_bytes;

/// Accumulated totals for one pruning run. A single value lives for the
/// whole run, so bytes reclaimed in one trash directory count against
/// the targets of the directories processed after it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total_files: u64,
    pub total_size: u64,
    pub deleted_files: u64,
    pub deleted_size: u64,
    /// Records that could not be read. Purge failures are logged but do
    /// not count here; the run keeps going either way.
    pub failures: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    /// Log the closing report shown with `--stat`.
    pub fn report(&self) {
        log::info!("Trash statistics:");
        log::info!(
            "  {:>6} entries at start ({})",
            self.total_files,
            fmt_bytes(self.total_size)
        );
        log::info!(
            " -{:>6} deleted ({})",
            self.deleted_files,
            fmt_bytes(self.deleted_size)
        );
        log::info!(
            " ={:>6} remaining ({})",
            self.total_files - self.deleted_files,
            fmt_bytes(self.total_size - self.deleted_size)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_all_zero() {
        let stats = RunStats::new();
        assert_eq!(stats, RunStats::default());
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.deleted_size, 0);
    }

    #[test]
    fn test_has_failures_only_after_a_failure() {
        let mut stats = RunStats::new();
        assert!(!stats.has_failures());
        stats.failures += 1;
        assert!(stats.has_failures());
    }
}
