use regex::Regex;

/// Immutable configuration for one pruning run.
///
/// Values arrive here already validated and converted; the
/// megabyte-valued command-line flags become byte counts before a
/// policy exists. A zero means the corresponding rule is off.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    /// Purge records strictly older than this many whole days.
    pub age_threshold_days: u64,
    /// Reclaim at least this many bytes per trash directory.
    pub delete_target_bytes: u64,
    /// Keep at least this many bytes of free space available.
    pub min_free_bytes: u64,
    /// Leave a directory alone when its filesystem already has more
    /// than this many bytes free.
    pub max_free_bytes: u64,
    /// Keep the total size of a trash directory under this many bytes.
    pub trash_cap_bytes: u64,
    /// Records whose base name matches jump the deletion queue; the
    /// first pattern listed has the highest priority.
    pub priority_patterns: Vec<Regex>,
    pub dry_run: bool,
    pub compute_stats: bool,
    /// Warn about trashinfo entries with no real file behind them.
    pub report_orphans: bool,
    /// Legacy behavior: one unreadable trashinfo abandons the whole
    /// directory instead of being skipped.
    pub stop_on_bad_info: bool,
}

impl Policy {
    /// True when the run needs a free-space probe before anything else.
    pub fn uses_free_space(&self) -> bool {
        self.max_free_bytes > 0 || self.min_free_bytes > 0
    }

    /// Age threshold in the signed day count record ages use.
    /// Thresholds beyond `i64::MAX` clamp instead of wrapping negative,
    /// which would turn an absurdly large threshold into "purge
    /// everything".
    pub fn age_cutoff_days(&self) -> i64 {
        i64::try_from(self.age_threshold_days).unwrap_or(i64::MAX)
    }
}
