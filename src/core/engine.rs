use std::path::Path;

use regex::Regex;

use crate::config::Policy;
use crate::core::access::TrashAccess;
use crate::core::record::{self, TrashRecord};
use crate::core::stats::RunStats;
use crate::utils::{fmt_bytes, BinsweepError, Result};

/// Decides which records of a trash directory get purged, and purges
/// them.
///
/// One engine serves any number of directories against the same policy;
/// every touch of the outside world goes through the injected
/// [`TrashAccess`], which keeps the selection rules testable without a
/// real trash directory.
pub struct SelectionEngine<'a> {
    access: &'a dyn TrashAccess,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(access: &'a dyn TrashAccess) -> Self {
        Self { access }
    }

    /// Run the full pipeline for one trash `info/` directory: free-space
    /// gates, record collection, ordering and the purge sweep.
    pub fn process_directory(
        &self,
        info_dir: &Path,
        policy: &Policy,
        stats: &mut RunStats,
    ) -> Result<()> {
        // The byte target is local to the directory. Free-space
        // shortfalls differ per filesystem and must not leak into the
        // directories processed afterwards.
        let mut delete_target = policy.delete_target_bytes;

        if policy.uses_free_space() {
            let fs_stat = self.access.fs_stat(info_dir)?;
            if fs_stat.block_size == 0 {
                return Err(BinsweepError::free_space_query(info_dir));
            }
            let free_bytes = fs_stat.free_bytes();
            if policy.max_free_bytes > 0 && free_bytes > policy.max_free_bytes {
                log::debug!(
                    "I see {} of free space at \"{}\", which is more than --max-free, doing nothing",
                    fmt_bytes(free_bytes),
                    info_dir.display()
                );
                return Ok(());
            }
            if policy.min_free_bytes > 0 && free_bytes < policy.min_free_bytes {
                delete_target = policy.min_free_bytes - free_bytes;
                log::debug!(
                    "Setting the delete target to {} to make sure at least {} is available, currently {} is free",
                    fmt_bytes(delete_target),
                    fmt_bytes(policy.min_free_bytes),
                    fmt_bytes(free_bytes)
                );
            }
        }

        let size_needed =
            policy.compute_stats || delete_target > 0 || policy.trash_cap_bytes > 0;
        let Some((mut records, trash_total)) =
            self.collect_records(info_dir, policy, size_needed, stats)?
        else {
            return Ok(());
        };

        if policy.trash_cap_bytes > 0 {
            if delete_target > 0 {
                return Err(BinsweepError::invalid_args(
                    "cannot mix '--trash-limit' with '--delete'",
                ));
            }
            log::debug!("Total trash size is {}", fmt_bytes(trash_total));
            log::debug!("Trash size limit is {}", fmt_bytes(policy.trash_cap_bytes));
            if policy.trash_cap_bytes < trash_total {
                delete_target = trash_total - policy.trash_cap_bytes;
                log::debug!("Trash exceeds limit by {}", fmt_bytes(delete_target));
            }
        }

        order_records(&mut records, &policy.priority_patterns);
        self.sweep(records, policy, delete_target, stats);
        Ok(())
    }

    /// Parse every trashinfo entry into a record, tallying unreadable
    /// ones as failures. Sizes are only computed when the run needs
    /// them, since sizing a trashed tree can be expensive.
    ///
    /// Returns `None` when an unreadable record abandons the directory
    /// under the legacy `stop_on_bad_info` behavior.
    fn collect_records(
        &self,
        info_dir: &Path,
        policy: &Policy,
        size_needed: bool,
        stats: &mut RunStats,
    ) -> Result<Option<(Vec<TrashRecord>, u64)>> {
        let info_files = self.access.list_info_files(info_dir)?;
        let now = self.access.now();
        let mut records = Vec::with_capacity(info_files.len());
        let mut total_size = 0u64;

        for info_path in info_files {
            let real_path = record::real_file_for(&info_path);
            if policy.report_orphans && !real_path.exists() {
                log::warn!("{} has no real file associated with it", info_path.display());
            }

            let deletion_time = match self.access.read_deletion_date(&info_path) {
                Ok(Some(deletion_time)) => Some(deletion_time),
                Ok(None) => None,
                Err(err) => {
                    log::error!("{}", err);
                    None
                }
            };
            let Some(deletion_time) = deletion_time else {
                log::warn!("Failed to read trash info for real file: {}", real_path.display());
                stats.failures += 1;
                if policy.stop_on_bad_info {
                    return Ok(None);
                }
                continue;
            };

            let mut record = TrashRecord::new(info_path, deletion_time, now);

            if size_needed {
                let mut size = self.access.consumed_size(&record.info_path);
                if record.real_path.exists() {
                    if record.real_path.is_dir() {
                        log::debug!(
                            "Calculating size of directory {} (may take a long time)",
                            record.real_path.display()
                        );
                    }
                    size += self.access.consumed_size(&record.real_path);
                }
                record.size = Some(size);
                total_size += size;
            }

            log::debug!("File {}", record.real_path.display());
            let preview = if record.age_days > policy.age_cutoff_days() {
                ""
            } else {
                "not "
            };
            log::debug!(
                "    is {} days old, {} seconds, so it should {}be removed",
                record.age_days,
                record.age_seconds,
                preview
            );
            log::debug!(
                "    deletion date was {}",
                record.deletion_time.format("%Y-%m-%dT%H:%M:%S")
            );
            if policy.compute_stats {
                if let Some(size) = record.size {
                    log::debug!("    consumes {}", fmt_bytes(size));
                }
            }

            records.push(record);
        }

        Ok(Some((records, total_size)))
    }

    /// Walk the ordered queue and purge what the policy selects: every
    /// record strictly older than the age threshold, plus records in
    /// queue order until the byte target is met.
    fn sweep(
        &self,
        mut records: Vec<TrashRecord>,
        policy: &Policy,
        delete_target: u64,
        stats: &mut RunStats,
    ) {
        for record in &mut records {
            if policy.compute_stats {
                stats.total_files += 1;
                stats.total_size += record.size.unwrap_or(0);
            }

            let age_exceeded = policy.age_threshold_days > 0
                && record.age_days > policy.age_cutoff_days();
            let target_unmet = stats.deleted_size < delete_target;
            if !(age_exceeded || target_unmet) {
                log::debug!("Keeping {}", record.real_path.display());
                continue;
            }

            let purged = match self.access.purge(&record.info_path, policy.dry_run) {
                Ok(purged) => purged,
                Err(err) => {
                    log::error!("{}", err);
                    false
                }
            };
            if purged || policy.dry_run {
                record.deleted = true;
                if delete_target > 0 || policy.compute_stats {
                    stats.deleted_files += 1;
                    stats.deleted_size += record.size.unwrap_or(0);
                }
            }
        }

        let swept = records.iter().filter(|record| record.deleted).count();
        log::debug!("Swept {} of {} records", swept, records.len());
    }
}

/// Order the queue oldest first, then stably pull each priority
/// pattern's matches to the front. Patterns are applied in reverse so
/// the first one listed ends up with the highest priority.
fn order_records(records: &mut Vec<TrashRecord>, patterns: &[Regex]) {
    records.sort_by(|a, b| b.age_seconds.cmp(&a.age_seconds));

    for pattern in patterns.iter().rev() {
        let (mut matched, unmatched): (Vec<TrashRecord>, Vec<TrashRecord>) = records
            .drain(..)
            .partition(|record| starts_with_match(pattern, &record.base_name()));
        for record in &matched {
            log::debug!(
                "Pushing {} to top of queue because it matches {}",
                record.base_name(),
                pattern.as_str()
            );
        }
        matched.extend(unmatched);
        *records = matched;
    }
}

/// A pattern counts as matching when it matches at the start of the
/// name; it does not have to cover the whole name.
fn starts_with_match(pattern: &Regex, name: &str) -> bool {
    pattern.find(name).is_some_and(|m| m.start() == 0)
}
