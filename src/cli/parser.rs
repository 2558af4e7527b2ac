use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

use crate::config::Policy;
use crate::utils::{BinsweepError, Result};

const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "binsweep")]
#[command(about = "Purge old files from FreeDesktop.org trash directories")]
#[command(
    version,
    long_about = "Scans trash directories and permanently removes entries that are \
older than a given age, or as many of the oldest entries as it takes to satisfy \
a free-space or trash-size goal."
)]
pub struct Cli {
    /// Delete files older than DAYS number of days
    #[arg(short = 'd', long, value_name = "DAYS", default_value_t = 0)]
    pub days: u64,

    /// Empty the trash in DIRECTORY instead of the user's home trash
    #[arg(
        short = 'T',
        long,
        value_name = "DIRECTORY",
        conflicts_with = "trash_mounts"
    )]
    pub trash_path: Option<PathBuf>,

    /// Process all user trash directories instead of just the one in
    /// the home directory
    #[arg(short = 't', long)]
    pub trash_mounts: bool,

    /// Only run if less than M megabytes of free space is left
    #[arg(long, value_name = "M", default_value_t = 0)]
    pub max_free: u64,

    /// Delete at least M megabytes
    #[arg(long, value_name = "M", default_value_t = 0, conflicts_with = "min_free")]
    pub delete: u64,

    /// Keep deleting the oldest entries until at least M megabytes of
    /// space is available
    #[arg(long, visible_alias = "keep-free", value_name = "M", default_value_t = 0)]
    pub min_free: u64,

    /// Make sure no more than M megabytes of space are used by the trash
    #[arg(
        long,
        alias = "trash_limit",
        value_name = "M",
        default_value_t = 0,
        conflicts_with_all = ["delete", "min_free"]
    )]
    pub trash_limit: u64,

    /// Push files matching this REGEX to the top of the deletion queue;
    /// can be given multiple times, earlier patterns win
    #[arg(short = 'D', long, value_name = "REGEX")]
    pub delete_first: Vec<String>,

    /// Be more verbose, a must when testing something out
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only output warnings
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Report trashinfo files without a real file
    #[arg(long)]
    pub check: bool,

    /// Just list what would have been done
    #[arg(long)]
    pub dry_run: bool,

    /// Show the number and total size of the files involved
    #[arg(long, conflicts_with = "quiet")]
    pub stat: bool,

    /// Install a daily systemd user timer that runs with the given
    /// options
    #[arg(long, conflicts_with = "dry_run")]
    pub install: bool,

    /// Abandon a trash directory at the first unreadable trashinfo file
    /// instead of skipping past it
    #[arg(long)]
    pub stop_on_bad_info: bool,
}

impl Cli {
    /// Sanity rules that clap's declarative conflicts cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 && self.delete == 0 && self.min_free == 0 {
            return Err(BinsweepError::invalid_args(
                "you need to specify at least one of --days, --delete or --min-free \
for this command to have any effect",
            ));
        }
        if !self.delete_first.is_empty() && self.min_free == 0 {
            return Err(BinsweepError::invalid_args(
                "using --delete-first (-D) without --min-free does not have any effect; \
age based purging will still work as predicted",
            ));
        }
        Ok(())
    }

    /// Compile the run policy out of validated flags, converting the
    /// megabyte-valued ones to bytes.
    pub fn policy(&self) -> Result<Policy> {
        let mut priority_patterns = Vec::with_capacity(self.delete_first.len());
        for pattern in &self.delete_first {
            let compiled = Regex::new(pattern).map_err(|e| {
                BinsweepError::invalid_args(format!(
                    "invalid --delete-first pattern '{}': {}",
                    pattern, e
                ))
            })?;
            priority_patterns.push(compiled);
        }

        Ok(Policy {
            age_threshold_days: self.days,
            delete_target_bytes: self.delete.saturating_mul(BYTES_PER_MEGABYTE),
            min_free_bytes: self.min_free.saturating_mul(BYTES_PER_MEGABYTE),
            max_free_bytes: self.max_free.saturating_mul(BYTES_PER_MEGABYTE),
            trash_cap_bytes: self.trash_limit.saturating_mul(BYTES_PER_MEGABYTE),
            priority_patterns,
            dry_run: self.dry_run,
            compute_stats: self.stat,
            report_orphans: self.check,
            stop_on_bad_info: self.stop_on_bad_info,
        })
    }
}
