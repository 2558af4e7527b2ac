//! Shared helpers for tests: a scriptable [`TrashAccess`] plus
//! builders for real on-disk trash layouts.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};

use crate::core::access::{FsStat, TrashAccess};
use crate::utils::{BinsweepError, Result};

/// A fixed reference time so age math in tests is reproducible.
pub fn fixed_now() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Create the `info/` and `files/` areas of a trash directory.
pub fn make_trash(trash_root: &Path) -> (PathBuf, PathBuf) {
    let info_dir = trash_root.join("info");
    let files_dir = trash_root.join("files");
    fs::create_dir_all(&info_dir).unwrap();
    fs::create_dir_all(&files_dir).unwrap();
    (info_dir, files_dir)
}

/// Drop one complete trash entry: a real file under `files/` and its
/// trashinfo under `info/`. Returns the trashinfo path.
pub fn add_trash_entry(
    trash_root: &Path,
    name: &str,
    deletion_date: &str,
    contents: &[u8],
) -> PathBuf {
    let (info_dir, files_dir) = make_trash(trash_root);
    fs::write(files_dir.join(name), contents).unwrap();
    let info_path = info_dir.join(format!("{}.trashinfo", name));
    fs::write(
        &info_path,
        format!(
            "[Trash Info]\nPath=/home/user/{}\nDeletionDate={}\n",
            name, deletion_date
        ),
    )
    .unwrap();
    info_path
}

enum ScriptedDate {
    Valid(NaiveDateTime),
    Missing,
    Corrupt,
}

struct ScriptedEntry {
    name: String,
    date: ScriptedDate,
    size: u64,
}

/// Scriptable [`TrashAccess`] that records every call, so selection
/// tests can assert on what the engine asked for and in which order.
pub struct MockTrashAccess {
    now: NaiveDateTime,
    entries: Vec<ScriptedEntry>,
    fs_stat: Option<FsStat>,
    failing_purges: Vec<String>,
    purge_calls: RefCell<Vec<(PathBuf, bool)>>,
    size_calls: RefCell<usize>,
}

impl Default for MockTrashAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrashAccess {
    pub fn new() -> Self {
        Self {
            now: fixed_now(),
            entries: Vec::new(),
            fs_stat: None,
            failing_purges: Vec::new(),
            purge_calls: RefCell::new(Vec::new()),
            size_calls: RefCell::new(0),
        }
    }

    /// Add an entry that is `age_seconds` old at the mock's notion of
    /// now and consumes `size` bytes on disk.
    pub fn with_entry(mut self, name: &str, age_seconds: i64, size: u64) -> Self {
        self.entries.push(ScriptedEntry {
            name: name.to_string(),
            date: ScriptedDate::Valid(self.now - Duration::seconds(age_seconds)),
            size,
        });
        self
    }

    /// Add an entry whose trashinfo carries no readable deletion date.
    pub fn with_dateless_entry(mut self, name: &str) -> Self {
        self.entries.push(ScriptedEntry {
            name: name.to_string(),
            date: ScriptedDate::Missing,
            size: 0,
        });
        self
    }

    /// Add an entry whose trashinfo fails to parse.
    pub fn with_corrupt_entry(mut self, name: &str) -> Self {
        self.entries.push(ScriptedEntry {
            name: name.to_string(),
            date: ScriptedDate::Corrupt,
            size: 0,
        });
        self
    }

    pub fn with_fs_stat(mut self, block_size: u64, blocks_available: u64) -> Self {
        self.fs_stat = Some(FsStat {
            block_size,
            blocks_available,
        });
        self
    }

    /// Purging the named entry will fail with an error.
    pub fn with_failing_purge(mut self, name: &str) -> Self {
        self.failing_purges.push(name.to_string());
        self
    }

    pub fn purge_calls(&self) -> Vec<(PathBuf, bool)> {
        self.purge_calls.borrow().clone()
    }

    /// Real-file names purged so far, in call order.
    pub fn purged_names(&self) -> Vec<String> {
        self.purge_calls
            .borrow()
            .iter()
            .map(|(path, _)| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn size_call_count(&self) -> usize {
        *self.size_calls.borrow()
    }

    fn entry_for(&self, info_path: &Path) -> Option<&ScriptedEntry> {
        let file_name = info_path.file_name()?.to_string_lossy().into_owned();
        self.entries
            .iter()
            .find(|entry| format!("{}.trashinfo", entry.name) == file_name)
    }
}

impl TrashAccess for MockTrashAccess {
    fn list_info_files(&self, info_dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .entries
            .iter()
            .map(|entry| info_dir.join(format!("{}.trashinfo", entry.name)))
            .collect())
    }

    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn fs_stat(&self, _path: &Path) -> Result<FsStat> {
        self.fs_stat
            .ok_or_else(|| BinsweepError::fs_error("no filesystem probe scripted"))
    }

    fn consumed_size(&self, path: &Path) -> u64 {
        *self.size_calls.borrow_mut() += 1;
        self.entry_for(path).map(|entry| entry.size).unwrap_or(0)
    }

    fn read_deletion_date(&self, info_path: &Path) -> Result<Option<NaiveDateTime>> {
        match self.entry_for(info_path).map(|entry| &entry.date) {
            Some(ScriptedDate::Valid(date)) => Ok(Some(*date)),
            Some(ScriptedDate::Missing) | None => Ok(None),
            Some(ScriptedDate::Corrupt) => Err(BinsweepError::trash_info(
                info_path,
                "invalid DeletionDate value",
            )),
        }
    }

    fn purge(&self, info_path: &Path, dry_run: bool) -> Result<bool> {
        self.purge_calls
            .borrow_mut()
            .push((info_path.to_path_buf(), dry_run));
        let name = info_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_purges.contains(&name) {
            return Err(BinsweepError::fs_error(format!(
                "failed to remove {}: permission denied",
                info_path.display()
            )));
        }
        Ok(!dry_run)
    }
}
