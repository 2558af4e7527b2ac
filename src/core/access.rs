use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::core::{purge, size, trash_info};
use crate::utils::{BinsweepError, Result};

/// Free-space numbers for the filesystem backing a trash directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStat {
    pub block_size: u64,
    pub blocks_available: u64,
}

impl FsStat {
    pub fn free_bytes(&self) -> u64 {
        self.block_size.saturating_mul(self.blocks_available)
    }
}

/// Everything the selection engine needs from the outside world.
///
/// Production code uses [`RealTrashAccess`]; tests script the answers
/// so selection behavior can be checked without a real trash directory.
pub trait TrashAccess {
    /// Paths of all `*.trashinfo` entries in a trash `info/` directory,
    /// sorted by name for deterministic runs.
    fn list_info_files(&self, info_dir: &Path) -> Result<Vec<PathBuf>>;

    /// The current local time, naive like the trashinfo timestamps.
    fn now(&self) -> NaiveDateTime;

    /// Free-space probe for the filesystem holding `path`.
    fn fs_stat(&self, path: &Path) -> Result<FsStat>;

    /// On-disk bytes consumed by `path`, zero on stat failure.
    fn consumed_size(&self, path: &Path) -> u64;

    /// Deletion timestamp recorded in a trashinfo file, if any.
    fn read_deletion_date(&self, info_path: &Path) -> Result<Option<NaiveDateTime>>;

    /// Remove, or in dry-run mode pretend to remove, one record.
    /// Returns whether anything was actually deleted.
    fn purge(&self, info_path: &Path, dry_run: bool) -> Result<bool>;
}

/// [`TrashAccess`] backed by the live filesystem.
pub struct RealTrashAccess;

impl TrashAccess for RealTrashAccess {
    fn list_info_files(&self, info_dir: &Path) -> Result<Vec<PathBuf>> {
        let listing_error = |e: std::io::Error| {
            BinsweepError::fs_error(format!("failed to list {}: {}", info_dir.display(), e))
        };
        let entries = std::fs::read_dir(info_dir).map_err(listing_error)?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(listing_error)?.path();
            // Suffix match on the whole name, so an entry called just
            // ".trashinfo" is picked up too.
            let matches = path
                .file_name()
                .map_or(false, |name| name.as_bytes().ends_with(b".trashinfo"));
            if matches {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn fs_stat(&self, path: &Path) -> Result<FsStat> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            BinsweepError::fs_error(format!("path contains a NUL byte: {}", path.display()))
        })?;
        let mut vfs: libc::statvfs = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut vfs) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            return Err(BinsweepError::fs_error(format!(
                "statvfs failed for {}: {}",
                path.display(),
                err
            )));
        }
        Ok(FsStat {
            block_size: vfs.f_bsize as u64,
            blocks_available: vfs.f_bavail as u64,
        })
    }

    fn consumed_size(&self, path: &Path) -> u64 {
        size::consumed_size(path)
    }

    fn read_deletion_date(&self, info_path: &Path) -> Result<Option<NaiveDateTime>> {
        trash_info::read_deletion_date(info_path)
    }

    fn purge(&self, info_path: &Path, dry_run: bool) -> Result<bool> {
        purge::purge_record(info_path, dry_run)
    }
}
