use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::core::record;
use crate::utils::{BinsweepError, Result};

/// Remove one trashed item: first the real file or tree under `files/`,
/// then its trashinfo entry.
///
/// In dry-run mode the same decisions are logged and nothing is
/// touched; the return value is `false` so callers can tell a simulated
/// removal from a real one. Directory trees are removed best-effort and
/// the trashinfo entry is removed even after a partial tree failure. A
/// failed unlink of a plain file or symlink keeps the trashinfo so the
/// record shows up again on the next run.
pub fn purge_record(info_path: &Path, dry_run: bool) -> Result<bool> {
    let target = record::real_file_for(info_path);

    if dry_run {
        if target.exists() || target.is_symlink() {
            log::info!("Remove {}", target.display());
        } else {
            log::info!("Ignore {}", target.display());
        }
        if info_path.exists() {
            log::info!("Remove {}", info_path.display());
        } else {
            log::info!("Ignore {}", info_path.display());
        }
        return Ok(false);
    }

    match fs::symlink_metadata(&target) {
        Ok(meta) if meta.file_type().is_symlink() => {
            log::debug!("Removing link {}", target.display());
            fs::remove_file(&target).map_err(|e| removal_error(&target, &e))?;
        }
        Ok(meta) if meta.is_dir() => {
            log::debug!("Removing directory {}", target.display());
            remove_tree(&target);
        }
        Ok(_) => {
            log::debug!("Removing file {}", target.display());
            fs::remove_file(&target).map_err(|e| removal_error(&target, &e))?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("Ignore non-existing file {}", target.display());
        }
        Err(err) => return Err(removal_error(&target, &err)),
    }

    fs::remove_file(info_path).map_err(|e| removal_error(info_path, &e))?;
    Ok(true)
}

fn removal_error(path: &Path, err: &io::Error) -> BinsweepError {
    BinsweepError::fs_error(format!("failed to remove {}: {}", path.display(), err))
}

/// Best-effort recursive removal. Each entry gets one retry after a
/// permission repair; any other failure is logged and skipped so the
/// rest of the tree still gets cleared.
fn remove_tree(root: &Path) {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            log::error!("Failed to remove \"{}\", got error: {}", root.display(), err);
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::error!("Failed to remove \"{}\", got error: {}", root.display(), err);
                continue;
            }
        };
        let path = entry.path();
        let descend = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if descend {
            remove_tree(&path);
        } else {
            remove_with_repair(&path, |p| fs::remove_file(p));
        }
    }
    remove_with_repair(root, |p| fs::remove_dir(p));
}

fn remove_with_repair<F>(path: &Path, remove: F)
where
    F: Fn(&Path) -> io::Result<()>,
{
    let err = match remove(path) {
        Ok(()) => return,
        Err(err) => err,
    };
    if err.kind() != io::ErrorKind::PermissionDenied {
        log::error!("Failed to remove \"{}\", got error: {}", path.display(), err);
        return;
    }
    log::debug!(
        "Failed to remove {}: {}; changing permissions and trying again",
        path.display(),
        err
    );
    if let Err(repair_err) = grant_owner_write(path) {
        log::error!(
            "Failed to remove \"{}\", got error: {}",
            path.display(),
            repair_err
        );
        return;
    }
    if let Err(retry_err) = remove(path) {
        log::error!(
            "Failed to remove \"{}\", got error: {}",
            path.display(),
            retry_err
        );
    }
}

/// Unlinking needs write and search access on the containing directory,
/// not on the entry itself, so the repair targets the parent.
fn grant_owner_write(path: &Path) -> io::Result<()> {
    let dir = path.parent().unwrap_or(path);
    let mut perms = fs::metadata(dir)?.permissions();
    perms.set_mode(perms.mode() | 0o300);
    fs::set_permissions(dir, perms)
}
