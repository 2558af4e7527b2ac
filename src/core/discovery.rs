use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::utils::{BinsweepError, Result};

/// Build the list of trash directories a run will process.
///
/// An explicit override wins outright and suppresses all discovery.
/// Otherwise the user's home trash under the XDG data directory is
/// included, plus, when `scan_mounts` is set, the per-user
/// `.Trash/<uid>` or `.Trash-<uid>` top directories of every mounted
/// filesystem that actually has one.
pub fn find_trash_directories(
    override_dir: Option<&Path>,
    scan_mounts: bool,
) -> Result<Vec<PathBuf>> {
    if let Some(dir) = override_dir {
        return Ok(vec![expand_tilde(dir)?]);
    }

    let base = BaseDirs::new()
        .ok_or_else(|| BinsweepError::fs_error("unable to determine the user's home directory"))?;
    let user_trash = base.data_dir().join("Trash");
    log::debug!("Found trash directory: {}", user_trash.display());
    let mut trash_dirs = vec![user_trash];

    if scan_mounts {
        let mounts = fs::read_to_string("/proc/mounts")
            .map_err(|e| BinsweepError::fs_error(format!("failed to read /proc/mounts: {}", e)))?;
        trash_dirs.extend(mount_trash_directories(&mounts, unsafe { libc::getuid() }));
    }

    Ok(trash_dirs)
}

/// Scan a `/proc/mounts` listing for per-user trash directories. Both
/// the admin-created `.Trash/<uid>` layout and the user-created
/// `.Trash-<uid>` fallback are recognized, first match per mount wins.
fn mount_trash_directories(mounts: &str, uid: u32) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for line in mounts.lines() {
        let Some(mount_point) = line.split_whitespace().nth(1) else {
            continue;
        };
        let candidates = [
            Path::new(mount_point).join(".Trash").join(uid.to_string()),
            Path::new(mount_point).join(format!(".Trash-{}", uid)),
        ];
        for candidate in candidates {
            if candidate.is_dir() {
                log::debug!("Found trash directory: {}", candidate.display());
                found.push(candidate);
                break;
            }
        }
    }
    found
}

/// Expand a leading `~` in a user-supplied trash path.
fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let Some(text) = path.to_str() else {
        return Ok(path.to_path_buf());
    };
    if text == "~" || text.starts_with("~/") {
        let base = BaseDirs::new().ok_or_else(|| {
            BinsweepError::fs_error("unable to determine the user's home directory")
        })?;
        let rest = text.trim_start_matches('~').trim_start_matches('/');
        return Ok(base.home_dir().join(rest));
    }
    Ok(path.to_path_buf())
}
