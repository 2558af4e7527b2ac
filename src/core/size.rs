use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// Bytes actually consumed on disk by `path`, recursing into
/// directories.
///
/// Symbolic links count their own length and are never followed.
/// Regular files and directories are charged `st_blocks * 512` so
/// sparse files cost what they occupy, not what they claim. Stat
/// failures are logged and contribute zero; the walk keeps going so one
/// unreadable entry cannot hide the rest of a tree.
pub fn consumed_size(path: &Path) -> u64 {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            log::error!("Error getting size for {}: {}", path.display(), err);
            return 0;
        }
    };

    if meta.file_type().is_symlink() {
        return meta.len();
    }

    let mut size = meta.blocks() * 512;
    if meta.is_dir() {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("Error getting size for {}: {}", path.display(), err);
                return size;
            }
        };
        for entry in entries {
            match entry {
                Ok(entry) => size += consumed_size(&entry.path()),
                Err(err) => {
                    log::error!("Error getting size for {}: {}", path.display(), err)
                }
            }
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path_counts_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(consumed_size(&dir.path().join("nope")), 0);
    }

    #[test]
    fn test_file_size_is_counted_in_whole_blocks() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data");
        fs::write(&file, vec![7u8; 5000]).unwrap();

        let size = consumed_size(&file);
        assert!(size >= 5000, "5000 payload bytes must consume at least that, got {size}");
        assert_eq!(size % 512, 0);
    }

    #[test]
    fn test_directory_includes_its_entries() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("a"), vec![1u8; 3000]).unwrap();
        fs::write(sub.join("b"), vec![2u8; 3000]).unwrap();

        let whole = consumed_size(dir.path());
        let file_only = consumed_size(&sub.join("a"));
        assert!(whole >= 2 * file_only);
    }

    #[test]
    fn test_symlink_counts_its_own_length_not_the_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("big");
        fs::write(&target, vec![0u8; 100_000]).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let link_size = consumed_size(&link);
        assert_eq!(link_size, target.to_string_lossy().len() as u64);
        assert!(link_size < consumed_size(&target));
    }

    #[test]
    fn test_dangling_symlink_still_counts_its_length() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink("/nowhere/in/particular", &link).unwrap();
        assert_eq!(consumed_size(&link), "/nowhere/in/particular".len() as u64);
    }
}
