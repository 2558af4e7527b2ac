use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

const SECONDS_PER_DAY: i64 = 86_400;

/// One trashed item, as described by an entry in a trash directory's
/// `info/` area.
#[derive(Debug, Clone)]
pub struct TrashRecord {
    /// The `*.trashinfo` file this record was read from.
    pub info_path: PathBuf,
    /// The trashed file or tree under the sibling `files/` area.
    pub real_path: PathBuf,
    /// Deletion timestamp recorded in the trashinfo file, local naive.
    pub deletion_time: NaiveDateTime,
    pub age_seconds: i64,
    /// Age in whole elapsed days, floored. Negative for timestamps in
    /// the future.
    pub age_days: i64,
    /// On-disk bytes consumed by the item plus its trashinfo file.
    /// `None` until a run actually needs sizes.
    pub size: Option<u64>,
    pub deleted: bool,
}

impl TrashRecord {
    pub fn new(info_path: PathBuf, deletion_time: NaiveDateTime, now: NaiveDateTime) -> Self {
        let real_path = real_file_for(&info_path);
        let age_seconds = (now - deletion_time).num_seconds();
        Self {
            info_path,
            real_path,
            deletion_time,
            age_seconds,
            age_days: age_seconds.div_euclid(SECONDS_PER_DAY),
            size: None,
            deleted: false,
        }
    }

    /// Base name of the trashed file, the text priority patterns match
    /// against.
    pub fn base_name(&self) -> String {
        self.real_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }
}

/// Map a trashinfo path to the trashed file it describes: the same base
/// name minus the `.trashinfo` extension, under `files/` next to the
/// `info/` directory.
pub fn real_file_for(info_path: &Path) -> PathBuf {
    let stem = info_path.file_stem().unwrap_or_default();
    let trash_root = info_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or(Path::new(""));
    trash_root.join("files").join(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_time() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_real_file_for_maps_into_files_directory() {
        let real = real_file_for(Path::new("/home/u/.local/share/Trash/info/report.txt.trashinfo"));
        assert_eq!(
            real,
            PathBuf::from("/home/u/.local/share/Trash/files/report.txt")
        );
    }

    #[test]
    fn test_real_file_for_strips_only_the_last_extension() {
        let real = real_file_for(Path::new("/t/info/archive.tar.gz.trashinfo"));
        assert_eq!(real, PathBuf::from("/t/files/archive.tar.gz"));
    }

    #[test]
    fn test_age_fields_for_whole_and_partial_days() {
        let now = base_time();

        let two_days = TrashRecord::new(
            PathBuf::from("/t/info/a.trashinfo"),
            now - Duration::days(2),
            now,
        );
        assert_eq!(two_days.age_seconds, 2 * 86_400);
        assert_eq!(two_days.age_days, 2);

        let partial = TrashRecord::new(
            PathBuf::from("/t/info/b.trashinfo"),
            now - Duration::seconds(86_400 + 8_640),
            now,
        );
        assert_eq!(partial.age_days, 1);
    }

    #[test]
    fn test_future_deletion_time_floors_to_negative_days() {
        let now = base_time();
        let future = TrashRecord::new(
            PathBuf::from("/t/info/c.trashinfo"),
            now + Duration::seconds(43_200),
            now,
        );
        assert_eq!(future.age_seconds, -43_200);
        assert_eq!(future.age_days, -1);
    }

    #[test]
    fn test_new_record_has_no_size_and_is_not_deleted() {
        let now = base_time();
        let record = TrashRecord::new(
            PathBuf::from("/t/info/d.trashinfo"),
            now - Duration::days(1),
            now,
        );
        assert_eq!(record.size, None);
        assert!(!record.deleted);
    }

    #[test]
    fn test_base_name_uses_the_real_file() {
        let now = base_time();
        let record = TrashRecord::new(
            PathBuf::from("/t/info/core.1000.trashinfo"),
            now - Duration::days(1),
            now,
        );
        assert_eq!(record.base_name(), "core.1000");
    }
}
