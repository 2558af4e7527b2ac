use crate::cli::parser::Cli;
use crate::core::access::RealTrashAccess;
use crate::core::discovery;
use crate::core::engine::SelectionEngine;
use crate::core::stats::RunStats;
use crate::utils::{BinsweepError, Result};

/// One full pruning pass over every configured trash directory.
pub fn execute(cli: &Cli) -> Result<()> {
    let policy = cli.policy()?;
    let trash_dirs =
        discovery::find_trash_directories(cli.trash_path.as_deref(), cli.trash_mounts)?;

    let access = RealTrashAccess;
    let engine = SelectionEngine::new(&access);
    let mut stats = RunStats::new();

    for trash_dir in &trash_dirs {
        let info_dir = trash_dir.join("info");
        if !info_dir.exists() {
            return Err(BinsweepError::fs_error(format!(
                "can not find trash information directory: {}",
                info_dir.display()
            )));
        }
        engine.process_directory(&info_dir, &policy, &mut stats)?;
    }

    if policy.compute_stats {
        stats.report();
    }
    if stats.has_failures() {
        return Err(BinsweepError::failures(stats.failures));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::add_trash_entry;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli_for(trash_root: &std::path::Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "binsweep".to_string(),
            "-T".to_string(),
            trash_root.to_string_lossy().into_owned(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_missing_info_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cli = cli_for(&temp.path().join("no-trash-here"), &["-d", "1"]);
        let err = execute(&cli).unwrap_err();
        assert!(err
            .to_string()
            .contains("can not find trash information directory"));
    }

    #[test]
    fn test_age_pass_removes_only_old_entries() {
        let temp = TempDir::new().unwrap();
        let old = add_trash_entry(temp.path(), "old.txt", "2019-01-01T00:00:00", b"old");
        let new_info = add_trash_entry(temp.path(), "new.txt", "2999-01-01T00:00:00", b"new");

        let cli = cli_for(temp.path(), &["-d", "30"]);
        execute(&cli).unwrap();

        assert!(!old.exists());
        assert!(!temp.path().join("files").join("old.txt").exists());
        assert!(new_info.exists());
        assert!(temp.path().join("files").join("new.txt").exists());
    }

    #[test]
    fn test_unreadable_records_fail_the_run_but_not_the_pass() {
        let temp = TempDir::new().unwrap();
        let bad = add_trash_entry(temp.path(), "bad.txt", "never", b"bad");
        let old = add_trash_entry(temp.path(), "old.txt", "2019-01-01T00:00:00", b"old");

        let cli = cli_for(temp.path(), &["-d", "30"]);
        let err = execute(&cli).unwrap_err();

        assert!(matches!(err, BinsweepError::Failures(1)));
        assert!(!old.exists(), "the readable record must still be purged");
        assert!(bad.exists(), "the unreadable record is left in place");
    }
}
