use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

use directories::BaseDirs;

use crate::utils::{BinsweepError, Result};

const TIMER_UNIT: &str = "\
[Unit]
Description=Empty trash

[Timer]
OnCalendar=daily
Persistent=true

[Install]
WantedBy=timers.target
";

/// Install a daily systemd user timer that reruns the current
/// invocation, minus the `--install` flag itself.
pub fn execute() -> Result<()> {
    if !systemctl_available() {
        return Err(BinsweepError::invalid_args(
            "the system must support systemd to use --install",
        ));
    }

    let executable = env::current_exe().map_err(|e| {
        BinsweepError::fs_error(format!("can not locate the running executable: {}", e))
    })?;
    let rerun_args: Vec<String> = env::args()
        .skip(1)
        .filter(|arg| arg != "--install")
        .collect();
    let service_unit = service_unit_for(&executable.to_string_lossy(), &rerun_args);

    let base = BaseDirs::new()
        .ok_or_else(|| BinsweepError::fs_error("unable to determine the user's home directory"))?;
    let systemd_dir = base.config_dir().join("systemd").join("user");
    fs::create_dir_all(&systemd_dir).map_err(|e| {
        BinsweepError::fs_error(format!("failed to create {}: {}", systemd_dir.display(), e))
    })?;

    write_unit(&systemd_dir.join("binsweep.timer"), TIMER_UNIT)?;
    write_unit(&systemd_dir.join("binsweep.service"), &service_unit)?;
    log::info!("service installed to \"{}\"", systemd_dir.display());

    run_systemctl(&["--user", "enable", "binsweep.timer"])?;
    log::info!("checking that the service is working...");
    run_systemctl(&["--user", "start", "binsweep"])?;
    log::info!("service is working");
    Ok(())
}

fn service_unit_for(executable: &str, args: &[String]) -> String {
    format!(
        "\
[Unit]
Description=Empty trash

[Service]
Type=oneshot
ExecStart=\"{}\" {}
",
        executable,
        shell_join(args)
    )
}

fn write_unit(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .map_err(|e| BinsweepError::fs_error(format!("failed to write {}: {}", path.display(), e)))
}

fn run_systemctl(args: &[&str]) -> Result<()> {
    let output = Command::new("systemctl")
        .args(args)
        .output()
        .map_err(|e| BinsweepError::fs_error(format!("failed to run systemctl: {}", e)))?;
    if !output.status.success() {
        return Err(BinsweepError::fs_error(format!(
            "systemctl {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

fn systemctl_available() -> bool {
    Command::new("which")
        .arg("systemctl")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Join argv back into one ExecStart-compatible command line, quoting
/// arguments that would otherwise split.
fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| quote_arg(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    let needs_quoting =
        arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if !needs_quoting {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_timer_unit_runs_daily_and_persists() {
        assert!(TIMER_UNIT.contains("OnCalendar=daily"));
        assert!(TIMER_UNIT.contains("Persistent=true"));
        assert!(TIMER_UNIT.contains("WantedBy=timers.target"));
    }

    #[test]
    fn test_service_unit_reruns_the_surviving_flags() {
        let unit = service_unit_for(
            "/usr/local/bin/binsweep",
            &["-d".to_string(), "30".to_string(), "--stat".to_string()],
        );
        assert!(unit.contains("Type=oneshot"));
        assert!(unit.contains("ExecStart=\"/usr/local/bin/binsweep\" -d 30 --stat"));
    }

    #[test]
    fn test_shell_join_quotes_awkward_arguments() {
        let joined = shell_join(&[
            "-T".to_string(),
            "/mnt/my disk/.Trash-1000".to_string(),
            "-D".to_string(),
            "^report \"final\"".to_string(),
        ]);
        assert_eq!(
            joined,
            "-T \"/mnt/my disk/.Trash-1000\" -D \"^report \\\"final\\\"\""
        );
    }

    #[test]
    fn test_plain_arguments_stay_unquoted() {
        assert_eq!(quote_arg("--min-free"), "--min-free");
        assert_eq!(quote_arg("500"), "500");
        assert_eq!(quote_arg(""), "\"\"");
    }

    #[test]
    fn test_write_unit_creates_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("binsweep.timer");
        write_unit(&path, TIMER_UNIT).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), TIMER_UNIT);
    }
}
