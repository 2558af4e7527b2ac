use std::io::Write;

use log::LevelFilter;

/// Set up the process-wide logger.
///
/// Output is plain messages without timestamps or module prefixes so
/// the tool reads like any other shell utility. `RUST_LOG` still wins
/// over the flag-derived level when set.
pub fn init(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .parse_default_env()
        .init();
}
