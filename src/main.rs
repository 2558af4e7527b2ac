use clap::Parser;

use binsweep::cli::{execute_command, Cli};
use binsweep::utils::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = execute_command(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
