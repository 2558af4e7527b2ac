pub mod commands;
pub mod parser;

pub use parser::Cli;

use crate::utils::Result;

/// Entry point shared by the binary and the integration tests:
/// validate the flags, then either install the timer unit or run a
/// pruning pass.
pub fn execute_command(cli: Cli) -> Result<()> {
    cli.validate()?;
    if cli.install {
        return commands::install::execute();
    }
    commands::prune::execute(&cli)
}
