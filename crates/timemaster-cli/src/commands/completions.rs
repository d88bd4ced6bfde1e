use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

pub fn run(shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    clap_complete::generate(shell, &mut Cli::command(), "timemaster", &mut std::io::stdout());
    Ok(())
}
