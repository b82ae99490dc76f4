mod cmd;

use clap::Parser;

use cmd::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show(a) => a.run(),
        Commands::Simulate(a) => a.run(),
        Commands::Atpg(a) => a.run(),
    }
}
