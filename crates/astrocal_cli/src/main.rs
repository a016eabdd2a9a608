use std::process;

use anyhow::Result;
use clap::Parser;

use astrocal_cli::cli::{Cli, Command};
use astrocal_cli::{logging, pipeline};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => pipeline::run(&args),
    }
}
