use clap::Parser;
use stl_organizer::cli::{Cli, run_cli};
use stl_organizer::output::OutputFormatter;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(&cli) {
        OutputFormatter::error(&e);
        process::exit(1);
    }
}
