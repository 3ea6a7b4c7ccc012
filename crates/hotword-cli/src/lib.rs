pub mod cli;
pub mod commands;
pub mod logging;

use clap::Parser;
use cli::{Commands, Hotword};
use commands::handle_command;
use std::process;

/// Run the hotword CLI application
pub fn run_main() {
    let args = Hotword::parse();

    let default_level = match args.commands {
        Some(Commands::DaemonWorker) | Some(Commands::Run { .. }) => "info",
        _ => "warn",
    };
    logging::init_logging(default_level);

    if let Err(e) = handle_command(args.commands) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
