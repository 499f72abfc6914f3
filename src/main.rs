use std::path::PathBuf;
use std::process;

use log::error;

use riverkit::commands::{build_cli, CommandFactory, RiverkitCommandFactory};
use riverkit::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let log_file = matches.get_one::<String>("log-file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("riverkit.log"));
    let level = Logger::level_for(matches.get_flag("verbose"));

    if let Err(e) = Logger::init_global_logger(&log_file, level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = RiverkitCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
