//! Command pattern interfaces
//!
//! Each CLI operation is a `Command`; the factory picks one from the
//! parsed arguments.

use crate::errors::RiverResult;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> RiverResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Create the Command selected by the CLI arguments
    fn create_command(&self, args: &clap::ArgMatches) -> RiverResult<Box<dyn Command>>;
}
