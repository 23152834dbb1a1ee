mod commands;
mod error;
pub mod exit_codes;
pub mod output;

pub use commands::{Cli, Commands, ConfigCommands, RuleArgs};
pub use error::CliError;

use output::OutputMode;

/// run a parsed command line and return the process exit code
///
/// errors go to stdout as a JSON-RPC error in JSON mode, else to stderr
pub fn run(cli: Cli) -> i32 {
    let mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match commands::execute(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            if mode.is_json() {
                output::print_json_error(err.code, &err.message, err.suggestions);
            } else {
                eprintln!("Error: {}", err.message);
                if !err.suggestions.is_empty() {
                    eprintln!("Did you mean: {}", err.suggestions.join(", "));
                }
            }
            err.code
        }
    }
}
