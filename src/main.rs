use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tagsel::cli::{self, Cli};

/// overrides the default filter, e.g. `TAGSEL_LOG=tagsel=trace`
const LOG_ENV_VAR: &str = "TAGSEL_LOG";

fn main() {
    // handle broken pipe gracefully (e.g., when piping to `head` or `jq` that exits early)
    reset_sigpipe();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    std::process::exit(cli::run(cli));
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
/// this is the standard Unix behavior for CLI tools
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// log to stderr so stdout stays machine-readable
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tagsel=debug")
        } else {
            EnvFilter::new("tagsel=warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}
