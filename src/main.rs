//! Marketplace publisher - upload an extension archive to the marketplace
//!
//! Exits 0 when the marketplace answered HTTP 200 (or on a dry run), 1 on a
//! rejected upload or network failure, 2 on invalid input.

use marketplace_publish::cli::Cli;
use marketplace_publish::config::ProcessEnv;
use marketplace_publish::file_reader::SearchRoots;
use marketplace_publish::publish::publish;
use marketplace_publish::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

/// Main application entry point
#[allow(clippy::print_stderr)]
fn run() -> i32 {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    match execute(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            err.exit_code()
        }
    }
}

/// Execute the publish command
fn execute(cli: &Cli) -> Result<()> {
    tracing::debug!("marketplace-publish v{}", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    publish(
        &cli.options(),
        cli.flags(),
        &ProcessEnv,
        &SearchRoots::from_env(),
        &mut out,
    )
}

/// Log to stderr; `--debug` raises the level, `RUST_LOG` overrides both
fn init_logging(debug: bool) {
    let default = if debug {
        "marketplace_publish=debug"
    } else {
        "marketplace_publish=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
