mod cli;

use anyhow::Result;
use clap::Parser;
use sessionlist::config::Config;
use tracing_subscriber::EnvFilter;

use cli::{dispatch, Cli};

/// Logs go to stderr so stdout only carries server replies.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug output for
/// this crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,sessionlist=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    dispatch(cli.command, &config)
}
