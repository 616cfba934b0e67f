use clap::Parser;
use dirsort::cli::{Cli, run_cli};
use dirsort::logging::{init_logging, level_for};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(level_for(cli.verbose, cli.quiet));

    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
