// fsbasics: exercises a directory with basic filesystem operations and
// reports pass/fail per test.
// Usage: fsbasics [--quick | --combined N] [--directory DIR] ...

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use fsbasics::report::{
    BarProgress, ConsoleReporter, FileLogger, Logger, NullLogger, NullProgress, ProgressIndicator,
};
use fsbasics::{logging, Cli, Config, Driver};

fn main() -> ExitCode {
    // Usage errors exit with status 2, --help with 0.
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fsbasics: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli).context("invalid configuration")?;
    logging::init(config.verbose);
    tracing::debug!(?config, "resolved configuration");

    let mut reporter = ConsoleReporter::stdout();
    let mut progress: Box<dyn ProgressIndicator> = if config.verbose {
        Box::new(BarProgress::new())
    } else {
        Box::new(NullProgress::default())
    };
    let mut logger: Box<dyn Logger> = match &config.log_file {
        Some(path) => Box::new(FileLogger::new(path)),
        None => Box::new(NullLogger),
    };

    // Individual failures are reported, not reflected in the exit status.
    Driver::new(&config, &mut reporter, progress.as_mut(), logger.as_mut()).run();
    Ok(())
}
