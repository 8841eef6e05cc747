mod cli;
mod output;

use anyhow::{Context, Result};
use benchcmp_core::{render_report, BenchcmpConfig, CompareError, Comparison};
use clap::Parser;
use std::io::Write;

use crate::cli::{Args, Inputs};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let inputs = Inputs::split(&args.inputs);
    if inputs.files.is_empty() {
        output::print_usage();
        std::process::exit(1);
    }

    let mut config = BenchcmpConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    config.compare.ignore.extend(args.ignore);
    config.compare.ignore.extend(inputs.ignore);
    log::debug!(
        "comparing {} files, ignoring {:?}",
        inputs.files.len(),
        config.compare.ignore
    );

    let comparison = match Comparison::from_files(&inputs.files, &config.compare) {
        Ok(comparison) => comparison,
        Err(e @ CompareError::InconsistentTestset { .. }) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to compare runs"),
    };

    let report = render_report(&comparison).context("Failed to render report")?;
    output::print_exclusion_note(comparison.reconciliation.excluded.len());
    output::write_report(std::io::stdout().lock(), &report)
        .context("Failed to write report")?;

    Ok(())
}
