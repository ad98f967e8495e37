//! Command-line enumerator of small comb programs.

mod cli;
mod output;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use comb_core::GuideConfig;
use comb_gen::EnumerationDriver;
use comb_guide::{BfsGuide, RandomGuide};
use comb_ir::{Printer, PrinterConfig};
use tracing::info;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    telemetry::init_telemetry(cli.log_json)?;

    let config = cli.to_config()?;
    config.validate().context("invalid configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(
        fuel = config.generator.fuel,
        arguments = config.generator.arguments.len(),
        destination = %config.output.destination,
        "Starting comb fuzzer"
    );

    let printer = Printer::new(PrinterConfig {
        generic: cli.generic,
        ..Default::default()
    });
    let mut sink = output::OutputSink::open(&config.output, printer)?;
    let driver = EnumerationDriver::new(config.generator.clone());

    let stats = match config.guide {
        GuideConfig::Bfs { max_choosers } => {
            let mut guide = match max_choosers {
                Some(max) => BfsGuide::new().with_max_choosers(max),
                None => BfsGuide::new(),
            };
            driver.run(&mut guide, &mut sink)?
        }
        GuideConfig::Random { seed, samples } => {
            driver.run(&mut RandomGuide::new(seed, samples), &mut sink)?
        }
    };
    sink.finish().context("failed to flush output")?;

    info!(
        accepted = stats.accepted,
        attempts = stats.attempts,
        "Acceptance rate {:.2}%",
        stats.acceptance_rate() * 100.0
    );

    Ok(())
}
