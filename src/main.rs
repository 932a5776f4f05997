use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::Context;
use clap::Parser;
use shelfmark::catalog::Catalog;
use shelfmark::config::{Cli, RunConfig};
use shelfmark::session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = RunConfig::resolve(Cli::parse()).context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let input = File::open(&config.input).with_context(|| format!("failed to open {}", config.input.display()))?;
    let output =
        File::create(&config.output).with_context(|| format!("failed to create {}", config.output.display()))?;

    let mut catalog = Catalog::new();
    let summary = session::run(&mut catalog, BufReader::new(input), BufWriter::new(output))
        .with_context(|| format!("failed while running {}", config.input.display()))?;

    tracing::info!(
        executed = summary.executed,
        rejected = summary.rejected,
        quit = summary.quit,
        books = catalog.len(),
        color_flips = catalog.color_flip_count(),
        "run finished"
    );
    println!("Output written to {}", config.output.display());
    Ok(())
}
