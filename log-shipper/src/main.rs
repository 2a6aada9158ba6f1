//! Ship lines read from stdin to Loki, one entry per line.
use envconfig::Envconfig;
use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing_subscriber::EnvFilter;

use log_shipper::config::Config;
use log_shipper::console::DEFAULT_FILTER;
use log_shipper::{Level, LogShipper, Metadata};

fn report(result: Result<(), JoinError>) {
    if let Err(e) = result {
        tracing::error!("log delivery task failed: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .init();

    let config = Config::init_from_env()?;
    let level = match std::env::args().nth(1) {
        Some(level) => level.parse::<Level>().map_err(|e| eyre::eyre!("{}", e))?,
        None => Level::Info,
    };

    let shipper = LogShipper::new(&config)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        shipper.dispatch_into(&mut in_flight, level, line, Metadata::new());

        while let Some(result) = in_flight.try_join_next() {
            report(result);
        }
    }

    while let Some(result) = in_flight.join_next().await {
        report(result);
    }

    Ok(())
}
