//! Kraken paper-trading agent - entry point.

use anyhow::Result;
use clap::Parser;
use kpa_agent::{AppConfig, Application, RunOptions};
use std::process::ExitCode;
use tracing::{error, info};

/// Exit code when started without `--paper`.
const EXIT_LIVE_TRADING_DISABLED: u8 = 2;

/// Paper-trading agent (Kraken market data)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via KPA_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Trading pair, e.g. BTC/EUR
    #[arg(long)]
    pair: Option<String>,

    /// Candle timeframe (1m, 5m, 15m, 1h, 4h)
    #[arg(long)]
    timeframe: Option<String>,

    /// REQUIRED: enforce paper trading only
    #[arg(long)]
    paper: bool,

    /// Trade all EUR-quoted pairs
    #[arg(long)]
    auto_eur: bool,

    /// Seconds between cycles
    #[arg(long)]
    loop_interval: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let options = RunOptions {
        paper: args.paper,
        auto_eur: args.auto_eur,
        dry_run: args.dry_run,
    };
    // Checked before the config is read: a broken config must not mask it
    if let Err(e) = options.ensure_paper() {
        eprintln!("{e}");
        return Ok(ExitCode::from(EXIT_LIVE_TRADING_DISABLED));
    }

    let mut config = AppConfig::load(args.config.as_deref())?;

    let _log_guard =
        kpa_telemetry::init_logging(&config.telemetry.log_level, config.telemetry.log_dir())?;

    info!("Starting kpa-agent v{}", env!("CARGO_PKG_VERSION"));

    if let Some(pair) = args.pair {
        config.default_pair = pair;
    }
    if let Some(timeframe) = args.timeframe {
        config.timeframe = timeframe;
    }
    if let Some(secs) = args.loop_interval {
        config.loop_interval_secs = secs;
    }

    let app = match Application::new(config, options) {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    };

    app.run().await?;

    info!("Exit");
    Ok(ExitCode::SUCCESS)
}
