//! Pipeline driver and main loop.

use crate::broker::{PaperBroker, PaperFill};
use crate::config::AppConfig;
use crate::contract::ActionContract;
use crate::decision::{Decider, HoldDecider};
use crate::error::{AppError, AppResult};
use crate::risk::RiskGate;
use kpa_core::{IndicatorSnapshot, ResolvedPair, Timeframe};
use kpa_feed::CandleFetcher;
use kpa_registry::SymbolRegistry;
use kpa_rest::PublicClient;
use kpa_telemetry::Metrics;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Quote currency used by `--auto-eur`.
const AUTO_QUOTE: &str = "EUR";

/// Outcome of one pipeline cycle for one pair.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub pair: ResolvedPair,
    pub candle_count: usize,
    pub snapshot: IndicatorSnapshot,
    pub decision: ActionContract,
    /// Present when the gated decision was not `hold` and a price was known.
    pub fill: Option<PaperFill>,
}

/// One-pair pipeline: resolve, fetch, compute, decide, gate, record.
pub struct Pipeline {
    registry: SymbolRegistry,
    fetcher: CandleFetcher,
    decider: Box<dyn Decider>,
    risk: RiskGate,
    broker: PaperBroker,
    timeframe: Timeframe,
    candle_limit: usize,
}

impl Pipeline {
    /// Build from config over `client`, with the hold decider.
    pub fn new(config: &AppConfig, client: PublicClient) -> AppResult<Self> {
        Ok(Self {
            registry: SymbolRegistry::new(client.clone()),
            fetcher: CandleFetcher::new(client),
            decider: Box::new(HoldDecider),
            risk: RiskGate::from_config(config),
            broker: PaperBroker::new(config.fee_bps),
            timeframe: config.parsed_timeframe()?,
            candle_limit: config.candle_limit,
        })
    }

    /// Replace the decider.
    pub fn with_decider(mut self, decider: Box<dyn Decider>) -> Self {
        self.decider = decider;
        self
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn broker(&self) -> &PaperBroker {
        &self.broker
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Run one cycle for `user_pair`.
    pub async fn run_cycle(&mut self, user_pair: &str) -> AppResult<CycleReport> {
        let pair = self.registry.resolve(user_pair).await?;

        let candles = self
            .fetcher
            .fetch(&pair.internal_code, self.timeframe, None, self.candle_limit)
            .await?;

        let snapshot = kpa_indicators::compute(&candles, self.timeframe.as_str());
        if let Some(price) = snapshot.price {
            Metrics::last_price(&pair.name, price);
        }
        debug!(pair = %pair, ?snapshot, "Indicators computed");

        let proposal = self.decider.decide(&snapshot, self.broker.position());
        let decision = self.risk.check_and_gate(proposal);

        let fill = match (decision.action.is_hold(), snapshot.price) {
            (false, Some(price)) => Some(self.broker.submit(&decision, price)),
            (false, None) => {
                warn!(pair = %pair, action = %decision.action, "No price, skipping paper fill");
                None
            }
            (true, _) => None,
        };

        info!(
            pair = %pair,
            timeframe = %self.timeframe,
            candles = candles.len(),
            price = ?snapshot.price,
            rsi = ?snapshot.rsi,
            ema_cross = ?snapshot.ema_cross,
            decider = self.decider.name(),
            action = %decision.action,
            "Cycle complete"
        );

        Ok(CycleReport {
            pair,
            candle_count: candles.len(),
            snapshot,
            decision,
            fill,
        })
    }
}

/// Per-run options taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Paper mode acknowledged; required to start.
    pub paper: bool,
    /// Trade every EUR-quoted pair instead of `default_pair`.
    pub auto_eur: bool,
    /// Run a single cycle and exit.
    pub dry_run: bool,
}

impl RunOptions {
    /// Refuse to start without paper mode.
    pub fn ensure_paper(&self) -> AppResult<()> {
        if self.paper {
            Ok(())
        } else {
            Err(AppError::LiveTradingDisabled)
        }
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    options: RunOptions,
    pipeline: Pipeline,
}

impl Application {
    /// Create the application with the reqwest transport.
    pub fn new(config: AppConfig, options: RunOptions) -> AppResult<Self> {
        let client = PublicClient::http(config.api_base_url.clone(), config.retry)?;
        Self::with_client(config, options, client)
    }

    /// Create the application over an existing client.
    pub fn with_client(
        config: AppConfig,
        options: RunOptions,
        client: PublicClient,
    ) -> AppResult<Self> {
        options.ensure_paper()?;
        config.validate()?;

        let pipeline = Pipeline::new(&config, client)?;
        Ok(Self {
            config,
            options,
            pipeline,
        })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Pairs traded this cycle.
    pub async fn target_pairs(&self) -> AppResult<Vec<String>> {
        if !self.options.auto_eur {
            return Ok(vec![self.config.default_pair.clone()]);
        }

        let pairs = self.pipeline.registry().list_quoted_in(AUTO_QUOTE).await?;
        if pairs.is_empty() {
            warn!(quote = AUTO_QUOTE, "No pairs found for quote currency");
        }
        Ok(pairs)
    }

    /// Run one cycle over every target pair.
    ///
    /// A failing pair is logged and skipped; only a failure to determine the
    /// target pairs is returned.
    pub async fn run_once(&mut self) -> AppResult<Vec<CycleReport>> {
        let pairs = self.target_pairs().await?;
        let mut reports = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let started = Instant::now();
            let result = self.pipeline.run_cycle(&pair).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

            match result {
                Ok(report) => {
                    Metrics::cycle("ok", elapsed_ms);
                    reports.push(report);
                }
                Err(e) => {
                    Metrics::cycle("failed", elapsed_ms);
                    warn!(pair = %pair, error = %e, "Cycle failed, skipping");
                }
            }
        }

        Ok(reports)
    }

    /// Run until Ctrl-C, or once with `dry_run`.
    pub async fn run(mut self) -> AppResult<()> {
        info!(
            pair = %self.config.default_pair,
            timeframe = %self.pipeline.timeframe(),
            auto_eur = self.options.auto_eur,
            dry_run = self.options.dry_run,
            "Starting in PAPER mode"
        );

        if self.options.dry_run {
            let reports = self.run_once().await?;
            info!(cycles = reports.len(), "Dry run complete");
            self.log_metrics();
            return Ok(());
        }

        let interval = self.config.loop_interval();
        let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = interval.as_secs(), "Entering main loop");
        let mut cycles = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    cycles += 1;
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "Cycle setup failed");
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!(
            cycles,
            fills = self.pipeline.broker().fills().len(),
            "Shutting down"
        );
        self.log_metrics();
        Ok(())
    }

    fn log_metrics(&self) {
        match Metrics::render() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to render metrics"),
        }
    }
}
