use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use signal_desk::{
    dispatch::{
        dispatcher::Dispatcher,
        types::{DispatchMode, TickResult},
    },
    market::{
        market_snapshot::MarketSnapshot,
        market_source::{JsonLinesSource, SnapshotSource},
        synthetic::SyntheticMarket,
    },
    types::{instrument::Symbol, trading_rules::DeskConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Single-instrument when the snapshot holds only the legacy product.
    Auto,
    Single,
    Multi,
}

#[derive(Debug, Clone, Parser)]
#[command(about = "Replays market snapshots through the per-instrument strategies")]
struct Args {
    /// YAML instrument roster; the built-in roster when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON-lines snapshots; a synthetic random-walk market when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, default_value_t = 1_000)]
    pub ticks: usize,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    #[arg(long, value_enum, default_value = "auto")]
    pub mode: ModeArg,

    /// Overrides the roster's legacy single-product instrument.
    #[arg(long)]
    pub legacy_product: Option<String>,
}

#[derive(Serialize)]
struct TickLine<'a> {
    timestamp: u64,
    #[serde(flatten)]
    result: &'a TickResult,
}

fn mode_for(mode: ModeArg, snapshot: &MarketSnapshot, legacy_product: &Symbol) -> DispatchMode {
    match mode {
        ModeArg::Auto => DispatchMode::infer(snapshot, legacy_product),
        ModeArg::Single => DispatchMode::SingleInstrument(legacy_product.clone()),
        ModeArg::Multi => DispatchMode::MultiInstrument,
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signal_desk=info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::builtin()?.clone(),
    };
    let legacy_product = args
        .legacy_product
        .as_deref()
        .map(Symbol::new)
        .unwrap_or_else(|| config.legacy_product.clone());

    let mut dispatcher = Dispatcher::from_config(&config)?;

    let mut source: Box<dyn SnapshotSource> = match &args.input {
        Some(path) => Box::new(JsonLinesSource::open(path)?),
        None => {
            info!(ticks = args.ticks, seed = args.seed, "replaying synthetic market");
            Box::new(SyntheticMarket::new(
                config.instruments.keys().cloned(),
                args.seed,
                args.ticks,
            ))
        }
    };

    info!(
        instruments = dispatcher.len(),
        mode = ?args.mode,
        %legacy_product,
        "replay started"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    let mut ticks = 0usize;
    let mut orders = 0usize;

    while let Some(snapshot) = source.next_snapshot()? {
        let mode = mode_for(args.mode, &snapshot, &legacy_product);
        let result = dispatcher.on_tick(&mode, &snapshot);

        ticks += 1;
        orders += result.all_orders().count();

        let line = TickLine {
            timestamp: snapshot.timestamp,
            result: &result,
        };
        serde_json::to_writer(&mut out, &line).context("failed to write tick result")?;
        out.write_all(b"\n")?;
    }

    out.flush()?;
    info!(ticks, orders, "replay finished");

    Ok(())
}
