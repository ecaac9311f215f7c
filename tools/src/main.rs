//! irf-runner: headless vendor risk index runner.
//!
//! Usage:
//!   irf-runner --orders book.json --predictions predictions.json --as-of 2025-06-30
//!   irf-runner --synthetic 12345 --db history.db
//!   irf-runner --orders book.json --predictions p.json --data-dir ./data --json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use irf_core::{
    config::IrfConfig,
    order::{OrderBook, OrderRow},
    pipeline::{RiskPipeline, RiskReport},
    prediction::{PredictionResult, StaticPredictions},
    store::IrfStore,
    synth::{self, SynthParams},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let as_of = match arg_value(&args, "--as-of") {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("--as-of must be YYYY-MM-DD, got {s}"))?,
        None => chrono::Local::now().date_naive(),
    };
    let json_output = args.iter().any(|a| a == "--json");

    let config = match arg_value(&args, "--data-dir") {
        Some(dir) => IrfConfig::load(dir)?,
        None => IrfConfig::default(),
    };

    let (book, predictions) = match arg_value(&args, "--synthetic") {
        Some(seed) => {
            let seed: u64 = seed.parse().context("--synthetic expects a numeric seed")?;
            log::info!("Generating synthetic order book from seed {seed}");
            let synthetic = synth::generate(seed, &SynthParams::new(as_of));
            (synthetic.book, synthetic.predictions)
        }
        None => {
            let orders_path = arg_value(&args, "--orders")
                .context("--orders <file> is required unless --synthetic is given")?;
            let predictions_path = arg_value(&args, "--predictions")
                .context("--predictions <file> is required unless --synthetic is given")?;
            (load_orders(orders_path)?, load_predictions(predictions_path)?)
        }
    };

    if !json_output {
        println!("IRF: vendor risk index");
        println!("  as of:        {as_of}");
        println!("  order lines:  {}", book.len());
        println!("  predictions:  {}", predictions.len());
        println!();
    }

    let pipeline = RiskPipeline::new(config);
    let report = pipeline.run(&book, &predictions, as_of)?;

    if let Some(db) = arg_value(&args, "--db") {
        let store = IrfStore::open(db)?;
        store.migrate()?;
        let run_id = format!("irf-{as_of}-{}", uuid::Uuid::new_v4());
        store.insert_run(&run_id, as_of, env!("CARGO_PKG_VERSION"))?;
        store.save_report(&run_id, &report)?;
        log::info!("Run {run_id} saved to {db}");
        if !json_output {
            println!("  saved as run: {run_id}");
            println!();
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_matrix(&report);
    }
    Ok(())
}

fn load_orders(path: &str) -> Result<OrderBook> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
    let rows: Vec<OrderRow> =
        serde_json::from_str(&content).with_context(|| format!("Cannot parse {path}"))?;
    Ok(OrderBook::new(rows))
}

fn load_predictions(path: &str) -> Result<StaticPredictions> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
    let results: Vec<PredictionResult> =
        serde_json::from_str(&content).with_context(|| format!("Cannot parse {path}"))?;
    Ok(StaticPredictions::new(results))
}

fn print_matrix(report: &RiskReport) {
    println!("=== VENDOR RISK MATRIX ===");
    println!(
        "  {:>4}  {:<28} {:>10}  {:>5} {:>5} {:>6}  {:>4} {:>5}  {:>12} {:>6} {:>6}  {:>7}",
        "rank", "vendor", "id", "ok", "late", "rate", "load", "ratio", "value", "vrate", "conf", "risk"
    );
    for row in &report.vendors {
        println!(
            "  {:>4}  {:<28} {:>10}  {:>5} {:>5} {:>6.2}  {:>4} {:>5.2}  {:>12.2} {:>6.2} {:>6.2}  {:>7.2}",
            row.rank,
            truncate(row.vendor_name.as_deref().unwrap_or("-"), 28),
            row.vendor_id,
            row.orders_on_time,
            row.orders_late,
            row.rate_on_time,
            row.mean_load,
            row.load_ratio,
            row.value_total,
            row.rate_value,
            row.mean_confidence,
            row.risk_index,
        );
    }
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  vendors scored:   {}", report.vendors.len());
    println!("  open orders:      {}", report.orders.len());
    println!("  forced late:      {}", report.forced_late_count());
    println!("  vendors w/ load:  {}", report.vendor_loads.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
