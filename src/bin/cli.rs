//! Chain Pricer CLI
//!
//! # Price one contract
//! chain-pricer price --spot 150 --strike 150 --days 30 --vol 0.25
//!
//! # Fetch, price and report a live chain
//! chain-pricer chain --symbol SPY --max-expiries 2
//!
//! # Re-price a saved snapshot
//! chain-pricer file --path data/spy.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chain_pricer::prelude::*;

#[derive(Parser)]
#[command(name = "chain-pricer")]
#[command(about = "Black-Scholes fair values and mispricing across an option chain")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single contract
    Price {
        #[arg(long)]
        spot: f64,

        #[arg(long)]
        strike: f64,

        /// Calendar days to expiry (may be zero or negative)
        #[arg(long)]
        days: i64,

        /// Annualized volatility, e.g. 0.25
        #[arg(long)]
        vol: f64,

        #[arg(long, default_value_t = DEFAULT_RISK_FREE_RATE)]
        rate: f64,

        /// Price a put instead of a call
        #[arg(long)]
        put: bool,
    },

    /// Fetch a live chain from Yahoo Finance and report mispricing
    Chain {
        /// Underlying symbol (overrides config)
        #[arg(short, long)]
        symbol: Option<String>,

        /// Risk-free rate (overrides config)
        #[arg(long)]
        rate: Option<f64>,

        /// Only the nearest N expiries (overrides config)
        #[arg(long)]
        max_expiries: Option<usize>,

        /// Price on all cores
        #[arg(long)]
        parallel: bool,

        /// Bypass the snapshot cache
        #[arg(long)]
        no_cache: bool,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write the fetched snapshot to this file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Print priced contracts as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Price a snapshot saved with `chain --save`
    File {
        #[arg(short, long)]
        path: PathBuf,

        #[arg(long, default_value_t = DEFAULT_RISK_FREE_RATE)]
        rate: f64,

        #[arg(long)]
        parallel: bool,

        #[arg(long)]
        json: bool,
    },
}

fn cmd_price(spot: f64, strike: f64, days: i64, vol: f64, rate: f64, put: bool) -> ChainResult<()> {
    let kind = if put { OptionType::Put } else { OptionType::Call };
    let time = days as f64 / DAYS_PER_YEAR;
    let value = bs_price(spot, strike, time, rate, vol, kind)?;

    println!("Black-Scholes {}:", kind);
    println!("  Spot:   {:.2}", spot);
    println!("  Strike: {:.2}", strike);
    println!("  Time:   {} days ({:.5} years)", days, time);
    println!("  Rate:   {:.2}%", rate * 100.0);
    println!("  Vol:    {:.2}%", vol * 100.0);
    println!("  Price:  {:.4}", value);
    Ok(())
}

fn print_batch(batch: &BatchPricing, json: bool) -> ChainResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&batch.priced)?);
    } else {
        print!("{}", ChainReport::new(batch));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_chain(
    symbol: Option<String>,
    rate: Option<f64>,
    max_expiries: Option<usize>,
    parallel: bool,
    no_cache: bool,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    json: bool,
) -> ChainResult<()> {
    let mut config = match config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(symbol) = symbol {
        config.symbol = symbol;
    }
    if let Some(rate) = rate {
        config.risk_free_rate = rate;
    }
    if max_expiries.is_some() {
        config.max_expiries = max_expiries;
    }
    config.parallel |= parallel;
    if no_cache {
        config.cache.enabled = false;
    }
    config.validate()?;

    // The only clock read in the pipeline
    let as_of = as_of_date(chrono::Utc::now());
    let client = YahooClient::new()?;

    let snapshot = CachedFetcher::new(config.cache.clone())?.get_snapshot(
        &client,
        &client,
        &config.symbol,
        as_of,
        config.max_expiries,
    )?;

    if let Some(path) = save {
        snapshot.save_json(&path)?;
        info!("Saved snapshot to {:?}", path);
    }

    let batch = price_snapshot(&snapshot, config.risk_free_rate, config.parallel)?;
    print_batch(&batch, json)
}

fn cmd_file(path: PathBuf, rate: f64, parallel: bool, json: bool) -> ChainResult<()> {
    let snapshot = ChainSnapshot::load_json(&path)?;
    info!(
        "Loaded {} contracts for {} from {:?}",
        snapshot.total_contracts(),
        snapshot.underlying,
        path
    );

    let batch = price_snapshot(&snapshot, rate, parallel)?;
    print_batch(&batch, json)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chain_pricer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Price {
            spot,
            strike,
            days,
            vol,
            rate,
            put,
        } => cmd_price(spot, strike, days, vol, rate, put),
        Commands::Chain {
            symbol,
            rate,
            max_expiries,
            parallel,
            no_cache,
            config,
            save,
            json,
        } => cmd_chain(symbol, rate, max_expiries, parallel, no_cache, config, save, json),
        Commands::File {
            path,
            rate,
            parallel,
            json,
        } => cmd_file(path, rate, parallel, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
