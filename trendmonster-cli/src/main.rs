//! TrendMonster CLI — signal, allocation and params commands.
//!
//! Commands:
//! - `signal` — full signal from confirmed closes, optionally diffed against a
//!   held allocation; prints a summary or the JSON record
//! - `allocation` — target allocation percentages only
//! - `params` — print the effective strategy parameters as TOML

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use trendmonster_core::{
    calculate_allocation_with, classify_trend, MarketSnapshot, Signal, SignalGenerator,
    StrategyParams,
};

#[derive(Parser)]
#[command(
    name = "trendmonster",
    about = "TrendMonster CLI — trend + volatility-ratio tactical allocation signal"
)]
struct Cli {
    /// Log verbosity: -v for info, -vv for debug. RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct MarketArgs {
    /// Weekly close of the trend instrument (e.g. SPY Friday close).
    #[arg(long)]
    price: Option<f64>,

    /// Trend moving average (e.g. 50-week SMA).
    #[arg(long)]
    sma: Option<f64>,

    /// Weekly close history, oldest first; replaces --price and --sma.
    #[arg(long, value_delimiter = ',')]
    weekly_closes: Option<Vec<f64>>,

    /// Near-term volatility index close (e.g. VIX).
    #[arg(long)]
    vix: f64,

    /// Longer-term volatility index close (e.g. VIX3M).
    #[arg(long)]
    vix3m: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full signal.
    Signal {
        #[command(flatten)]
        market: MarketArgs,

        /// Held allocation as three weights: equity_a,equity_b,cash.
        #[arg(long, value_delimiter = ',')]
        current: Option<Vec<f64>>,

        /// As-of time of the weekly close (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS).
        #[arg(long)]
        weekly_as_of: Option<String>,

        /// As-of time of the daily close (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS).
        #[arg(long)]
        daily_as_of: Option<String>,

        /// Path to a TOML params file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the JSON record instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the target allocation only.
    Allocation {
        #[command(flatten)]
        market: MarketArgs,

        /// Path to a TOML params file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective strategy parameters.
    Params {
        /// Path to a TOML params file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Signal {
            market,
            current,
            weekly_as_of,
            daily_as_of,
            config,
            json,
        } => run_signal(
            market,
            current,
            weekly_as_of.as_deref(),
            daily_as_of.as_deref(),
            config.as_deref(),
            json,
        ),
        Commands::Allocation { market, config } => run_allocation(market, config.as_deref()),
        Commands::Params { config } => run_params(config.as_deref()),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_params(config: Option<&Path>) -> Result<StrategyParams> {
    match config {
        Some(path) => {
            let params = StrategyParams::from_file(path)?;
            let params_hash = params.params_hash()?;
            debug!(path = %path.display(), %params_hash, "loaded params");
            Ok(params)
        }
        None => Ok(StrategyParams::default()),
    }
}

fn build_snapshot(market: &MarketArgs, params: &StrategyParams) -> Result<MarketSnapshot> {
    match (&market.weekly_closes, market.price, market.sma) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("--weekly-closes and --price/--sma are mutually exclusive")
        }
        (Some(closes), None, None) => Ok(MarketSnapshot::from_weekly_closes(
            closes,
            params.sma_weeks,
            market.vix,
            market.vix3m,
        )?),
        (None, Some(price), Some(sma)) => {
            Ok(MarketSnapshot::new(price, sma, market.vix, market.vix3m))
        }
        (None, _, _) => bail!("either --weekly-closes or both --price and --sma are required"),
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!("invalid timestamp '{s}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")
    })?;
    Ok(date.and_time(NaiveTime::MIN))
}

fn run_signal(
    market: MarketArgs,
    current: Option<Vec<f64>>,
    weekly_as_of: Option<&str>,
    daily_as_of: Option<&str>,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let params = load_params(config)?;
    let mut snapshot = build_snapshot(&market, &params)?;
    if let Some(s) = weekly_as_of {
        snapshot = snapshot.with_weekly_as_of(parse_timestamp(s)?);
    }
    if let Some(s) = daily_as_of {
        snapshot = snapshot.with_daily_as_of(parse_timestamp(s)?);
    }

    let mut generator = SignalGenerator::with_params(params);
    if let Some(weights) = current {
        let &[a, b, cash] = weights.as_slice() else {
            bail!(
                "--current takes exactly three weights (equity_a,equity_b,cash), got {}",
                weights.len()
            );
        };
        generator.set_current_allocation(a, b, cash)?;
    }

    let signal = generator.generate(&snapshot)?;
    if json {
        println!("{}", signal.to_json_pretty()?);
    } else {
        print_summary(&signal, generator.params());
    }
    Ok(())
}

fn run_allocation(market: MarketArgs, config: Option<&Path>) -> Result<()> {
    let params = load_params(config)?;
    let snapshot = build_snapshot(&market, &params)?;

    snapshot.check_finite()?;
    let ratio = snapshot.volatility_ratio()?;
    let trend = classify_trend(snapshot.trend_price, snapshot.trend_reference);
    let (a, b, cash) =
        calculate_allocation_with(trend, ratio, &params.thresholds).as_percentages();

    println!(
        "{} {a:.0}% | {} {b:.0}% | {} {cash:.0}%",
        params.equity_a_symbol, params.equity_b_symbol, params.cash_symbol
    );
    Ok(())
}

fn run_params(config: Option<&Path>) -> Result<()> {
    let params = load_params(config)?;
    print!("{}", params.to_toml()?);
    println!("# params_hash = \"{}\"", params.params_hash()?);
    Ok(())
}

fn format_as_of(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.to_string()).unwrap_or_else(|| "-".into())
}

fn print_summary(signal: &Signal, params: &StrategyParams) {
    println!();
    println!("=== TrendMonster Signal ===");
    println!(
        "Trend:          {} ({:.2} vs {:.2})",
        signal.trend(),
        signal.price(),
        signal.reference()
    );
    println!(
        "Volatility:     {} (ratio {:.4})",
        signal.vix_level(),
        signal.ratio()
    );
    println!("Posture:        {}", signal.posture());
    println!(
        "Allocation:     {}",
        signal.allocation().describe(|i| params.symbol(i))
    );
    println!();
    println!("--- Rebalance ---");
    println!("Required:       {}", signal.rebalance_required());
    println!("Action:         {}", signal.rebalance_instructions());
    println!();
    println!("Generated:      {}", signal.generated_at().format("%Y-%m-%d %H:%M:%S"));
    println!("Weekly as of:   {}", format_as_of(signal.weekly_as_of()));
    println!("Daily as of:    {}", format_as_of(signal.daily_as_of()));
    println!();
}
