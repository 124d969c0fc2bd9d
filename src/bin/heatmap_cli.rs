//! Option Heatmap CLI
//!
//! Fetches a chain, resolves one contract and prints its P&L heatmap.
//! Without `--exp` it lists expirations; without `--strike` it lists strikes.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use option_heatmap::prelude::*;

#[derive(Parser)]
#[command(name = "heatmap_cli")]
#[command(about = "Print a Black-Scholes P&L heatmap for one option")]
struct Args {
    /// Underlying ticker, e.g. AAPL
    ticker: String,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    exp: Option<String>,

    /// Strike price
    #[arg(long)]
    strike: Option<f64>,

    /// Price the put instead of the call
    #[arg(long)]
    put: bool,

    /// Lowest underlying price (0 with --range-max 0 for the default range)
    #[arg(long, default_value = "0")]
    range_min: f64,

    /// Highest underlying price
    #[arg(long, default_value = "0")]
    range_max: f64,

    /// Fixed risk-free rate (fraction) instead of fetching ^IRX
    #[arg(long)]
    rate: Option<f64>,

    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn print_grid(grid: &HeatmapGrid) {
    print!("{:>10} |", "Price\\DTE");
    for day in &grid.cols {
        print!(" {:>6}", day);
    }
    println!();
    println!("{}", "-".repeat(12 + 7 * grid.cols.len()));

    for (price, row) in grid.rows.iter().zip(grid.values.outer_iter()) {
        print!("{:>10.2} |", price);
        for value in row.iter() {
            print!(" {:>6.1}", value);
        }
        println!();
    }
}

fn run(args: Args) -> HeatmapResult<()> {
    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let yahoo = YahooClient::new(config.market_data);
    let option_type = if args.put { OptionType::Put } else { OptionType::Call };

    let chain = yahoo.fetch_chain(&args.ticker)?;
    println!("{} underlying: ${:.2}", args.ticker.to_uppercase(), chain.underlying_price);

    let Some(exp) = args.exp else {
        println!("\nExpirations:");
        for exp in &chain.expirations {
            println!("  {}", exp);
        }
        return Ok(());
    };

    let Some(strike) = args.strike else {
        println!("\n{} strikes for {}:", option_type, exp);
        for strike in chain.strikes(&exp, option_type) {
            println!("  {:.2}", strike);
        }
        return Ok(());
    };

    let records = chain.side(option_type);
    let contract = match args.rate {
        Some(rate) => resolve_today(records, &exp, strike, option_type, &FixedRate(rate))?,
        None => resolve_today(records, &exp, strike, option_type, &yahoo)?,
    };

    println!("\nContract:");
    println!("  Type:     {}", contract.option_type);
    println!("  Strike:   ${:.2}", contract.strike_price);
    println!("  Time:     {:.0} days", contract.time_to_expiry * 365.0);
    println!("  Vol:      {:.2}%", contract.implied_volatility * 100.0);
    println!("  Rate:     {:.2}%", contract.risk_free_rate * 100.0);
    println!("  Last:     ${:.2}\n", contract.last_traded_price);

    let grid = generate(&contract, args.range_min, args.range_max)?;
    println!("P&L vs last price (%):");
    print_grid(&grid);

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
