//! Straddle Watch - Main Entry Point
//!
//! Evaluates one symbol / strike / expiry and prints the straddle suggestion.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use straddle_watch::config::Config;
use straddle_watch::market::{NseClient, YahooClient};
use straddle_watch::report;
use straddle_watch::strategy::{Expiry, StraddleEvaluator, StraddleQuery};
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_SYMBOL: &str = "BANKNIFTY";
const DEFAULT_STRIKE: &str = "49000";
const DEFAULT_EXPIRY: &str = "07-Aug-2025";

/// Straddle Watch CLI
#[derive(Parser)]
#[command(name = "straddle-watch")]
#[command(
    version,
    about = "CE/PE prices, IV, OI, events and a BUY/AVOID straddle suggestion for NSE options"
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    query: QueryArgs,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a straddle for one symbol, strike and expiry (default)
    Evaluate {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show market-moving corporate announcements for a symbol
    Events {
        /// Stock or index symbol (e.g. RELIANCE)
        #[arg(short, long, default_value = DEFAULT_SYMBOL)]
        symbol: String,
    },

    /// Show global market cues
    Cues,
}

#[derive(Args)]
struct QueryArgs {
    /// Stock or index symbol (e.g. BANKNIFTY, NIFTY, RELIANCE)
    #[arg(short, long, default_value = DEFAULT_SYMBOL)]
    symbol: String,

    /// Strike price exactly as listed in the chain (e.g. 49000)
    #[arg(short = 'k', long, default_value = DEFAULT_STRIKE)]
    strike: Decimal,

    /// Expiry date (e.g. 07-Aug-2025)
    #[arg(short, long, default_value = DEFAULT_EXPIRY)]
    expiry: Expiry,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let _log_guard = init_logging()?;

    // Load configuration
    let config = Config::load()?;
    config.validate().context("Invalid configuration")?;
    log_config(&config);

    let nse = NseClient::new(&config.nse)?;
    let yahoo = YahooClient::new(&config.yahoo)?;
    let evaluator = StraddleEvaluator::new(
        &config,
        Box::new(nse.clone()),
        Box::new(nse),
        Box::new(yahoo),
    );
    let as_of = Local::now().date_naive();

    match cli.command {
        Some(Commands::Evaluate { query, json }) => {
            run_evaluate(&evaluator, query, json, as_of).await?;
        }
        Some(Commands::Events { symbol }) => {
            let (events, available) = evaluator.scan_events(&symbol, as_of).await;
            let mut out = String::new();
            report::render_events(&mut out, &events, available)?;
            print!("{}", out);
        }
        Some(Commands::Cues) => {
            let cues = evaluator.macro_cues().await;
            let mut out = String::new();
            report::render_macro_cues(&mut out, &cues)?;
            print!("{}", out);
        }
        None => {
            run_evaluate(&evaluator, cli.query, cli.json, as_of).await?;
        }
    }

    Ok(())
}

async fn run_evaluate(
    evaluator: &StraddleEvaluator,
    args: QueryArgs,
    json: bool,
    as_of: chrono::NaiveDate,
) -> Result<()> {
    let query = StraddleQuery::new(&args.symbol, args.strike, args.expiry);
    info!(
        symbol = %query.symbol,
        strike = %query.strike,
        expiry = %query.expiry,
        "📊 Evaluating straddle"
    );

    let evaluation = evaluator.evaluate(&query, as_of).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&evaluation).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report::render(&evaluation)?);
    }

    Ok(())
}

/// Initialize logging to stderr and a daily rolling file.
///
/// Stdout is reserved for the report so `--json` output stays parseable.
fn init_logging() -> Result<WorkerGuard> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::daily("logs", "straddle-watch.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("straddle_watch=debug".parse()?)
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr.and(file_writer))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("📋 Configuration:");
    info!("   NSE: {}", config.nse.base_url);
    info!("   Yahoo: {}", config.yahoo.base_url);
    info!(
        "   Event keywords: {:?} (first {}, case-sensitive: {})",
        config.events.keywords, config.events.lookback, config.events.case_sensitive
    );
    if let Some(days) = config.events.max_age_days {
        info!("   Event window: {} days", days);
    }
    info!(
        "   IV thresholds: low < {}%, high > {}%",
        config.decision.low_iv, config.decision.high_iv
    );
    info!("   Macro failure policy: {:?}", config.macro_cues.policy);
}
