use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ohlcv_core::candle::{Candle, CandleInput};
use ohlcv_core::input::{DecimalInput, TimestampInput};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "ohlcv", about = "Normalize OHLCV candle inputs")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a candle and print its normalized fields
    Candle {
        /// Market code, e.g. KRW-BTC
        #[arg(long)]
        market: String,

        /// Candle period, e.g. 1m
        #[arg(long)]
        timeframe: String,

        #[arg(long, allow_hyphen_values = true)]
        open: String,

        #[arg(long, allow_hyphen_values = true)]
        high: String,

        #[arg(long, allow_hyphen_values = true)]
        low: String,

        #[arg(long, allow_hyphen_values = true)]
        close: String,

        #[arg(long, allow_hyphen_values = true)]
        volume: String,

        /// ISO-8601 open time (naive times are UTC)
        #[arg(long)]
        open_time: String,

        /// ISO-8601 close time (naive times are UTC)
        #[arg(long)]
        close_time: String,
    },

    /// Normalize one or more values as exact decimals
    Decimal {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Normalize one or more ISO-8601 timestamps to UTC
    Timestamp {
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn render_candle(candle: &Candle) -> String {
    [
        format!("market:     {}", candle.market()),
        format!("timeframe:  {}", candle.timeframe()),
        format!("open:       {}", candle.open()),
        format!("high:       {}", candle.high()),
        format!("low:        {}", candle.low()),
        format!("close:      {}", candle.close()),
        format!("volume:     {}", candle.volume()),
        format!("open_time:  {}", candle.open_time().to_rfc3339()),
        format!("close_time: {}", candle.close_time().to_rfc3339()),
    ]
    .join("\n")
}

fn cmd_candle(input: CandleInput) -> Result<()> {
    let market = input.market.clone();
    let candle = Candle::new(input).with_context(|| format!("invalid candle for {market}"))?;
    info!(
        "{market}: normalized {} candle at {}",
        candle.timeframe(),
        candle.open_time()
    );
    println!("{}", render_candle(&candle));
    Ok(())
}

fn cmd_decimal(values: &[String]) -> Result<()> {
    let mut failures = 0;
    for value in values {
        match DecimalInput::from(value.as_str()).normalize("value") {
            Ok(decimal) => {
                debug!("{value:?}: scale {}", decimal.scale());
                println!("{value} -> {decimal}");
            }
            Err(e) => {
                warn!("{e}");
                println!("{value} -> ERROR");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} value(s) failed to parse", values.len());
    }
    Ok(())
}

fn cmd_timestamp(values: &[String]) -> Result<()> {
    let mut failures = 0;
    for value in values {
        match TimestampInput::from(value.as_str()).normalize("value") {
            Ok(ts) => println!("{value} -> {}", ts.to_rfc3339()),
            Err(e) => {
                warn!("{e}");
                println!("{value} -> ERROR");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} value(s) failed to parse", values.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.command {
        Commands::Candle {
            market,
            timeframe,
            open,
            high,
            low,
            close,
            volume,
            open_time,
            close_time,
        } => {
            cmd_candle(CandleInput {
                market,
                timeframe,
                open: open.into(),
                high: high.into(),
                low: low.into(),
                close: close.into(),
                volume: volume.into(),
                open_time: open_time.into(),
                close_time: close_time.into(),
            })?;
        }
        Commands::Decimal { values } => {
            cmd_decimal(&values)?;
        }
        Commands::Timestamp { values } => {
            cmd_timestamp(&values)?;
        }
    }

    Ok(())
}
