use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::CandleError;
use crate::input::{DecimalInput, TimestampInput};

/// Raw fields for building a [`Candle`].
///
/// Every field is required; prices and times may arrive in any supported form
/// and are normalized by [`Candle::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct CandleInput {
    pub market: String,
    pub timeframe: String,
    pub open: DecimalInput,
    pub high: DecimalInput,
    pub low: DecimalInput,
    pub close: DecimalInput,
    pub volume: DecimalInput,
    pub open_time: TimestampInput,
    pub close_time: TimestampInput,
}

/// A single OHLCV candle for one market and timeframe.
///
/// Prices and volume are exact decimals and both times are UTC instants.
/// Market and timeframe are kept exactly as given. No ordering between
/// high/low or open/close time is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candle {
    market: String,
    timeframe: String,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
    open_time: DateTime<Utc>,
    close_time: DateTime<Utc>,
}

impl Candle {
    /// Normalize `input` into a candle.
    /// Fails on the first price or time string that does not parse.
    pub fn new(input: CandleInput) -> Result<Self, CandleError> {
        Ok(Self {
            market: input.market,
            timeframe: input.timeframe,
            open: input.open.normalize("open")?,
            high: input.high.normalize("high")?,
            low: input.low.normalize("low")?,
            close: input.close.normalize("close")?,
            volume: input.volume.normalize("volume")?,
            open_time: input.open_time.normalize("open_time")?,
            close_time: input.close_time.normalize("close_time")?,
        })
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn open(&self) -> Decimal {
        self.open
    }

    pub fn high(&self) -> Decimal {
        self.high
    }

    pub fn low(&self) -> Decimal {
        self.low
    }

    pub fn close(&self) -> Decimal {
        self.close
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn open_time(&self) -> DateTime<Utc> {
        self.open_time
    }

    pub fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }
}

impl TryFrom<CandleInput> for Candle {
    type Error = CandleError;

    fn try_from(input: CandleInput) -> Result<Self, Self::Error> {
        Candle::new(input)
    }
}
