pub mod candle;
pub mod error;
pub mod input;

pub use candle::{Candle, CandleInput};
pub use error::CandleError;
pub use input::{DecimalInput, TimestampInput};
