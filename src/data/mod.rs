// Candle file loading for the CLI
mod candle_loader;

pub use candle_loader::{CandleFormat, load_candles, parse_csv, parse_json};
