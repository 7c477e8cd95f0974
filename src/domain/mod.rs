// Domain types and value objects
mod candle;
mod timeframe;

// Re-export commonly used types to the world
pub use candle::Candle;
pub use timeframe::Timeframe;
