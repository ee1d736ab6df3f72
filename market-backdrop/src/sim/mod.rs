//! Deterministic synthetic market feed
//!
//! Provides:
//! - A seeded LCG and stochastic series (GBM, EMA)
//! - Dataset generators for every panel
//! - The mutable [`MarketState`] container and its low-frequency tick

mod rng;
mod simulator;
mod state;
mod stochastic;
mod types;

pub use rng::SeededRng;
pub use simulator::{base_price, MarketSimulator, HEADLINE_POOL};
pub use state::{
    DatasetSpec, MarketState, Sparkline, TradeTape, SPARKLINE_CAPACITY, TRADE_TAPE_CAPACITY,
};
pub use stochastic::{ema, geometric_brownian_motion, PRICE_FLOOR};
pub use types::{
    BookSide, Candle, DepthLevel, FxRate, MacroIndicator, Quote, SectorReturn, Side, Trade,
    YieldPoint,
};
