//! Mutable dataset container owned by a mounted backdrop
//!
//! Seeded once at mount, perturbed in place on the low-frequency tick and
//! dropped on unmount.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::simulator::{base_price, MarketSimulator};
use super::types::{
    Candle, DepthLevel, FxRate, MacroIndicator, Quote, SectorReturn, Trade, YieldPoint,
};

/// Maximum prints kept on the tape
pub const TRADE_TAPE_CAPACITY: usize = 50;

/// Maximum points kept per sparkline
pub const SPARKLINE_CAPACITY: usize = 100;

/// Probability of a new print on each low-frequency tick
const TRADE_PROBABILITY: f64 = 0.3;

/// Symbol the candles, depth and tape are generated for
const CHART_SYMBOL: &str = "AAPL";

/// Bounded FIFO of trades, oldest evicted first
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TradeTape {
    trades: VecDeque<Trade>,
}

impl TradeTape {
    pub fn new() -> Self {
        Self {
            trades: VecDeque::with_capacity(TRADE_TAPE_CAPACITY),
        }
    }

    pub fn push(&mut self, trade: Trade) {
        if self.trades.len() >= TRADE_TAPE_CAPACITY {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Trade> + ExactSizeIterator {
        self.trades.iter()
    }

    /// Get last N trades, oldest first
    pub fn last_n(&self, n: usize) -> Vec<&Trade> {
        let start = self.trades.len().saturating_sub(n);
        self.trades.range(start..).collect()
    }
}

/// Price history for one symbol, bounded to [`SPARKLINE_CAPACITY`] points
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Sparkline {
    pub symbol: String,
    prices: VecDeque<f64>,
    pub current: f64,
}

impl Sparkline {
    pub fn new(symbol: impl Into<String>, history: Vec<f64>) -> Self {
        let mut line = Self {
            symbol: symbol.into(),
            prices: VecDeque::with_capacity(SPARKLINE_CAPACITY),
            current: 0.0,
        };
        for price in history {
            line.push(price);
        }
        line
    }

    pub fn push(&mut self, price: f64) {
        if self.prices.len() >= SPARKLINE_CAPACITY {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
        self.current = price;
    }

    pub fn prices(&self) -> &VecDeque<f64> {
        &self.prices
    }

    pub fn first(&self) -> Option<f64> {
        self.prices.front().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Up relative to the start of the visible window
    pub fn is_up(&self) -> bool {
        self.first().map(|first| self.current >= first).unwrap_or(true)
    }
}

/// What to generate at mount
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetSpec {
    pub symbols: Vec<String>,
    pub sparkline_symbols: usize,
    pub candle_count: usize,
    pub candle_timeframe_ms: i64,
    pub depth_levels: usize,
    pub initial_trades: usize,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            symbols: ["AAPL", "GOOGL", "MSFT", "TSLA", "NVDA", "META", "AMZN", "NFLX"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sparkline_symbols: 6,
            candle_count: 60,
            candle_timeframe_ms: 60_000,
            depth_levels: 15,
            initial_trades: 12,
        }
    }
}

/// Every dataset the panels render
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MarketState {
    pub quotes: Vec<Quote>,
    pub candles: Vec<Candle>,
    pub depth: Vec<DepthLevel>,
    pub trades: TradeTape,
    pub sectors: Vec<SectorReturn>,
    pub fx_rates: Vec<FxRate>,
    pub yields: Vec<YieldPoint>,
    pub headlines: Vec<String>,
    pub sparklines: Vec<Sparkline>,
    pub macro_data: Vec<MacroIndicator>,
}

impl MarketState {
    /// Generate all datasets once, at mount
    pub fn seed(sim: &mut MarketSimulator, spec: &DatasetSpec, now_ms: i64) -> Self {
        let chart_base = base_price(CHART_SYMBOL);

        let mut trades = TradeTape::new();
        for trade in sim.generate_trades(spec.initial_trades, chart_base, 30_000, now_ms) {
            trades.push(trade);
        }

        let spark_symbols: Vec<String> = spec
            .symbols
            .iter()
            .take(spec.sparkline_symbols)
            .cloned()
            .collect();

        Self {
            quotes: sim.generate_quotes(&spec.symbols, now_ms),
            candles: sim.generate_candles(spec.candle_count, chart_base, spec.candle_timeframe_ms),
            depth: sim.generate_depth(chart_base, spec.depth_levels),
            trades,
            sectors: sim.generate_sector_returns(),
            fx_rates: sim.generate_fx_rates(),
            yields: sim.generate_yield_curve(),
            sparklines: sim
                .generate_sparklines(&spark_symbols)
                .into_iter()
                .map(|(symbol, prices)| Sparkline::new(symbol, prices))
                .collect(),
            macro_data: sim.generate_macro_data(),
            headlines: sim.generate_headlines(),
        }
    }

    /// Low-frequency tick: walk quotes, maybe print a trade, extend sparklines
    pub fn update(&mut self, sim: &mut MarketSimulator, now_ms: i64) {
        let mid = self.tape_mid_price();
        let rng = sim.live_rng();

        for quote in &mut self.quotes {
            let change = (rng.next() - 0.5) * 0.1;
            quote.price *= 1.0 + change / 100.0;
            quote.change_pct += change * 0.1;
            quote.last_update_ms = now_ms;
        }

        let print = rng.chance(TRADE_PROBABILITY);

        for spark in &mut self.sparklines {
            let last = spark.last().unwrap_or(spark.current);
            spark.push(last * (1.0 + (rng.next() - 0.5) * 0.02));
        }

        if print {
            let trade = sim.next_trade(mid, now_ms);
            self.trades.push(trade);
        }
    }

    /// Reference price for new prints: the chart symbol's live quote
    fn tape_mid_price(&self) -> f64 {
        self.quotes
            .iter()
            .find(|q| q.symbol == CHART_SYMBOL)
            .or_else(|| self.quotes.first())
            .map(|q| q.price)
            .unwrap_or_else(|| base_price(CHART_SYMBOL))
    }
}
