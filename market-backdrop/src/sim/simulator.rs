//! Synthetic market data generators
//!
//! A [`MarketSimulator`] is the explicit simulator context for one mounted
//! backdrop. It owns independent RNG streams so that seeding the initial
//! datasets and perturbing them on the live tick never disturb each other:
//!
//! - `market`: quotes, candles, depth, trades, sectors, FX, yields
//! - `feed`: sparklines and headlines
//! - `live`: low-frequency tick perturbations

use super::rng::SeededRng;
use super::stochastic::{geometric_brownian_motion, PRICE_FLOOR};
use super::types::{
    BookSide, Candle, DepthLevel, FxRate, MacroIndicator, Quote, SectorReturn, Side, Trade,
    YieldPoint,
};

/// Fallback base price for symbols outside [`BASE_PRICES`]
const DEFAULT_BASE_PRICE: f64 = 100.0;

const BASE_PRICES: [(&str, f64); 12] = [
    ("AAPL", 192.45),
    ("GOOGL", 168.83),
    ("MSFT", 421.12),
    ("TSLA", 218.54),
    ("NVDA", 130.91),
    ("META", 311.34),
    ("AMZN", 147.92),
    ("NFLX", 485.23),
    ("CRM", 267.45),
    ("ORCL", 142.67),
    ("ADBE", 563.21),
    ("INTC", 43.76),
];

const SECTORS: [&str; 12] = [
    "Technology",
    "Healthcare",
    "Financials",
    "Consumer Disc.",
    "Industrials",
    "Energy",
    "Materials",
    "Consumer Staples",
    "Utilities",
    "Real Estate",
    "Communication",
    "Others",
];

const FX_PAIRS: [(&str, f64); 6] = [
    ("EUR/USD", 1.0854),
    ("USD/JPY", 149.82),
    ("GBP/USD", 1.2634),
    ("USD/CHF", 0.8976),
    ("AUD/USD", 0.6534),
    ("USD/CAD", 1.3621),
];

const YIELD_CURVE: [(&str, f64); 8] = [
    ("1M", 4.8),
    ("3M", 4.9),
    ("6M", 5.0),
    ("1Y", 4.7),
    ("2Y", 4.5),
    ("5Y", 4.2),
    ("10Y", 4.3),
    ("30Y", 4.4),
];

/// Pool sampled by [`MarketSimulator::generate_headlines`]
pub const HEADLINE_POOL: [&str; 8] = [
    "Fed Officials Signal Cautious Approach to Rate Cuts Amid Inflation Data",
    "Tech Earnings Beat Expectations as AI Investment Drives Growth",
    "Oil Prices Rally on Middle East Supply Concerns and OPEC+ Cuts",
    "Dollar Strengthens Against Majors as Treasury Yields Rise",
    "Equity Markets Show Resilience Despite Geopolitical Headwinds",
    "Central Bank Digital Currency Trials Expand in Major Economies",
    "Green Energy Sector Attracts Record Investment Flows",
    "Volatility Index Drops as Market Sentiment Improves",
];

/// Look up the reference price of a symbol
pub fn base_price(symbol: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Seeded simulator context, constructed once per mount
#[derive(Debug, Clone)]
pub struct MarketSimulator {
    seed: String,
    market: SeededRng,
    feed: SeededRng,
    live: SeededRng,
    /// Wall clock the candle history is anchored to (epoch ms)
    base_time_ms: i64,
}

impl MarketSimulator {
    pub fn new(seed: &str, base_time_ms: i64) -> Self {
        Self {
            seed: seed.to_string(),
            market: SeededRng::new(seed),
            feed: SeededRng::new(&format!("{seed}/news-feed")),
            live: SeededRng::new(&format!("{seed}/live")),
            base_time_ms,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn base_time_ms(&self) -> i64 {
        self.base_time_ms
    }

    /// RNG stream reserved for low-frequency tick perturbations
    pub fn live_rng(&mut self) -> &mut SeededRng {
        &mut self.live
    }

    pub fn generate_quotes(&mut self, symbols: &[String], now_ms: i64) -> Vec<Quote> {
        let rng = &mut self.market;
        symbols
            .iter()
            .map(|symbol| {
                let base = base_price(symbol);
                let volatility = rng.range(0.02, 0.08);
                let phase = rng.range(0.0, std::f64::consts::TAU);
                let time_variation = (now_ms as f64 * 0.001 + phase).sin();
                let price =
                    (base * (1.0 + volatility * time_variation * rng.range(0.5, 1.5))).max(PRICE_FLOOR);
                Quote {
                    symbol: symbol.clone(),
                    price,
                    change_pct: (price - base) / base * 100.0,
                    last_update_ms: now_ms + rng.range(-5000.0, 0.0) as i64,
                }
            })
            .collect()
    }

    /// Random-walk candle history, `timeframe_ms` apart, starting at `base_price`
    pub fn generate_candles(&mut self, count: usize, base_price: f64, timeframe_ms: i64) -> Vec<Candle> {
        let rng = &mut self.market;
        let mut candles = Vec::with_capacity(count);
        let mut current = base_price.max(PRICE_FLOOR);

        for i in 0..count {
            let volatility = rng.range(0.015, 0.045);
            let trend = rng.range(-0.002, 0.002);

            let open = current;
            let price_move = open * trend + rng.jitter(0.0, open * volatility);
            let close = (open + price_move).max(PRICE_FLOOR);

            let wick = price_move.abs() * 0.5;
            let high = open.max(close) + rng.range(0.0, wick);
            let low = (open.min(close) - rng.range(0.0, wick)).max(PRICE_FLOOR.min(open.min(close)));

            candles.push(Candle {
                open,
                high,
                low,
                close,
                timestamp_ms: self.base_time_ms + i as i64 * timeframe_ms,
            });

            current = close;
        }

        candles
    }

    /// Bid and ask ladders around `mid_price`, bids first
    ///
    /// Bid prices strictly decrease and ask prices strictly increase with the
    /// level index; sizes decay as `exp(-0.3 * i)`.
    pub fn generate_depth(&mut self, mid_price: f64, levels: usize) -> Vec<DepthLevel> {
        if mid_price <= 0.0 || !mid_price.is_finite() {
            return Vec::new();
        }

        let rng = &mut self.market;
        let spread = mid_price * rng.range(0.0001, 0.0008);
        let mut depth = Vec::with_capacity(levels * 2);

        for (side, sign) in [(BookSide::Bid, -1.0), (BookSide::Ask, 1.0)] {
            for i in 0..levels {
                let price = mid_price + sign * (spread / 2.0 + i as f64 * spread * 0.1);
                let size = rng.range(100.0, 5000.0) * (-(i as f64) * 0.3).exp();
                depth.push(DepthLevel { price, size, side });
            }
        }

        depth
    }

    /// `count` trades spread evenly over the `timespan_ms` ending at `now_ms`
    pub fn generate_trades(&mut self, count: usize, mid_price: f64, timespan_ms: i64, now_ms: i64) -> Vec<Trade> {
        if count == 0 {
            return Vec::new();
        }
        let step = timespan_ms as f64 / count as f64;
        (0..count)
            .map(|i| {
                let at = now_ms - ((count - i) as f64 * step) as i64;
                Self::trade_from(&mut self.market, mid_price, at)
            })
            .collect()
    }

    /// A single fresh print stamped `now_ms`, drawn from the live stream
    pub fn next_trade(&mut self, mid_price: f64, now_ms: i64) -> Trade {
        Self::trade_from(&mut self.live, mid_price, now_ms)
    }

    fn trade_from(rng: &mut SeededRng, mid_price: f64, timestamp_ms: i64) -> Trade {
        let side = if rng.next() > 0.5 { Side::Buy } else { Side::Sell };
        let price = (mid_price + rng.jitter(0.0, mid_price * 0.002)).max(PRICE_FLOOR);
        let size = rng.range(10.0, 1000.0);
        Trade { price, size, side, timestamp_ms }
    }

    pub fn generate_sector_returns(&mut self) -> Vec<SectorReturn> {
        SECTORS
            .iter()
            .map(|sector| SectorReturn {
                sector: sector.to_string(),
                return_pct: self.market.range(-3.5, 3.5),
            })
            .collect()
    }

    pub fn generate_fx_rates(&mut self) -> Vec<FxRate> {
        FX_PAIRS
            .iter()
            .map(|(pair, base)| {
                let volatility = self.market.range(0.005, 0.02);
                let rate = base * (1.0 + self.market.jitter(0.0, volatility));
                FxRate {
                    pair: pair.to_string(),
                    rate,
                    change_pct: (rate - base) / base * 100.0,
                }
            })
            .collect()
    }

    pub fn generate_yield_curve(&mut self) -> Vec<YieldPoint> {
        YIELD_CURVE
            .iter()
            .map(|(tenor, base)| YieldPoint {
                tenor: tenor.to_string(),
                yield_pct: base + self.market.jitter(0.0, 0.3),
            })
            .collect()
    }

    /// GBM price histories, one per symbol, drawn from the feed stream
    pub fn generate_sparklines(&mut self, symbols: &[String]) -> Vec<(String, Vec<f64>)> {
        symbols
            .iter()
            .map(|symbol| {
                let prices = geometric_brownian_motion(100.0, 0.05, 0.2, 50, 0.1, &mut self.feed);
                (symbol.clone(), prices)
            })
            .collect()
    }

    /// Macro dashboard values from a dedicated stream, identical on every call
    pub fn generate_macro_data(&self) -> Vec<MacroIndicator> {
        let mut rng = SeededRng::new(&format!("{}/macro-data", self.seed));
        let mut indicator = |name: &str, center: f64, variance: f64, change: f64| MacroIndicator {
            name: name.to_string(),
            value: rng.jitter(center, variance),
            change: rng.range(-change, change),
        };
        vec![
            indicator("10Y Treasury", 4.2, 0.1, 0.05),
            indicator("VIX", 18.5, 2.0, 1.0),
            indicator("Gold", 2045.0, 20.0, 15.0),
            indicator("Oil (WTI)", 78.5, 3.0, 2.0),
            indicator("DXY", 104.2, 1.0, 0.5),
            indicator("Bitcoin", 67500.0, 2000.0, 5.0),
        ]
    }

    /// 3 or 4 distinct headlines sampled without replacement, in random order
    pub fn generate_headlines(&mut self) -> Vec<String> {
        let count = self.feed.range(3.0, 5.0).floor() as usize;
        let mut pool: Vec<&str> = HEADLINE_POOL.to_vec();
        let mut selected = Vec::with_capacity(count);

        while selected.len() < count && !pool.is_empty() {
            let index = (self.feed.next() * pool.len() as f64) as usize;
            selected.push(pool.swap_remove(index.min(pool.len() - 1)).to_string());
        }

        selected
    }
}
