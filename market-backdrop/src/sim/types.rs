/// Value records produced by the market simulator
///
/// Every record is a plain serializable value: no identity beyond its fields.
use serde::{Deserialize, Serialize};

/// Last-price quote for a single symbol
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Quote {
    pub symbol: String,
    /// Last price, always > 0
    pub price: f64,
    /// Percentage change vs. the base price
    pub change_pct: f64,
    /// Wall clock of the last update (epoch ms)
    pub last_update_ms: i64,
}

/// OHLC candle
///
/// Invariant: `high >= max(open, close)` and `low <= min(open, close)`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp_ms: i64,
}

impl Candle {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Side of an order book level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BookSide {
    Bid,
    Ask,
}

/// One price level of the order book ladder
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DepthLevel {
    pub price: f64,
    pub size: f64,
    pub side: BookSide,
}

/// Aggressor side of a trade (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Convert to display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }

    /// Check if this is a buy
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single print on the tape
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Trade {
    pub price: f64,
    pub size: f64,
    pub side: Side,
    /// Execution wall clock (epoch ms)
    pub timestamp_ms: i64,
}

/// Daily return of a market sector, in [-3.5, 3.5] percent
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectorReturn {
    pub sector: String,
    pub return_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FxRate {
    pub pair: String,
    pub rate: f64,
    pub change_pct: f64,
}

/// Macro dashboard entry (yields, commodities, indices)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MacroIndicator {
    pub name: String,
    pub value: f64,
    pub change: f64,
}

/// Point on the treasury yield curve
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct YieldPoint {
    pub tenor: String,
    pub yield_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Buy.to_string(), "Buy");
        assert_eq!(Side::Sell.to_string(), "Sell");
        assert!(Side::Buy.is_buy());
        assert!(!Side::Sell.is_buy());
    }

    #[test]
    fn test_candle_direction() {
        let up = Candle { open: 1.0, high: 2.0, low: 0.5, close: 1.5, timestamp_ms: 0 };
        let down = Candle { open: 1.5, high: 2.0, low: 0.5, close: 1.0, timestamp_ms: 0 };
        assert!(up.is_up());
        assert!(!down.is_up());
    }

    #[test]
    fn test_trade_serde() {
        let trade = Trade { price: 100.5, size: 10.0, side: Side::Sell, timestamp_ms: 1_700_000_000_000 };
        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"side\":\"Sell\""));
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }
}
